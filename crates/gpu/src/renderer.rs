use foundation::time::Time;
use runtime::frame::Frame;
use scene::components::{Material, Shape3D, Transform};
use scene::entity::EntityId;
use scene::world::World;

/// Camera driven by the AR context.
///
/// The projection arrives once the tracker's camera parameters have loaded;
/// until then the backend falls back to its own default.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ArCamera {
    /// Column-major 4x4 projection matrix.
    pub projection: Option<[f64; 16]>,
    /// Column-major pose of the tracked marker.
    pub marker_pose: Option<[f64; 16]>,
}

impl ArCamera {
    /// Column-major RH perspective with depth range `[0, 1]`, used until the AR context
    /// supplies its calibrated projection.
    pub fn perspective_projection(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [f64; 16] {
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        let m22 = far / (near - far);
        let m23 = (near * far) / (near - far);
        [
            f / aspect, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, m22, -1.0, //
            0.0, 0.0, m23, 0.0,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Draw {
        entity: EntityId,
        /// World-space transform.
        transform: Transform,
        shape: Shape3D,
        material: Material,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub frame_index: u64,
    pub time: Time,
    pub camera: ArCamera,
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    pub fn draw_count(&self) -> usize {
        self.commands.len()
    }
}

/// The rendering collaborator. Implementations own the GPU and the composite over the camera feed.
pub trait RenderBackend {
    fn submit(&mut self, frame: &RenderFrame);
}

/// Backend that keeps every submitted frame; used headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    frames: Vec<RenderFrame>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RenderFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&RenderFrame> {
        self.frames.last()
    }
}

impl RenderBackend for RecordingBackend {
    fn submit(&mut self, frame: &RenderFrame) {
        self.frames.push(frame.clone());
    }
}

pub struct Renderer;

impl Renderer {
    /// Flattens the visible part of the world into draw commands, in entity order.
    pub fn collect(world: &World, camera: ArCamera, frame: Frame) -> RenderFrame {
        let commands = world
            .drawables_3d()
            .into_iter()
            .map(|(entity, transform, drawable)| RenderCommand::Draw {
                entity,
                transform,
                shape: drawable.shape,
                material: drawable.material,
            })
            .collect();
        RenderFrame {
            frame_index: frame.index,
            time: frame.time,
            camera,
            commands,
        }
    }
}
