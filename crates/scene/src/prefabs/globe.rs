use foundation::color::Rgb;
use foundation::math::Vec3;

use crate::World;
use crate::components::{Drawable3D, Material, Shape3D, Transform, Visibility};
use crate::entity::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    pub radius: f64,
    pub segments: u32,
    /// Atmosphere shell size relative to the globe.
    pub atmosphere_scale: f64,
    pub focus_circle_count: usize,
    pub focus_circle_segments: u32,
    pub focus_circle_color: Rgb,
    pub focus_circle_width: f32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            segments: 32,
            atmosphere_scale: 1.1,
            focus_circle_count: 3,
            focus_circle_segments: 32,
            focus_circle_color: Rgb::from_hex(0xcccccc),
            focus_circle_width: 2.0,
        }
    }
}

/// Entity handles of the globe scene graph.
///
/// ```text
/// marker_root          (shown while tracked; the backend applies the pose from `RenderFrame.camera`)
/// └── pivot            (spins while the marker is visible)
///     ├── points       (city markers)
///     ├── earth
///     ├── atmosphere
///     └── focus circles (hidden)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeRig {
    pub marker_root: EntityId,
    pub pivot: EntityId,
    pub points: EntityId,
    pub earth: EntityId,
    pub atmosphere: EntityId,
    pub focus_circles: Vec<EntityId>,
    pub radius: f64,
}

impl GlobeRig {
    /// Binds the earth texture once it has loaded.
    pub fn set_earth_texture(&self, world: &mut World, texture: impl Into<String>) {
        if let Some(drawable) = world.drawable_3d_mut(self.earth) {
            drawable.material = Material::Earth {
                texture: Some(texture.into()),
            };
        }
    }

    pub fn spin(&self, world: &mut World, delta_rad: f64) {
        if let Some(t) = world.transform_mut(self.pivot) {
            t.yaw_rad += delta_rad;
        }
    }

    pub fn yaw_rad(&self, world: &World) -> f64 {
        world.transform(self.pivot).map(|t| t.yaw_rad).unwrap_or(0.0)
    }
}

pub fn spawn_globe(world: &mut World, config: &GlobeConfig) -> GlobeRig {
    let marker_root = world.spawn_group("marker_root", None);
    let pivot = world.spawn_group("pivot", Some(marker_root));
    let points = world.spawn_group("points", Some(pivot));

    let earth = world.spawn();
    world.set_name(earth, "earth");
    world.set_parent(earth, pivot);
    world.set_transform(earth, Transform::identity());
    world.set_drawable_3d(
        earth,
        Drawable3D::sphere(
            config.radius,
            config.segments,
            Material::Earth { texture: None },
        ),
    );

    let atmosphere = world.spawn();
    world.set_name(atmosphere, "atmosphere");
    world.set_parent(atmosphere, pivot);
    world.set_transform(
        atmosphere,
        Transform::identity().with_scale(Vec3::splat(config.atmosphere_scale)),
    );
    world.set_drawable_3d(
        atmosphere,
        Drawable3D::sphere(config.radius, config.segments, Material::Atmosphere),
    );

    let focus_circles = (0..config.focus_circle_count)
        .map(|i| {
            let circle = world.spawn();
            world.set_name(circle, format!("focus_circle_{i}"));
            world.set_parent(circle, pivot);
            world.set_transform(circle, Transform::identity());
            world.set_visibility(circle, Visibility::hidden());
            world.set_drawable_3d(
                circle,
                Drawable3D::new(
                    Shape3D::Ring {
                        radius: 1.0,
                        segments: config.focus_circle_segments,
                    },
                    Material::Line {
                        color: config.focus_circle_color,
                        width: config.focus_circle_width,
                    },
                ),
            );
            circle
        })
        .collect();

    GlobeRig {
        marker_root,
        pivot,
        points,
        earth,
        atmosphere,
        focus_circles,
        radius: config.radius,
    }
}
