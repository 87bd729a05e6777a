use formats::FontFace;
use gpu::{ArCamera, RenderBackend, RenderFrame, Renderer};
use runtime::{Event, EventBus, EventKind, Frame, MarkerTracker, ResourceError, ResourceSlot};
use scene::components::Visibility;
use scene::prefabs::{GlobeRig, spawn_globe};
use scene::{CityMarkers, CityPlacement, CityRegistry, GeoCity, World};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;

/// One running AR globe: the scene, the city markers and the per-frame state.
pub struct GlobeSession {
    config: SessionConfig,
    world: World,
    rig: GlobeRig,
    markers: CityMarkers,
    events: EventBus,
    frame: Frame,
    camera: ArCamera,
    texture: ResourceSlot<String>,
    font: ResourceSlot<FontFace>,
    camera_parameters: ResourceSlot<[f64; 16]>,
}

impl GlobeSession {
    pub fn new(config: SessionConfig) -> Self {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &config.globe_config());
        // Nothing is shown until the tracker finds the marker.
        world.set_visibility(rig.marker_root, Visibility::hidden());
        let markers = CityMarkers::new(config.marker_config());
        info!(
            radius = rig.radius,
            labels = config.labels,
            "globe session created"
        );
        Self {
            config,
            world,
            rig,
            markers,
            events: EventBus::new(),
            frame: Frame::first(),
            camera: ArCamera::default(),
            texture: ResourceSlot::new("texture"),
            font: ResourceSlot::new("font"),
            camera_parameters: ResourceSlot::new("camera_parameters"),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn rig(&self) -> &GlobeRig {
        &self.rig
    }

    pub fn markers(&self) -> &CityMarkers {
        &self.markers
    }

    pub fn registry(&self) -> &CityRegistry {
        self.markers.registry()
    }

    /// Events recorded since the last [`GlobeSession::drain_events`].
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Hands the pending events to the host and clears the bus.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn camera(&self) -> ArCamera {
        self.camera
    }

    pub fn texture(&self) -> &ResourceSlot<String> {
        &self.texture
    }

    pub fn font(&self) -> &ResourceSlot<FontFace> {
        &self.font
    }

    pub fn camera_parameters(&self) -> &ResourceSlot<[f64; 16]> {
        &self.camera_parameters
    }

    pub fn add_cities(&mut self, cities: &[GeoCity]) -> Vec<CityPlacement> {
        let placements: Vec<CityPlacement> =
            cities.iter().map(|city| self.add_city(city)).collect();
        info!(
            added = placements.len(),
            total = self.registry().len(),
            "cities added"
        );
        placements
    }

    pub fn add_city(&mut self, city: &GeoCity) -> CityPlacement {
        let placement = self.markers.add_city(&mut self.world, &self.rig, city);
        let kind = if placement.replaced {
            EventKind::CityUpdated
        } else {
            EventKind::CityPlaced
        };
        self.events.emit(self.frame, kind, city.name.clone());
        placement
    }

    /// Binds the earth texture, or leaves the globe untextured when loading failed.
    pub fn on_texture_loaded<E: std::fmt::Display>(&mut self, result: Result<String, E>) {
        let settled = self.texture.settle(result);
        let failure = self.texture.failure().map(str::to_string);
        if self.report(self.texture.name(), settled, failure) == Some(true)
            && let Some(texture) = self.texture.get()
        {
            self.rig.set_earth_texture(&mut self.world, texture.clone());
        }
    }

    /// Enables labels for cities added after this point, when labels are configured.
    pub fn on_font_loaded<E: std::fmt::Display>(&mut self, result: Result<FontFace, E>) {
        let settled = self.font.settle(result);
        let failure = self.font.failure().map(str::to_string);
        if self.report(self.font.name(), settled, failure) == Some(true)
            && let Some(face) = self.font.get()
        {
            self.markers.set_label_font(face.family.clone());
        }
    }

    pub fn on_camera_ready<E: std::fmt::Display>(&mut self, result: Result<[f64; 16], E>) {
        let settled = self.camera_parameters.settle(result);
        let failure = self.camera_parameters.failure().map(str::to_string);
        if self.report(self.camera_parameters.name(), settled, failure) == Some(true) {
            self.camera.projection = self.camera_parameters.get().copied();
        }
    }

    /// Advances one frame: spins the globe while the marker is visible, then polls the tracker.
    pub fn update(&mut self, dt_s: f64, tracker: &mut impl MarkerTracker) {
        self.frame = self.frame.advance(dt_s);

        if self.world.is_visible(self.rig.marker_root) {
            self.rig.spin(&mut self.world, self.config.spin_rad_per_frame);
        }

        if !tracker.source_ready() {
            return;
        }
        let state = tracker.update();
        let was_visible = self.world.is_visible(self.rig.marker_root);
        let visibility = if state.marker_visible {
            Visibility::visible()
        } else {
            Visibility::hidden()
        };
        self.world.set_visibility(self.rig.marker_root, visibility);
        self.camera.marker_pose = state.marker_pose;

        if state.marker_visible != was_visible {
            let kind = if state.marker_visible {
                EventKind::TrackingFound
            } else {
                EventKind::TrackingLost
            };
            debug!(frame = self.frame.index, event = kind.as_str(), "tracking changed");
            self.events.emit(self.frame, kind, "marker_root");
        }
    }

    pub fn render(&self, backend: &mut impl RenderBackend) -> RenderFrame {
        let frame = Renderer::collect(&self.world, self.camera, self.frame);
        backend.submit(&frame);
        frame
    }

    /// Logs and records a settle outcome. `None` when the slot had already settled.
    fn report(
        &mut self,
        name: &'static str,
        settled: Result<bool, ResourceError>,
        failure: Option<String>,
    ) -> Option<bool> {
        match settled {
            Ok(true) => {
                info!(resource = name, "resource ready");
                self.events.emit(self.frame, EventKind::ResourceReady, name);
                Some(true)
            }
            Ok(false) => {
                let reason = failure.unwrap_or_default();
                warn!(resource = name, %reason, "resource failed to load; continuing without it");
                self.events
                    .emit(self.frame, EventKind::ResourceFailed, format!("{name}: {reason}"));
                Some(false)
            }
            Err(e) => {
                warn!(resource = name, error = %e, "ignoring repeated resource result");
                None
            }
        }
    }
}
