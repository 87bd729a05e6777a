use foundation::color::color_from_seed;
use foundation::math::{ProjectionConvention, Vec3, lat_lon_in_range, project, project_label_anchor};
use tracing::{debug, warn};

use crate::World;
use crate::components::{Drawable3D, Material, Shape3D, Transform};
use crate::entity::EntityId;
use crate::prefabs::GlobeRig;
use crate::registry::{CityRegistry, GeoCity, PlacedCity};

/// Where city markers hang in the globe scene graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MarkerAttachment {
    /// Under the spinning pivot; markers turn with the globe.
    #[default]
    PointsGroup,
    /// Directly under the AR marker root; markers stay put while the globe spins.
    MarkerRoot,
}

/// What happens when a city with an already-registered name is added again.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Always append a new marker and registry entry.
    #[default]
    Append,
    /// Move the existing marker and overwrite its registry entry.
    UpsertByName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelConfig {
    pub enabled: bool,
    /// Radius multiplier for the label anchor.
    pub lift: f64,
    pub size: f64,
    pub depth: f64,
    pub curve_segments: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            lift: 1.001,
            size: 5.0,
            depth: 0.5,
            curve_segments: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerConfig {
    pub convention: ProjectionConvention,
    pub attachment: MarkerAttachment,
    pub duplicates: DuplicatePolicy,
    /// Marker edge length as a fraction of the globe radius.
    pub footprint_ratio: f64,
    /// Marker extent along the surface normal.
    pub height: f64,
    pub labels: LabelConfig,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            convention: ProjectionConvention::default(),
            attachment: MarkerAttachment::default(),
            duplicates: DuplicatePolicy::default(),
            footprint_ratio: 0.01,
            height: 0.1,
            labels: LabelConfig::default(),
        }
    }
}

/// Result of placing one city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityPlacement {
    /// Registry index.
    pub index: usize,
    pub marker: EntityId,
    pub label: Option<EntityId>,
    /// True when an existing entry was overwritten under [`DuplicatePolicy::UpsertByName`].
    pub replaced: bool,
}

/// Builds city markers in the world and keeps the registry in step with them.
///
/// `markers[i]` and `labels[i]` belong to registry entry `i`.
#[derive(Debug, Clone, Default)]
pub struct CityMarkers {
    config: MarkerConfig,
    registry: CityRegistry,
    markers: Vec<EntityId>,
    labels: Vec<Option<EntityId>>,
    font_family: Option<String>,
}

impl CityMarkers {
    pub fn new(config: MarkerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    pub fn markers(&self) -> &[EntityId] {
        &self.markers
    }

    pub fn label(&self, index: usize) -> Option<EntityId> {
        self.labels.get(index).copied().flatten()
    }

    /// Font used for labels created from now on. Without one, labels are skipped.
    pub fn set_label_font(&mut self, family: impl Into<String>) {
        self.font_family = Some(family.into());
    }

    /// Places every city in input order.
    pub fn add_cities(
        &mut self,
        world: &mut World,
        rig: &GlobeRig,
        cities: &[GeoCity],
    ) -> Vec<CityPlacement> {
        cities
            .iter()
            .map(|city| self.add_city(world, rig, city))
            .collect()
    }

    pub fn add_city(
        &mut self,
        world: &mut World,
        rig: &GlobeRig,
        city: &GeoCity,
    ) -> CityPlacement {
        if !city.latitude.is_finite() || !city.longitude.is_finite() {
            warn!(
                city = %city.name,
                lat = city.latitude,
                lon = city.longitude,
                "non-finite coordinates; marker position is undefined"
            );
        } else if !lat_lon_in_range(city.latitude, city.longitude) {
            warn!(
                city = %city.name,
                lat = city.latitude,
                lon = city.longitude,
                "coordinates out of range; projecting as-is"
            );
        }

        let radius = rig.radius;
        let color = color_from_seed(city.color_seed);
        let position =
            project(city.latitude, city.longitude, radius, self.config.convention).position;

        let side = radius * self.config.footprint_ratio;
        let marker_drawable = Drawable3D::colored_box(side, side, self.config.height, color);
        let marker_transform = Transform::translate(position).looking_at(Vec3::ZERO);

        let placed = PlacedCity {
            name: city.name.clone(),
            position,
            link_uri: city.link_uri.clone(),
        };

        let existing = match self.config.duplicates {
            DuplicatePolicy::Append => None,
            DuplicatePolicy::UpsertByName => self.registry.find_by_name(&city.name),
        };

        if let Some(index) = existing {
            let marker = self.markers[index];
            world.set_transform(marker, marker_transform);
            world.set_drawable_3d(marker, marker_drawable);
            let label = match self.labels[index] {
                Some(label) => {
                    self.update_label(world, label, rig.radius, city);
                    Some(label)
                }
                None => self.spawn_label(world, rig, city),
            };
            self.labels[index] = label;
            self.registry.upsert_by_name(placed);
            debug!(city = %city.name, index, "updated city marker");
            return CityPlacement {
                index,
                marker,
                label,
                replaced: true,
            };
        }

        let parent = self.attachment_group(rig);
        let marker = world.spawn();
        world.set_name(marker, city.name.clone());
        world.set_parent(marker, parent);
        world.set_transform(marker, marker_transform);
        world.set_drawable_3d(marker, marker_drawable);

        let label = self.spawn_label(world, rig, city);
        let index = self.registry.push(placed);
        self.markers.push(marker);
        self.labels.push(label);
        debug!(city = %city.name, index, "placed city marker");

        CityPlacement {
            index,
            marker,
            label,
            replaced: false,
        }
    }

    fn attachment_group(&self, rig: &GlobeRig) -> EntityId {
        match self.config.attachment {
            MarkerAttachment::PointsGroup => rig.points,
            MarkerAttachment::MarkerRoot => rig.marker_root,
        }
    }

    fn spawn_label(&self, world: &mut World, rig: &GlobeRig, city: &GeoCity) -> Option<EntityId> {
        if !self.config.labels.enabled {
            return None;
        }
        let Some(font_family) = self.font_family.clone() else {
            debug!(city = %city.name, "font not loaded; skipping label");
            return None;
        };

        let label = world.spawn();
        world.set_name(label, format!("{}_label", city.name));
        world.set_parent(label, self.attachment_group(rig));
        world.set_drawable_3d(
            label,
            Drawable3D::new(
                Shape3D::Text {
                    content: city.name.clone(),
                    font_family,
                    size: self.config.labels.size,
                    depth: self.config.labels.depth,
                    curve_segments: self.config.labels.curve_segments,
                },
                Material::Basic {
                    color: color_from_seed(city.color_seed),
                },
            ),
        );
        self.place_label(world, label, rig.radius, city);
        Some(label)
    }

    fn update_label(&self, world: &mut World, label: EntityId, radius: f64, city: &GeoCity) {
        self.place_label(world, label, radius, city);
        if let Some(drawable) = world.drawable_3d_mut(label) {
            drawable.material = Material::Basic {
                color: color_from_seed(city.color_seed),
            };
        }
    }

    /// Labels face away from the globe and start collapsed (zero x/y scale).
    fn place_label(&self, world: &mut World, label: EntityId, radius: f64, city: &GeoCity) {
        let anchor = project_label_anchor(
            city.latitude,
            city.longitude,
            radius,
            self.config.labels.lift,
            self.config.convention,
        );
        world.set_transform(
            label,
            Transform::translate(anchor)
                .looking_at(anchor.scale(2.0))
                .with_scale(Vec3::new(0.0, 0.0, 1.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{CityMarkers, DuplicatePolicy, MarkerAttachment, MarkerConfig};
    use crate::World;
    use crate::components::{Material, Shape3D};
    use crate::prefabs::{GlobeConfig, spawn_globe};
    use crate::registry::GeoCity;
    use foundation::color::color_from_seed;
    use foundation::math::{ProjectionConvention, Vec3};

    fn city(name: &str, lat: f64, lon: f64, seed: f64) -> GeoCity {
        GeoCity::new(name, lat, lon, seed, format!("https://example.org/{name}"))
    }

    fn sample() -> Vec<GeoCity> {
        vec![
            city("New York", 40.7, -74.0, 0.1),
            city("Sydney", -33.87, 151.21, 0.5),
            city("Tokyo", 35.68, 139.69, 0.9),
        ]
    }

    #[test]
    fn registry_follows_input_order() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig::default());

        let placements = markers.add_cities(&mut world, &rig, &sample());
        assert_eq!(placements.len(), 3);
        assert_eq!(markers.registry().names(), vec!["New York", "Sydney", "Tokyo"]);
        assert_eq!(world.children(rig.points), markers.markers().to_vec());
    }

    #[test]
    fn placed_positions_sit_on_the_globe_surface() {
        let mut world = World::new();
        let rig = spawn_globe(
            &mut world,
            &GlobeConfig {
                radius: 2.5,
                ..GlobeConfig::default()
            },
        );
        let mut markers = CityMarkers::new(MarkerConfig::default());
        markers.add_cities(&mut world, &rig, &sample());

        for placed in markers.registry() {
            assert!((placed.position.length() - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn adding_the_same_city_twice_duplicates() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig::default());
        let paris = city("Paris", 48.85, 2.35, 0.3);

        let before = markers.registry().len();
        let a = markers.add_city(&mut world, &rig, &paris);
        let b = markers.add_city(&mut world, &rig, &paris);
        assert_eq!(markers.registry().len(), before + 2);
        assert_eq!(markers.registry().get(a.index), markers.registry().get(b.index));
        assert_ne!(a.marker, b.marker);
        assert!(!b.replaced);
    }

    #[test]
    fn upsert_policy_moves_existing_marker() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig {
            duplicates: DuplicatePolicy::UpsertByName,
            ..MarkerConfig::default()
        });

        let first = markers.add_city(&mut world, &rig, &city("Paris", 48.85, 2.35, 0.3));
        let second = markers.add_city(&mut world, &rig, &city("Paris", 0.0, 0.0, 0.6));
        assert_eq!(markers.registry().len(), 1);
        assert_eq!(first.marker, second.marker);
        assert!(second.replaced);

        let t = world.transform(second.marker).expect("marker transform");
        assert!((t.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
        let drawable = world.drawable_3d(second.marker).expect("marker drawable");
        assert_eq!(drawable.color(), Some(color_from_seed(0.6)));
    }

    #[test]
    fn marker_is_a_colored_box_facing_the_center() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig::default());
        let placement = markers.add_city(&mut world, &rig, &city("Quito", -0.18, -78.47, 0.0));

        let drawable = world.drawable_3d(placement.marker).expect("drawable");
        assert!(matches!(
            drawable.shape,
            Shape3D::Box { width, height, depth } if width == 0.01 && height == 0.01 && depth == 0.1
        ));
        assert_eq!(drawable.material, Material::Basic { color: color_from_seed(0.0) });

        let t = world.transform(placement.marker).expect("transform");
        let facing = t.facing.expect("facing");
        assert!((facing + t.position.normalize_or_zero()).length() < 1e-12);
    }

    #[test]
    fn marker_root_attachment_does_not_spin() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig {
            attachment: MarkerAttachment::MarkerRoot,
            ..MarkerConfig::default()
        });
        let placement = markers.add_city(&mut world, &rig, &city("Lagos", 6.52, 3.37, 0.2));
        let before = world.world_transform(placement.marker).position;

        rig.spin(&mut world, 1.0);
        let after = world.world_transform(placement.marker).position;
        assert_eq!(world.parent(placement.marker), Some(rig.marker_root));
        assert!((before - after).length() < 1e-12);
    }

    #[test]
    fn points_group_markers_spin_with_the_globe() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig::default());
        let placement = markers.add_city(&mut world, &rig, &city("Lagos", 6.52, 3.37, 0.2));
        let local = world.transform(placement.marker).expect("transform").position;

        rig.spin(&mut world, 0.5);
        let after = world.world_transform(placement.marker).position;
        assert!((after - local.rotate_y(0.5)).length() < 1e-12);
    }

    #[test]
    fn mirrored_convention_flips_marker_side() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig {
            convention: ProjectionConvention::MIRRORED,
            ..MarkerConfig::default()
        });
        markers.add_city(&mut world, &rig, &city("Null Island", 0.0, 0.0, 0.0));
        let p = markers.registry().get(0).expect("entry").position;
        assert!((p - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn labels_need_both_the_flag_and_a_font() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut config = MarkerConfig::default();
        config.labels.enabled = true;
        let mut markers = CityMarkers::new(config);

        let no_font = markers.add_city(&mut world, &rig, &city("Rome", 41.9, 12.5, 0.4));
        assert_eq!(no_font.label, None);

        markers.set_label_font("helvetiker");
        let with_font = markers.add_city(&mut world, &rig, &city("Oslo", 59.91, 10.75, 0.7));
        let label = with_font.label.expect("label");
        let t = world.transform(label).expect("label transform");
        assert!((t.position.length() - 1.001).abs() < 1e-12);
        assert_eq!(t.scale, Vec3::new(0.0, 0.0, 1.0));
        assert!(matches!(
            world.drawable_3d(label).map(|d| &d.shape),
            Some(Shape3D::Text { content, .. }) if content == "Oslo"
        ));
        assert_eq!(markers.label(with_font.index), Some(label));
    }

    #[test]
    fn labels_are_off_by_default() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig::default());
        markers.set_label_font("helvetiker");
        let placement = markers.add_city(&mut world, &rig, &city("Rome", 41.9, 12.5, 0.4));
        assert_eq!(placement.label, None);
    }

    #[test]
    fn nan_coordinates_propagate() {
        let mut world = World::new();
        let rig = spawn_globe(&mut world, &GlobeConfig::default());
        let mut markers = CityMarkers::new(MarkerConfig::default());
        markers.add_city(&mut world, &rig, &city("Nowhere", f64::NAN, 0.0, 0.0));
        assert!(!markers.registry().get(0).expect("entry").position.is_finite());
    }
}
