use std::f64::consts::PI;

use super::Vec3;

/// Azimuth offset applied to label anchors so text sits beside its marker.
pub const LABEL_AZIMUTH_OFFSET_RAD: f64 = PI / 120.0;

/// Sign applied to longitude when deriving the azimuth `theta = (180 ± lon)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LongitudeSign {
    Plus,
    Minus,
}

/// Sign applied to the x component of the projected point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum XAxis {
    /// `x = -R sin(phi) cos(theta)`
    Negated,
    /// `x = R sin(phi) cos(theta)`
    Direct,
}

/// Longitude/x-axis sign convention for the lat/lon -> sphere mapping.
///
/// Two variants of the globe disagree here. Neither is treated as canonical;
/// they differ by a half turn about +Y.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProjectionConvention {
    pub longitude: LongitudeSign,
    pub x_axis: XAxis,
}

impl ProjectionConvention {
    /// `theta = 180 + lon`, negated x.
    pub const PLAIN_GLOBE: Self = Self {
        longitude: LongitudeSign::Plus,
        x_axis: XAxis::Negated,
    };

    /// `theta = 180 - lon`, direct x.
    pub const MIRRORED: Self = Self {
        longitude: LongitudeSign::Minus,
        x_axis: XAxis::Direct,
    };
}

impl Default for ProjectionConvention {
    fn default() -> Self {
        Self::PLAIN_GLOBE
    }
}

/// Spherical angles in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphericalAngles {
    /// Angle from the north pole.
    pub colatitude_rad: f64,
    /// Angle around the polar (+Y) axis.
    pub azimuth_rad: f64,
}

impl SphericalAngles {
    pub fn from_lat_lon_deg(lat_deg: f64, lon_deg: f64, longitude: LongitudeSign) -> Self {
        let azimuth_deg = match longitude {
            LongitudeSign::Plus => 180.0 + lon_deg,
            LongitudeSign::Minus => 180.0 - lon_deg,
        };
        Self {
            colatitude_rad: (90.0 - lat_deg) * PI / 180.0,
            azimuth_rad: azimuth_deg * PI / 180.0,
        }
    }
}

/// A point on the sphere surface together with its outward unit normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphericalPoint {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Maps latitude/longitude (degrees) onto a sphere of `radius` centered at the origin, +Y up.
///
/// Inputs are not range-checked: values outside `[-90, 90] x [-180, 180]` still land on the
/// sphere but no longer correspond to a geographic location, and NaN propagates.
pub fn project(
    lat_deg: f64,
    lon_deg: f64,
    radius: f64,
    convention: ProjectionConvention,
) -> SphericalPoint {
    let angles = SphericalAngles::from_lat_lon_deg(lat_deg, lon_deg, convention.longitude);
    let position = point_on_sphere(angles, radius, x_sign(convention.x_axis));
    SphericalPoint {
        position,
        normal: position.normalize_or_zero(),
    }
}

/// Anchor for a city's text label: azimuth nudged by [`LABEL_AZIMUTH_OFFSET_RAD`] and pushed
/// outward by `lift` (a radius multiplier, e.g. `1.001`).
pub fn project_label_anchor(
    lat_deg: f64,
    lon_deg: f64,
    radius: f64,
    lift: f64,
    convention: ProjectionConvention,
) -> Vec3 {
    let mut angles = SphericalAngles::from_lat_lon_deg(lat_deg, lon_deg, convention.longitude);
    angles.azimuth_rad -= LABEL_AZIMUTH_OFFSET_RAD;
    point_on_sphere(angles, radius, x_sign(convention.x_axis)).scale(lift)
}

pub fn lat_lon_in_range(lat_deg: f64, lon_deg: f64) -> bool {
    (-90.0..=90.0).contains(&lat_deg) && (-180.0..=180.0).contains(&lon_deg)
}

fn x_sign(x_axis: XAxis) -> f64 {
    match x_axis {
        XAxis::Negated => -1.0,
        XAxis::Direct => 1.0,
    }
}

fn point_on_sphere(angles: SphericalAngles, radius: f64, x_sign: f64) -> Vec3 {
    let (sin_phi, cos_phi) = angles.colatitude_rad.sin_cos();
    let (sin_theta, cos_theta) = angles.azimuth_rad.sin_cos();
    Vec3::new(
        x_sign * radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}
