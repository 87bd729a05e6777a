use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::math::ProjectionConvention;
use scene::prefabs::GlobeConfig;
use scene::{DuplicatePolicy, LabelConfig, MarkerAttachment, MarkerConfig};
use serde::Deserialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConventionName {
    #[default]
    PlainGlobe,
    Mirrored,
}

impl From<ConventionName> for ProjectionConvention {
    fn from(name: ConventionName) -> Self {
        match name {
            ConventionName::PlainGlobe => ProjectionConvention::PLAIN_GLOBE,
            ConventionName::Mirrored => ProjectionConvention::MIRRORED,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentName {
    #[default]
    PointsGroup,
    MarkerRoot,
}

impl From<AttachmentName> for MarkerAttachment {
    fn from(name: AttachmentName) -> Self {
        match name {
            AttachmentName::PointsGroup => MarkerAttachment::PointsGroup,
            AttachmentName::MarkerRoot => MarkerAttachment::MarkerRoot,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateName {
    #[default]
    Append,
    UpsertByName,
}

impl From<DuplicateName> for DuplicatePolicy {
    fn from(name: DuplicateName) -> Self {
        match name {
            DuplicateName::Append => DuplicatePolicy::Append,
            DuplicateName::UpsertByName => DuplicatePolicy::UpsertByName,
        }
    }
}

/// Session settings, read from an optional JSON file and then from `AR_GLOBE_*` variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub sphere_radius: f64,
    pub sphere_segments: u32,
    pub convention: ConventionName,
    pub marker_attachment: AttachmentName,
    pub duplicates: DuplicateName,
    pub labels: bool,
    /// Globe spin applied once per frame while the AR marker is visible.
    pub spin_rad_per_frame: f64,
    pub texture_path: PathBuf,
    pub font_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 1.0,
            sphere_segments: 32,
            convention: ConventionName::default(),
            marker_attachment: AttachmentName::default(),
            duplicates: DuplicateName::default(),
            labels: false,
            spin_rad_per_frame: 0.01,
            texture_path: PathBuf::from("public/images/globe.jpg"),
            font_path: PathBuf::from("public/fonts/helvetiker_regular.typeface.json"),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl SessionConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&payload)
    }

    /// Applies `AR_GLOBE_RADIUS`, `AR_GLOBE_CONVENTION`, `AR_GLOBE_LABELS`,
    /// `AR_GLOBE_SPIN`, `AR_GLOBE_TEXTURE` and `AR_GLOBE_FONT` from `lookup`.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(v) = lookup("AR_GLOBE_RADIUS") {
            self.sphere_radius = parse_value("AR_GLOBE_RADIUS", &v)?;
        }
        if let Some(v) = lookup("AR_GLOBE_CONVENTION") {
            self.convention = match v.as_str() {
                "plain_globe" => ConventionName::PlainGlobe,
                "mirrored" => ConventionName::Mirrored,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "AR_GLOBE_CONVENTION",
                        value: v,
                    });
                }
            };
        }
        if let Some(v) = lookup("AR_GLOBE_LABELS") {
            self.labels = parse_value("AR_GLOBE_LABELS", &v)?;
        }
        if let Some(v) = lookup("AR_GLOBE_SPIN") {
            self.spin_rad_per_frame = parse_value("AR_GLOBE_SPIN", &v)?;
        }
        if let Some(v) = lookup("AR_GLOBE_TEXTURE") {
            self.texture_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("AR_GLOBE_FONT") {
            self.font_path = PathBuf::from(v);
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "sphere_radius",
                value: self.sphere_radius.to_string(),
            });
        }
        if self.sphere_segments < 3 {
            return Err(ConfigError::InvalidValue {
                key: "sphere_segments",
                value: self.sphere_segments.to_string(),
            });
        }
        if !self.spin_rad_per_frame.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "spin_rad_per_frame",
                value: self.spin_rad_per_frame.to_string(),
            });
        }
        Ok(())
    }

    pub fn globe_config(&self) -> GlobeConfig {
        GlobeConfig {
            radius: self.sphere_radius,
            segments: self.sphere_segments,
            ..GlobeConfig::default()
        }
    }

    pub fn marker_config(&self) -> MarkerConfig {
        MarkerConfig {
            convention: self.convention.into(),
            attachment: self.marker_attachment.into(),
            duplicates: self.duplicates.into(),
            labels: LabelConfig {
                enabled: self.labels,
                ..LabelConfig::default()
            },
            ..MarkerConfig::default()
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
