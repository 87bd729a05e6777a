use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

/// Metadata of a typeface JSON font, enough to decide whether labels can be built.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub family: String,
    /// Glyph units per em.
    pub resolution: u32,
    pub glyph_count: usize,
}

impl FontFace {
    pub fn has_glyph(&self) -> bool {
        self.glyph_count > 0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypefaceFile {
    family_name: String,
    #[serde(default = "default_resolution")]
    resolution: u32,
    #[serde(default)]
    glyphs: BTreeMap<String, Value>,
}

fn default_resolution() -> u32 {
    1000
}

#[derive(Debug)]
pub enum TypefaceError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    NoGlyphs { family: String },
}

impl fmt::Display for TypefaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypefaceError::Io { path, source } => {
                write!(f, "failed to read typeface {}: {source}", path.display())
            }
            TypefaceError::Parse(err) => write!(f, "typeface parse error: {err}"),
            TypefaceError::NoGlyphs { family } => write!(f, "typeface {family} has no glyphs"),
        }
    }
}

impl std::error::Error for TypefaceError {}

pub fn parse_typeface(payload: &str) -> Result<FontFace, TypefaceError> {
    let file: TypefaceFile = serde_json::from_str(payload).map_err(TypefaceError::Parse)?;
    if file.glyphs.is_empty() {
        return Err(TypefaceError::NoGlyphs {
            family: file.family_name,
        });
    }
    Ok(FontFace {
        family: file.family_name,
        resolution: file.resolution,
        glyph_count: file.glyphs.len(),
    })
}

pub fn load_typeface(path: impl AsRef<Path>) -> Result<FontFace, TypefaceError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|e| TypefaceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_typeface(&payload)
}
