use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use foundation::math::lat_lon_in_range;
use scene::GeoCity;
use serde::Deserialize;
use serde_json::Value;

/// One row of a city batch: `[name, latitude, longitude, colorSeed, linkURI]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct CityRow(String, f64, f64, f64, String);

impl From<CityRow> for GeoCity {
    fn from(row: CityRow) -> Self {
        let CityRow(name, latitude, longitude, color_seed, link_uri) = row;
        GeoCity {
            name,
            latitude,
            longitude,
            color_seed,
            link_uri,
        }
    }
}

#[derive(Debug)]
pub enum CityDataError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    NotABatch,
    InvalidRow { index: usize, reason: String },
    InvalidCity { index: usize, name: String, reason: String },
}

impl fmt::Display for CityDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityDataError::Io { path, source } => {
                write!(f, "failed to read city data {}: {source}", path.display())
            }
            CityDataError::Parse(err) => write!(f, "city data parse error: {err}"),
            CityDataError::NotABatch => write!(f, "expected a JSON array of city rows"),
            CityDataError::InvalidRow { index, reason } => {
                write!(f, "invalid city row at index {index}: {reason}")
            }
            CityDataError::InvalidCity {
                index,
                name,
                reason,
            } => write!(f, "invalid city {name:?} at index {index}: {reason}"),
        }
    }
}

impl std::error::Error for CityDataError {}

/// Parses a JSON array of `[name, lat, lon, colorSeed, uri]` rows, keeping input order.
///
/// Only the shape is checked here; see [`validate_batch`] for value checks.
pub fn parse_city_batch(payload: &str) -> Result<Vec<GeoCity>, CityDataError> {
    let value: Value = serde_json::from_str(payload).map_err(CityDataError::Parse)?;
    let Value::Array(rows) = value else {
        return Err(CityDataError::NotABatch);
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value::<CityRow>(row)
                .map(GeoCity::from)
                .map_err(|e| CityDataError::InvalidRow {
                    index,
                    reason: e.to_string(),
                })
        })
        .collect()
}

pub fn load_city_batch(path: impl AsRef<Path>) -> Result<Vec<GeoCity>, CityDataError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|e| CityDataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_city_batch(&payload)
}

/// Rejects empty names, non-finite values and coordinates outside `[-90, 90] x [-180, 180]`.
///
/// Seeds outside `[0, 1]` are accepted; the hue wraps.
pub fn validate_city(index: usize, city: &GeoCity) -> Result<(), CityDataError> {
    let invalid = |reason: String| CityDataError::InvalidCity {
        index,
        name: city.name.clone(),
        reason,
    };

    if city.name.trim().is_empty() {
        return Err(invalid("empty name".to_string()));
    }
    if !city.latitude.is_finite() || !city.longitude.is_finite() {
        return Err(invalid("non-finite coordinates".to_string()));
    }
    if !lat_lon_in_range(city.latitude, city.longitude) {
        return Err(invalid(format!(
            "coordinates out of range: lat {}, lon {}",
            city.latitude, city.longitude
        )));
    }
    if !city.color_seed.is_finite() {
        return Err(invalid("non-finite color seed".to_string()));
    }
    Ok(())
}

pub fn validate_batch(cities: &[GeoCity]) -> Result<(), CityDataError> {
    for (index, city) in cities.iter().enumerate() {
        validate_city(index, city)?;
    }
    Ok(())
}

/// Splits a batch into valid cities and per-city errors, preserving order among the valid ones.
pub fn partition_valid(cities: Vec<GeoCity>) -> (Vec<GeoCity>, Vec<CityDataError>) {
    let mut valid = Vec::with_capacity(cities.len());
    let mut errors = Vec::new();
    for (index, city) in cities.into_iter().enumerate() {
        match validate_city(index, &city) {
            Ok(()) => valid.push(city),
            Err(e) => errors.push(e),
        }
    }
    (valid, errors)
}

#[cfg(test)]
mod tests {
    use super::{CityDataError, load_city_batch, parse_city_batch, partition_valid, validate_batch};
    use pretty_assertions::assert_eq;
    use scene::GeoCity;

    const SAMPLE: &str = r#"[
        ["New York", 40.7, -74.0, 0.1, "https://en.wikipedia.org/wiki/New_York_City"],
        ["Sydney", -33.87, 151.21, 0.55, "https://en.wikipedia.org/wiki/Sydney"],
        ["Tokyo", 35.68, 139.69, 0.9, "https://en.wikipedia.org/wiki/Tokyo"]
    ]"#;

    #[test]
    fn parses_rows_in_order() {
        let cities = parse_city_batch(SAMPLE).expect("parse");
        let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["New York", "Sydney", "Tokyo"]);
        assert_eq!(
            cities[0],
            GeoCity::new(
                "New York",
                40.7,
                -74.0,
                0.1,
                "https://en.wikipedia.org/wiki/New_York_City"
            )
        );
        assert!(validate_batch(&cities).is_ok());
    }

    #[test]
    fn short_row_reports_its_index() {
        let err = parse_city_batch(r#"[["Oslo", 59.9, 10.7, 0.2, "u"], ["Lima", -12.0]]"#)
            .expect_err("short row");
        assert!(matches!(err, CityDataError::InvalidRow { index: 1, .. }));
    }

    #[test]
    fn non_array_payload_is_rejected() {
        assert!(matches!(
            parse_city_batch(r#"{"cities": []}"#),
            Err(CityDataError::NotABatch)
        ));
        assert!(matches!(
            parse_city_batch("not json"),
            Err(CityDataError::Parse(_))
        ));
    }

    #[test]
    fn validation_flags_out_of_range_and_keeps_the_rest() {
        let cities = vec![
            GeoCity::new("Ok", 10.0, 10.0, 0.5, "u"),
            GeoCity::new("Bad", 95.0, 10.0, 0.5, "u"),
            GeoCity::new("Wrapped seed", 0.0, 0.0, 1.7, "u"),
            GeoCity::new("", 0.0, 0.0, 0.5, "u"),
        ];
        assert!(matches!(
            validate_batch(&cities),
            Err(CityDataError::InvalidCity { index: 1, .. })
        ));

        let (valid, errors) = partition_valid(cities);
        let names: Vec<&str> = valid.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ok", "Wrapped seed"]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn loads_batch_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cities.json");
        std::fs::write(&path, SAMPLE).expect("write");
        assert_eq!(load_city_batch(&path).expect("load").len(), 3);

        let err = load_city_batch(dir.path().join("none.json")).expect_err("missing");
        assert!(matches!(err, CityDataError::Io { .. }));
    }
}
