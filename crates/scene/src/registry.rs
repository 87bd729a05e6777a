use foundation::math::Vec3;

/// Input record for one city. Latitude/longitude in degrees, `color_seed` nominally in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color_seed: f64,
    pub link_uri: String,
}

impl GeoCity {
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        color_seed: f64,
        link_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            color_seed,
            link_uri: link_uri.into(),
        }
    }
}

/// A city after projection onto the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCity {
    pub name: String,
    pub position: Vec3,
    pub link_uri: String,
}

/// Ordered record of every placed city for the session.
///
/// Entries keep insertion order and are never merged: pushing the same city
/// twice yields two entries.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CityRegistry {
    cities: Vec<PlacedCity>,
}

impl CityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends and returns the new entry's index.
    pub fn push(&mut self, city: PlacedCity) -> usize {
        self.cities.push(city);
        self.cities.len() - 1
    }

    /// Replaces the first entry named like `city`, or appends. Returns `(index, replaced)`.
    pub fn upsert_by_name(&mut self, city: PlacedCity) -> (usize, bool) {
        match self.find_by_name(&city.name) {
            Some(idx) => {
                self.cities[idx] = city;
                (idx, true)
            }
            None => (self.push(city), false),
        }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&PlacedCity> {
        self.cities.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedCity> {
        self.cities.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.cities.iter().position(|c| c.name == name)
    }
}

impl<'a> IntoIterator for &'a CityRegistry {
    type Item = &'a PlacedCity;
    type IntoIter = std::slice::Iter<'a, PlacedCity>;

    fn into_iter(self) -> Self::IntoIter {
        self.cities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{CityRegistry, PlacedCity};
    use foundation::math::Vec3;

    fn placed(name: &str, x: f64) -> PlacedCity {
        PlacedCity {
            name: name.to_string(),
            position: Vec3::new(x, 0.0, 0.0),
            link_uri: format!("https://example.org/{name}"),
        }
    }

    #[test]
    fn push_keeps_order_and_duplicates() {
        let mut reg = CityRegistry::new();
        reg.push(placed("Oslo", 1.0));
        reg.push(placed("Lima", 2.0));
        reg.push(placed("Oslo", 1.0));
        assert_eq!(reg.names(), vec!["Oslo", "Lima", "Oslo"]);
        assert_eq!(reg.get(0), reg.get(2));
    }

    #[test]
    fn upsert_replaces_first_match() {
        let mut reg = CityRegistry::new();
        reg.push(placed("Oslo", 1.0));
        reg.push(placed("Lima", 2.0));

        assert_eq!(reg.upsert_by_name(placed("Lima", 5.0)), (1, true));
        assert_eq!(reg.upsert_by_name(placed("Cairo", 3.0)), (2, false));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get(1).map(|c| c.position.x), Some(5.0));
    }
}
