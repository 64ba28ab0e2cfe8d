use std::fmt;

use geo_types::Point;

/// A validated reverse geocoding request
#[derive(Clone, PartialEq)]
pub struct GeoQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub api_key: String,
}

impl GeoQuery {
    pub fn is_valid(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

// Keeps the key out of logs
impl fmt::Debug for GeoQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoQuery")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("key_present", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_key() {
        let query = GeoQuery {
            latitude: 31.2,
            longitude: 121.5,
            api_key: String::from("SECRET-KEY"),
        };
        let printed = format!("{query:?}");
        assert!(!printed.contains("SECRET-KEY"));
        assert!(printed.contains("key_present: true"));
    }

    #[test]
    fn point_is_lng_lat() {
        let query = GeoQuery {
            latitude: 31.2,
            longitude: 121.5,
            api_key: String::from("k"),
        };
        assert_eq!(query.point().x(), 121.5);
        assert_eq!(query.point().y(), 31.2);
    }
}
