//! Location model for geographic coordinates

use serde::{Deserialize, Serialize};

/// A point in WGS84 degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a "lat, lng" string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// GeoJSON position order: `[lng, lat]`
    #[must_use]
    pub fn to_position(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    #[must_use]
    pub fn from_position(position: [f64; 2]) -> Self {
        Self::new(position[1], position[0])
    }
}

impl From<Coordinates> for haversine::Location {
    fn from(value: Coordinates) -> Self {
        haversine::Location {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}
