//! Parking space model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Coordinates;

/// A bookable parking location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParkingSpace {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Total price in pounds
    pub price: f64,
    pub lat: f64,
    pub lng: f64,
    /// Star rating (0-5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Display-only distance, e.g. "0.3 miles"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    /// Display-only availability, e.g. "Available now"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    /// Any other fields carried by the record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParkingSpace {
    /// Create a space with the canonical fields only
    pub fn new<S: Into<String>>(
        id: S,
        name: S,
        address: S,
        price: f64,
        coordinates: Coordinates,
        features: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            price,
            lat: coordinates.latitude,
            lng: coordinates.longitude,
            rating: None,
            distance: None,
            availability: None,
            features: features.iter().map(|f| (*f).to_string()).collect(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// True when every tag in `tags` is one of this space's features,
    /// compared after trimming
    #[must_use]
    pub fn has_all_features(&self, tags: &[String]) -> bool {
        tags.iter()
            .all(|tag| self.features.iter().any(|f| f.trim() == tag.trim()))
    }

    /// Case-insensitive substring match on name or address
    #[must_use]
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.name.to_lowercase().contains(&keyword)
            || self.address.to_lowercase().contains(&keyword)
    }
}
