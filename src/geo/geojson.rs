//! GeoJSON wire codec for parking spaces
//!
//! Spaces travel as a `FeatureCollection` of `Point` features. Property keys
//! are uppercased on the wire and the geometry uses `[lng, lat]` order, while
//! the domain model keeps `lat`/`lng` as separate fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::parse_features;
use crate::models::{Coordinates, ParkingSpace};
use crate::{ParkingError, Result};

/// Collection name used when none is supplied
pub const DEFAULT_COLLECTION_NAME: &str = "Parking_Spaces";

const FEATURE_COLLECTION: &str = "FeatureCollection";
const FEATURE: &str = "Feature";
const POINT: &str = "Point";

/// Property keys written for the canonical fields
const CANONICAL_KEYS: [&str; 8] = [
    "ID",
    "NAME",
    "ADDRESS",
    "PRICE",
    "FEATURES",
    "FEATURES_ARRAY",
    "LATITUDE",
    "LONGITUDE",
];

/// Optional fields with a typed home on [`ParkingSpace`]
const OPTIONAL_KEYS: [&str; 3] = ["RATING", "DISTANCE", "AVAILABILITY"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lng, lat]`, optionally followed by an altitude
    pub coordinates: Vec<f64>,
}

impl FeatureCollection {
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Decode every feature back into a space
    pub fn into_spaces(self) -> Result<Vec<ParkingSpace>> {
        if self.kind != FEATURE_COLLECTION {
            return Err(ParkingError::codec(format!(
                "Invalid GeoJSON: expected FeatureCollection, got '{}'",
                self.kind
            )));
        }
        self.features
            .iter()
            .enumerate()
            .map(|(index, feature)| feature.to_space(index))
            .collect()
    }
}

impl Feature {
    /// Encode one space as a `Point` feature
    #[must_use]
    pub fn from_space(space: &ParkingSpace) -> Self {
        let mut properties = Map::new();
        properties.insert("ID".into(), Value::from(space.id.clone()));
        properties.insert("NAME".into(), Value::from(space.name.clone()));
        properties.insert("ADDRESS".into(), Value::from(space.address.clone()));
        properties.insert("PRICE".into(), Value::from(space.price));
        properties.insert("FEATURES".into(), Value::from(space.features.join(", ")));
        properties.insert("FEATURES_ARRAY".into(), Value::from(space.features.clone()));
        properties.insert("LATITUDE".into(), Value::from(space.lat));
        properties.insert("LONGITUDE".into(), Value::from(space.lng));

        if let Some(rating) = space.rating {
            properties.insert("RATING".into(), Value::from(rating));
        }
        if let Some(distance) = &space.distance {
            properties.insert("DISTANCE".into(), Value::from(distance.clone()));
        }
        if let Some(availability) = &space.availability {
            properties.insert("AVAILABILITY".into(), Value::from(availability.clone()));
        }
        for (key, value) in &space.extra {
            properties.insert(key.to_uppercase(), value.clone());
        }

        Self {
            kind: FEATURE.to_string(),
            properties,
            geometry: Geometry {
                kind: POINT.to_string(),
                coordinates: space.coordinates().to_position().to_vec(),
            },
        }
    }

    /// Decode this feature; `index` is only used in error messages
    pub fn to_space(&self, index: usize) -> Result<ParkingSpace> {
        let props = &self.properties;
        let id = match property(props, "ID") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(ParkingError::codec(format!("Feature {index} has no ID"))),
        };
        let name = string_property(props, "NAME")
            .ok_or_else(|| ParkingError::codec(format!("Feature {index} has no NAME")))?;
        let address = string_property(props, "ADDRESS").unwrap_or_default();
        let price = property(props, "PRICE").and_then(Value::as_f64).unwrap_or(0.0);

        let features = match property(props, "FEATURES_ARRAY") {
            Some(Value::Array(items)) => feature_tags(items),
            _ => match property(props, "FEATURES") {
                Some(Value::String(joined)) => parse_features(joined),
                Some(Value::Array(items)) => feature_tags(items),
                _ => Vec::new(),
            },
        };

        let extra = props
            .iter()
            .filter(|(key, _)| {
                let upper = key.to_uppercase();
                !CANONICAL_KEYS.contains(&upper.as_str())
                    && !OPTIONAL_KEYS.contains(&upper.as_str())
            })
            .map(|(key, value)| (key.to_lowercase(), value.clone()))
            .collect();

        let coordinates = match self.geometry.coordinates.as_slice() {
            [lng, lat, ..] => Coordinates::from_position([*lng, *lat]),
            _ => {
                return Err(ParkingError::codec(format!(
                    "Feature {index} needs at least two coordinates"
                )));
            }
        };

        Ok(ParkingSpace {
            id,
            name,
            address,
            price,
            lat: coordinates.latitude,
            lng: coordinates.longitude,
            rating: property(props, "RATING").and_then(Value::as_f64),
            distance: string_property(props, "DISTANCE"),
            availability: string_property(props, "AVAILABILITY"),
            features,
            extra,
        })
    }
}

/// Look up an uppercase wire key, falling back to its lowercase spelling
fn property<'a>(props: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    props
        .get(key)
        .filter(|v| !v.is_null())
        .or_else(|| props.get(&key.to_lowercase()).filter(|v| !v.is_null()))
}

/// Trimmed, non-empty string entries of a tag array
fn feature_tags(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

fn string_property(props: &Map<String, Value>, key: &str) -> Option<String> {
    property(props, key).and_then(Value::as_str).map(str::to_string)
}

/// Encode spaces as a named `FeatureCollection`, preserving input order
#[must_use]
pub fn to_feature_collection(spaces: &[ParkingSpace], name: &str) -> FeatureCollection {
    FeatureCollection {
        kind: FEATURE_COLLECTION.to_string(),
        name: name.to_string(),
        features: spaces.iter().map(Feature::from_space).collect(),
    }
}

/// Decode a typed collection; same rules as [`from_geojson`]
pub fn from_feature_collection(collection: FeatureCollection) -> Result<Vec<ParkingSpace>> {
    collection.into_spaces()
}

/// Encode an untyped `{ "spaces": [...] }` payload.
///
/// Fails unless `input` is an object whose `spaces` field is an array of
/// space records.
pub fn to_geojson(input: &Value, collection_name: Option<&str>) -> Result<Value> {
    let spaces = input
        .get("spaces")
        .and_then(Value::as_array)
        .ok_or_else(|| ParkingError::codec("Invalid input: expected object with 'spaces' array"))?;

    let spaces = spaces
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            serde_json::from_value::<ParkingSpace>(raw.clone()).map_err(|e| {
                ParkingError::codec(format!("Invalid space at index {index}: {e}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let collection =
        to_feature_collection(&spaces, collection_name.unwrap_or(DEFAULT_COLLECTION_NAME));
    Ok(serde_json::to_value(collection)?)
}

/// Decode an untyped GeoJSON value into spaces.
///
/// Fails when `type` is not `"FeatureCollection"`, when `features` is not an
/// array, or when a feature lacks an id, a name or point coordinates.
pub fn from_geojson(value: &Value) -> Result<Vec<ParkingSpace>> {
    if value.get("type").and_then(Value::as_str) != Some(FEATURE_COLLECTION) {
        return Err(ParkingError::codec(
            "Invalid GeoJSON: expected FeatureCollection",
        ));
    }
    if !value.get("features").is_some_and(Value::is_array) {
        return Err(ParkingError::codec(
            "Invalid GeoJSON: 'features' must be an array",
        ));
    }

    let collection: FeatureCollection = serde_json::from_value(value.clone())
        .map_err(|e| ParkingError::codec(format!("Invalid GeoJSON feature: {e}")))?;
    collection.into_spaces()
}
