//! Geodata utilities: the GeoJSON codec and distance calculations

pub mod distance;
pub mod geojson;

pub use distance::{distance_km, format_distance};
pub use geojson::{
    Feature, FeatureCollection, from_feature_collection, from_geojson, to_feature_collection,
    to_geojson,
};
