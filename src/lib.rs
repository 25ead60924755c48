//! `ParkSpot` - map-centric parking search and reservation core
//!
//! This library provides the GeoJSON wire codec, an in-process mock search
//! backend served over HTTP, the search and result-list state machines,
//! reservation stores and a headless map model.

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod geo;
pub mod map;
pub mod mock;
pub mod models;
pub mod search;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use config::ParkspotConfig;
pub use error::ParkingError;
pub use geo::{FeatureCollection, distance_km, from_geojson, to_geojson};
pub use map::{MapPoint, MapView, ViewState};
pub use mock::{MockSearchService, SearchSettings};
pub use models::{Coordinates, ParkingSpace, SearchRequest, SearchResponse};
pub use search::{ResultView, SearchBackend, SearchQuery, SearchSession, SortKey};
pub use store::{PendingReservation, SpaceStore, UserSpaces};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ParkingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
