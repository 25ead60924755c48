//! Data models for the ParkSpot core
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates in WGS84 degrees
//! - Space: Parking space records as shown on the map and in lists
//! - Search: Search request and response payloads

pub mod location;
pub mod search;
pub mod space;

// Re-export all public types for convenient access
pub use location::Coordinates;
pub use search::{SearchRequest, SearchResponse};
pub use space::ParkingSpace;
