//! In-process mock backend
//!
//! Everything the front end would normally fetch from a server is answered
//! here: the static parking dataset and the randomized search endpoint.

pub mod dataset;
pub mod search;

pub use search::{MockSearchService, SearchSettings};
