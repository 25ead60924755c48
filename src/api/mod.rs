use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::geo::FeatureCollection;
use crate::mock::{MockSearchService, dataset};
use crate::models::SearchRequest;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<MockSearchService>,
    pub version: &'static str,
}

impl AppState {
    #[must_use]
    pub fn new(search: MockSearchService) -> Self {
        Self {
            search: Arc::new(search),
            version: crate::VERSION,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Health {
    pub status: String,
    pub version: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/parking/search", post(search_parking))
        .route("/parking/spaces", get(get_spaces))
        .route("/health", get(health))
        .with_state(state)
}

async fn search_parking(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<FeatureCollection>, StatusCode> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!("Rejected search request: {}", e.body_text());
        StatusCode::BAD_REQUEST
    })?;
    Ok(Json(state.search.search(&request).await))
}

async fn get_spaces() -> Json<FeatureCollection> {
    Json(dataset::feature_collection())
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: state.version.to_string(),
    })
}
