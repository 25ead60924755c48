//! Search backends: anything that can answer a [`SearchRequest`] with a
//! GeoJSON body

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::models::SearchRequest;
use crate::{ParkingError, Result};

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search and return the raw response body
    async fn fetch(&self, request: &SearchRequest) -> Result<Value>;
}

/// Talks to a running `parkspot` server over HTTP
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    client: Client,
    base_url: String,
}

impl HttpSearchBackend {
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("parkspot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ParkingError::search(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/api/parking/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    #[instrument(skip(self, request), fields(location = %request.location))]
    async fn fetch(&self, request: &SearchRequest) -> Result<Value> {
        let url = self.search_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ParkingError::search(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Search request failed with status {}", status);
            return Err(ParkingError::search(format!(
                "Failed to fetch parking spaces ({status})"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ParkingError::search(format!("Unreadable response body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_joins_cleanly() {
        let backend = HttpSearchBackend::new("http://localhost:3000/").unwrap();
        assert_eq!(backend.search_url(), "http://localhost:3000/api/parking/search");

        let backend = HttpSearchBackend::new("http://localhost:3000").unwrap();
        assert_eq!(backend.search_url(), "http://localhost:3000/api/parking/search");
    }
}
