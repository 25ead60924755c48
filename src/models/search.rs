//! Search request and response payloads

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::ParkingSpace;

/// Body of `POST /api/parking/search`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text location keyword, e.g. "London Bridge"
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SearchRequest {
    pub fn new<S: Into<String>>(
        location: S,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            location: location.into(),
            start_time,
            end_time,
        }
    }

    /// Time window formatted as `2025-10-23T14:24:00Z/2025-10-23T18:24:00Z`
    #[must_use]
    pub fn window(&self) -> String {
        format!(
            "{}/{}",
            self.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.end_time.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Decoded search result set
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub spaces: Vec<ParkingSpace>,
    pub total_results: usize,
}

impl SearchResponse {
    #[must_use]
    pub fn new(spaces: Vec<ParkingSpace>) -> Self {
        let total_results = spaces.len();
        Self {
            spaces,
            total_results,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_wire_format() {
        let start = Utc.with_ymd_and_hms(2025, 10, 15, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 10, 15, 17, 0, 0).unwrap();
        let request = SearchRequest::new("London Bridge", start, end);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["location"], "London Bridge");
        assert_eq!(value["startTime"], "2025-10-15T09:00:00Z");
        assert_eq!(value["endTime"], "2025-10-15T17:00:00Z");

        let parsed: SearchRequest = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_request_window() {
        let start = Utc.with_ymd_and_hms(2025, 10, 23, 14, 24, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 10, 23, 18, 24, 0).unwrap();
        let request = SearchRequest::new("Angel", start, end);
        assert_eq!(request.window(), "2025-10-23T14:24:00Z/2025-10-23T18:24:00Z");
    }

    #[test]
    fn test_response_counts_spaces() {
        let response = SearchResponse::new(Vec::new());
        assert_eq!(response.total_results, 0);
        assert!(response.is_empty());
        assert_eq!(response, SearchResponse::empty());
    }
}
