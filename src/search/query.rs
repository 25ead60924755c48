//! Search form state: location text and the from/until window
//!
//! `from` may never be moved into the past and `until` may never precede
//! `from`. Moving `from` past `until` drags `until` along with it.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::models::SearchRequest;
use crate::{ParkingError, Result};

/// Length of the default search window
pub const DEFAULT_WINDOW_HOURS: i64 = 4;

/// A named place offered while typing a location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSuggestion {
    pub id: u32,
    pub name: &'static str,
}

const fn suggestion(id: u32, name: &'static str) -> LocationSuggestion {
    LocationSuggestion { id, name }
}

pub const LOCATIONS: [LocationSuggestion; 10] = [
    suggestion(1, "London Bridge"),
    suggestion(2, "King's Cross"),
    suggestion(3, "Angel"),
    suggestion(4, "Islington"),
    suggestion(5, "Shoreditch"),
    suggestion(6, "Camden Town"),
    suggestion(7, "Hoxton Square"),
    suggestion(8, "Old Street"),
    suggestion(9, "Farringdon"),
    suggestion(10, "Clerkenwell"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    location: String,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
    show_validation: bool,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl SearchQuery {
    /// Empty location and a four hour window starting at `now`
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            location: String::new(),
            from: now,
            until: now + TimeDelta::hours(DEFAULT_WINDOW_HOURS),
            show_validation: false,
        }
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn from_date_time(&self) -> DateTime<Utc> {
        self.from
    }

    #[must_use]
    pub fn until_date_time(&self) -> DateTime<Utc> {
        self.until
    }

    /// Whether the "location required" hint is showing
    #[must_use]
    pub fn show_validation(&self) -> bool {
        self.show_validation
    }

    pub fn set_location<S: Into<String>>(&mut self, text: S) {
        self.location = text.into();
        if !self.location.is_empty() {
            self.show_validation = false;
        }
    }

    /// Suggestions whose name contains the current text, ignoring case.
    /// Empty text offers every suggestion.
    #[must_use]
    pub fn suggestions(&self) -> Vec<LocationSuggestion> {
        let needle = self.location.trim().to_lowercase();
        LOCATIONS
            .iter()
            .filter(|l| l.name.to_lowercase().contains(&needle))
            .copied()
            .collect()
    }

    /// Use the suggestion with `id` as the location. Returns `false` for an
    /// unknown id.
    pub fn select_suggestion(&mut self, id: u32) -> bool {
        match LOCATIONS.iter().find(|l| l.id == id) {
            Some(found) => {
                self.set_location(found.name);
                true
            }
            None => false,
        }
    }

    /// Set the start of the window, checked against the current time
    pub fn set_from(&mut self, from: DateTime<Utc>) -> bool {
        self.set_from_at(from, Utc::now())
    }

    /// Set the start of the window as of `now`. Returns `false` and leaves
    /// the state unchanged when `from` is in the past.
    pub fn set_from_at(&mut self, from: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if from < now {
            debug!("Rejected start time {} before now {}", from, now);
            return false;
        }
        self.from = from;
        if self.until < from {
            self.until = from;
        }
        true
    }

    /// Set the end of the window. Returns `false` and leaves the state
    /// unchanged when `until` precedes the start.
    pub fn set_until(&mut self, until: DateTime<Utc>) -> bool {
        if until < self.from {
            debug!("Rejected end time {} before start {}", until, self.from);
            return false;
        }
        self.until = until;
        true
    }

    /// Build the request for a submit. An empty location raises the
    /// validation flag and yields a validation error.
    pub fn to_request(&mut self) -> Result<SearchRequest> {
        if self.location.is_empty() {
            self.show_validation = true;
            return Err(ParkingError::validation("Please enter a location"));
        }
        self.show_validation = false;
        Ok(SearchRequest::new(self.location.clone(), self.from, self.until))
    }

    /// Reset location and validation; the time window is kept
    pub fn clear(&mut self) {
        self.location.clear();
        self.show_validation = false;
    }
}
