//! Search session: submits queries to a backend and owns the shown results
//!
//! Every submit is issued a ticket. Only the response carrying the most
//! recently issued ticket is applied; anything older is dropped. `clear`
//! issues no request but still invalidates outstanding tickets.

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::backend::SearchBackend;
use super::query::SearchQuery;
use super::results::ResultView;
use crate::geo::from_geojson;
use crate::models::{Coordinates, ParkingSpace, SearchRequest, SearchResponse};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    ResultsShown,
}

/// What happened to a response handed to [`SearchSession::complete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response was the latest and has been applied
    Applied,
    /// A newer search or a clear superseded it
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// A request that has been issued but not yet answered
#[derive(Debug, Clone)]
pub struct PendingSearch {
    pub ticket: SearchTicket,
    pub request: SearchRequest,
}

#[derive(Debug)]
pub struct SearchSession {
    query: SearchQuery,
    phase: SearchPhase,
    results: Option<SearchResponse>,
    reference: Option<Coordinates>,
    error: Option<String>,
    issued: u64,
    changes: watch::Sender<SearchResponse>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchQuery::default())
    }
}

impl SearchSession {
    #[must_use]
    pub fn new(query: SearchQuery) -> Self {
        let (changes, _) = watch::channel(SearchResponse::empty());
        Self {
            query,
            phase: SearchPhase::Idle,
            results: None,
            reference: None,
            error: None,
            issued: 0,
            changes,
        }
    }

    #[must_use]
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut SearchQuery {
        &mut self.query
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    /// Spaces of the last applied response, empty before the first one
    #[must_use]
    pub fn results(&self) -> &[ParkingSpace] {
        self.results.as_ref().map_or(&[], |r| r.spaces.as_slice())
    }

    #[must_use]
    pub fn response(&self) -> Option<&SearchResponse> {
        self.results.as_ref()
    }

    /// Coordinate of the first result, used for "closest" ordering
    #[must_use]
    pub fn reference(&self) -> Option<Coordinates> {
        self.reference
    }

    /// User-facing message of the last failed search
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Results filtered and sorted through `view`
    #[must_use]
    pub fn view_results(&self, view: &ResultView) -> Vec<ParkingSpace> {
        view.apply(self.results(), self.reference)
    }

    /// Receiver that sees every applied result set, and an empty one on clear
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchResponse> {
        self.changes.subscribe()
    }

    /// Validate the query and issue a ticket. An empty location raises the
    /// validation flag and no request is produced.
    pub fn begin(&mut self) -> Result<PendingSearch> {
        let request = self.query.to_request()?;
        self.issued += 1;
        self.phase = SearchPhase::Searching;
        self.error = None;
        debug!("Issued search ticket {} for '{}'", self.issued, request.location);
        Ok(PendingSearch {
            ticket: SearchTicket(self.issued),
            request,
        })
    }

    /// Apply a backend response. Stale tickets are ignored. A failed or
    /// undecodable response stores a user message and keeps prior results.
    pub fn complete(&mut self, ticket: SearchTicket, outcome: Result<Value>) -> Result<Completion> {
        if ticket.0 != self.issued {
            debug!("Dropping response for stale ticket {}", ticket.0);
            return Ok(Completion::Stale);
        }

        match outcome.and_then(|body| from_geojson(&body)) {
            Ok(spaces) => {
                info!("Search returned {} spaces", spaces.len());
                let response = SearchResponse::new(spaces);
                self.reference = response.spaces.first().map(ParkingSpace::coordinates);
                self.changes.send_replace(response.clone());
                self.results = Some(response);
                self.phase = SearchPhase::ResultsShown;
                self.error = None;
                Ok(Completion::Applied)
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                self.error = Some(e.user_message());
                self.phase = if self.results.is_some() {
                    SearchPhase::ResultsShown
                } else {
                    SearchPhase::Idle
                };
                Err(e)
            }
        }
    }

    /// Submit the current query to `backend` and apply its answer
    #[instrument(skip(self, backend), fields(location = %self.query.location()))]
    pub async fn submit<B: SearchBackend + ?Sized>(&mut self, backend: &B) -> Result<Completion> {
        let pending = self.begin()?;
        let outcome = backend.fetch(&pending.request).await;
        self.complete(pending.ticket, outcome)
    }

    /// Reset query, results and error, and broadcast an empty result set
    pub fn clear(&mut self) {
        self.issued += 1;
        self.query.clear();
        self.results = None;
        self.reference = None;
        self.error = None;
        self.phase = SearchPhase::Idle;
        self.changes.send_replace(SearchResponse::empty());
        debug!("Search cleared");
    }
}
