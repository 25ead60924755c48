//! Search flow: query state, backends, the session that ties them together
//! and the result list pipeline

pub mod backend;
pub mod query;
pub mod results;
pub mod session;

pub use backend::{HttpSearchBackend, SearchBackend};
pub use query::{LOCATIONS, LocationSuggestion, SearchQuery};
pub use results::{ResultView, SortKey, available_features};
pub use session::{Completion, PendingSearch, SearchPhase, SearchSession, SearchTicket};
