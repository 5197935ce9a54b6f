pub mod loader;
pub mod types;

pub use loader::{load_scorecards, most_recent, DEFAULT_RECENT_ROUNDS};
pub use types::{Course, ScorecardEntry, ScorecardFile};
