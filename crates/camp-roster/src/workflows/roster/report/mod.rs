mod summary;
mod views;

pub use summary::{percent, RosterReport};
pub use views::{CandidateView, GenderRatio, RosterSnapshot, RosterSummary, SchoolShare};
