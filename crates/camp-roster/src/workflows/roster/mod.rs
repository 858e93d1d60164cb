//! Roster selection: candidates, constraints, the registration ledger, the
//! draw weight and the driver that ties them together.

pub mod constraints;
pub mod domain;
pub mod driver;
pub mod ledger;
pub mod probability;
pub mod report;

#[cfg(test)]
mod tests;

pub use constraints::ConstraintIndex;
pub use domain::{Candidate, CandidateAnswers, CandidateId, DoctoralSchool, Gender};
pub use driver::{select, SelectionDriver, SelectionError, SelectionOutcome, SelectionPhase};
pub use ledger::{LedgerError, Partition, Registration, RegistrationLedger};
pub use probability::{weight, Composition, WeightBreakdown, WeightFactor, WeightModel};
pub use report::{RosterReport, RosterSnapshot, RosterSummary};
