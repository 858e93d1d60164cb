use crate::workflows::roster::domain::{Candidate, CandidateId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Flat, display-ready projection of a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateView {
    pub id: CandidateId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: &'static str,
    pub doctoral_school: &'static str,
    pub has_car: bool,
    pub seat_capacity: u32,
    pub attended_before: bool,
}

impl From<&Candidate> for CandidateView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id(),
            full_name: candidate.full_name(),
            email: candidate.email().to_string(),
            phone: candidate.phone().to_string(),
            gender: candidate.gender().label(),
            doctoral_school: candidate.doctoral_school().code(),
            has_car: candidate.has_car(),
            seat_capacity: candidate.seat_capacity(),
            attended_before: candidate.attended_before(),
        }
    }
}

/// The three ledger partitions at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RosterSnapshot {
    pub drawn_at: DateTime<Utc>,
    pub target: usize,
    pub draws: usize,
    pub registered: Vec<CandidateView>,
    pub pool: Vec<CandidateView>,
    pub rejected: Vec<CandidateView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenderRatio {
    pub male: f64,
    pub female: f64,
    pub non_binary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolShare {
    pub school: &'static str,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSummary {
    pub registered: usize,
    pub gender_ratio: GenderRatio,
    pub school_ratio: Vec<SchoolShare>,
    pub seats: u64,
    pub remaining_seats: i64,
    pub emails: Vec<String>,
}
