use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::workflows::roster::domain::{Candidate, CandidateAnswers, CandidateId};

/// Builder over raw form answers so fixtures read like the export.
pub(super) struct Applicant {
    id: u32,
    answers: CandidateAnswers,
}

impl Applicant {
    pub(super) fn new(id: u32) -> Self {
        Self {
            id,
            answers: CandidateAnswers {
                first_name: format!("person{id}"),
                family_name: "camper".to_string(),
                email: format!("person{id}@camp.test"),
                phone: "06 00 00 00 00".to_string(),
                gender: "Female".to_string(),
                doctoral_school: "Other".to_string(),
                car_plan: "No".to_string(),
                seat_capacity: "0".to_string(),
                attended_before: "No".to_string(),
            },
        }
    }

    pub(super) fn gender(mut self, gender: &str) -> Self {
        self.answers.gender = gender.to_string();
        self
    }

    pub(super) fn school(mut self, code: &str) -> Self {
        self.answers.doctoral_school = code.to_string();
        self
    }

    pub(super) fn car(mut self, seats: u32) -> Self {
        self.answers.car_plan = "Yes".to_string();
        self.answers.seat_capacity = seats.to_string();
        self
    }

    pub(super) fn seats(mut self, seats: u32) -> Self {
        self.answers.seat_capacity = seats.to_string();
        self
    }

    pub(super) fn returning(mut self) -> Self {
        self.answers.attended_before = "Yes".to_string();
        self
    }

    pub(super) fn build(self) -> Candidate {
        Candidate::from_answers(CandidateId(self.id), &self.answers)
    }
}

/// `count` interchangeable candidates with ids starting at 2.
pub(super) fn pool(count: u32) -> Vec<Candidate> {
    (2..2 + count).map(|id| Applicant::new(id).build()).collect()
}

pub(super) fn ids(raw: &[u32]) -> Vec<CandidateId> {
    raw.iter().copied().map(CandidateId).collect()
}

pub(super) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
