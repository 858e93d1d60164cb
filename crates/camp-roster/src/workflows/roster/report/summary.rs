use super::views::{CandidateView, GenderRatio, RosterSnapshot, RosterSummary, SchoolShare};
use crate::workflows::roster::domain::{DoctoralSchool, Gender};
use crate::workflows::roster::driver::SelectionOutcome;
use chrono::Utc;

/// Reporting view over a finished selection.
pub struct RosterReport<'a> {
    outcome: &'a SelectionOutcome,
}

impl<'a> RosterReport<'a> {
    pub fn new(outcome: &'a SelectionOutcome) -> Self {
        Self { outcome }
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        let ledger = &self.outcome.ledger;
        RosterSnapshot {
            drawn_at: Utc::now(),
            target: self.outcome.target,
            draws: self.outcome.draws,
            registered: ledger.registered().map(CandidateView::from).collect(),
            pool: ledger.pool().map(CandidateView::from).collect(),
            rejected: ledger.rejected().map(CandidateView::from).collect(),
        }
    }

    pub fn summary(&self) -> RosterSummary {
        let ledger = &self.outcome.ledger;
        let registered = ledger.registered_count();

        let mut male = 0;
        let mut female = 0;
        let mut schools: Vec<(DoctoralSchool, usize)> = Vec::new();
        for candidate in ledger.registered() {
            match candidate.gender() {
                Gender::Male => male += 1,
                Gender::Female => female += 1,
                Gender::NonBinary(_) => {}
            }
            let school = candidate.doctoral_school();
            match schools.iter_mut().find(|(seen, _)| *seen == school) {
                Some((_, count)) => *count += 1,
                None => schools.push((school, 1)),
            }
        }

        let gender_ratio = GenderRatio {
            male: percent(male, registered),
            female: percent(female, registered),
            non_binary: percent(registered - male - female, registered),
        };

        let school_ratio = schools
            .into_iter()
            .map(|(school, count)| SchoolShare {
                school: school.code(),
                count,
                percent: percent(count, registered),
            })
            .collect();

        let seats = ledger.registered_seats();

        RosterSummary {
            registered,
            gender_ratio,
            school_ratio,
            seats,
            remaining_seats: seats as i64 - registered as i64,
            emails: ledger
                .registered()
                .map(|candidate| candidate.email().to_string())
                .collect(),
        }
    }
}

/// Share of `part` in `total` as a percentage with one decimal; zero when `total` is zero.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}
