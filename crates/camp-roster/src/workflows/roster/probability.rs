use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{Candidate, CandidateId, DoctoralSchool, Gender};
use super::ledger::RegistrationLedger;

/// Constants of the multiplicative draw weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightModel {
    /// Multiplier for candidates without a car while registered seats are short.
    pub car_shortage_penalty: f64,
    /// Lower bound applied to both counts of a balance ratio.
    pub ratio_floor: f64,
    /// Divisor for candidates who attended a previous edition.
    pub repeat_attendance_divisor: f64,
}

impl Default for WeightModel {
    fn default() -> Self {
        Self {
            car_shortage_penalty: 1e-3,
            ratio_floor: 1e-2,
            repeat_attendance_divisor: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("weight constant `{field}` must lie within [{min}, {max}], got {value}")]
pub struct WeightModelError {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Factors that can move a candidate's weight away from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightFactor {
    CarShortage,
    PassengerBonus,
    SchoolBalance,
    GenderBalance,
    RepeatAttendance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightComponent {
    pub factor: WeightFactor,
    pub multiplier: f64,
}

/// Weight of one candidate with the trail of factors that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBreakdown {
    pub candidate: CandidateId,
    pub weight: f64,
    pub components: Vec<WeightComponent>,
}

/// Counts over the registered set that the weight reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    registered: usize,
    seats: u64,
    by_school: HashMap<DoctoralSchool, usize>,
    male: usize,
    female: usize,
    non_binary: usize,
}

impl Composition {
    pub fn of(ledger: &RegistrationLedger) -> Self {
        let mut composition = Self::default();
        for candidate in ledger.registered() {
            composition.registered += 1;
            composition.seats += u64::from(candidate.seat_capacity());
            *composition
                .by_school
                .entry(candidate.doctoral_school())
                .or_default() += 1;
            match candidate.gender() {
                Gender::Male => composition.male += 1,
                Gender::Female => composition.female += 1,
                Gender::NonBinary(_) => composition.non_binary += 1,
            }
        }
        composition
    }

    pub fn seats_short(&self) -> bool {
        self.seats < self.registered as u64
    }

    fn same_school(&self, school: DoctoralSchool) -> usize {
        self.by_school.get(&school).copied().unwrap_or(0)
    }

    fn same_gender(&self, gender: &Gender) -> usize {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::NonBinary(_) => self.non_binary,
        }
    }
}

impl WeightModel {
    /// Bounds keep the product of every factor far above `f64::MIN_POSITIVE`.
    pub fn validate(&self) -> Result<(), WeightModelError> {
        for (field, value, min, max) in [
            ("car_shortage_penalty", self.car_shortage_penalty, 1e-9, 1.0),
            ("ratio_floor", self.ratio_floor, 1e-6, 1.0),
            ("repeat_attendance_divisor", self.repeat_attendance_divisor, 1.0, 1e6),
        ] {
            if !(min..=max).contains(&value) {
                return Err(WeightModelError {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    pub fn weigh(&self, candidate: &Candidate, composition: &Composition) -> f64 {
        self.explain(candidate, composition).weight
    }

    pub fn explain(&self, candidate: &Candidate, composition: &Composition) -> WeightBreakdown {
        let mut weight = 1.0;
        let mut components = Vec::new();
        let mut apply = |factor: WeightFactor, multiplier: f64| {
            weight *= multiplier;
            components.push(WeightComponent { factor, multiplier });
        };

        if composition.seats_short() && !candidate.has_car() {
            apply(WeightFactor::CarShortage, self.car_shortage_penalty);
        }

        if candidate.seat_capacity() > 1 {
            apply(
                WeightFactor::PassengerBonus,
                f64::from(candidate.seat_capacity()),
            );
        }

        let school = candidate.doctoral_school();
        if school != DoctoralSchool::Other {
            let same = composition.same_school(school);
            apply(
                WeightFactor::SchoolBalance,
                self.balance(same, composition.registered - same),
            );
        }

        let gender = candidate.gender();
        if gender.is_binary() {
            let same = composition.same_gender(gender);
            apply(
                WeightFactor::GenderBalance,
                self.balance(same, composition.registered - same),
            );
        }

        if candidate.attended_before() {
            apply(
                WeightFactor::RepeatAttendance,
                1.0 / self.repeat_attendance_divisor,
            );
        }

        WeightBreakdown {
            candidate: candidate.id(),
            weight: weight.max(f64::MIN_POSITIVE),
            components,
        }
    }

    fn balance(&self, same: usize, other: usize) -> f64 {
        let same = (same as f64).max(self.ratio_floor);
        let other = (other as f64).max(self.ratio_floor);
        other / same
    }
}

/// Draw weight of `candidate` under the default model and the current ledger.
pub fn weight(candidate: &Candidate, ledger: &RegistrationLedger) -> f64 {
    WeightModel::default().weigh(candidate, &Composition::of(ledger))
}
