use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::workflows::intake::normalizer::{
    normalize_email, normalize_person_name, normalize_phone,
};

/// Stable identifier of a candidate, matching the spreadsheet row of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl CandidateId {
    /// Spreadsheet rows start at 1 and the first one holds the header.
    pub const ROW_OFFSET: u32 = 2;

    pub fn from_row_index(index: usize) -> Self {
        Self(index as u32 + Self::ROW_OFFSET)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Gender as declared on the form. Only the binary answers take part in balancing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    NonBinary(String),
}

impl Gender {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Male" => Self::Male,
            "Female" => Self::Female,
            other => Self::NonBinary(other.to_string()),
        }
    }

    pub fn is_binary(&self) -> bool {
        !matches!(self, Self::NonBinary(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::NonBinary(_) => "Non-binary",
        }
    }
}

/// Doctoral school of the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DoctoralSchool {
    Despeg,
    Sfa,
    Shal,
    Smh,
    Stic,
    Svs,
    Other,
}

impl DoctoralSchool {
    pub const fn ordered() -> [DoctoralSchool; 7] {
        [
            Self::Despeg,
            Self::Sfa,
            Self::Shal,
            Self::Smh,
            Self::Stic,
            Self::Svs,
            Self::Other,
        ]
    }

    pub fn parse(value: &str) -> Self {
        Self::ordered()
            .into_iter()
            .find(|school| *school != Self::Other && school.code() == value.trim())
            .unwrap_or(Self::Other)
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Despeg => "ED DESPEG",
            Self::Sfa => "ED SFA",
            Self::Shal => "ED SHAL",
            Self::Smh => "ED SMH",
            Self::Stic => "ED STIC",
            Self::Svs => "ED SVS",
            Self::Other => "Other",
        }
    }
}

/// Raw form answers for one candidate, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateAnswers {
    pub first_name: String,
    pub family_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub doctoral_school: String,
    pub car_plan: String,
    pub seat_capacity: String,
    pub attended_before: String,
}

/// A normalized pool member. Immutable once built; identity is the id alone.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    id: CandidateId,
    first_name: String,
    family_name: String,
    email: String,
    phone: String,
    gender: Gender,
    doctoral_school: DoctoralSchool,
    has_car: bool,
    seat_capacity: u32,
    attended_before: bool,
}

impl Candidate {
    pub fn from_answers(id: CandidateId, answers: &CandidateAnswers) -> Self {
        Self {
            id,
            first_name: normalize_person_name(&answers.first_name),
            family_name: normalize_person_name(&answers.family_name),
            email: normalize_email(&answers.email),
            phone: normalize_phone(&answers.phone),
            gender: Gender::parse(&answers.gender),
            doctoral_school: DoctoralSchool::parse(&answers.doctoral_school),
            has_car: parse_car_plan(&answers.car_plan),
            seat_capacity: parse_seat_capacity(&answers.seat_capacity),
            attended_before: answers.attended_before.trim() == "Yes",
        }
    }

    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.family_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn gender(&self) -> &Gender {
        &self.gender
    }

    pub fn doctoral_school(&self) -> DoctoralSchool {
        self.doctoral_school
    }

    pub fn has_car(&self) -> bool {
        self.has_car
    }

    pub fn seat_capacity(&self) -> u32 {
        self.seat_capacity
    }

    pub fn attended_before(&self) -> bool {
        self.attended_before
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.first_name, self.family_name, self.email)
    }
}

fn parse_car_plan(value: &str) -> bool {
    let answer = value.trim();
    answer.eq_ignore_ascii_case("yes") || answer.eq_ignore_ascii_case("if necessary")
}

/// Spreadsheet exports render integers as `2` or `2.0`; anything else is zero seats.
fn parse_seat_capacity(value: &str) -> u32 {
    let trimmed = value.trim();
    if let Ok(seats) = trimmed.parse::<u32>() {
        return seats;
    }

    match trimmed.parse::<f64>() {
        Ok(seats) if seats.is_finite() && seats >= 0.0 && seats.fract() == 0.0 => {
            seats.min(u32::MAX as f64) as u32
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> CandidateAnswers {
        CandidateAnswers {
            first_name: " jean  marie ".to_string(),
            family_name: "DU PONT".to_string(),
            email: " Jean.Dupont@Example.ORG ".to_string(),
            phone: "06 12.34 56 78".to_string(),
            gender: "Female".to_string(),
            doctoral_school: "ED SFA".to_string(),
            car_plan: "If necessary".to_string(),
            seat_capacity: "3".to_string(),
            attended_before: "Yes".to_string(),
        }
    }

    #[test]
    fn from_answers_normalizes_every_field() {
        let candidate = Candidate::from_answers(CandidateId(7), &answers());

        assert_eq!(candidate.first_name(), "Jeanmarie");
        assert_eq!(candidate.family_name(), "Dupont");
        assert_eq!(candidate.full_name(), "Jeanmarie Dupont");
        assert_eq!(candidate.email(), "jean.dupont@example.org");
        assert_eq!(candidate.phone(), "0612345678");
        assert_eq!(candidate.gender(), &Gender::Female);
        assert_eq!(candidate.doctoral_school(), DoctoralSchool::Sfa);
        assert!(candidate.has_car());
        assert_eq!(candidate.seat_capacity(), 3);
        assert!(candidate.attended_before());
    }

    #[test]
    fn unknown_school_and_invalid_seats_fall_back() {
        let mut raw = answers();
        raw.doctoral_school = "ED MATHS".to_string();
        raw.seat_capacity = "two".to_string();
        raw.car_plan = "No".to_string();
        raw.attended_before = "No".to_string();
        let candidate = Candidate::from_answers(CandidateId(2), &raw);

        assert_eq!(candidate.doctoral_school(), DoctoralSchool::Other);
        assert_eq!(candidate.seat_capacity(), 0);
        assert!(!candidate.has_car());
        assert!(!candidate.attended_before());
    }

    #[test]
    fn seat_capacity_accepts_spreadsheet_floats_only_when_whole() {
        assert_eq!(parse_seat_capacity("2.0"), 2);
        assert_eq!(parse_seat_capacity(" 4 "), 4);
        assert_eq!(parse_seat_capacity("1.5"), 0);
        assert_eq!(parse_seat_capacity("-1"), 0);
        assert_eq!(parse_seat_capacity(""), 0);
    }

    #[test]
    fn equality_uses_the_id_only() {
        let first = Candidate::from_answers(CandidateId(3), &answers());
        let twin = Candidate::from_answers(CandidateId(4), &answers());
        let same_row = Candidate::from_answers(CandidateId(3), &CandidateAnswers::default());

        assert_ne!(first, twin);
        assert_eq!(first, same_row);
    }

    #[test]
    fn gender_categories() {
        assert!(Gender::parse("Male").is_binary());
        assert!(!Gender::parse("Prefer not to say").is_binary());
        assert_eq!(Gender::parse("Agender").label(), Gender::parse("Other").label());
        assert_eq!(Gender::parse("").label(), "Non-binary");
    }

    #[test]
    fn candidate_ids_follow_spreadsheet_rows() {
        assert_eq!(CandidateId::from_row_index(0), CandidateId(2));
        assert_eq!(CandidateId::from_row_index(10).to_string(), "#12");
    }
}
