use crate::workflows::roster::domain::CandidateAnswers;
use serde::Deserialize;
use std::io::Read;

pub(crate) fn parse_answers<R: Read>(reader: R) -> Result<Vec<CandidateAnswers>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut answers = Vec::new();

    for record in csv_reader.deserialize::<PreRegistrationRow>() {
        let row = record?;
        answers.push(row.into_answers());
    }

    Ok(answers)
}

#[derive(Debug, Deserialize)]
struct PreRegistrationRow {
    #[serde(rename = "First name", default)]
    first_name: String,
    #[serde(rename = "Family name", default)]
    family_name: String,
    #[serde(rename = "Email Address", default)]
    email: String,
    #[serde(rename = "Phone number", default)]
    phone: String,
    #[serde(rename = "Gender", default)]
    gender: String,
    #[serde(rename = "Doctoral school", default)]
    doctoral_school: String,
    #[serde(
        rename = "Do you plan to take your car to come? (winter equipment might be required)",
        default
    )]
    car_plan: String,
    #[serde(
        rename = "How many people can you carry in your car? (besides you)",
        default
    )]
    seat_capacity: String,
    #[serde(rename = "Have you attended a previous winter camp?", default)]
    attended_before: String,
}

impl PreRegistrationRow {
    fn into_answers(self) -> CandidateAnswers {
        CandidateAnswers {
            first_name: self.first_name,
            family_name: self.family_name,
            email: self.email,
            phone: self.phone,
            gender: self.gender,
            doctoral_school: self.doctoral_school,
            car_plan: self.car_plan,
            seat_capacity: self.seat_capacity,
            attended_before: self.attended_before,
        }
    }
}
