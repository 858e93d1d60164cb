use super::common::*;
use crate::config::SelectionConfig;
use crate::workflows::roster::driver::select;
use crate::workflows::roster::report::{percent, RosterReport};

#[test]
fn summary_reports_ratios_seats_and_emails() {
    let mut config = SelectionConfig::new(0);
    config.organizers = ids(&[2, 3, 4]);
    config.conflicts = vec![ids(&[4, 5])];
    let candidates = vec![
        Applicant::new(2).gender("Male").school("ED SVS").car(2).build(),
        Applicant::new(3).gender("Female").school("ED SMH").build(),
        Applicant::new(4).gender("Prefer not to say").school("ED SVS").build(),
        Applicant::new(5).build(),
        Applicant::new(6).build(),
    ];

    let outcome = select(&config, candidates, &mut rng(0)).expect("selection runs");
    let report = RosterReport::new(&outcome);
    let summary = report.summary();

    assert_eq!(summary.registered, 3);
    assert_eq!(summary.gender_ratio.male, 33.3);
    assert_eq!(summary.gender_ratio.female, 33.3);
    assert_eq!(summary.gender_ratio.non_binary, 33.3);

    let schools: Vec<_> = summary
        .school_ratio
        .iter()
        .map(|share| (share.school, share.count, share.percent))
        .collect();
    assert_eq!(schools, vec![("ED SVS", 2, 66.7), ("ED SMH", 1, 33.3)]);

    assert_eq!(summary.seats, 2);
    assert_eq!(summary.remaining_seats, -1);
    assert_eq!(
        summary.emails,
        vec![
            "person2@camp.test".to_string(),
            "person3@camp.test".to_string(),
            "person4@camp.test".to_string()
        ]
    );

    let snapshot = report.snapshot();
    assert_eq!(snapshot.registered.len(), 3);
    assert_eq!(snapshot.pool.len(), 1);
    assert_eq!(snapshot.rejected.len(), 1);
    assert_eq!(snapshot.rejected[0].full_name, "Person5 Camper");
    assert_eq!(snapshot.registered[2].gender, "Non-binary");
}

#[test]
fn empty_roster_reports_zero_percentages() {
    let outcome = select(&SelectionConfig::new(0), pool(2), &mut rng(0)).expect("selection runs");
    let summary = RosterReport::new(&outcome).summary();

    assert_eq!(summary.registered, 0);
    assert_eq!(summary.gender_ratio.male, 0.0);
    assert!(summary.school_ratio.is_empty());
    assert_eq!(summary.remaining_seats, 0);
}

#[test]
fn percent_rounds_to_one_decimal() {
    assert_eq!(percent(1, 3), 33.3);
    assert_eq!(percent(2, 3), 66.7);
    assert_eq!(percent(0, 0), 0.0);
}
