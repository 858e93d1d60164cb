use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::workflows::roster::constraints::ConstraintIndex;
use crate::workflows::roster::domain::CandidateId;
use crate::workflows::roster::probability::WeightModel;

/// The per-edition selection document: seat target, organizers and constraints.
///
/// ```yaml
/// places: 35
/// organizers: [2, 14]
/// conflicts:
///   - [5, 9]
/// groups:
///   - [3, 4, 11]
/// registered: [2, 14, 3, 4, 11]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub places: u32,
    #[serde(default)]
    pub organizers: Vec<CandidateId>,
    #[serde(default)]
    pub conflicts: Vec<Vec<CandidateId>>,
    #[serde(default)]
    pub groups: Vec<Vec<CandidateId>>,
    /// Candidates confirmed by a previous run, registered again before the draw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered: Option<Vec<CandidateId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightModel>,
}

/// Config entry that a candidate id was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigReference {
    Organizer,
    Conflict { group: usize },
    Group { group: usize },
    Registered,
}

impl fmt::Display for ConfigReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigReference::Organizer => write!(f, "organizers"),
            ConfigReference::Conflict { group } => write!(f, "conflicts[{group}]"),
            ConfigReference::Group { group } => write!(f, "groups[{group}]"),
            ConfigReference::Registered => write!(f, "registered"),
        }
    }
}

impl SelectionConfig {
    pub fn new(places: u32) -> Self {
        Self {
            places,
            organizers: Vec::new(),
            conflicts: Vec::new(),
            groups: Vec::new(),
            registered: None,
            weights: None,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.weight_model().validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_yaml_string()?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Same document with the carry-over list replaced by `ids`.
    pub fn with_registered(&self, ids: &[CandidateId]) -> Self {
        Self {
            registered: Some(ids.to_vec()),
            ..self.clone()
        }
    }

    pub fn carry_over(&self) -> &[CandidateId] {
        self.registered.as_deref().unwrap_or(&[])
    }

    pub fn weight_model(&self) -> WeightModel {
        self.weights.unwrap_or_default()
    }

    pub fn constraint_index(&self) -> ConstraintIndex {
        ConstraintIndex::new(self.conflicts.clone(), self.groups.clone())
    }

    /// Every candidate id mentioned by the document, tagged with where it appears.
    pub fn references(&self) -> Vec<(ConfigReference, CandidateId)> {
        let organizers = self
            .organizers
            .iter()
            .map(|id| (ConfigReference::Organizer, *id));
        let conflicts = self.conflicts.iter().enumerate().flat_map(|(group, ids)| {
            ids.iter()
                .map(move |id| (ConfigReference::Conflict { group }, *id))
        });
        let groups = self.groups.iter().enumerate().flat_map(|(group, ids)| {
            ids.iter()
                .map(move |id| (ConfigReference::Group { group }, *id))
        });
        let registered = self
            .carry_over()
            .iter()
            .map(|id| (ConfigReference::Registered, *id));

        organizers
            .chain(conflicts)
            .chain(groups)
            .chain(registered)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "places: 35\n\
organizers: [2, 14]\n\
conflicts:\n  - [5, 9]\n\
groups:\n  - [3, 4, 11]\n";

    #[test]
    fn parses_document_without_carry_over() {
        let config = SelectionConfig::from_yaml_str(DOCUMENT).expect("valid yaml");
        assert_eq!(config.places, 35);
        assert_eq!(config.organizers, vec![CandidateId(2), CandidateId(14)]);
        assert_eq!(config.conflicts, vec![vec![CandidateId(5), CandidateId(9)]]);
        assert!(config.registered.is_none());
        assert!(config.carry_over().is_empty());
        assert_eq!(config.weight_model(), WeightModel::default());
    }

    #[test]
    fn missing_constraint_lists_default_to_empty() {
        let config = SelectionConfig::from_yaml_str("places: 4\n").expect("valid yaml");
        assert!(config.organizers.is_empty());
        assert!(config.conflicts.is_empty());
        assert!(config.groups.is_empty());
    }

    #[test]
    fn registered_list_survives_a_round_trip() {
        let config = SelectionConfig::from_yaml_str(DOCUMENT).expect("valid yaml");
        let updated = config.with_registered(&[CandidateId(2), CandidateId(14), CandidateId(7)]);
        let yaml = updated.to_yaml_string().expect("serializes");
        let reparsed = SelectionConfig::from_yaml_str(&yaml).expect("reparses");

        assert_eq!(reparsed, updated);
        assert_eq!(
            reparsed.carry_over(),
            &[CandidateId(2), CandidateId(14), CandidateId(7)]
        );
    }

    #[test]
    fn partial_weights_fill_in_defaults_and_reject_non_positive() {
        let config =
            SelectionConfig::from_yaml_str("places: 3\nweights:\n  repeat_attendance_divisor: 2\n")
                .expect("valid yaml");
        let model = config.weight_model();
        assert_eq!(model.repeat_attendance_divisor, 2.0);
        assert_eq!(model.ratio_floor, WeightModel::default().ratio_floor);

        match SelectionConfig::from_yaml_str("places: 3\nweights:\n  ratio_floor: 0\n") {
            Err(ConfigError::InvalidWeights(err)) => assert_eq!(err.field, "ratio_floor"),
            other => panic!("expected invalid weights, got {other:?}"),
        }
    }

    #[test]
    fn references_tag_every_id_with_its_origin() {
        let config = SelectionConfig::from_yaml_str(DOCUMENT)
            .expect("valid yaml")
            .with_registered(&[CandidateId(20)]);
        let references = config.references();

        assert_eq!(references.len(), 8);
        assert_eq!(references[0], (ConfigReference::Organizer, CandidateId(2)));
        assert_eq!(
            references[3],
            (ConfigReference::Conflict { group: 0 }, CandidateId(9))
        );
        assert_eq!(
            references[7],
            (ConfigReference::Registered, CandidateId(20))
        );
        assert_eq!(ConfigReference::Group { group: 1 }.to_string(), "groups[1]");
    }

    #[test]
    fn load_reports_missing_files() {
        match SelectionConfig::load("./does-not-exist.yaml") {
            Err(ConfigError::Io { path, .. }) => {
                assert_eq!(path, std::path::PathBuf::from("./does-not-exist.yaml"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
