pub(crate) mod normalizer;
mod parser;

use crate::workflows::roster::domain::{Candidate, CandidateId};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    NoRosterFound { dir: PathBuf },
    MultipleRosters { dir: PathBuf, found: Vec<PathBuf> },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::NoRosterFound { dir } => {
                write!(
                    f,
                    "no .csv roster export found in {} (export the form responses as CSV; .xlsx is not read)",
                    dir.display()
                )
            }
            RosterImportError::MultipleRosters { dir, found } => write!(
                f,
                "{} .csv files found in {}; remove all unwanted files",
                found.len(),
                dir.display()
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::NoRosterFound { .. } | RosterImportError::MultipleRosters { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds the candidate pool from the pre-registration form export.
pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Candidate>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Candidate>, RosterImportError> {
        let candidates = parser::parse_answers(reader)?
            .iter()
            .enumerate()
            .map(|(index, answers)| {
                Candidate::from_answers(CandidateId::from_row_index(index), answers)
            })
            .collect();

        Ok(candidates)
    }

    /// Locates the single roster export in `dir`, ignoring spreadsheet lock files.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<PathBuf, RosterImportError> {
        let dir = dir.as_ref();
        let mut found = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            let is_lock_file = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with("~$"))
                .unwrap_or(false);
            if is_csv && !is_lock_file {
                found.push(path);
            }
        }

        found.sort();
        match found.len() {
            0 => Err(RosterImportError::NoRosterFound {
                dir: dir.to_path_buf(),
            }),
            1 => Ok(found.remove(0)),
            _ => Err(RosterImportError::MultipleRosters {
                dir: dir.to_path_buf(),
                found,
            }),
        }
    }
}
