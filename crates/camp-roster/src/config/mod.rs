mod selection;

pub use selection::{ConfigReference, SelectionConfig};

use crate::workflows::roster::probability::WeightModelError;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration for the command line tool.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub selection_path: PathBuf,
    pub roster_dir: PathBuf,
    pub seed: Option<u64>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let selection_path = env::var("CAMP_ROSTER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yaml"));
        let roster_dir = env::var("CAMP_ROSTER_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let seed = match env::var("CAMP_ROSTER_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed { value: raw })?,
            ),
            _ => None,
        };

        let log_level = env::var("CAMP_ROSTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            selection_path,
            roster_dir,
            seed,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSeed { value: String },
    Io { path: PathBuf, source: std::io::Error },
    Yaml(serde_yaml::Error),
    InvalidWeights(WeightModelError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSeed { value } => {
                write!(f, "CAMP_ROSTER_SEED must be an unsigned integer, got '{value}'")
            }
            ConfigError::Io { path, .. } => {
                write!(f, "unable to access selection config {}", path.display())
            }
            ConfigError::Yaml(err) => write!(f, "invalid selection config: {err}"),
            ConfigError::InvalidWeights(err) => write!(f, "invalid selection config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidSeed { .. } => None,
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Yaml(err) => Some(err),
            ConfigError::InvalidWeights(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<WeightModelError> for ConfigError {
    fn from(value: WeightModelError) -> Self {
        Self::InvalidWeights(value)
    }
}
