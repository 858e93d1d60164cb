use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidLogLevel { value: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidLogLevel { value, .. } => write!(
                f,
                "draw log level '{value}' is not a valid filter (set CAMP_ROSTER_LOG_LEVEL or RUST_LOG, e.g. `info` or `camp_roster=debug`)"
            ),
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "draw logging was already initialized: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidLogLevel { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` wins over the configured draw log level when it parses.
fn draw_log_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidLogLevel {
        value: config.log_level.clone(),
        source,
    })
}

/// Draw events go to stderr; stdout carries the roster report.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(draw_log_filter(config)?)
        .with_target(false)
        .without_time()
        .compact()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_log_level() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "camp_roster=verbose".to_string(),
        };
        match draw_log_filter(&config) {
            Err(err @ TelemetryError::InvalidLogLevel { .. }) => {
                assert!(err.to_string().contains("'camp_roster=verbose'"));
                assert!(err.to_string().contains("CAMP_ROSTER_LOG_LEVEL"));
            }
            other => panic!("expected log level error, got {other:?}"),
        }
    }

    #[test]
    fn configured_level_is_used_without_rust_log() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "camp_roster=debug".to_string(),
        };
        let filter = draw_log_filter(&config).expect("valid directive");
        assert!(filter.to_string().contains("camp_roster=debug"));
    }
}
