//! Installation configuration, loaded from JSON.

use crate::core::DEFAULT_HISTORY_CAPACITY;
use crate::installation::{ActuatorId, DEFAULT_VARIANCE_TOLERANCE_MM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit newline-delimited JSON instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Everything needed to stand up one installation.
///
/// Missing fields take their defaults, so `{}` is a valid config.
///
/// ```
/// use maestro::config::InstallationConfig;
///
/// let config = InstallationConfig::from_json_str(r#"{ "actuator_count": 4 }"#).unwrap();
/// assert_eq!(config.actuator_count, 4);
/// assert_eq!(config.variance_tolerance_mm, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallationConfig {
    pub actuator_count: ActuatorId,
    pub variance_tolerance_mm: f32,
    pub history_capacity: usize,
    pub logging: LoggingConfig,
}

impl Default for InstallationConfig {
    fn default() -> Self {
        Self {
            actuator_count: 6,
            variance_tolerance_mm: DEFAULT_VARIANCE_TOLERANCE_MM,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            logging: LoggingConfig::default(),
        }
    }
}

impl InstallationConfig {
    /// Parse and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actuator_count == 0 {
            return Err(ConfigError::Invalid {
                field: "actuator_count",
                reason: "an installation needs at least one actuator".to_string(),
            });
        }
        if !self.variance_tolerance_mm.is_finite() || self.variance_tolerance_mm < 0.0 {
            return Err(ConfigError::Invalid {
                field: "variance_tolerance_mm",
                reason: format!(
                    "must be a finite, non-negative distance, got {}",
                    self.variance_tolerance_mm
                ),
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "history_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = InstallationConfig::from_json_str("{}").unwrap();
        assert_eq!(config, InstallationConfig::default());
        assert_eq!(config.actuator_count, 6);
        assert_eq!(config.history_capacity, 256);
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn nested_logging_fields_are_read() {
        let config = InstallationConfig::from_json_str(
            r#"{ "logging": { "filter": "maestro=debug", "json": true } }"#,
        )
        .unwrap();
        assert_eq!(config.logging.filter, "maestro=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn zero_actuators_is_rejected() {
        let err = InstallationConfig::from_json_str(r#"{ "actuator_count": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "actuator_count",
                ..
            }
        ));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err =
            InstallationConfig::from_json_str(r#"{ "variance_tolerance_mm": -0.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "variance_tolerance_mm",
                ..
            }
        ));
    }

    #[test]
    fn zero_history_is_rejected() {
        let config = InstallationConfig {
            history_capacity: 0,
            ..InstallationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_and_bad_json_fail_to_parse() {
        assert!(matches!(
            InstallationConfig::from_json_str(r#"{ "actuators": 3 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            InstallationConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = InstallationConfig::from_path("/nonexistent/maestro.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/maestro.json"));
    }
}
