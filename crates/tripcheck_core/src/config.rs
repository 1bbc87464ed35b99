//! Core runtime configuration.
//!
//! # Responsibility
//! - Decode caller configuration for logging and data sources.
//! - Resolve configured data files into a dataset and lexicon.
//!
//! # Invariants
//! - Absent data paths select the built-in data.
//! - `log_level` must be one accepted by [`crate::init_logging`].

use crate::lexicon::Lexicon;
use crate::logging::{default_log_level, normalize_level};
use crate::schema::{builtin_dataset, builtin_lexicon, load_lexicon, Dataset, SchemaError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    InvalidLevel(String),
    RelativeLogDir(PathBuf),
    Data(SchemaError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid config document: {err}"),
            Self::InvalidLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::Data(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Data(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<SchemaError> for ConfigError {
    fn from(value: SchemaError) -> Self {
        Self::Data(value)
    }
}

/// Caller configuration for the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "default_level_string")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    #[serde(default)]
    pub default_country: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_level_string(),
            log_dir: None,
            dataset_path: None,
            lexicon_path: None,
            default_country: None,
        }
    }
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

impl CoreConfig {
    /// Decodes and validates a JSON config document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLevel)?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }

    /// Loads the configured dataset, or clones the built-in one.
    pub fn dataset(&self) -> ConfigResult<Dataset> {
        match &self.dataset_path {
            Some(path) => Ok(Dataset::load(path)?),
            None => Ok(builtin_dataset().clone()),
        }
    }

    /// Loads the configured lexicon, or clones the built-in one.
    pub fn lexicon(&self) -> ConfigResult<Lexicon> {
        match &self.lexicon_path {
            Some(path) => Ok(load_lexicon(path)?),
            None => Ok(builtin_lexicon().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use crate::logging::default_log_level;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn rejects_unknown_level_and_relative_dir() {
        let err = CoreConfig::from_json_str(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));

        let err = CoreConfig::from_json_str(r#"{ "log_dir": "logs" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::RelativeLogDir(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = CoreConfig::from_json_str(r#"{ "colour": "blue" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
