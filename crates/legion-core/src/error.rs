//! Error types for game data loading.
//!
//! The simulation itself never fails; configuration gaps at runtime degrade
//! into skipped work. Only reading and validating a [`GameData`](crate::data::GameData)
//! document can produce a [`ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors produced while loading or validating game data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The data file could not be read.
    #[error("Failed to read game data '{path}': {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for [`GameData`](crate::data::GameData).
    #[error("Failed to parse game data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A numeric field is non-finite or out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field (e.g. `units.ARCHER.range`).
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
