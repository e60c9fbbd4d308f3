//! Error types for workout file loading

use std::path::PathBuf;
use thiserror::Error;

use crate::spec::ValidationError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON")]
    ParseJson(#[source] serde_json::Error),

    #[error("failed to parse TOML")]
    ParseToml(#[source] toml::de::Error),

    #[error("invalid workout in {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    /// Validation failure for content that did not come from a file
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl LoadError {
    /// The underlying validation failure, if that is what went wrong
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            LoadError::Invalid { source, .. } | LoadError::Validation(source) => Some(source),
            _ => None,
        }
    }
}
