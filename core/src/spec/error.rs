//! Error types for workout specification validation

use thiserror::Error;

/// A workout specification that failed validation.
///
/// Every variant that concerns a single field carries the field path
/// (e.g. `blocks[1].exercises[0].seconds`) so callers can point at it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{path}: expected an object")]
    NotAnObject { path: String },

    #[error("workout has both `blocks` and `timeline`; exactly one is allowed")]
    AmbiguousShape,

    #[error("workout needs a non-empty `blocks` or `timeline` list")]
    MissingContent,

    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: block is missing its `type` tag")]
    MissingTag { path: String },

    #[error("{path}: unknown block type '{tag}'")]
    UnknownTag { path: String, tag: String },

    #[error("{path}: expected {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },

    #[error("{path}: expected a whole number, got {value}")]
    NotAnInteger { path: String, value: f64 },

    #[error("{path}: {value} is outside {min}..={max}")]
    OutOfRange {
        path: String,
        value: f64,
        min: u64,
        max: u64,
    },

    #[error("{path}: must not be empty")]
    EmptyString { path: String },

    #[error("{path}: needs at least one entry")]
    EmptyList { path: String },

    #[error("{path}: unknown value '{value}'")]
    UnknownValue { path: String, value: String },
}

impl ValidationError {
    /// Path of the offending field, if the error concerns one
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::AmbiguousShape | Self::MissingContent => None,
            Self::NotAnObject { path }
            | Self::MissingField { path }
            | Self::MissingTag { path }
            | Self::UnknownTag { path, .. }
            | Self::WrongType { path, .. }
            | Self::NotAnInteger { path, .. }
            | Self::OutOfRange { path, .. }
            | Self::EmptyString { path }
            | Self::EmptyList { path }
            | Self::UnknownValue { path, .. } => Some(path),
        }
    }
}
