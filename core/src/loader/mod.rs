//! Workout file loading
//!
//! Reads a workout document from disk, parses it as JSON or TOML into a
//! `serde_json::Value` tree and runs it through the normalizer. TOML files
//! use the same keys as JSON ones (`[[blocks]]` / `[[timeline]]` tables).

mod error;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::spec::{CanonicalSpec, normalize};

pub use error::LoadError;

/// Document syntax of a workout file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Toml,
}

impl SourceFormat {
    /// Guess from the file extension. Anything that isn't `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => SourceFormat::Toml,
            _ => SourceFormat::Json,
        }
    }
}

/// Parse document text into a raw value tree without validating it
pub fn parse_document(content: &str, format: SourceFormat) -> Result<Value, LoadError> {
    match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(LoadError::ParseJson),
        SourceFormat::Toml => toml::from_str::<Value>(content).map_err(LoadError::ParseToml),
    }
}

/// Parse and normalize workout text
pub fn parse_workout(content: &str, format: SourceFormat) -> Result<CanonicalSpec, LoadError> {
    let raw = parse_document(content, format)?;
    Ok(normalize(&raw)?)
}

/// Load and normalize a workout file
pub fn load_workout(path: &Path) -> Result<CanonicalSpec, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = parse_document(&content, SourceFormat::from_path(path))?;
    let spec = normalize(&raw).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        title = %spec.title,
        items = spec.body.len(),
        "loaded workout"
    );
    Ok(spec)
}
