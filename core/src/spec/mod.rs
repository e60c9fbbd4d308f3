//! Workout specifications
//!
//! This module validates incoming workout documents and turns them into
//! the canonical form consumed by the timeline builder.
//!
//! - **definition**: Canonical types (`CanonicalSpec`, `Block`, `TimelineItem`)
//! - **normalize**: Shape detection, validation and defaulting
//! - **error**: `ValidationError`, one variant per failure with its field path
//!
//! Two source shapes are accepted:
//!
//! ```text
//! { "title", "total_minutes", "blocks": [ {"type": "EMOM", ...}, ... ], "cues"? }
//! { "title", "total_seconds"?, "timeline": [ {"kind": "work", "label", "seconds"}, ... ] }
//! ```

mod definition;
mod error;
mod normalize;

#[cfg(test)]
mod normalize_tests;

pub use definition::*;
pub use error::ValidationError;
pub use normalize::{normalize, normalize_blocks, normalize_flat};
