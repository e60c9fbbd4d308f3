//! Error types for timeline edits

use thiserror::Error;

/// A manual edit that could not be applied. The source timeline is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("event index {index} is out of range (timeline has {len} events)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("duration must be at least one second, got {seconds}")]
    NonPositiveDuration { seconds: u32 },

    #[error("event label must not be empty")]
    EmptyLabel,

    #[error("reorder must list every index 0..{len} exactly once")]
    InvalidPermutation { len: usize },

    #[error("cannot remove the last remaining event")]
    WouldBeEmpty,
}
