//! Timeline system
//!
//! This module provides:
//! - **Builder**: Expands a canonical workout into timed events
//! - **Events**: `TimelineEvent` / `Timeline` and the contiguous layout pass
//! - **Edits**: Insert/delete/resize/relabel/reorder, each producing a new timeline
//! - **Stats / format**: Figures and clock strings for previews
//!
//! # Layout
//!
//! ```text
//!   CanonicalSpec ──build──▶ segments ──layout──▶ Timeline
//!                                          ▲          │
//!                                          └── edit ──┘
//! ```
//!
//! Both paths go through the same left-to-right layout, so every timeline
//! starts at 0 and each event begins where the previous one ends.

mod builder;
mod edit;
mod error;
mod event;
mod format;
mod stats;

#[cfg(test)]
mod builder_tests;

pub use builder::build;
pub use edit::{DEFAULT_DRAFT_LABEL, DEFAULT_DRAFT_SECS, EventDraft, TimelineEdit};
pub use error::EditError;
pub use event::{CUE_LEAD_MS, EventKind, Timeline, TimelineEvent, cue_offsets};
pub use format::{format_clock, format_duration, format_offset};
pub use stats::TimelineStats;
