//! Read-only view of the runtime for presentation layers

use serde::Serialize;

use crate::timeline::{EventKind, format_clock};

/// Runtime state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Ran past the last event. Behaves like `Idle` for `start()`.
    Completed,
}

impl RuntimeState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RuntimeState::Idle | RuntimeState::Completed)
    }
}

/// Derived values for the current event, computed on demand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeSnapshot {
    pub state: RuntimeState,
    pub index: usize,
    pub event_count: usize,
    pub label: String,
    pub kind: Option<EventKind>,
    pub round: Option<u32>,
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    /// 0.0 - 100.0
    pub progress_percent: f64,
    pub next_label: Option<String>,
    /// "{index + 1} of {event_count}"
    pub position: String,
    /// Time since workout start
    pub workout_elapsed_ms: u64,
    pub workout_total_ms: u64,
}

impl RuntimeSnapshot {
    /// Remaining time as a `m:ss` countdown
    pub fn remaining_clock(&self) -> String {
        format_clock(self.remaining_ms)
    }
}
