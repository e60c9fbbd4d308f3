//! Timer runtime
//!
//! Plays a [`Timeline`](crate::timeline::Timeline) in real time:
//! - **Runner**: `TimerRuntime` state machine driven by `tick()`
//! - **Cues**: Per-event table of pending lookahead announcements
//! - **Sink**: `CueSink` trait the host implements for speech and haptics
//! - **Snapshot**: Derived values for display
//!
//! The runtime never blocks and never reads a clock on its own; `tick_at`
//! only measures the gap between instants the host hands it.

mod cues;
mod runner;
mod sink;
mod snapshot;


pub use cues::{CueKind, HALFWAY_MIN_MS, PREVIEW_LEAD_MS};
pub use runner::TimerRuntime;
pub use sink::{BuzzPattern, CueSink, NullSink, SinkError};
pub use snapshot::{RuntimeSnapshot, RuntimeState};
