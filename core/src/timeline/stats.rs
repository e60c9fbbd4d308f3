//! Timeline statistics for previews

use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use super::event::{EventKind, Timeline};

/// Summary figures re-derived from a built timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimelineStats {
    pub event_count: usize,
    pub total_ms: u64,
    /// Time in work-type events (anything not rest/round rest)
    pub work_ms: u64,
    pub rest_ms: u64,
    /// Number of distinct source blocks
    pub block_count: usize,
    pub by_kind: HashMap<EventKind, usize>,
}

impl TimelineStats {
    pub fn count(&self, kind: EventKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Share of the workout spent working, 0.0 - 100.0
    pub fn work_percent(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        100.0 * self.work_ms as f64 / self.total_ms as f64
    }
}

impl Timeline {
    pub fn stats(&self) -> TimelineStats {
        let mut stats = TimelineStats {
            event_count: self.len(),
            total_ms: self.total_ms(),
            ..Default::default()
        };

        let mut blocks = HashSet::new();
        for event in self {
            if event.is_work_type() {
                stats.work_ms += event.duration_ms();
            } else {
                stats.rest_ms += event.duration_ms();
            }
            if let Some(kind) = event.kind {
                *stats.by_kind.entry(kind).or_insert(0) += 1;
            }
            blocks.insert(event.block_index);
        }

        stats.block_count = blocks.len();
        stats
    }
}
