//! Pending cue table
//!
//! Cues are armed per event index when an event becomes current and are
//! looked up by that same index, so a cue armed for one event can never fire
//! against another. Arming always starts from an empty table.

use hashbrown::HashMap;
use repcue_types::CueSettings;

use crate::timeline::{CUE_LEAD_MS, TimelineEvent};

/// Lead time of the next-event preview
pub const PREVIEW_LEAD_MS: u64 = 3_000;

/// Work events must be longer than this to get a halfway cue
pub const HALFWAY_MIN_MS: u64 = 10_000;

/// Scheduled announcement within the current event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    /// "five seconds"
    NearEnd,
    /// "Next: {label}"
    NextPreview,
    /// "Halfway"
    Halfway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingCue {
    kind: CueKind,
    /// Elapsed time within the event at which the cue fires
    at_ms: u64,
}

#[derive(Debug, Default)]
pub(crate) struct CueTable {
    entries: HashMap<usize, Vec<PendingCue>>,
}

impl CueTable {
    /// Replace the table with the cues for `event`, skipping any whose offset
    /// is not after `elapsed_ms` (used when resuming mid-event).
    pub fn arm(
        &mut self,
        index: usize,
        event: &TimelineEvent,
        has_next: bool,
        settings: &CueSettings,
        elapsed_ms: u64,
    ) {
        self.entries.clear();

        let duration = event.duration_ms();
        let mut cues = Vec::with_capacity(3);

        if settings.halfway && event.is_work_type() && duration > HALFWAY_MIN_MS {
            cues.push(PendingCue {
                kind: CueKind::Halfway,
                at_ms: duration / 2,
            });
        }
        if duration > CUE_LEAD_MS {
            cues.push(PendingCue {
                kind: CueKind::NearEnd,
                at_ms: duration - CUE_LEAD_MS,
            });
        }
        if has_next && duration > PREVIEW_LEAD_MS {
            cues.push(PendingCue {
                kind: CueKind::NextPreview,
                at_ms: duration - PREVIEW_LEAD_MS,
            });
        }

        cues.retain(|c| c.at_ms > elapsed_ms);
        cues.sort_by_key(|c| c.at_ms);

        if !cues.is_empty() {
            self.entries.insert(index, cues);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every cue for `index` that is due at `elapsed_ms`,
    /// in firing order
    pub fn take_due(&mut self, index: usize, elapsed_ms: u64) -> Vec<CueKind> {
        let Some(cues) = self.entries.get_mut(&index) else {
            return Vec::new();
        };
        let split = cues.partition_point(|c| c.at_ms <= elapsed_ms);
        let due = cues.drain(..split).map(|c| c.kind).collect();
        if cues.is_empty() {
            self.entries.remove(&index);
        }
        due
    }

    /// Number of cues still waiting to fire
    pub fn pending(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn pending_kinds(&self, index: usize) -> Vec<CueKind> {
        self.entries
            .get(&index)
            .map(|cues| cues.iter().map(|c| c.kind).collect())
            .unwrap_or_default()
    }
}
