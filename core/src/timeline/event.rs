//! Timeline events and the contiguous layout pass
//!
//! A `Timeline` is only ever produced by laying out a list of segments
//! left to right from 0. That single pass is shared by the builder and by
//! every edit, so contiguity holds by construction.

use serde::{Deserialize, Serialize};

/// Lead time of the near-end cue. Work events longer than this get
/// `cue_at_ms = [start, end - CUE_LEAD_MS]`.
pub const CUE_LEAD_MS: u64 = 5_000;

/// Classification of an event, for display and statistics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Prep,
    Work,
    Rest,
    RoundRest,
    Cooldown,
}

static EVENT_KINDS: phf::Map<&'static str, EventKind> = phf::phf_map! {
    "prep" => EventKind::Prep,
    "work" => EventKind::Work,
    "rest" => EventKind::Rest,
    "round_rest" => EventKind::RoundRest,
    "cooldown" => EventKind::Cooldown,
};

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Prep => "prep",
            EventKind::Work => "work",
            EventKind::Rest => "rest",
            EventKind::RoundRest => "round_rest",
            EventKind::Cooldown => "cooldown",
        }
    }

    /// Rest-type kinds never get automatic cues
    pub fn is_rest(&self) -> bool {
        matches!(self, EventKind::Rest | EventKind::RoundRest)
    }
}

impl std::str::FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EVENT_KINDS
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or(())
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One absolutely-timed interval of a workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Offset from workout start, inclusive
    pub start_ms: u64,
    /// Offset from workout start, exclusive. Always > `start_ms`.
    pub end_ms: u64,
    pub label: String,
    /// Index of the source block (0 for flat workouts)
    pub block_index: usize,
    pub round: Option<u32>,
    /// Absolute offsets for lookahead announcements (empty = none)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cue_at_ms: Vec<u64>,
    pub kind: Option<EventKind>,
}

impl TimelineEvent {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Events without a kind count as work
    pub fn is_work_type(&self) -> bool {
        !self.kind.is_some_and(|k| k.is_rest())
    }

    fn to_segment(&self) -> Segment {
        Segment {
            label: self.label.clone(),
            duration_ms: self.duration_ms(),
            block_index: self.block_index,
            round: self.round,
            kind: self.kind,
        }
    }
}

/// Cue offsets for an event occupying `[start_ms, end_ms)`
pub fn cue_offsets(start_ms: u64, end_ms: u64, kind: Option<EventKind>) -> Vec<u64> {
    let is_rest = kind.is_some_and(|k| k.is_rest());
    if is_rest || end_ms - start_ms <= CUE_LEAD_MS {
        return Vec::new();
    }
    vec![start_ms, end_ms - CUE_LEAD_MS]
}

/// An event before it has been placed on the timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub label: String,
    /// Always > 0
    pub duration_ms: u64,
    pub block_index: usize,
    pub round: Option<u32>,
    pub kind: Option<EventKind>,
}

impl Segment {
    pub fn new(
        label: String,
        seconds: u32,
        block_index: usize,
        round: Option<u32>,
        kind: EventKind,
    ) -> Self {
        Self {
            label,
            duration_ms: u64::from(seconds) * 1000,
            block_index,
            round,
            kind: Some(kind),
        }
    }
}

/// An ordered, contiguous sequence of events plus the workout title
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Timeline {
    title: String,
    events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Place segments back to back from 0, assigning cue offsets
    pub(crate) fn layout(title: String, segments: Vec<Segment>) -> Self {
        let mut cursor = 0u64;
        let events = segments
            .into_iter()
            .map(|seg| {
                let start_ms = cursor;
                let end_ms = cursor + seg.duration_ms;
                cursor = end_ms;
                TimelineEvent {
                    start_ms,
                    end_ms,
                    cue_at_ms: cue_offsets(start_ms, end_ms, seg.kind),
                    label: seg.label,
                    block_index: seg.block_index,
                    round: seg.round,
                    kind: seg.kind,
                }
            })
            .collect();

        Self { title, events }
    }

    pub(crate) fn segments(&self) -> Vec<Segment> {
        self.events.iter().map(TimelineEvent::to_segment).collect()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&TimelineEvent> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEvent> {
        self.events.iter()
    }

    /// Total length; always the last event's end
    pub fn total_ms(&self) -> u64 {
        self.events.last().map_or(0, |e| e.end_ms)
    }

    /// Total length in whole minutes, rounded up (for display)
    pub fn total_minutes(&self) -> u64 {
        self.total_ms().div_ceil(60_000)
    }

    /// Check the layout invariants: starts at 0, contiguous, non-empty events,
    /// cue offsets inside their event. Used by tests and debug assertions.
    pub fn is_contiguous(&self) -> bool {
        let mut cursor = 0;
        for event in &self.events {
            if event.start_ms != cursor || event.end_ms <= event.start_ms {
                return false;
            }
            if event
                .cue_at_ms
                .iter()
                .any(|&at| at < event.start_ms || at >= event.end_ms)
            {
                return false;
            }
            cursor = event.end_ms;
        }
        true
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEvent;
    type IntoIter = std::slice::Iter<'a, TimelineEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
