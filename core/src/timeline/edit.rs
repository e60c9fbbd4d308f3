//! Manual timeline edits
//!
//! Every edit works on a copy: the structural change is applied to the
//! segment list, then the whole timeline is laid out again from 0. Offsets
//! are never shifted incrementally.

use super::error::EditError;
use super::event::{EventKind, Segment, Timeline, TimelineEvent};

/// Default duration of an inserted event
pub const DEFAULT_DRAFT_SECS: u32 = 30;

/// Default label of an inserted event
pub const DEFAULT_DRAFT_LABEL: &str = "New Exercise";

/// A new event to insert. Unset `block_index`/`round` inherit from the
/// event it is inserted after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub label: String,
    pub seconds: u32,
    pub kind: Option<EventKind>,
    pub block_index: Option<usize>,
    pub round: Option<u32>,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            label: DEFAULT_DRAFT_LABEL.to_string(),
            seconds: DEFAULT_DRAFT_SECS,
            kind: Some(EventKind::Work),
            block_index: None,
            round: None,
        }
    }
}

impl EventDraft {
    pub fn new(label: impl Into<String>, seconds: u32) -> Self {
        Self {
            label: label.into(),
            seconds,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// A single manual edit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEdit {
    InsertAfter { index: usize, draft: EventDraft },
    Delete { index: usize },
    Resize { index: usize, seconds: u32 },
    Relabel { index: usize, label: String },
    /// `order[i]` is the old index of the event that ends up at position `i`
    Reorder { order: Vec<usize> },
}

impl Timeline {
    /// Apply any edit, returning the rebuilt timeline
    pub fn apply(&self, edit: &TimelineEdit) -> Result<Timeline, EditError> {
        match edit {
            TimelineEdit::InsertAfter { index, draft } => self.insert_after(*index, draft.clone()),
            TimelineEdit::Delete { index } => self.delete(*index),
            TimelineEdit::Resize { index, seconds } => self.resize(*index, *seconds),
            TimelineEdit::Relabel { index, label } => self.relabel(*index, label),
            TimelineEdit::Reorder { order } => self.reorder(order),
        }
    }

    pub fn insert_after(&self, index: usize, draft: EventDraft) -> Result<Timeline, EditError> {
        let anchor = self.checked(index)?;
        let label = checked_label(&draft.label)?;
        let seconds = checked_seconds(draft.seconds)?;

        let segment = Segment {
            label,
            duration_ms: u64::from(seconds) * 1000,
            block_index: draft.block_index.unwrap_or(anchor.block_index),
            round: draft.round.or(anchor.round),
            kind: draft.kind,
        };

        let mut segments = self.segments();
        segments.insert(index + 1, segment);
        Ok(self.relayout("insert", segments))
    }

    pub fn delete(&self, index: usize) -> Result<Timeline, EditError> {
        self.checked(index)?;
        if self.len() == 1 {
            return Err(EditError::WouldBeEmpty);
        }

        let mut segments = self.segments();
        segments.remove(index);
        Ok(self.relayout("delete", segments))
    }

    pub fn resize(&self, index: usize, seconds: u32) -> Result<Timeline, EditError> {
        self.checked(index)?;
        let seconds = checked_seconds(seconds)?;

        let mut segments = self.segments();
        segments[index].duration_ms = u64::from(seconds) * 1000;
        Ok(self.relayout("resize", segments))
    }

    pub fn relabel(&self, index: usize, label: &str) -> Result<Timeline, EditError> {
        self.checked(index)?;
        let label = checked_label(label)?;

        let mut segments = self.segments();
        segments[index].label = label;
        Ok(self.relayout("relabel", segments))
    }

    pub fn reorder(&self, order: &[usize]) -> Result<Timeline, EditError> {
        let len = self.len();
        let mut seen = vec![false; len];
        let valid = order.len() == len
            && order.iter().all(|&i| {
                if i >= len || seen[i] {
                    return false;
                }
                seen[i] = true;
                true
            });
        if !valid {
            return Err(EditError::InvalidPermutation { len });
        }

        let mut old: Vec<Option<Segment>> = self.segments().into_iter().map(Some).collect();
        let segments = order.iter().filter_map(|&i| old[i].take()).collect();
        Ok(self.relayout("reorder", segments))
    }

    fn checked(&self, index: usize) -> Result<&TimelineEvent, EditError> {
        self.get(index).ok_or(EditError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    fn relayout(&self, op: &'static str, segments: Vec<Segment>) -> Timeline {
        let rebuilt = Timeline::layout(self.title().to_string(), segments);
        tracing::debug!(
            op,
            events = rebuilt.len(),
            total_ms = rebuilt.total_ms(),
            "timeline edited"
        );
        rebuilt
    }
}

fn checked_label(label: &str) -> Result<String, EditError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(EditError::EmptyLabel);
    }
    Ok(trimmed.to_string())
}

fn checked_seconds(seconds: u32) -> Result<u32, EditError> {
    if seconds == 0 {
        return Err(EditError::NonPositiveDuration { seconds });
    }
    Ok(seconds)
}
