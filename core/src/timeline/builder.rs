//! Timeline builder
//!
//! Expands a [`CanonicalSpec`] into a [`Timeline`]. Each block pattern has
//! its own expansion function; all of them only emit segments, and the
//! shared layout pass assigns offsets and cues afterwards.

use crate::spec::{
    Block, BlockPattern, CanonicalSpec, CircuitBlock, EMOM_SLOT_SECS, EmomBlock, IntervalBlock,
    SpecBody, TabataBlock, TimelineItem,
};

use super::event::{EventKind, Segment, Timeline};

/// Build the timeline for a validated workout.
///
/// Pure and deterministic: the same spec always yields an identical timeline.
pub fn build(spec: &CanonicalSpec) -> Timeline {
    let segments = match &spec.body {
        SpecBody::Blocks(blocks) => blocks
            .iter()
            .enumerate()
            .flat_map(|(index, block)| expand_block(index, block))
            .collect(),
        SpecBody::Flat(items) => items.iter().map(flat_segment).collect(),
    };

    let timeline = Timeline::layout(spec.title.clone(), segments);
    debug_assert!(timeline.is_contiguous());

    tracing::debug!(
        title = %spec.title,
        events = timeline.len(),
        total_ms = timeline.total_ms(),
        hint_minutes = ?spec.total_minutes_hint,
        "built timeline"
    );

    timeline
}

fn expand_block(block_index: usize, block: &Block) -> Vec<Segment> {
    tracing::trace!(block_index, tag = block.tag().as_str(), "expanding block");
    match &block.pattern {
        BlockPattern::Emom(b) => expand_emom(block_index, b),
        BlockPattern::Interval(b) => expand_interval(block_index, b),
        BlockPattern::Circuit(b) => expand_circuit(block_index, b),
        BlockPattern::Tabata(b) => expand_tabata(block_index, b),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Expansion Rules
// ═══════════════════════════════════════════════════════════════════════════

fn expand_emom(block_index: usize, b: &EmomBlock) -> Vec<Segment> {
    (1..=b.minutes)
        .filter_map(|minute| {
            let inst = b.instruction_for(minute)?;
            Some(Segment::new(
                format!("M{minute}: {}", inst.name),
                EMOM_SLOT_SECS,
                block_index,
                Some(minute),
                EventKind::Work,
            ))
        })
        .collect()
}

fn expand_interval(block_index: usize, b: &IntervalBlock) -> Vec<Segment> {
    let mut out = Vec::new();

    for set in 1..=b.sets {
        match &b.sequence {
            Some(steps) => {
                for step in steps {
                    out.push(Segment::new(
                        format!("{} ({set}/{})", step.name, b.sets),
                        step.seconds,
                        block_index,
                        Some(set),
                        EventKind::Work,
                    ));
                    if step.rest_seconds > 0 {
                        out.push(Segment::new(
                            format!("Rest ({set}/{})", b.sets),
                            step.rest_seconds,
                            block_index,
                            Some(set),
                            EventKind::Rest,
                        ));
                    }
                }
            }
            None => {
                out.push(Segment::new(
                    format!("Work {set}/{}", b.sets),
                    b.work_seconds,
                    block_index,
                    Some(set),
                    EventKind::Work,
                ));
                // No trailing rest after the final set
                if set < b.sets && b.rest_seconds > 0 {
                    out.push(Segment::new(
                        format!("Rest {set}/{}", b.sets),
                        b.rest_seconds,
                        block_index,
                        Some(set),
                        EventKind::Rest,
                    ));
                }
            }
        }
    }

    out
}

fn expand_circuit(block_index: usize, b: &CircuitBlock) -> Vec<Segment> {
    let mut out = Vec::new();

    for round in 1..=b.rounds {
        for ex in &b.exercises {
            out.push(Segment::new(
                format!("{} (R {round}/{})", ex.name, b.rounds),
                ex.seconds,
                block_index,
                Some(round),
                EventKind::Work,
            ));
            if ex.rest_after_seconds > 0 {
                out.push(Segment::new(
                    "Rest".to_string(),
                    ex.rest_after_seconds,
                    block_index,
                    Some(round),
                    EventKind::Rest,
                ));
            }
        }
        if b.rest_between_rounds_seconds > 0 && round < b.rounds {
            out.push(Segment::new(
                "Round rest".to_string(),
                b.rest_between_rounds_seconds,
                block_index,
                Some(round),
                EventKind::RoundRest,
            ));
        }
    }

    out
}

fn expand_tabata(block_index: usize, b: &TabataBlock) -> Vec<Segment> {
    let mut out = Vec::new();

    for round in 1..=b.rounds {
        out.push(Segment::new(
            format!("{} ({round}/{})", b.exercise, b.rounds),
            b.work_seconds,
            block_index,
            Some(round),
            EventKind::Work,
        ));
        if round < b.rounds {
            out.push(Segment::new(
                format!("Rest ({round}/{})", b.rounds),
                b.rest_seconds,
                block_index,
                Some(round),
                EventKind::Rest,
            ));
        }
    }

    out
}

fn flat_segment(item: &TimelineItem) -> Segment {
    Segment::new(item.label.clone(), item.seconds, 0, item.round, item.kind)
}
