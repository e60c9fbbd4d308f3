//! Tests for timeline expansion
//!
//! Verifies that:
//! - Each block type expands with the right labels, rounds and durations
//! - Timelines are contiguous and deterministic
//! - Cue offsets follow the 5 second rule
//! - Declared totals never influence timing

use repcue_types::CueSettings;
use serde_json::json;

use super::{EventKind, Timeline, build};
use crate::spec::{Block, BlockPattern, CanonicalSpec, EmomBlock, SpecBody, normalize};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn build_json(doc: serde_json::Value) -> Timeline {
    build(&normalize(&doc).expect("test workout should normalize"))
}

fn labels(tl: &Timeline) -> Vec<&str> {
    tl.iter().map(|e| e.label.as_str()).collect()
}

fn durations(tl: &Timeline) -> Vec<u64> {
    tl.iter().map(|e| e.duration_ms()).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// EMOM
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_emom_parity() {
    let tl = build_json(json!({
        "title": "EMOM",
        "total_minutes": 4,
        "blocks": [{
            "type": "EMOM",
            "minutes": 4,
            "instructions": [
                { "minute_mod": "odd", "name": "A" },
                { "minute_mod": "even", "name": "B" }
            ]
        }]
    }));

    assert_eq!(labels(&tl), vec!["M1: A", "M2: B", "M3: A", "M4: B"]);
    assert_eq!(durations(&tl), vec![60_000; 4]);
    let rounds: Vec<_> = tl.iter().map(|e| e.round).collect();
    assert_eq!(rounds, vec![Some(1), Some(2), Some(3), Some(4)]);
    assert_eq!(tl.events()[1].cue_at_ms, vec![60_000, 115_000]);
}

#[test]
fn test_emom_falls_back_to_first_instruction() {
    let tl = build_json(json!({
        "title": "EMOM",
        "blocks": [{
            "type": "EMOM",
            "minutes": 3,
            "instructions": [
                { "name": "Burpees" },
                { "minute_mod": "even", "name": "Plank" }
            ]
        }]
    }));
    assert_eq!(labels(&tl), vec!["M1: Burpees", "M2: Plank", "M3: Burpees"]);
}

#[test]
fn test_emom_without_instructions_builds_nothing() {
    let block = EmomBlock {
        minutes: 3,
        instructions: vec![],
    };
    assert!(block.instruction_for(1).is_none());

    let spec = CanonicalSpec {
        title: "Hand built".to_string(),
        total_minutes_hint: None,
        cues: CueSettings::default(),
        cues_declared: false,
        body: SpecBody::Blocks(vec![Block {
            title: None,
            notes: None,
            pattern: BlockPattern::Emom(block),
        }]),
    };
    let tl = build(&spec);
    assert!(tl.is_empty());
    assert_eq!(tl.total_ms(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// INTERVAL
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_interval_duration_conservation() {
    let tl = build_json(json!({
        "title": "Intervals",
        "total_minutes": 99,
        "blocks": [{ "type": "INTERVAL", "sets": 6, "work_seconds": 60, "rest_seconds": 60 }]
    }));

    assert_eq!(tl.len(), 11);
    assert_eq!(tl.total_ms(), 6 * 60_000 + 5 * 60_000);
    assert_eq!(tl.total_ms(), 660_000);
    // Declared hint is ignored
    assert_eq!(tl.total_minutes(), 11);

    assert_eq!(tl.events()[0].label, "Work 1/6");
    assert_eq!(tl.events()[1].label, "Rest 1/6");
    assert_eq!(tl.events()[1].kind, Some(EventKind::Rest));
    assert!(tl.events()[1].cue_at_ms.is_empty());
    assert_eq!(tl.events()[10].label, "Work 6/6");
}

#[test]
fn test_interval_without_rest() {
    let tl = build_json(json!({
        "title": "Intervals",
        "blocks": [{ "type": "INTERVAL", "sets": 3, "work_seconds": 20 }]
    }));
    assert_eq!(labels(&tl), vec!["Work 1/3", "Work 2/3", "Work 3/3"]);
}

#[test]
fn test_interval_with_sequence() {
    let tl = build_json(json!({
        "title": "Sequence",
        "blocks": [{
            "type": "INTERVAL",
            "work_seconds": 60,
            "rest_seconds": 60,
            "sets": 2,
            "sequence": [
                { "name": "Row", "seconds": 40, "rest_seconds": 20 },
                { "name": "Bike" }
            ]
        }]
    }));

    assert_eq!(
        labels(&tl),
        vec!["Row (1/2)", "Rest (1/2)", "Bike (1/2)", "Row (2/2)", "Rest (2/2)", "Bike (2/2)"]
    );
    assert_eq!(
        durations(&tl),
        vec![40_000, 20_000, 60_000, 40_000, 20_000, 60_000]
    );
    assert_eq!(tl.events()[3].round, Some(2));
}

// ═══════════════════════════════════════════════════════════════════════════
// CIRCUIT / TABATA
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_circuit_rounds_and_rests() {
    let tl = build_json(json!({
        "title": "Circuit",
        "blocks": [{
            "type": "CIRCUIT",
            "rounds": 2,
            "rest_between_rounds_seconds": 90,
            "exercises": [
                { "name": "Squat", "seconds": 45, "rest_after_seconds": 15 },
                { "name": "Push-up" }
            ]
        }]
    }));

    assert_eq!(
        labels(&tl),
        vec![
            "Squat (R 1/2)",
            "Rest",
            "Push-up (R 1/2)",
            "Round rest",
            "Squat (R 2/2)",
            "Rest",
            "Push-up (R 2/2)",
        ]
    );
    assert_eq!(tl.events()[2].duration_ms(), 30_000);
    assert_eq!(tl.events()[3].kind, Some(EventKind::RoundRest));
    assert_eq!(tl.events()[3].duration_ms(), 90_000);
}

#[test]
fn test_tabata() {
    let tl = build_json(json!({
        "title": "Tabata",
        "blocks": [{ "type": "TABATA", "rounds": 3, "exercise": "Jump squats" }]
    }));

    assert_eq!(
        labels(&tl),
        vec![
            "Jump squats (1/3)",
            "Rest (1/3)",
            "Jump squats (2/3)",
            "Rest (2/3)",
            "Jump squats (3/3)",
        ]
    );
    assert_eq!(tl.total_ms(), 3 * 20_000 + 2 * 10_000);
    assert_eq!(tl.events()[0].cue_at_ms, vec![0, 15_000]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Flat / Multi-block
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_flat_maps_one_to_one() {
    let tl = build_json(json!({
        "title": "Flat",
        "timeline": [
            { "kind": "prep", "label": "Get ready", "seconds": 5 },
            { "kind": "work", "label": "Burpees", "seconds": 40, "round": 1 },
            { "kind": "rest", "label": "Breathe", "seconds": 20, "round": 1 },
            { "kind": "cooldown", "label": "Walk", "seconds": 60 }
        ]
    }));

    assert_eq!(labels(&tl), vec!["Get ready", "Burpees", "Breathe", "Walk"]);
    assert_eq!(durations(&tl), vec![5_000, 40_000, 20_000, 60_000]);
    assert!(tl.iter().all(|e| e.block_index == 0));
    // 5s prep is exactly at the threshold: no cues
    assert!(tl.events()[0].cue_at_ms.is_empty());
    assert_eq!(tl.events()[1].cue_at_ms, vec![5_000, 40_000]);
    assert!(tl.events()[2].cue_at_ms.is_empty());
}

#[test]
fn test_cue_threshold_boundary() {
    let tl = build_json(json!({
        "title": "Edge",
        "timeline": [
            { "kind": "work", "label": "five", "seconds": 5 },
            { "kind": "work", "label": "six", "seconds": 6 }
        ]
    }));
    assert!(tl.events()[0].cue_at_ms.is_empty());
    assert_eq!(tl.events()[1].cue_at_ms, vec![5_000, 6_000]);
}

#[test]
fn test_multi_block_contiguity_and_block_index() {
    let doc = json!({
        "title": "Mixed",
        "total_minutes": 30,
        "blocks": [
            { "type": "TABATA", "rounds": 2 },
            { "type": "EMOM", "minutes": 2, "instructions": [{ "name": "Swings" }] },
            { "type": "CIRCUIT", "rounds": 1, "exercises": [{ "name": "Carry", "seconds": 50 }] }
        ]
    });
    let tl = build_json(doc.clone());

    assert!(tl.is_contiguous());
    assert_eq!(tl.events()[0].start_ms, 0);
    for pair in tl.events().windows(2) {
        assert_eq!(pair[0].end_ms, pair[1].start_ms);
    }

    let blocks: Vec<_> = tl.iter().map(|e| e.block_index).collect();
    assert_eq!(blocks, vec![0, 0, 0, 1, 1, 2]);
    assert_eq!(tl.total_ms(), 50_000 + 120_000 + 50_000);

    let stats = tl.stats();
    assert_eq!(stats.block_count, 3);
    assert_eq!(stats.rest_ms, 10_000);
    assert_eq!(stats.work_ms, 210_000);
    assert_eq!(stats.count(EventKind::Work), 5);

    // Determinism
    assert_eq!(build_json(doc), tl);
}

#[test]
fn test_title_carried() {
    let tl = build_json(json!({ "title": "Finisher", "blocks": [{ "type": "TABATA" }] }));
    assert_eq!(tl.title(), "Finisher");
    assert_eq!(tl.len(), 15);
}
