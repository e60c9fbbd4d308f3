//! Tests for workout specification normalization
//!
//! Verifies that:
//! - Each shape is accepted and defaulted correctly
//! - Ambiguous or empty documents are rejected
//! - Each malformed field produces its own error with the right path

use repcue_types::CueSettings;
use serde_json::json;

use super::*;
use crate::timeline::EventKind;

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn blocks_of(spec: &CanonicalSpec) -> &[Block] {
    match &spec.body {
        SpecBody::Blocks(blocks) => blocks,
        SpecBody::Flat(_) => panic!("expected block body"),
    }
}

fn first_block_error(block: serde_json::Value) -> ValidationError {
    normalize(&json!({ "title": "T", "total_minutes": 10, "blocks": [block] }))
        .expect_err("block should be rejected")
}

// ═══════════════════════════════════════════════════════════════════════════
// Shape Detection
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_block_shape_with_default_cues() {
    let spec = normalize(&json!({
        "title": "  Double-Unders and Swings ",
        "total_minutes": 12,
        "blocks": [{
            "type": "INTERVAL",
            "work_seconds": 60,
            "rest_seconds": 60,
            "sets": 6
        }]
    }))
    .unwrap();

    assert_eq!(spec.title, "Double-Unders and Swings");
    assert_eq!(spec.total_minutes_hint, Some(12));
    assert_eq!(spec.cues, CueSettings::default());
    assert!(!spec.cues_declared);
    assert_eq!(spec.cues_or(CueSettings::muted()), CueSettings::muted());

    let blocks = blocks_of(&spec);
    assert_eq!(blocks.len(), 1);
    match &blocks[0].pattern {
        BlockPattern::Interval(b) => {
            assert_eq!((b.work_seconds, b.rest_seconds, b.sets), (60, 60, 6));
            assert!(b.sequence.is_none());
        }
        other => panic!("unexpected pattern {other:?}"),
    }
}

#[test]
fn test_flat_shape() {
    let spec = normalize(&json!({
        "title": "Flat",
        "total_seconds": 90,
        "timeline": [
            { "kind": "prep", "label": "Get ready", "seconds": 10 },
            { "kind": "work", "label": "Burpees", "seconds": 60, "round": 1, "index": 0 },
            { "kind": "cooldown", "label": "Walk", "seconds": 20 }
        ]
    }))
    .unwrap();

    assert_eq!(spec.total_minutes_hint, Some(2));
    let SpecBody::Flat(items) = &spec.body else {
        panic!("expected flat body");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].kind, EventKind::Prep);
    assert_eq!(items[1].round, Some(1));
    assert_eq!(items[1].index, Some(0));
    assert_eq!(items[2].kind, EventKind::Cooldown);
}

#[test]
fn test_both_shapes_rejected() {
    let err = normalize(&json!({
        "title": "Both",
        "blocks": [{ "type": "TABATA" }],
        "timeline": [{ "kind": "work", "label": "x", "seconds": 5 }]
    }))
    .unwrap_err();
    assert_eq!(err, ValidationError::AmbiguousShape);
}

#[test]
fn test_empty_blocks_fall_through_to_timeline() {
    let spec = normalize(&json!({
        "title": "Flat",
        "blocks": [],
        "timeline": [{ "kind": "work", "label": "x", "seconds": 5 }]
    }))
    .unwrap();
    assert!(matches!(spec.body, SpecBody::Flat(_)));
}

#[test]
fn test_neither_shape_rejected() {
    let err = normalize(&json!({ "title": "Nothing", "blocks": [], "timeline": [] })).unwrap_err();
    assert_eq!(err, ValidationError::MissingContent);

    let err = normalize(&json!({ "title": "Nothing" })).unwrap_err();
    assert_eq!(err, ValidationError::MissingContent);
}

#[test]
fn test_non_object_rejected() {
    let err = normalize(&json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, ValidationError::NotAnObject { .. }));
}

#[test]
fn test_blank_title_rejected() {
    let err = normalize(&json!({ "title": "   ", "blocks": [{ "type": "TABATA" }] })).unwrap_err();
    assert_eq!(
        err,
        ValidationError::EmptyString {
            path: "title".to_string()
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Block Validation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_tag() {
    let err = first_block_error(json!({ "minutes": 4 }));
    assert_eq!(
        err,
        ValidationError::MissingTag {
            path: "blocks[0]".to_string()
        }
    );
}

#[test]
fn test_unknown_tag() {
    let err = first_block_error(json!({ "type": "AMRAP", "minutes": 4 }));
    assert!(matches!(err, ValidationError::UnknownTag { ref tag, .. } if tag == "AMRAP"));
    assert_eq!(err.path(), Some("blocks[0].type"));
}

#[test]
fn test_lowercase_tag_accepted() {
    let spec = normalize(&json!({
        "title": "T",
        "blocks": [{ "type": "tabata" }]
    }))
    .unwrap();
    let tag = blocks_of(&spec)[0].tag();
    assert_eq!(tag, BlockTag::Tabata);
    assert_eq!(tag.as_str(), "TABATA");
    assert_eq!(tag.as_str().parse::<BlockTag>(), Ok(BlockTag::Tabata));
}

#[test]
fn test_fractional_duration() {
    let err = first_block_error(json!({
        "type": "INTERVAL", "work_seconds": 30.5, "sets": 3
    }));
    assert_eq!(
        err,
        ValidationError::NotAnInteger {
            path: "blocks[0].work_seconds".to_string(),
            value: 30.5
        }
    );
}

#[test]
fn test_negative_duration() {
    let err = first_block_error(json!({
        "type": "INTERVAL", "work_seconds": 30, "rest_seconds": -10, "sets": 3
    }));
    assert!(matches!(err, ValidationError::OutOfRange { value, .. } if value == -10.0));
    assert_eq!(err.path(), Some("blocks[0].rest_seconds"));
}

#[test]
fn test_zero_count_rejected() {
    let err = first_block_error(json!({ "type": "CIRCUIT", "rounds": 0, "exercises": [{ "name": "a" }] }));
    assert_eq!(err.path(), Some("blocks[0].rounds"));
    assert!(matches!(err, ValidationError::OutOfRange { min: 1, .. }));
}

#[test]
fn test_integral_float_accepted() {
    let spec = normalize(&json!({
        "title": "T",
        "blocks": [{ "type": "INTERVAL", "work_seconds": 45.0, "sets": 2 }]
    }))
    .unwrap();
    let BlockPattern::Interval(b) = &blocks_of(&spec)[0].pattern else {
        panic!("expected interval");
    };
    assert_eq!(b.work_seconds, 45);
}

#[test]
fn test_huge_count_rejected_before_expansion() {
    let err = first_block_error(json!({
        "type": "EMOM", "minutes": 4_294_967_295u64, "instructions": [{ "name": "Burpees" }]
    }));
    assert_eq!(
        err,
        ValidationError::OutOfRange {
            path: "blocks[0].minutes".to_string(),
            value: 4_294_967_295.0,
            min: 1,
            max: MAX_WORKOUT_SECS as u64,
        }
    );
}

#[test]
fn test_workout_longer_than_a_day_rejected() {
    let emom = |minutes: u32| {
        normalize(&json!({
            "title": "T",
            "blocks": [{ "type": "EMOM", "minutes": minutes, "instructions": [{ "name": "Row" }] }]
        }))
    };
    assert!(emom(1440).is_ok());
    assert_eq!(
        emom(1441).unwrap_err(),
        ValidationError::OutOfRange {
            path: "blocks[0].minutes".to_string(),
            value: 1441.0,
            min: 1,
            max: 1440,
        }
    );

    // 84_000 s of EMOM leaves 2_400 s; 80 tabata rounds (2_390 s) still fit
    let err = normalize(&json!({
        "title": "T",
        "blocks": [
            { "type": "EMOM", "minutes": 1400, "instructions": [{ "name": "Row" }] },
            { "type": "TABATA", "rounds": 100 }
        ]
    }))
    .unwrap_err();
    assert_eq!(err.path(), Some("blocks[1].rounds"));
    assert!(matches!(err, ValidationError::OutOfRange { max: 80, .. }));

    let err = normalize(&json!({
        "title": "T",
        "timeline": [
            { "kind": "work", "label": "Long", "seconds": 86_000 },
            { "kind": "rest", "label": "Too long", "seconds": 500 }
        ]
    }))
    .unwrap_err();
    assert_eq!(
        err,
        ValidationError::OutOfRange {
            path: "timeline[1].seconds".to_string(),
            value: 500.0,
            min: 1,
            max: 400,
        }
    );
}

#[test]
fn test_emom_requires_instructions() {
    let err = first_block_error(json!({ "type": "EMOM", "minutes": 10, "instructions": [] }));
    assert_eq!(
        err,
        ValidationError::EmptyList {
            path: "blocks[0].instructions".to_string()
        }
    );

    let err = first_block_error(json!({ "type": "EMOM", "minutes": 10 }));
    assert_eq!(
        err,
        ValidationError::MissingField {
            path: "blocks[0].instructions".to_string()
        }
    );
}

#[test]
fn test_emom_bad_minute_mod() {
    let err = first_block_error(json!({
        "type": "EMOM", "minutes": 4,
        "instructions": [{ "minute_mod": "third", "name": "A" }]
    }));
    assert_eq!(err.path(), Some("blocks[0].instructions[0].minute_mod"));
    assert!(matches!(err, ValidationError::UnknownValue { .. }));
}

#[test]
fn test_circuit_requires_exercises() {
    let err = first_block_error(json!({ "type": "CIRCUIT", "rounds": 3, "exercises": [] }));
    assert!(matches!(err, ValidationError::EmptyList { .. }));
}

#[test]
fn test_circuit_exercise_defaults() {
    let spec = normalize(&json!({
        "title": "T",
        "blocks": [{
            "type": "CIRCUIT",
            "rounds": 2,
            "exercises": [{ "name": " Squats " }, { "name": "Row", "seconds": 45, "rest_after_seconds": 15 }]
        }]
    }))
    .unwrap();
    let BlockPattern::Circuit(b) = &blocks_of(&spec)[0].pattern else {
        panic!("expected circuit");
    };
    assert_eq!(b.exercises[0].name, "Squats");
    assert_eq!(b.exercises[0].seconds, DEFAULT_CIRCUIT_EXERCISE_SECS);
    assert_eq!(b.exercises[0].rest_after_seconds, 0);
    assert_eq!(b.exercises[1].rest_after_seconds, 15);
    assert_eq!(b.rest_between_rounds_seconds, 0);
}

#[test]
fn test_tabata_defaults() {
    let spec = normalize(&json!({ "title": "T", "blocks": [{ "type": "TABATA" }] })).unwrap();
    let BlockPattern::Tabata(b) = &blocks_of(&spec)[0].pattern else {
        panic!("expected tabata");
    };
    assert_eq!(b.rounds, 8);
    assert_eq!(b.work_seconds, 20);
    assert_eq!(b.rest_seconds, 10);
    assert_eq!(b.exercise, "Mixed");
}

#[test]
fn test_interval_exercises_alias_and_step_defaults() {
    let spec = normalize(&json!({
        "title": "T",
        "blocks": [{
            "type": "INTERVAL",
            "work_seconds": 40,
            "sets": 3,
            "exercises": [{ "name": "Bike" }, { "name": "Row", "seconds": 20, "rest_seconds": 10 }]
        }]
    }))
    .unwrap();
    let BlockPattern::Interval(b) = &blocks_of(&spec)[0].pattern else {
        panic!("expected interval");
    };
    let steps = b.sequence.as_ref().unwrap();
    assert_eq!(steps[0].seconds, 40);
    assert_eq!(steps[1].seconds, 20);
    assert_eq!(steps[1].rest_seconds, 10);
}

#[test]
fn test_blank_exercise_name() {
    let err = first_block_error(json!({
        "type": "CIRCUIT", "rounds": 1, "exercises": [{ "name": "  " }]
    }));
    assert_eq!(
        err,
        ValidationError::EmptyString {
            path: "blocks[0].exercises[0].name".to_string()
        }
    );
}

#[test]
fn test_block_title_and_notes() {
    let spec = normalize(&json!({
        "title": "T",
        "blocks": [{ "type": "TABATA", "title": "Finisher", "notes": "" }]
    }))
    .unwrap();
    let block = &blocks_of(&spec)[0];
    assert_eq!(block.title.as_deref(), Some("Finisher"));
    assert_eq!(block.notes, None);
}

// ═══════════════════════════════════════════════════════════════════════════
// Flat Validation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_flat_item_errors() {
    let err = normalize(&json!({
        "title": "T",
        "timeline": [{ "kind": "sprint", "label": "x", "seconds": 10 }]
    }))
    .unwrap_err();
    assert_eq!(err.path(), Some("timeline[0].kind"));

    let err = normalize(&json!({
        "title": "T",
        "timeline": [{ "kind": "work", "label": "x", "seconds": 0 }]
    }))
    .unwrap_err();
    assert_eq!(err.path(), Some("timeline[0].seconds"));

    let err = normalize(&json!({
        "title": "T",
        "timeline": [{ "kind": "work", "seconds": 10 }]
    }))
    .unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingField {
            path: "timeline[0].label".to_string()
        }
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// Cue Settings
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_partial_cues_take_defaults() {
    let spec = normalize(&json!({
        "title": "T",
        "blocks": [{ "type": "TABATA" }],
        "cues": { "halfway": true, "tts": false }
    }))
    .unwrap();
    assert!(spec.cues_declared);
    assert_eq!(
        spec.cues,
        CueSettings {
            start: true,
            halfway: true,
            last_round: true,
            tts: false
        }
    );
    assert_eq!(spec.cues_or(CueSettings::default()), spec.cues);
}

#[test]
fn test_cue_wrong_type() {
    let err = normalize(&json!({
        "title": "T",
        "blocks": [{ "type": "TABATA" }],
        "cues": { "start": "yes" }
    }))
    .unwrap_err();
    assert_eq!(err.path(), Some("cues.start"));
}

#[test]
fn test_bad_total_minutes_hint() {
    let err = normalize(&json!({
        "title": "T",
        "total_minutes": -3,
        "blocks": [{ "type": "TABATA" }]
    }))
    .unwrap_err();
    assert_eq!(err.path(), Some("total_minutes"));
}
