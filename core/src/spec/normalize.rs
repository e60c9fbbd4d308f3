//! Workout specification normalizer
//!
//! Turns a raw JSON/TOML document into a [`CanonicalSpec`]. The top-level
//! shape is inspected exactly once in [`normalize`]; after that each shape
//! has its own entry point and never looks at the other.
//!
//! Numbers are read from `serde_json::Value` directly rather than through
//! derived structs so that a fractional or negative duration is reported as
//! such, with its field path, instead of as a generic parse failure.

use repcue_types::CueSettings;
use serde_json::{Map, Value};

use super::definition::*;
use super::error::ValidationError;
use crate::timeline::EventKind;

type Result<T> = std::result::Result<T, ValidationError>;

/// Validate and canonicalize a workout document of either shape
pub fn normalize(raw: &Value) -> Result<CanonicalSpec> {
    let obj = raw.as_object().ok_or_else(|| ValidationError::NotAnObject {
        path: "$".to_string(),
    })?;

    let has_blocks = obj.get("blocks").is_some_and(is_present);
    let has_timeline = obj.get("timeline").is_some_and(is_present);

    match (has_blocks, has_timeline) {
        (true, true) => Err(ValidationError::AmbiguousShape),
        (true, false) => normalize_blocks(obj),
        (false, true) => normalize_flat(obj),
        (false, false) => Err(ValidationError::MissingContent),
    }
}

/// Entry point for the block-structured shape (`blocks` list)
pub fn normalize_blocks(obj: &Map<String, Value>) -> Result<CanonicalSpec> {
    let root = Fields::root(obj);
    let title = root.required_str("title")?;
    let total_minutes_hint = root.optional_positive_number("total_minutes")?.map(ceil_u32);
    let (cues, cues_declared) = root.cue_settings()?;

    let raw_blocks = match root.list("blocks")? {
        Some(list) if !list.is_empty() => list,
        _ => return Err(ValidationError::MissingContent),
    };

    let blocks = raw_blocks
        .iter()
        .enumerate()
        .map(|(i, value)| normalize_block(value, &format!("blocks[{i}]")))
        .collect::<Result<Vec<_>>>()?;
    check_block_budget(&blocks)?;

    tracing::trace!(title = %title, blocks = blocks.len(), "normalized block workout");

    Ok(CanonicalSpec {
        title,
        total_minutes_hint,
        cues,
        cues_declared,
        body: SpecBody::Blocks(blocks),
    })
}

/// Entry point for the flat shape (`timeline` list of pre-timed items)
pub fn normalize_flat(obj: &Map<String, Value>) -> Result<CanonicalSpec> {
    let root = Fields::root(obj);
    let title = root.required_str("title")?;
    let total_minutes_hint = root
        .optional_positive_number("total_seconds")?
        .map(|secs| ceil_u32(secs / 60.0));
    let (cues, cues_declared) = root.cue_settings()?;

    let raw_items = match root.list("timeline")? {
        Some(list) if !list.is_empty() => list,
        _ => return Err(ValidationError::MissingContent),
    };

    let items = raw_items
        .iter()
        .enumerate()
        .map(|(i, value)| normalize_item(value, &format!("timeline[{i}]")))
        .collect::<Result<Vec<_>>>()?;
    check_item_budget(&items)?;

    tracing::trace!(title = %title, items = items.len(), "normalized flat workout");

    Ok(CanonicalSpec {
        title,
        total_minutes_hint,
        cues,
        cues_declared,
        body: SpecBody::Flat(items),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Blocks
// ═══════════════════════════════════════════════════════════════════════════

fn normalize_block(value: &Value, path: &str) -> Result<Block> {
    let f = Fields::new(value, path)?;

    let tag_value = match f.get("type") {
        Some(v) => v,
        None => {
            return Err(ValidationError::MissingTag {
                path: path.to_string(),
            });
        }
    };
    let tag_str = tag_value.as_str().ok_or_else(|| ValidationError::WrongType {
        path: f.child("type"),
        expected: "a block type string",
    })?;
    let tag: BlockTag = tag_str.parse().map_err(|_| ValidationError::UnknownTag {
        path: f.child("type"),
        tag: tag_str.to_string(),
    })?;

    let pattern = match tag {
        BlockTag::Emom => BlockPattern::Emom(emom_block(&f)?),
        BlockTag::Interval => BlockPattern::Interval(interval_block(&f)?),
        BlockTag::Circuit => BlockPattern::Circuit(circuit_block(&f)?),
        BlockTag::Tabata => BlockPattern::Tabata(tabata_block(&f)?),
    };

    Ok(Block {
        title: f.optional_str("title")?,
        notes: f.optional_str("notes")?,
        pattern,
    })
}

fn emom_block(f: &Fields<'_>) -> Result<EmomBlock> {
    let minutes = f.required_u32("minutes", 1)?;
    let instructions = f
        .required_list("instructions")?
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let inst = Fields::new(value, &f.child(&format!("instructions[{i}]")))?;
            let minute_mod = match inst.optional_string_value("minute_mod")? {
                None => None,
                Some(raw) => Some(match raw.trim().to_ascii_lowercase().as_str() {
                    "odd" => MinuteParity::Odd,
                    "even" => MinuteParity::Even,
                    _ => {
                        return Err(ValidationError::UnknownValue {
                            path: inst.child("minute_mod"),
                            value: raw.to_string(),
                        });
                    }
                }),
            };
            Ok(EmomInstruction {
                minute_mod,
                name: inst.required_str("name")?,
                target_reps: inst.optional_u32("target_reps", 1)?,
                target_seconds: inst.optional_u32("target_seconds", 1)?,
                cap_seconds: inst.optional_u32("cap_seconds", 1)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EmomBlock {
        minutes,
        instructions,
    })
}

fn interval_block(f: &Fields<'_>) -> Result<IntervalBlock> {
    let work_seconds = f.required_u32("work_seconds", 1)?;
    let rest_seconds = f.u32_or("rest_seconds", 0, 0)?;
    let sets = f.required_u32("sets", 1)?;

    // `exercises` is the older spelling of `sequence`
    let (key, raw_steps) = match f.list("sequence")? {
        Some(list) => ("sequence", Some(list)),
        None => ("exercises", f.list("exercises")?),
    };

    let sequence = match raw_steps {
        None => None,
        Some(list) if list.is_empty() => None,
        Some(list) => Some(
            list.iter()
                .enumerate()
                .map(|(i, value)| {
                    let step = Fields::new(value, &f.child(&format!("{key}[{i}]")))?;
                    Ok(IntervalStep {
                        name: step.required_str("name")?,
                        seconds: step.u32_or("seconds", 1, work_seconds)?,
                        rest_seconds: step.u32_or("rest_seconds", 0, 0)?,
                        reps: step.optional_u32("reps", 1)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        ),
    };

    Ok(IntervalBlock {
        work_seconds,
        rest_seconds,
        sets,
        sequence,
    })
}

fn circuit_block(f: &Fields<'_>) -> Result<CircuitBlock> {
    let rounds = f.required_u32("rounds", 1)?;
    let exercises = f
        .required_list("exercises")?
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let ex = Fields::new(value, &f.child(&format!("exercises[{i}]")))?;
            Ok(CircuitExercise {
                name: ex.required_str("name")?,
                seconds: ex.u32_or("seconds", 1, DEFAULT_CIRCUIT_EXERCISE_SECS)?,
                reps: ex.optional_u32("reps", 1)?,
                rest_after_seconds: ex.u32_or("rest_after_seconds", 0, 0)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CircuitBlock {
        rounds,
        exercises,
        rest_between_rounds_seconds: f.u32_or("rest_between_rounds_seconds", 0, 0)?,
    })
}

fn tabata_block(f: &Fields<'_>) -> Result<TabataBlock> {
    Ok(TabataBlock {
        rounds: f.u32_or("rounds", 1, DEFAULT_TABATA_ROUNDS)?,
        work_seconds: f.u32_or("work_seconds", 1, DEFAULT_TABATA_WORK_SECS)?,
        rest_seconds: f.u32_or("rest_seconds", 1, DEFAULT_TABATA_REST_SECS)?,
        exercise: f
            .optional_str("exercise")?
            .unwrap_or_else(|| DEFAULT_TABATA_EXERCISE.to_string()),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Flat items
// ═══════════════════════════════════════════════════════════════════════════

fn normalize_item(value: &Value, path: &str) -> Result<TimelineItem> {
    let f = Fields::new(value, path)?;

    let raw_kind = f
        .optional_string_value("kind")?
        .ok_or_else(|| ValidationError::MissingField {
            path: f.child("kind"),
        })?;
    let kind: EventKind = raw_kind.parse().map_err(|_| ValidationError::UnknownValue {
        path: f.child("kind"),
        value: raw_kind.to_string(),
    })?;

    Ok(TimelineItem {
        kind,
        label: f.required_str("label")?,
        seconds: f.required_u32("seconds", 1)?,
        round: f.optional_u32("round", 1)?,
        index: f.optional_u32("index", 0)?,
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Length Budget
// ═══════════════════════════════════════════════════════════════════════════

/// Reject block workouts that expand past [`MAX_WORKOUT_SECS`].
///
/// Blame falls on the repetition field of the first block that overflows,
/// with `max` set to the largest count that would still have fit.
fn check_block_budget(blocks: &[Block]) -> Result<()> {
    let mut remaining = MAX_WORKOUT_SECS as u64;
    for (i, block) in blocks.iter().enumerate() {
        let planned = block.pattern.planned_secs();
        if planned > remaining {
            let (field, count) = block.pattern.repeat();
            let (each, trailing) = block.pattern.repetition_secs();
            return Err(ValidationError::OutOfRange {
                path: format!("blocks[{i}].{field}"),
                value: count as f64,
                min: 1,
                max: (remaining + trailing) / each.max(1),
            });
        }
        remaining -= planned;
    }
    Ok(())
}

fn check_item_budget(items: &[TimelineItem]) -> Result<()> {
    let mut remaining = MAX_WORKOUT_SECS as u64;
    for (i, item) in items.iter().enumerate() {
        let secs = item.seconds as u64;
        if secs > remaining {
            return Err(ValidationError::OutOfRange {
                path: format!("timeline[{i}].seconds"),
                value: secs as f64,
                min: 1,
                max: remaining,
            });
        }
        remaining -= secs;
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Field Readers
// ═══════════════════════════════════════════════════════════════════════════

/// An object being read, plus the path used in error reports
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    path: String,
}

impl<'a> Fields<'a> {
    fn root(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            path: String::new(),
        }
    }

    fn new(value: &'a Value, path: &str) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| ValidationError::NotAnObject {
            path: path.to_string(),
        })?;
        Ok(Self {
            obj,
            path: path.to_string(),
        })
    }

    fn child(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Field value; explicit `null` counts as absent
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.obj.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, key: &str) -> ValidationError {
        ValidationError::MissingField {
            path: self.child(key),
        }
    }

    fn required_str(&self, key: &str) -> Result<String> {
        let raw = self
            .optional_string_value(key)?
            .ok_or_else(|| self.missing(key))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyString {
                path: self.child(key),
            });
        }
        Ok(trimmed.to_string())
    }

    /// Optional display text; blank strings are treated as absent
    fn optional_str(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .optional_string_value(key)?
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }

    fn optional_string_value(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ValidationError::WrongType {
                path: self.child(key),
                expected: "a string",
            }),
        }
    }

    fn optional_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ValidationError::WrongType {
                path: self.child(key),
                expected: "true or false",
            }),
        }
    }

    fn list(&self, key: &str) -> Result<Option<&'a Vec<Value>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(list)) => Ok(Some(list)),
            Some(_) => Err(ValidationError::WrongType {
                path: self.child(key),
                expected: "a list",
            }),
        }
    }

    fn required_list(&self, key: &str) -> Result<&'a Vec<Value>> {
        let list = self.list(key)?.ok_or_else(|| self.missing(key))?;
        if list.is_empty() {
            return Err(ValidationError::EmptyList {
                path: self.child(key),
            });
        }
        Ok(list)
    }

    fn required_u32(&self, key: &str, min: u32) -> Result<u32> {
        self.optional_u32(key, min)?
            .ok_or_else(|| self.missing(key))
    }

    fn u32_or(&self, key: &str, min: u32, default: u32) -> Result<u32> {
        Ok(self.optional_u32(key, min)?.unwrap_or(default))
    }

    /// Whole number in `min..=MAX_WORKOUT_SECS`; fractions and negatives are rejected
    fn optional_u32(&self, key: &str, min: u32) -> Result<Option<u32>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let path = self.child(key);
        let number = value.as_f64().ok_or_else(|| ValidationError::WrongType {
            path: path.clone(),
            expected: "a number",
        })?;

        if let Some(n) = value.as_u64() {
            return check_range(path, n as f64, n, min).map(Some);
        }
        if number.fract() != 0.0 || !number.is_finite() {
            return Err(ValidationError::NotAnInteger {
                path,
                value: number,
            });
        }
        if number < 0.0 {
            return Err(ValidationError::OutOfRange {
                path,
                value: number,
                min: min as u64,
                max: MAX_WORKOUT_SECS as u64,
            });
        }
        check_range(path, number, number as u64, min).map(Some)
    }

    /// Positive number that may be fractional (informational hints)
    fn optional_positive_number(&self, key: &str) -> Result<Option<f64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let number = value.as_f64().ok_or_else(|| ValidationError::WrongType {
            path: self.child(key),
            expected: "a number",
        })?;
        if number <= 0.0 || !number.is_finite() {
            return Err(ValidationError::OutOfRange {
                path: self.child(key),
                value: number,
                min: 1,
                max: u32::MAX as u64,
            });
        }
        Ok(Some(number))
    }

    /// `cues` table with per-field defaults; second value says whether it was present
    fn cue_settings(&self) -> Result<(CueSettings, bool)> {
        let Some(value) = self.get("cues") else {
            return Ok((CueSettings::default(), false));
        };
        let f = Fields::new(value, &self.child("cues"))?;
        let defaults = CueSettings::default();
        let cues = CueSettings {
            start: f.optional_bool("start")?.unwrap_or(defaults.start),
            halfway: f.optional_bool("halfway")?.unwrap_or(defaults.halfway),
            last_round: f.optional_bool("last_round")?.unwrap_or(defaults.last_round),
            tts: f.optional_bool("tts")?.unwrap_or(defaults.tts),
        };
        Ok((cues, true))
    }
}

/// A shape key counts as present unless it is null or an empty list
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(list) => !list.is_empty(),
        _ => true,
    }
}

fn check_range(path: String, value: f64, n: u64, min: u32) -> Result<u32> {
    if n < min as u64 || n > MAX_WORKOUT_SECS as u64 {
        return Err(ValidationError::OutOfRange {
            path,
            value,
            min: min as u64,
            max: MAX_WORKOUT_SECS as u64,
        });
    }
    Ok(n as u32)
}

fn ceil_u32(value: f64) -> u32 {
    value.ceil().min(u32::MAX as f64) as u32
}
