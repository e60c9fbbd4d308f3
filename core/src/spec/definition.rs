//! Canonical workout definitions
//!
//! These are the validated, defaulted forms produced by the normalizer.
//! Nothing in here can hold a zero duration or an empty name; the builder
//! relies on that and never re-checks.

use repcue_types::CueSettings;
use serde::Serialize;

use crate::timeline::EventKind;

/// Longest workout the normalizer accepts. Also bounds every whole-number
/// field, so expansion can never run away on a huge count.
pub const MAX_WORKOUT_SECS: u32 = 24 * 60 * 60;

/// A validated workout, ready for the timeline builder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalSpec {
    pub title: String,

    /// Declared length in whole minutes (rounded up). Informational only:
    /// the built timeline's own total is always authoritative.
    pub total_minutes_hint: Option<u32>,

    pub cues: CueSettings,

    /// Whether `cues` came from the document or from defaults
    pub cues_declared: bool,

    pub body: SpecBody,
}

impl CanonicalSpec {
    /// The workout's own cue settings when it declared any, else `fallback`
    pub fn cues_or(&self, fallback: CueSettings) -> CueSettings {
        if self.cues_declared { self.cues } else { fallback }
    }
}

/// The two accepted source shapes, after validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "shape", content = "items")]
pub enum SpecBody {
    Blocks(Vec<Block>),
    Flat(Vec<TimelineItem>),
}

impl SpecBody {
    pub fn len(&self) -> usize {
        match self {
            SpecBody::Blocks(blocks) => blocks.len(),
            SpecBody::Flat(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Blocks
// ═══════════════════════════════════════════════════════════════════════════

/// One training block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub pattern: BlockPattern,
}

impl Block {
    pub fn tag(&self) -> BlockTag {
        self.pattern.tag()
    }
}

/// Type-specific parameters of a block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum BlockPattern {
    Emom(EmomBlock),
    Interval(IntervalBlock),
    Circuit(CircuitBlock),
    Tabata(TabataBlock),
}

impl BlockPattern {
    pub fn tag(&self) -> BlockTag {
        match self {
            BlockPattern::Emom(_) => BlockTag::Emom,
            BlockPattern::Interval(_) => BlockTag::Interval,
            BlockPattern::Circuit(_) => BlockTag::Circuit,
            BlockPattern::Tabata(_) => BlockTag::Tabata,
        }
    }

    /// Repetition field of the block and its value
    pub fn repeat(&self) -> (&'static str, u32) {
        match self {
            BlockPattern::Emom(b) => ("minutes", b.minutes),
            BlockPattern::Interval(b) => ("sets", b.sets),
            BlockPattern::Circuit(b) => ("rounds", b.rounds),
            BlockPattern::Tabata(b) => ("rounds", b.rounds),
        }
    }

    /// Seconds per repetition, and the rest left out after the final one
    pub fn repetition_secs(&self) -> (u64, u64) {
        match self {
            BlockPattern::Emom(_) => (EMOM_SLOT_SECS as u64, 0),
            BlockPattern::Interval(b) => match &b.sequence {
                Some(steps) => (
                    steps
                        .iter()
                        .map(|s| s.seconds as u64 + s.rest_seconds as u64)
                        .sum(),
                    0,
                ),
                None => (
                    b.work_seconds as u64 + b.rest_seconds as u64,
                    b.rest_seconds as u64,
                ),
            },
            BlockPattern::Circuit(b) => {
                let between = b.rest_between_rounds_seconds as u64;
                let round: u64 = b
                    .exercises
                    .iter()
                    .map(|e| e.seconds as u64 + e.rest_after_seconds as u64)
                    .sum();
                (round + between, between)
            }
            BlockPattern::Tabata(b) => (
                b.work_seconds as u64 + b.rest_seconds as u64,
                b.rest_seconds as u64,
            ),
        }
    }

    /// Length of the expanded block in seconds
    pub fn planned_secs(&self) -> u64 {
        let (_, count) = self.repeat();
        let (each, trailing) = self.repetition_secs();
        (count as u64).saturating_mul(each).saturating_sub(trailing)
    }
}

/// Block discriminant as written in source documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockTag {
    Emom,
    Interval,
    Circuit,
    Tabata,
}

impl BlockTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTag::Emom => "EMOM",
            BlockTag::Interval => "INTERVAL",
            BlockTag::Circuit => "CIRCUIT",
            BlockTag::Tabata => "TABATA",
        }
    }
}

static BLOCK_TAGS: phf::Map<&'static str, BlockTag> = phf::phf_map! {
    "EMOM" => BlockTag::Emom,
    "INTERVAL" => BlockTag::Interval,
    "CIRCUIT" => BlockTag::Circuit,
    "TABATA" => BlockTag::Tabata,
};

impl std::str::FromStr for BlockTag {
    type Err = ();

    /// Tags are matched case-insensitively ("emom" == "EMOM")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BLOCK_TAGS
            .get(s.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or(())
    }
}

// ─── EMOM ─────────────────────────────────────────────────────────────────

/// Length of one EMOM slot
pub const EMOM_SLOT_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmomBlock {
    pub minutes: u32,
    /// Never empty once normalized
    pub instructions: Vec<EmomInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmomInstruction {
    pub minute_mod: Option<MinuteParity>,
    pub name: String,
    pub target_reps: Option<u32>,
    pub target_seconds: Option<u32>,
    pub cap_seconds: Option<u32>,
}

/// Which minutes an EMOM instruction applies to (1-based minute numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MinuteParity {
    Odd,
    Even,
}

impl MinuteParity {
    /// Parity of a 1-based minute number
    pub fn of(minute: u32) -> Self {
        if minute % 2 == 1 {
            MinuteParity::Odd
        } else {
            MinuteParity::Even
        }
    }
}

impl EmomBlock {
    /// Instruction for a 1-based minute: first parity match, else the first
    /// one. `None` only for a block built without instructions.
    pub fn instruction_for(&self, minute: u32) -> Option<&EmomInstruction> {
        let parity = MinuteParity::of(minute);
        self.instructions
            .iter()
            .find(|i| i.minute_mod == Some(parity))
            .or_else(|| self.instructions.first())
    }
}

// ─── INTERVAL ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalBlock {
    pub work_seconds: u32,
    /// 0 = no rest between sets
    pub rest_seconds: u32,
    pub sets: u32,
    /// Explicit per-set sequence. `None` means uniform work/rest sets.
    pub sequence: Option<Vec<IntervalStep>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalStep {
    pub name: String,
    /// Already defaulted to the block's `work_seconds`
    pub seconds: u32,
    /// Rest emitted right after this step (0 = none)
    pub rest_seconds: u32,
    pub reps: Option<u32>,
}

// ─── CIRCUIT ──────────────────────────────────────────────────────────────

/// Work duration for circuit exercises that don't declare one
pub const DEFAULT_CIRCUIT_EXERCISE_SECS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitBlock {
    pub rounds: u32,
    /// Never empty
    pub exercises: Vec<CircuitExercise>,
    pub rest_between_rounds_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitExercise {
    pub name: String,
    pub seconds: u32,
    pub reps: Option<u32>,
    pub rest_after_seconds: u32,
}

// ─── TABATA ───────────────────────────────────────────────────────────────

pub const DEFAULT_TABATA_ROUNDS: u32 = 8;
pub const DEFAULT_TABATA_WORK_SECS: u32 = 20;
pub const DEFAULT_TABATA_REST_SECS: u32 = 10;
pub const DEFAULT_TABATA_EXERCISE: &str = "Mixed";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabataBlock {
    pub rounds: u32,
    pub work_seconds: u32,
    pub rest_seconds: u32,
    pub exercise: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Flat timeline items
// ═══════════════════════════════════════════════════════════════════════════

/// One pre-timed entry of a flat workout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineItem {
    pub kind: EventKind,
    pub label: String,
    pub seconds: u32,
    pub round: Option<u32>,
    /// Source-side ordinal; carried for reference, ordering is list order
    pub index: Option<u32>,
}
