//! Shared configuration types for repcue
//!
//! This crate contains serializable configuration types that are shared between
//! the timeline/runtime core (repcue-core) and the terminal front-end (repcue-cli).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Cue Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Which spoken/haptic cues a workout wants while it runs.
///
/// Workouts may carry their own `cues` table; any field missing from it
/// falls back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueSettings {
    /// Announce each event's label when it starts
    #[serde(default = "default_true")]
    pub start: bool,
    /// Announce "Halfway" in the middle of long work events
    #[serde(default)]
    pub halfway: bool,
    /// Announce "Last round" when a block enters its final round
    #[serde(default = "default_true")]
    pub last_round: bool,
    /// Master switch for speech. Buzzes still fire when this is off.
    #[serde(default = "default_true")]
    pub tts: bool,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            start: true,
            halfway: false,
            last_round: true,
            tts: true,
        }
    }
}

impl CueSettings {
    /// Settings with every spoken cue disabled
    pub fn muted() -> Self {
        Self {
            tts: false,
            ..Self::default()
        }
    }

    /// Whether start-of-event labels should be spoken
    pub fn speaks_start(&self) -> bool {
        self.tts && self.start
    }
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Lower bound for the runtime tick cadence
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Upper bound for the runtime tick cadence. Coarser ticks make cues late.
pub const MAX_TICK_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// How often the runner ticks the runtime, in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Cue settings used when a workout does not carry its own
    #[serde(default)]
    pub default_cues: CueSettings,
    /// Forward buzz patterns to the haptic sink
    #[serde(default = "default_true")]
    pub buzz_enabled: bool,
    /// Speech rate hint passed to the announce sink (1.0 = normal)
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
}

fn default_tick_interval() -> u64 {
    50
}

fn default_speech_rate() -> f32 {
    1.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            default_cues: CueSettings::default(),
            buzz_enabled: true,
            speech_rate: default_speech_rate(),
        }
    }
}

impl AppConfig {
    /// Tick interval clamped into the supported range
    pub fn effective_tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
            .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS)
    }
}
