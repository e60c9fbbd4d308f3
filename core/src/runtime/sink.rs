//! Announce/buzz capabilities consumed by the runtime
//!
//! Implementations must return quickly: the runtime calls them inline from
//! `tick()` and never waits on speech or vibration to finish. Failures are
//! logged and dropped by the runtime.

use serde::Serialize;
use thiserror::Error;

/// Vibration pattern in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BuzzPattern {
    /// One pulse of the given length
    Pulse(u32),
    /// Alternating on/off lengths, starting with on
    Pattern(Vec<u32>),
}

impl BuzzPattern {
    /// Short tap when an event starts
    pub fn event_start() -> Self {
        BuzzPattern::Pulse(50)
    }

    /// Triple pulse for the five second warning
    pub fn near_end() -> Self {
        BuzzPattern::Pattern(vec![100, 100, 100])
    }

    /// Double tap alongside the next-event preview
    pub fn preview() -> Self {
        BuzzPattern::Pattern(vec![50, 100, 50])
    }

    /// Total length of the pattern
    pub fn total_ms(&self) -> u32 {
        match self {
            BuzzPattern::Pulse(ms) => *ms,
            BuzzPattern::Pattern(steps) => steps.iter().sum(),
        }
    }
}

/// Errors reported by a sink. Never propagated past the runtime.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cue channel closed")]
    Closed,

    #[error("cue backend failed: {0}")]
    Backend(String),
}

/// Side-effect capabilities for spoken and haptic cues
pub trait CueSink {
    fn announce(&mut self, text: &str) -> Result<(), SinkError>;
    fn buzz(&mut self, pattern: &BuzzPattern) -> Result<(), SinkError>;
}

impl<T: CueSink + ?Sized> CueSink for &mut T {
    fn announce(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).announce(text)
    }

    fn buzz(&mut self, pattern: &BuzzPattern) -> Result<(), SinkError> {
        (**self).buzz(pattern)
    }
}

impl<T: CueSink + ?Sized> CueSink for Box<T> {
    fn announce(&mut self, text: &str) -> Result<(), SinkError> {
        (**self).announce(text)
    }

    fn buzz(&mut self, pattern: &BuzzPattern) -> Result<(), SinkError> {
        (**self).buzz(pattern)
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CueSink for NullSink {
    fn announce(&mut self, _text: &str) -> Result<(), SinkError> {
        Ok(())
    }

    fn buzz(&mut self, _pattern: &BuzzPattern) -> Result<(), SinkError> {
        Ok(())
    }
}
