//! Terminal cue sink
//!
//! The runtime calls the sink inline from `tick()`, so `ChannelSink` only
//! pushes onto an unbounded channel. A separate task drains it and prints
//! each cue, standing in for speech and vibration on a terminal.

use repcue_core::{BuzzPattern, CueSink, SinkError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum CueMessage {
    Announce(String),
    Buzz(BuzzPattern),
}

pub struct ChannelSink {
    tx: mpsc::UnboundedSender<CueMessage>,
    buzz_enabled: bool,
}

impl ChannelSink {
    pub fn new(buzz_enabled: bool) -> (Self, mpsc::UnboundedReceiver<CueMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, buzz_enabled }, rx)
    }
}

impl CueSink for ChannelSink {
    fn announce(&mut self, text: &str) -> Result<(), SinkError> {
        self.tx
            .send(CueMessage::Announce(text.to_string()))
            .map_err(|_| SinkError::Closed)
    }

    fn buzz(&mut self, pattern: &BuzzPattern) -> Result<(), SinkError> {
        if !self.buzz_enabled {
            return Ok(());
        }
        self.tx
            .send(CueMessage::Buzz(pattern.clone()))
            .map_err(|_| SinkError::Closed)
    }
}

/// Render one cue as a terminal line
pub fn render(message: &CueMessage, speech_rate: f32) -> String {
    match message {
        CueMessage::Announce(text) if (speech_rate - 1.0).abs() > f32::EPSILON => {
            format!("  [say x{speech_rate:.1}] {text}")
        }
        CueMessage::Announce(text) => format!("  [say] {text}"),
        CueMessage::Buzz(BuzzPattern::Pulse(ms)) => format!("  [buzz] {ms}ms"),
        CueMessage::Buzz(BuzzPattern::Pattern(steps)) => {
            let steps: Vec<String> = steps.iter().map(u32::to_string).collect();
            format!("  [buzz] {}", steps.join("-"))
        }
    }
}

/// Print cues until every sender is dropped
pub fn spawn_printer(
    mut rx: mpsc::UnboundedReceiver<CueMessage>,
    speech_rate: f32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            println!("{}", render(&message, speech_rate));
        }
    })
}
