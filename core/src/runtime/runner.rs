//! Real-time workout runner
//!
//! `TimerRuntime` walks a borrowed [`Timeline`] one event at a time. The
//! host drives it with [`TimerRuntime::tick`] (or [`TimerRuntime::tick_at`])
//! from a periodic callback; everything else is an explicit state change.
//!
//! # Lifecycle
//!
//! ```text
//!            start()            pause()
//!   Idle ─────────────▶ Running ◀──────▶ Paused
//!    ▲                    │     resume()
//!    │ reset()            │ past last event
//!    └──── Completed ◀────┘
//! ```
//!
//! `reset()` returns to `Idle` from any state.

use std::time::{Duration, Instant};

use hashbrown::HashMap;
use repcue_types::CueSettings;

use super::cues::{CueKind, CueTable};
use super::sink::{BuzzPattern, CueSink};
use super::snapshot::{RuntimeSnapshot, RuntimeState};
use crate::timeline::{Timeline, TimelineEvent};

const NEAR_END_TEXT: &str = "five seconds";
const HALFWAY_TEXT: &str = "Halfway";
const LAST_ROUND_TEXT: &str = "Last round";

pub struct TimerRuntime<'a, S: CueSink> {
    timeline: &'a Timeline,
    sink: S,
    settings: CueSettings,

    // ─── Position ───────────────────────────────────────────────────────────
    state: RuntimeState,
    /// 0-based; equals `timeline.len()` once completed
    current_index: usize,
    elapsed_ms: u64,

    // ─── Scheduling ─────────────────────────────────────────────────────────
    cue_table: CueTable,
    /// Previous `tick_at` instant while running
    last_tick: Option<Instant>,
    /// Sub-millisecond remainder carried between `tick_at` calls
    tick_carry: Duration,
    /// Per event: does it open the final round of a multi-round block
    last_round_starts: Vec<bool>,
}

impl<'a, S: CueSink> TimerRuntime<'a, S> {
    pub fn new(timeline: &'a Timeline, sink: S, settings: CueSettings) -> Self {
        Self {
            timeline,
            sink,
            settings,
            state: RuntimeState::Idle,
            current_index: 0,
            elapsed_ms: 0,
            cue_table: CueTable::default(),
            last_tick: None,
            tick_carry: Duration::ZERO,
            last_round_starts: last_round_starts(timeline),
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn timeline(&self) -> &'a Timeline {
        self.timeline
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RuntimeState::Running
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn settings(&self) -> &CueSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Current event, or `None` when the timeline is empty or finished
    pub fn current_event(&self) -> Option<&'a TimelineEvent> {
        self.timeline.get(self.current_index)
    }

    pub fn next_event(&self) -> Option<&'a TimelineEvent> {
        self.timeline.get(self.current_index + 1)
    }

    /// Cues still armed for the current event, in firing order
    pub fn pending_cues(&self) -> Vec<CueKind> {
        self.cue_table.pending_kinds(self.current_index)
    }

    // ─── Derived values ─────────────────────────────────────────────────────

    pub fn remaining_ms(&self) -> u64 {
        self.current_event()
            .map_or(0, |e| e.duration_ms().saturating_sub(self.elapsed_ms))
    }

    pub fn progress_percent(&self) -> f64 {
        match self.current_event() {
            Some(e) => 100.0 * self.elapsed_ms as f64 / e.duration_ms() as f64,
            None => 0.0,
        }
    }

    /// "{n} of {len}", clamped to the last event once completed
    pub fn position_label(&self) -> String {
        let len = self.timeline.len();
        let shown = (self.current_index + 1).min(len);
        format!("{shown} of {len}")
    }

    pub fn snapshot(&self) -> Option<RuntimeSnapshot> {
        let event = self.current_event()?;
        Some(RuntimeSnapshot {
            state: self.state,
            index: self.current_index,
            event_count: self.timeline.len(),
            label: event.label.clone(),
            kind: event.kind,
            round: event.round,
            elapsed_ms: self.elapsed_ms,
            remaining_ms: self.remaining_ms(),
            progress_percent: self.progress_percent(),
            next_label: self.next_event().map(|e| e.label.clone()),
            position: self.position_label(),
            workout_elapsed_ms: event.start_ms + self.elapsed_ms,
            workout_total_ms: self.timeline.total_ms(),
        })
    }

    // ─── Transitions ────────────────────────────────────────────────────────

    /// Start from the first event. Resumes when paused; no-op when running
    /// or when the timeline is empty.
    pub fn start(&mut self) {
        match self.state {
            RuntimeState::Running => {}
            RuntimeState::Paused => self.resume(),
            RuntimeState::Idle | RuntimeState::Completed => self.start_at(0),
        }
    }

    /// Start from `index` (clamped) with the usual start-of-event cues.
    /// Ignored unless idle or completed.
    pub fn start_at(&mut self, index: usize) {
        if !self.state.is_idle() {
            return;
        }
        if self.timeline.is_empty() {
            tracing::debug!("start ignored: empty timeline");
            return;
        }
        self.current_index = index.min(self.timeline.len() - 1);
        self.elapsed_ms = 0;
        self.state = RuntimeState::Running;
        self.last_tick = Some(Instant::now());
        self.tick_carry = Duration::ZERO;
        tracing::info!(
            title = %self.timeline.title(),
            events = self.timeline.len(),
            index = self.current_index,
            "workout started"
        );
        self.enter_event();
    }

    /// Stop advancing without losing position. Calling it again is a no-op.
    pub fn pause(&mut self) {
        if self.state != RuntimeState::Running {
            return;
        }
        self.state = RuntimeState::Paused;
        self.cue_table.clear();
        self.last_tick = None;
        self.tick_carry = Duration::ZERO;
        tracing::info!(
            index = self.current_index,
            elapsed_ms = self.elapsed_ms,
            "workout paused"
        );
    }

    pub fn resume(&mut self) {
        if self.state != RuntimeState::Paused {
            return;
        }
        self.state = RuntimeState::Running;
        self.last_tick = Some(Instant::now());
        self.tick_carry = Duration::ZERO;
        self.arm_cues();
        tracing::info!(index = self.current_index, "workout resumed");
    }

    /// Pause when running, otherwise start/resume
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Back to the first event, idle, from any state
    pub fn reset(&mut self) {
        self.state = RuntimeState::Idle;
        self.current_index = 0;
        self.elapsed_ms = 0;
        self.cue_table.clear();
        self.last_tick = None;
        self.tick_carry = Duration::ZERO;
        tracing::debug!("runtime reset");
    }

    /// Jump to an event (clamped). Silent: no start-of-event announcement.
    pub fn seek(&mut self, index: usize) {
        if self.timeline.is_empty() {
            return;
        }
        self.current_index = index.min(self.timeline.len() - 1);
        self.elapsed_ms = 0;
        self.cue_table.clear();

        if self.state == RuntimeState::Completed {
            self.state = RuntimeState::Idle;
        }
        if self.state == RuntimeState::Running {
            self.arm_cues();
        }
        tracing::debug!(index = self.current_index, "seek");
    }

    pub fn previous(&mut self) {
        self.seek(self.current_index.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.seek(self.current_index + 1);
    }

    /// Swap in a rebuilt timeline (after an edit) and reset
    pub fn replace_timeline(&mut self, timeline: &'a Timeline) {
        self.timeline = timeline;
        self.last_round_starts = last_round_starts(timeline);
        self.reset();
    }

    // ─── Ticking ────────────────────────────────────────────────────────────

    /// Advance by `delta_ms` of wall-clock time. Ignored unless running.
    ///
    /// At most one event boundary is crossed per tick; time beyond the
    /// boundary is dropped and the next event starts at 0.
    pub fn tick(&mut self, delta_ms: u64) {
        if self.state != RuntimeState::Running {
            return;
        }
        let Some(event) = self.current_event() else {
            self.complete();
            return;
        };

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        tracing::trace!(index = self.current_index, elapsed_ms = self.elapsed_ms, "tick");

        if self.elapsed_ms >= event.duration_ms() {
            self.advance();
            return;
        }

        for kind in self.cue_table.take_due(self.current_index, self.elapsed_ms) {
            self.fire_cue(kind);
        }
    }

    /// Tick using the host's monotonic clock
    pub fn tick_at(&mut self, now: Instant) {
        if self.state != RuntimeState::Running {
            self.last_tick = None;
            self.tick_carry = Duration::ZERO;
            return;
        }
        if let Some(prev) = self.last_tick {
            self.tick_carry += now.saturating_duration_since(prev);
        }
        self.last_tick = Some(now);

        let delta_ms = self.tick_carry.as_millis() as u64;
        self.tick_carry -= Duration::from_millis(delta_ms);
        self.tick(delta_ms);
    }

    fn advance(&mut self) {
        self.current_index = (self.current_index + 1).min(self.timeline.len());
        self.elapsed_ms = 0;
        self.cue_table.clear();

        if self.current_index >= self.timeline.len() {
            self.complete();
        } else {
            self.enter_event();
        }
    }

    fn complete(&mut self) {
        self.state = RuntimeState::Completed;
        self.cue_table.clear();
        self.last_tick = None;
        self.tick_carry = Duration::ZERO;
        tracing::info!(
            title = %self.timeline.title(),
            total_ms = self.timeline.total_ms(),
            "workout completed"
        );
    }

    // ─── Side effects ───────────────────────────────────────────────────────

    /// Announce and buzz for the (new) current event, then arm its cues
    fn enter_event(&mut self) {
        let Some(event) = self.current_event() else {
            return;
        };
        tracing::debug!(index = self.current_index, label = %event.label, "event started");

        if self.settings.speaks_start() {
            self.announce(&event.label);
        }
        self.buzz(&BuzzPattern::event_start());

        let opens_last_round = self
            .last_round_starts
            .get(self.current_index)
            .copied()
            .unwrap_or(false);
        if self.settings.last_round && opens_last_round {
            self.announce(LAST_ROUND_TEXT);
        }

        self.arm_cues();
    }

    fn arm_cues(&mut self) {
        let Some(event) = self.current_event() else {
            return;
        };
        let has_next = self.next_event().is_some();
        self.cue_table.arm(
            self.current_index,
            event,
            has_next,
            &self.settings,
            self.elapsed_ms,
        );
        tracing::trace!(pending = self.cue_table.pending(), "cues armed");
    }

    fn fire_cue(&mut self, kind: CueKind) {
        tracing::debug!(index = self.current_index, cue = ?kind, "cue fired");
        match kind {
            CueKind::NearEnd => {
                self.announce(NEAR_END_TEXT);
                self.buzz(&BuzzPattern::near_end());
            }
            CueKind::NextPreview => {
                if let Some(next) = self.next_event() {
                    self.announce(&format!("Next: {}", next.label));
                    self.buzz(&BuzzPattern::preview());
                }
            }
            CueKind::Halfway => self.announce(HALFWAY_TEXT),
        }
    }

    fn announce(&mut self, text: &str) {
        if !self.settings.tts {
            return;
        }
        if let Err(e) = self.sink.announce(text) {
            tracing::warn!(error = %e, text, "announce failed");
        }
    }

    fn buzz(&mut self, pattern: &BuzzPattern) {
        if let Err(e) = self.sink.buzz(pattern) {
            tracing::warn!(error = %e, ?pattern, "buzz failed");
        }
    }
}

/// Mark events that open the final round of a block with more than one round
fn last_round_starts(timeline: &Timeline) -> Vec<bool> {
    let mut final_round: HashMap<usize, u32> = HashMap::new();
    for event in timeline {
        if let Some(round) = event.round {
            let entry = final_round.entry(event.block_index).or_insert(round);
            *entry = (*entry).max(round);
        }
    }

    let events = timeline.events();
    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let Some(round) = event.round else {
                return false;
            };
            if round < 2 || final_round.get(&event.block_index) != Some(&round) {
                return false;
            }
            match i.checked_sub(1).map(|p| &events[p]) {
                Some(prev) => prev.block_index != event.block_index || prev.round != event.round,
                None => true,
            }
        })
        .collect()
}
