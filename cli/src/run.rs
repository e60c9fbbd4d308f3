//! Real-time workout runner for the terminal
//!
//! Drives a `TimerRuntime` from a tokio interval and reads single-letter
//! commands from stdin:
//!
//! ```text
//!   p  pause / resume      n  next event      b  previous event
//!   r  restart             q  quit            (Ctrl-C also quits)
//! ```

use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

use repcue_core::timeline::{format_duration, format_offset};
use repcue_core::{AppConfig, AppConfigExt, CueSink, RuntimeSnapshot, RuntimeState, TimerRuntime};
use repcue_types::{MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::commands::load_timeline;
use crate::sink::{ChannelSink, spawn_printer};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the configured tick interval
    pub tick_ms: Option<u64>,
    /// 0-based event to start from
    pub start_at: Option<usize>,
    /// Disable speech for this run
    pub mute: bool,
}

/// Keyboard command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Next,
    Previous,
    Restart,
    Quit,
}

impl Control {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" | "" => Some(Control::TogglePause),
            "n" | "next" => Some(Control::Next),
            "b" | "back" | "prev" => Some(Control::Previous),
            "r" | "restart" => Some(Control::Restart),
            "q" | "quit" | "exit" => Some(Control::Quit),
            _ => None,
        }
    }
}

pub async fn run(path: &Path, options: RunOptions) -> Result<(), String> {
    let config = AppConfig::load();
    let (spec, timeline) = load_timeline(path)?;

    let mut settings = spec.cues_or(config.default_cues);
    if options.mute {
        settings.tts = false;
    }
    let tick_ms = options
        .tick_ms
        .unwrap_or(config.tick_interval_ms)
        .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);

    let (sink, rx) = ChannelSink::new(config.buzz_enabled);
    let printer = spawn_printer(rx, config.speech_rate);

    println!(
        "{} ({} events, {}). p=pause n=next b=back r=restart q=quit",
        timeline.title(),
        timeline.len(),
        format_offset(timeline.total_ms())
    );
    tracing::info!(path = %path.display(), tick_ms, ?settings, "run started");

    let mut runtime = TimerRuntime::new(&timeline, sink, settings);
    runtime.start_at(options.start_at.unwrap_or(0));

    let mut input = spawn_stdin_reader();
    let mut stdin_open = true;

    let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut shown = None;
    print_status(&runtime, &mut shown);

    loop {
        tokio::select! {
            now = ticker.tick() => {
                runtime.tick_at(now.into_std());
            }
            line = input.recv(), if stdin_open => match line {
                Some(line) => match Control::parse(&line) {
                    Some(Control::Quit) => break,
                    Some(control) => apply(&mut runtime, control),
                    None => println!("unknown command {:?} (p, n, b, r, q)", line.trim()),
                },
                None => stdin_open = false,
            },
            _ = &mut ctrl_c => {
                println!();
                break;
            }
        }

        print_status(&runtime, &mut shown);
        if runtime.state() == RuntimeState::Completed {
            println!(
                "Workout complete: {} in {}",
                timeline.title(),
                format_offset(timeline.total_ms())
            );
            break;
        }
    }

    tracing::info!(state = ?runtime.state(), index = runtime.current_index(), "run finished");

    // Dropping the sink closes the channel so the printer can drain and exit
    drop(runtime);
    printer.await.map_err(|e| e.to_string())
}

/// Read stdin lines on a plain thread so a pending read never holds up
/// runtime shutdown
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

pub fn apply<S: CueSink>(runtime: &mut TimerRuntime<'_, S>, control: Control) {
    match control {
        Control::TogglePause => runtime.toggle(),
        Control::Next => runtime.next(),
        Control::Previous => runtime.previous(),
        Control::Restart => {
            runtime.reset();
            runtime.start();
        }
        Control::Quit => {}
    }
}

/// Print a status line whenever the event or state changes
fn print_status<S: CueSink>(
    runtime: &TimerRuntime<'_, S>,
    shown: &mut Option<(usize, RuntimeState)>,
) {
    let key = (runtime.current_index(), runtime.state());
    if *shown == Some(key) {
        return;
    }
    *shown = Some(key);
    if let Some(snapshot) = runtime.snapshot() {
        println!("{}", status_line(&snapshot));
    }
}

pub fn status_line(snapshot: &RuntimeSnapshot) -> String {
    let mut line = format!(
        "[{}] {} ({} left)",
        snapshot.position,
        snapshot.label,
        format_duration(snapshot.remaining_ms)
    );
    if let Some(next) = &snapshot.next_label {
        line.push_str(&format!(", next: {next}"));
    }
    match snapshot.state {
        RuntimeState::Paused => line.push_str(" [paused]"),
        RuntimeState::Idle => line.push_str(" [stopped]"),
        RuntimeState::Running | RuntimeState::Completed => {}
    }
    line
}
