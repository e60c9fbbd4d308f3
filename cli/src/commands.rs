use std::error::Error;
use std::path::Path;

use repcue_core::timeline::{format_duration, format_offset};
use repcue_core::{AppConfig, AppConfigExt, EventKind, Timeline, build, load_workout};

const KIND_ORDER: [EventKind; 5] = [
    EventKind::Prep,
    EventKind::Work,
    EventKind::Rest,
    EventKind::RoundRest,
    EventKind::Cooldown,
];

/// Flatten an error and its sources into one line
pub fn describe(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}

pub fn load_timeline(path: &Path) -> Result<(repcue_core::CanonicalSpec, Timeline), String> {
    let spec = load_workout(path).map_err(|e| describe(&e))?;
    let timeline = build(&spec);
    Ok((spec, timeline))
}

pub fn validate(path: &Path) -> Result<(), String> {
    let (spec, timeline) = load_timeline(path)?;
    println!(
        "ok: {} ({} events, {})",
        spec.title,
        timeline.len(),
        format_offset(timeline.total_ms())
    );
    Ok(())
}

pub fn preview(path: &Path, json: bool) -> Result<(), String> {
    let (spec, timeline) = load_timeline(path)?;

    if json {
        let text = serde_json::to_string_pretty(&timeline).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("{}", render_table(&timeline));
    println!();
    println!("{}", render_stats(&timeline));

    let actual = timeline.total_minutes();
    if let Some(declared) = spec.total_minutes_hint
        && u64::from(declared) != actual
    {
        println!("note: declared {declared} min, timeline runs {actual} min");
    }
    Ok(())
}

pub fn show_config() -> Result<(), String> {
    let config = AppConfig::load();
    if let Ok(path) = AppConfig::config_path() {
        println!("# {}", path.display());
    }
    println!("tick_interval_ms = {}", config.effective_tick_interval_ms());
    println!("buzz_enabled     = {}", config.buzz_enabled);
    println!("speech_rate      = {}", config.speech_rate);
    let cues = config.default_cues;
    println!(
        "default_cues     = start:{} halfway:{} last_round:{} tts:{}",
        cues.start, cues.halfway, cues.last_round, cues.tts
    );
    Ok(())
}

pub fn render_table(timeline: &Timeline) -> String {
    let mut lines = vec![
        format!(
            "{}  ({} events, {})",
            timeline.title(),
            timeline.len(),
            format_offset(timeline.total_ms())
        ),
        format!(
            "{:>3}  {:>6}  {:>6}  {:>5}  {:>5}  {:<10}  {}",
            "#", "start", "end", "dur", "round", "kind", "label"
        ),
    ];

    for (i, event) in timeline.iter().enumerate() {
        let round = event.round.map(|r| r.to_string()).unwrap_or_default();
        let kind = event.kind.map(|k| k.as_str()).unwrap_or("-");
        lines.push(format!(
            "{:>3}  {:>6}  {:>6}  {:>5}  {:>5}  {:<10}  {}",
            i + 1,
            format_offset(event.start_ms),
            format_offset(event.end_ms),
            format_duration(event.duration_ms()),
            round,
            kind,
            event.label
        ));
    }

    lines.join("\n")
}

pub fn render_stats(timeline: &Timeline) -> String {
    let stats = timeline.stats();
    let counts: Vec<String> = KIND_ORDER
        .iter()
        .filter(|k| stats.count(**k) > 0)
        .map(|k| format!("{} {}", stats.count(*k), k))
        .collect();

    format!(
        "work {} / rest {} ({:.0}% work), {} blocks: {}",
        format_offset(stats.work_ms),
        format_offset(stats.rest_ms),
        stats.work_percent(),
        stats.block_count,
        counts.join(", ")
    )
}
