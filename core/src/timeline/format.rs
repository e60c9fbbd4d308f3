//! Clock formatting helpers

/// Countdown display: whole seconds rounded up, `m:ss`.
///
/// Rounding up means a countdown shows `0:01` until the last millisecond.
pub fn format_clock(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Offset display for timeline listings: whole seconds rounded down, `m:ss`
pub fn format_offset(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Duration display: `45s` under a minute, `m:ss` otherwise
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}
