//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/repcue/repcue.log` (or platform equivalent) with
//! 5 MB size-based rotation. Set `DEBUG_LOGGING=1` to enable debug output
//! for repcue crates. Console output goes to stderr so it never mixes with
//! the workout display on stdout.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE: &str = "repcue.log";
const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

/// Initialize logging with dual output (file + stderr).
///
/// Returns a `WorkerGuard` that must be held for the lifetime of the
/// process so buffered log lines are flushed on exit.
///
/// # Behavior
/// - **File output:** INFO+ (DEBUG+ for repcue crates with `DEBUG_LOGGING=1`)
/// - **Stderr output:** WARN+ unless `verbose`, then the same filter as the file
/// - **Rotation:** Size-based, keeps only the latest rotated file
///
/// # Fallback
/// If the log directory cannot be created, returns `None` and logs to
/// stderr only.
pub fn init(verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("repcue"),
        None => {
            init_stderr_only(stderr_directive(debug_logging, verbose));
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Subscriber not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            log_dir, e
        );
        init_stderr_only(stderr_directive(debug_logging, verbose));
        return None;
    }

    let log_path = log_dir.join(LOG_FILE);
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stderr_only(stderr_directive(debug_logging, verbose));
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(filter_directive(debug_logging)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(stderr_directive(debug_logging, verbose)));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "repcue logging initialized");

    Some(guard)
}

/// Fallback when file logging is unavailable
fn init_stderr_only(directive: &'static str) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(directive))
        .init();

    tracing::info!(directive, "repcue logging initialized (stderr only)");
}

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "info,repcue_core=debug,repcue_cli=debug"
    } else {
        "info"
    }
}

/// Stderr stays quiet (warnings only) unless `--verbose`
fn stderr_directive(debug_logging: bool, verbose: bool) -> &'static str {
    if verbose {
        filter_directive(debug_logging)
    } else {
        "warn"
    }
}
