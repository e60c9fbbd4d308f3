//! repcue core
//!
//! Workout documents go through three stages:
//!
//! ```text
//!   JSON/TOML ──loader──▶ spec::normalize ──▶ timeline::build ──▶ runtime::TimerRuntime
//! ```
//!
//! Timelines can also be edited between building and running; every edit
//! produces a fresh, contiguous timeline.

pub mod context;
pub mod loader;
pub mod runtime;
pub mod spec;
pub mod timeline;

// Re-exports for convenience
pub use context::{AppConfig, AppConfigExt, ConfigError, CueSettings};
pub use loader::{LoadError, SourceFormat, load_workout, parse_workout};
pub use runtime::{
    BuzzPattern, CueKind, CueSink, NullSink, RuntimeSnapshot, RuntimeState, SinkError,
    TimerRuntime,
};
pub use spec::{CanonicalSpec, ValidationError, normalize};
pub use timeline::{
    EditError, EventDraft, EventKind, Timeline, TimelineEdit, TimelineEvent, TimelineStats,
    build,
};
