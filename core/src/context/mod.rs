//! Application context
//!
//! Persistent user configuration. The config type itself lives in
//! `repcue-types` so front-ends can share it without pulling in the core.

mod config;
mod error;

pub use config::{APP_NAME, AppConfig, AppConfigExt, CONFIG_NAME, CueSettings};
pub use error::ConfigError;
