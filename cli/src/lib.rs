pub mod commands;
pub mod logging;
pub mod run;
pub mod sink;

pub use run::{Control, RunOptions};
