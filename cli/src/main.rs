use std::path::PathBuf;

use clap::{Parser, Subcommand};
use repcue_cli::{RunOptions, commands, logging, run};

#[derive(Parser)]
#[command(version, about = "Workout timeline builder and interval timer")]
struct Cli {
    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a workout file and report the first problem
    Validate { path: PathBuf },
    /// Print the expanded timeline
    Preview {
        path: PathBuf,
        /// Emit the timeline as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a workout in real time
    Run {
        path: PathBuf,
        /// Tick interval in milliseconds (10-100)
        #[arg(long)]
        tick_ms: Option<u64>,
        /// 1-based event to start from
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        start_at: Option<u64>,
        /// Disable spoken cues
        #[arg(long)]
        mute: bool,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose);

    match cli.command {
        Commands::Validate { path } => commands::validate(&path),
        Commands::Preview { path, json } => commands::preview(&path, json),
        Commands::Run {
            path,
            tick_ms,
            start_at,
            mute,
        } => {
            let options = RunOptions {
                tick_ms,
                start_at: start_at.map(|i| (i - 1) as usize),
                mute,
            };
            run::run(&path, options).await
        }
        Commands::Config => commands::show_config(),
    }
}
