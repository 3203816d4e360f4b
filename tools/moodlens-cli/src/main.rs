//! MoodLens CLI: session simulation, report rendering, and config checks.
//!
//! Usage:
//!   moodlens simulate [OPTIONS]   Run a scripted session and print a report
//!   moodlens report <PATH>        Render a report from a saved sample log
//!   moodlens check                Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "moodlens",
    about = "Emotion telemetry for streamed video sessions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session through the full pipeline
    Simulate {
        /// Number of samples to feed
        #[arg(long, default_value = "60")]
        samples: usize,

        /// Capture interval in milliseconds (1000, 2000, or 5000)
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Confidence threshold for the sample validator
        #[arg(long, default_value = "0.7")]
        threshold: f64,

        /// Drive the async session in real time instead of synchronously
        #[arg(long)]
        realtime: bool,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Also write the accepted samples to a JSONL log
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a report from a saved JSONL sample log
    Report {
        /// Path to the sample log
        path: PathBuf,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the effective (clamped) configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    moodlens_common::logging::init_logging(&moodlens_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Simulate {
            samples,
            interval_ms,
            threshold,
            realtime,
            json,
            output,
        } => commands::simulate::run(samples, interval_ms, threshold, realtime, json, output).await,
        Commands::Report { path, json } => commands::report::run(path, json),
        Commands::Check => commands::check::run(),
    }
}
