//! Slidecq CLI - inspect and exercise the sliding constant-Q transform.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slidecq")]
#[command(author, version, about = "Sliding constant-Q transform CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the analysis bins of a configuration
    Bins(commands::bins::BinsArgs),

    /// Run a synthetic sine through the transform and report bin magnitudes
    Tone(commands::tone::ToneArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bins(args) => commands::bins::run(args),
        Commands::Tone(args) => commands::tone::run(args),
    }
}
