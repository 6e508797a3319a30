// crates/ecgset/src/main.rs

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

/// Builds and inspects cohort time-series datasets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest every cohort folder and persist the assembled dataset
    Build(BuildArgs),
    /// Load a persisted dataset and print its summary
    Inspect {
        /// Dataset archive written by `build`
        path: PathBuf,

        /// TOML file with the settings the dataset was built with
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Directory holding one subfolder per cohort
    pub base_path: Option<PathBuf>,

    /// Where to write the dataset archive
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML file with pipeline settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Build(args) => commands::build::run(args),
        Command::Inspect { path, config } => commands::inspect::run(&path, config.as_deref()),
    }
}
