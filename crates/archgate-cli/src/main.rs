//! archgate CLI.
//!
//! Usage:
//! ```bash
//! archgate check [OPTIONS] [PATH]
//! archgate baseline [OPTIONS] [PATH]
//! archgate list-rules
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod discovery;
mod pipeline;
mod project;

/// Architecture linter for TypeScript, JavaScript, Python, Java and Kotlin projects
#[derive(Parser)]
#[command(name = "archgate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ARCHGATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph and run the configured rules
    Check {
        /// Directory to check; the project root is found above it (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only fail on error violations missing from the baseline
        #[arg(long)]
        baseline: bool,

        /// With --baseline, also fail when baseline entries were fixed
        #[arg(long, requires = "baseline")]
        ratchet: bool,
    },

    /// Create or update the violation baseline
    Baseline {
        /// Project root (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Metrics snapshots kept in the history
        #[arg(long, default_value_t = archgate_baseline::DEFAULT_MAX_HISTORY)]
        max_history: usize,
    },

    /// List available rule kinds
    ListRules,
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            baseline,
            ratchet,
        } => {
            let location = project::ProjectLocation::locate(&path, cli.config.as_deref())?;
            commands::check::run(&location, format, baseline, ratchet)
        }
        Commands::Baseline { path, max_history } => {
            let location = project::ProjectLocation::locate(&path, cli.config.as_deref())?;
            commands::baseline::run(&location, max_history)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(ExitCode::SUCCESS)
        }
    }
}
