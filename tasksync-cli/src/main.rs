//! tasksync: mirror a backlog document into GitHub Issues.
//!
//! # Usage
//!
//! ```text
//! tasksync sync [--dry-run] [--json] [--file <PATH>]... [--no-priority-labels]
//! tasksync plan [--json] [--file <PATH>]...
//! tasksync tasks [--json] [--file <PATH>]...
//! ```
//!
//! `sync` and `plan` read the repository and token from `GITHUB_REPOSITORY`
//! and `GITHUB_TOKEN` (or `--repo` / `--token`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{plan::PlanArgs, sync::SyncArgs, tasks::TasksArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tasksync",
    version,
    about = "Synchronise a backlog document with GitHub Issues",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update one issue per backlog task.
    Sync(SyncArgs),

    /// Show what `sync` would do, without writing to the tracker.
    Plan(PlanArgs),

    /// Parse the backlog and list its tasks. No network access.
    Tasks(TasksArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Plan(args) => args.run(),
        Commands::Tasks(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
