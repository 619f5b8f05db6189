//! `tasksync sync`: create or update one issue per backlog task.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use tasksync_sync::{pipeline, SyncOutcome, SyncReport};

use super::{sync_config, warn_duplicates, DocumentArgs, TrackerArgs};

/// Arguments for `tasksync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    #[command(flatten)]
    pub tracker: TrackerArgs,

    /// List the tracker and report what would change without writing.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = sync_config(&self.document, &self.tracker, self.dry_run)?;
        let run = pipeline::run(&config)
            .with_context(|| format!("sync to '{}' failed", config.client.repo))?;

        warn_duplicates(&run.loaded.duplicates);
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&run.report).context("failed to serialize report")?
            );
            return Ok(());
        }

        print_report(&run.loaded.path.display().to_string(), &run.report);
        Ok(())
    }
}

fn print_report(source: &str, report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    if report.outcomes.is_empty() {
        println!("{prefix}✓ no tasks found in {source}");
        return;
    }

    println!(
        "{prefix}✓ {} task(s) from {source} ({} created, {} updated)",
        report.outcomes.len(),
        report.created(),
        report.updated()
    );

    for outcome in &report.outcomes {
        match outcome {
            SyncOutcome::Created { id, number } => {
                println!("  {}  {id}  created #{number}", "+".green().bold())
            }
            SyncOutcome::Updated { id, number, state } => {
                println!("  {}  {id}  updated #{number} ({state})", "✎".cyan().bold())
            }
            SyncOutcome::WouldCreate { id } => {
                println!("  {}  {id}  would create", "~".bright_black())
            }
            SyncOutcome::WouldUpdate { id, number, state } => {
                println!("  {}  {id}  would update #{number} ({state})", "~".bright_black())
            }
        }
    }
}
