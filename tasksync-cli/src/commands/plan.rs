//! `tasksync plan`: show the create/update plan without writing.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use tasksync_sync::{pipeline, PlannedAction, SyncPlan};

use super::{sync_config, warn_duplicates, DocumentArgs, TrackerArgs};

/// Arguments for `tasksync plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    #[command(flatten)]
    pub tracker: TrackerArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Tabled)]
struct PlanRow {
    #[tabled(rename = "task")]
    id: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "priority")]
    priority: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "issue")]
    issue: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "labels")]
    labels: String,
}

impl PlanArgs {
    pub fn run(self) -> Result<()> {
        let config = sync_config(&self.document, &self.tracker, true)?;
        let (loaded, plan) = pipeline::plan(&config)
            .with_context(|| format!("planning against '{}' failed", config.client.repo))?;

        warn_duplicates(&loaded.duplicates);
        let rows = rows(&plan);
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize plan")?
            );
            return Ok(());
        }

        println!(
            "{} | {} task(s) | {} to create | {} to update",
            loaded.path.display(),
            plan.items.len(),
            plan.creates(),
            plan.updates()
        );
        if rows.is_empty() {
            return Ok(());
        }
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn rows(plan: &SyncPlan) -> Vec<PlanRow> {
    plan.items
        .iter()
        .map(|item| {
            let (action, issue) = match &item.action {
                PlannedAction::Create => ("create", String::from("-")),
                PlannedAction::Update { issue } => ("update", format!("#{}", issue.number)),
            };
            // New issues always open; the derived state applies on the next update.
            let state = match item.action {
                PlannedAction::Create => "open".to_string(),
                PlannedAction::Update { .. } => item.draft.state.to_string(),
            };
            PlanRow {
                id: item.task.id().to_string(),
                title: item.task.title().to_owned(),
                priority: item
                    .task
                    .priority()
                    .map_or_else(|| "-".to_string(), |p| p.to_string()),
                action: action.to_string(),
                issue,
                state,
                labels: item.draft.label_names().join(", "),
            }
        })
        .collect()
}
