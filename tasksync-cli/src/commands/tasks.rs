//! `tasksync tasks`: parse the backlog and list its tasks.

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use tasksync_sync::pipeline;

use super::{warn_duplicates, DocumentArgs};

/// Arguments for `tasksync tasks`.
#[derive(Args, Debug)]
pub struct TasksArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Emit the parsed task records as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "task")]
    id: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "priority")]
    priority: String,
}

impl TasksArgs {
    pub fn run(self) -> Result<()> {
        let root = std::env::current_dir().context("could not determine working directory")?;
        let loaded = pipeline::load_tasks(&root, &self.document.candidates())
            .context("failed to load backlog")?;

        warn_duplicates(&loaded.duplicates);
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&loaded.tasks).context("failed to serialize tasks")?
            );
            return Ok(());
        }

        println!("{} | {} task(s)", loaded.path.display(), loaded.tasks.len());
        if loaded.tasks.is_empty() {
            return Ok(());
        }
        let rows: Vec<TaskRow> = loaded
            .tasks
            .iter()
            .map(|task| TaskRow {
                id: task.id().to_string(),
                title: task.title().to_owned(),
                status: task.status().to_owned(),
                priority: task
                    .priority()
                    .map_or_else(|| "-".to_string(), |p| p.to_string()),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
