//! Shared sync entrypoints used by the CLI commands.

use std::path::{Path, PathBuf};

use tasksync_core::{document, parse_document, TaskId, TaskRecord};
use tasksync_tracker::{ClientConfig, GitHubClient, Tracker};

use crate::{Reconciler, SyncError, SyncOptions, SyncPlan, SyncReport};

/// Everything a run needs, resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub client: ClientConfig,
    /// Directory relative candidates are resolved against.
    pub root: PathBuf,
    /// Document paths, tried in order.
    pub candidates: Vec<PathBuf>,
    pub options: SyncOptions,
}

/// Tasks read from the backlog document.
#[derive(Debug, Clone)]
pub struct LoadedTasks {
    pub path: PathBuf,
    pub tasks: Vec<TaskRecord>,
    pub duplicates: Vec<TaskId>,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct SyncRun {
    pub loaded: LoadedTasks,
    pub report: SyncReport,
}

/// Locate, read and parse the backlog document.
pub fn load_tasks<P: AsRef<Path>>(root: &Path, candidates: &[P]) -> Result<LoadedTasks, SyncError> {
    let doc = document::load_first(root, candidates)?;
    let parsed = parse_document(&doc.content);
    tracing::info!(
        "parsed {} task(s) from {}",
        parsed.tasks.len(),
        doc.path.display()
    );
    Ok(LoadedTasks {
        path: doc.path,
        tasks: parsed.tasks,
        duplicates: parsed.duplicates,
    })
}

/// Reconcile the document against `tracker`.
pub fn run_with<T: Tracker>(
    tracker: T,
    root: &Path,
    candidates: &[PathBuf],
    options: SyncOptions,
) -> Result<SyncRun, SyncError> {
    let loaded = load_tasks(root, candidates)?;
    let report = Reconciler::new(tracker, options).run(&loaded.tasks)?;
    tracing::info!(
        "sync finished: {} created, {} updated{}",
        report.created(),
        report.updated(),
        if report.dry_run { " (dry run)" } else { "" }
    );
    Ok(SyncRun { loaded, report })
}

/// Compute the plan for the document against `tracker` without writing.
pub fn plan_with<T: Tracker>(
    tracker: T,
    root: &Path,
    candidates: &[PathBuf],
    options: SyncOptions,
) -> Result<(LoadedTasks, SyncPlan), SyncError> {
    let loaded = load_tasks(root, candidates)?;
    let plan = Reconciler::new(tracker, options).plan(&loaded.tasks)?;
    Ok((loaded, plan))
}

/// Reconcile against GitHub using `config`.
///
/// The document is read before any network call, so a missing file fails fast.
pub fn run(config: &SyncConfig) -> Result<SyncRun, SyncError> {
    let client = GitHubClient::new(config.client.clone());
    run_with(client, &config.root, &config.candidates, config.options)
}

/// Plan against GitHub using `config`. Only reads from the tracker.
pub fn plan(config: &SyncConfig) -> Result<(LoadedTasks, SyncPlan), SyncError> {
    let client = GitHubClient::new(config.client.clone());
    plan_with(client, &config.root, &config.candidates, config.options)
}
