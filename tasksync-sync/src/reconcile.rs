//! Plan and apply create/update operations for a task list.
//!
//! Each task is evaluated on its own: if the remote index holds an issue for
//! its id the issue is updated, otherwise a new one is created. There is no
//! persisted cursor; every run starts from a fresh listing. Operations run in
//! document order, one at a time, because label provisioning mutates shared
//! remote state.

use serde::Serialize;

use tasksync_core::{TaskId, TaskRecord};
use tasksync_tracker::{IssueDraft, IssueIndex, IssueState, LabelPolicy, RemoteIssue, Tracker};

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Behaviour switches for a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOptions {
    pub labels: LabelPolicy,
    /// Plan only; issue no write calls.
    pub dry_run: bool,
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// What will happen to one task's issue.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedAction {
    /// No issue carries the task id.
    Create,
    /// `issue` carries the task id and will be overwritten.
    Update { issue: RemoteIssue },
}

/// One task with its draft and the action chosen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTask {
    pub task: TaskRecord,
    pub draft: IssueDraft,
    pub action: PlannedAction,
}

/// Ordered actions, one per task, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncPlan {
    pub items: Vec<PlannedTask>,
}

impl SyncPlan {
    /// Match `tasks` against `index`. Pure; touches no tracker.
    pub fn build(tasks: &[TaskRecord], index: &IssueIndex, policy: &LabelPolicy) -> Self {
        let items = tasks
            .iter()
            .map(|task| {
                let action = match index.get(task.id()) {
                    Some(issue) => PlannedAction::Update {
                        issue: issue.clone(),
                    },
                    None => PlannedAction::Create,
                };
                PlannedTask {
                    task: task.clone(),
                    draft: policy.draft(task),
                    action,
                }
            })
            .collect();
        Self { items }
    }

    pub fn creates(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.action, PlannedAction::Create))
            .count()
    }

    pub fn updates(&self) -> usize {
        self.items.len() - self.creates()
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Outcome for a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A new issue was opened.
    Created { id: TaskId, number: u64 },
    /// The matching issue was overwritten.
    Updated {
        id: TaskId,
        number: u64,
        state: IssueState,
    },
    /// Dry run: an issue would have been opened.
    WouldCreate { id: TaskId },
    /// Dry run: the matching issue would have been overwritten.
    WouldUpdate {
        id: TaskId,
        number: u64,
        state: IssueState,
    },
}

impl SyncOutcome {
    pub fn id(&self) -> &TaskId {
        match self {
            SyncOutcome::Created { id, .. }
            | SyncOutcome::Updated { id, .. }
            | SyncOutcome::WouldCreate { id }
            | SyncOutcome::WouldUpdate { id, .. } => id,
        }
    }
}

/// Summary of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Created { .. } | SyncOutcome::WouldCreate { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Updated { .. } | SyncOutcome::WouldUpdate { .. }))
    }

    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| pred(o)).count()
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Drives a [`Tracker`] so that it mirrors a task list.
#[derive(Debug)]
pub struct Reconciler<T> {
    tracker: T,
    options: SyncOptions,
}

impl<T: Tracker> Reconciler<T> {
    pub fn new(tracker: T, options: SyncOptions) -> Self {
        Self { tracker, options }
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Fetch the remote index and match `tasks` against it.
    pub fn plan(&self, tasks: &[TaskRecord]) -> Result<SyncPlan, SyncError> {
        let index = self.tracker.list_issues()?;
        tracing::info!(
            "{} task(s) in document, {} matching issue(s) on tracker",
            tasks.len(),
            index.len()
        );
        Ok(SyncPlan::build(tasks, &index, &self.options.labels))
    }

    /// Execute `plan`, stopping at the first failed call.
    pub fn apply(&self, plan: SyncPlan) -> Result<SyncReport, SyncError> {
        let dry_run = self.options.dry_run;
        let mut outcomes = Vec::with_capacity(plan.items.len());

        for PlannedTask {
            task,
            draft,
            action,
        } in plan.items
        {
            let id = task.id().clone();
            let outcome = match (action, dry_run) {
                (PlannedAction::Create, true) => {
                    tracing::info!("[dry-run] would create {}", draft.title);
                    SyncOutcome::WouldCreate { id }
                }
                (PlannedAction::Update { issue }, true) => {
                    tracing::info!("[dry-run] would update #{} {}", issue.number, draft.title);
                    SyncOutcome::WouldUpdate {
                        id,
                        number: issue.number,
                        state: draft.state,
                    }
                }
                (PlannedAction::Create, false) => {
                    let created = self.tracker.create_issue(&draft)?;
                    SyncOutcome::Created {
                        id,
                        number: created.number,
                    }
                }
                (PlannedAction::Update { issue }, false) => {
                    self.tracker.update_issue(&issue, &draft)?;
                    SyncOutcome::Updated {
                        id,
                        number: issue.number,
                        state: draft.state,
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(SyncReport { dry_run, outcomes })
    }

    /// Plan, then apply.
    pub fn run(&self, tasks: &[TaskRecord]) -> Result<SyncReport, SyncError> {
        let plan = self.plan(tasks)?;
        self.apply(plan)
    }
}
