//! Label naming and the task → issue draft mapping.

use tasksync_core::{Priority, TaskRecord};

use crate::types::{IssueDraft, IssueState, Label};

pub const BASE_LABEL: &str = "task";
pub const BASE_LABEL_COLOR: &str = "0e8a16";

/// Which labels a task's issue carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPolicy {
    /// Attach `priority-<level>` labels for tasks that have a priority.
    pub priority_labels: bool,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            priority_labels: true,
        }
    }
}

impl LabelPolicy {
    pub fn base_only() -> Self {
        Self {
            priority_labels: false,
        }
    }

    /// Labels for `task`, base label first.
    pub fn labels_for(&self, task: &TaskRecord) -> Vec<Label> {
        let mut labels = vec![Label::new(BASE_LABEL, BASE_LABEL_COLOR)];
        if self.priority_labels {
            if let Some(priority) = task.priority() {
                labels.push(priority_label(priority));
            }
        }
        labels
    }

    /// Title, body, labels and derived state for `task`.
    pub fn draft(&self, task: &TaskRecord) -> IssueDraft {
        IssueDraft {
            title: task.title_formatted().to_owned(),
            body: task.body().to_owned(),
            labels: self.labels_for(task),
            state: derive_state(task),
        }
    }
}

pub fn priority_label(priority: Priority) -> Label {
    let color = match priority {
        Priority::High => "d73a4a",
        Priority::Medium => "fbca04",
        Priority::Low => "0e8a16",
    };
    Label::new(format!("priority-{priority}"), color)
}

/// Closed iff the task's status marks it done or failed.
pub fn derive_state(task: &TaskRecord) -> IssueState {
    if task.is_finished() {
        IssueState::Closed
    } else {
        IssueState::Open
    }
}
