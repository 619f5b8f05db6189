//! In-memory tracker for tests.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::TrackerError;
use crate::tracker::{index_issues, Tracker};
use crate::types::{IssueDraft, IssueIndex, IssueLabel, IssueState, Label, RemoteIssue};

/// A call observed by [`InMemoryTracker`], in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    ListIssues,
    LookupLabel { name: String },
    CreateLabel { name: String, color: String },
    CreateIssue { title: String, labels: Vec<String> },
    UpdateIssue {
        number: u64,
        title: String,
        state: IssueState,
        labels: Vec<String>,
    },
}

/// Thread-safe in-memory [`Tracker`] that records every call.
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    labels: BTreeMap<String, Label>,
    issues: Vec<RemoteIssue>,
    calls: Vec<TrackerCall>,
    label_lookup_failure: Option<u16>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every label lookup fail with `status` (e.g. 403 on a revoked token).
    pub fn failing_label_lookups(self, status: u16) -> Self {
        self.write().label_lookup_failure = Some(status);
        self
    }

    /// Seed an existing issue; returns its number.
    pub fn seed_issue(&self, title: &str, state: IssueState) -> u64 {
        self.push_issue(title, state, None)
    }

    /// Seed a pull request entry; returns its number.
    pub fn seed_pull_request(&self, title: &str) -> u64 {
        self.push_issue(
            title,
            IssueState::Open,
            Some(serde_json::json!({ "url": "memory://pull" })),
        )
    }

    pub fn seed_label(&self, label: Label) {
        self.write().labels.insert(label.name.clone(), label);
    }

    /// Every issue and pull request, in creation order.
    pub fn issues(&self) -> Vec<RemoteIssue> {
        self.read().issues.clone()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.read().labels.values().cloned().collect()
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.read().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.write().calls.clear();
    }

    fn push_issue(
        &self,
        title: &str,
        state: IssueState,
        pull_request: Option<serde_json::Value>,
    ) -> u64 {
        let mut guard = self.write();
        let number = guard.issues.len() as u64 + 1;
        guard.issues.push(RemoteIssue {
            number,
            title: title.to_owned(),
            state,
            labels: vec![],
            pull_request,
        });
        number
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn issue_labels(draft: &IssueDraft) -> Vec<IssueLabel> {
    draft
        .labels
        .iter()
        .map(|l| IssueLabel {
            name: l.name.clone(),
        })
        .collect()
}

fn owned_names(draft: &IssueDraft) -> Vec<String> {
    draft.labels.iter().map(|l| l.name.clone()).collect()
}

impl Tracker for InMemoryTracker {
    fn ensure_label(&self, label: &Label) -> Result<(), TrackerError> {
        let mut state = self.write();
        state.calls.push(TrackerCall::LookupLabel {
            name: label.name.clone(),
        });
        if let Some(status) = state.label_lookup_failure {
            return Err(TrackerError::Status {
                method: "GET".to_owned(),
                url: format!("memory://labels/{}", label.name),
                status,
                body: String::new(),
            });
        }
        if state.labels.contains_key(&label.name) {
            return Ok(());
        }
        state.calls.push(TrackerCall::CreateLabel {
            name: label.name.clone(),
            color: label.color.clone(),
        });
        state.labels.insert(label.name.clone(), label.clone());
        Ok(())
    }

    fn list_issues(&self) -> Result<IssueIndex, TrackerError> {
        let mut state = self.write();
        state.calls.push(TrackerCall::ListIssues);
        Ok(index_issues(state.issues.clone()))
    }

    fn create_issue(&self, draft: &IssueDraft) -> Result<RemoteIssue, TrackerError> {
        self.provision_labels(&draft.labels)?;
        let mut state = self.write();
        state.calls.push(TrackerCall::CreateIssue {
            title: draft.title.clone(),
            labels: owned_names(draft),
        });
        let issue = RemoteIssue {
            number: state.issues.len() as u64 + 1,
            title: draft.title.clone(),
            state: IssueState::Open,
            labels: issue_labels(draft),
            pull_request: None,
        };
        state.issues.push(issue.clone());
        Ok(issue)
    }

    fn update_issue(
        &self,
        issue: &RemoteIssue,
        draft: &IssueDraft,
    ) -> Result<RemoteIssue, TrackerError> {
        self.provision_labels(&draft.labels)?;
        let mut state = self.write();
        state.calls.push(TrackerCall::UpdateIssue {
            number: issue.number,
            title: draft.title.clone(),
            state: draft.state,
            labels: owned_names(draft),
        });
        let Some(stored) = state.issues.iter_mut().find(|i| i.number == issue.number) else {
            return Err(TrackerError::Status {
                method: "PATCH".to_owned(),
                url: format!("memory://issues/{}", issue.number),
                status: 404,
                body: "Not Found".to_owned(),
            });
        };
        stored.title = draft.title.clone();
        stored.state = draft.state;
        stored.labels = issue_labels(draft);
        Ok(stored.clone())
    }
}
