//! The tracker seam used by the reconciler.

use crate::error::TrackerError;
use crate::types::{IssueDraft, IssueIndex, Label, RemoteIssue};

/// Operations the reconciler needs from an issue tracker.
///
/// Calls are blocking and made one at a time. Implementations provision every
/// label of a draft (see [`Tracker::provision_labels`]) before creating or
/// updating the issue.
pub trait Tracker {
    /// Make sure `label` exists, creating it when the lookup reports it absent.
    ///
    /// Any lookup failure other than "not found" is returned unchanged.
    fn ensure_label(&self, label: &Label) -> Result<(), TrackerError>;

    /// All task-sourced issues, keyed by the id token in their titles.
    ///
    /// Pull requests and issues without a leading `[TASK-<n>]` are skipped.
    fn list_issues(&self) -> Result<IssueIndex, TrackerError>;

    /// Create a new issue from `draft`. The draft's state is not sent.
    fn create_issue(&self, draft: &IssueDraft) -> Result<RemoteIssue, TrackerError>;

    /// Overwrite title, body, labels and state of `issue` with `draft`.
    fn update_issue(&self, issue: &RemoteIssue, draft: &IssueDraft)
        -> Result<RemoteIssue, TrackerError>;

    /// Ensure each label in turn; stops at the first failure.
    fn provision_labels(&self, labels: &[Label]) -> Result<(), TrackerError> {
        labels.iter().try_for_each(|label| self.ensure_label(label))
    }
}

impl<T: Tracker + ?Sized> Tracker for &T {
    fn ensure_label(&self, label: &Label) -> Result<(), TrackerError> {
        (**self).ensure_label(label)
    }

    fn list_issues(&self) -> Result<IssueIndex, TrackerError> {
        (**self).list_issues()
    }

    fn create_issue(&self, draft: &IssueDraft) -> Result<RemoteIssue, TrackerError> {
        (**self).create_issue(draft)
    }

    fn update_issue(
        &self,
        issue: &RemoteIssue,
        draft: &IssueDraft,
    ) -> Result<RemoteIssue, TrackerError> {
        (**self).update_issue(issue, draft)
    }
}

/// Build the id → issue index from raw listing entries.
///
/// When two issues carry the same id, the later entry wins.
pub fn index_issues<I>(issues: I) -> IssueIndex
where
    I: IntoIterator<Item = RemoteIssue>,
{
    let mut index = IssueIndex::new();
    for issue in issues {
        if issue.is_pull_request() {
            tracing::debug!("skipping pull request #{}", issue.number);
            continue;
        }
        match issue.task_id() {
            Some(id) => {
                index.insert(id, issue);
            }
            None => tracing::debug!("skipping untracked issue #{}", issue.number),
        }
    }
    index
}
