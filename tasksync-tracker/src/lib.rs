//! # tasksync-tracker
//!
//! Issue-tracker access for backlog reconciliation.
//!
//! [`Tracker`] is the seam the reconciler talks to. [`GitHubClient`] implements
//! it over the GitHub REST API with blocking `ureq` calls; [`InMemoryTracker`]
//! implements it in memory for tests and dry runs against fixtures.

pub mod error;
pub mod github;
pub mod labels;
pub mod memory;
pub mod tracker;
pub mod types;

pub use error::TrackerError;
pub use github::{ClientConfig, GitHubClient};
pub use labels::LabelPolicy;
pub use memory::{InMemoryTracker, TrackerCall};
pub use tracker::{index_issues, Tracker};
pub use types::{ApiToken, IssueDraft, IssueIndex, IssueState, Label, RemoteIssue, RepoSlug};
