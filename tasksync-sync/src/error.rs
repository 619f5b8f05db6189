//! Error types for tasksync-sync.

use thiserror::Error;

use tasksync_core::DocumentError;
use tasksync_tracker::TrackerError;

/// All errors that can abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The backlog document could not be found or read.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// A tracker call failed; the run stops at the first one.
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),
}
