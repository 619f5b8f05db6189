//! Error types for tasksync-tracker.

use thiserror::Error;

/// All errors that can arise from tracker operations.
///
/// Nothing here is retried; callers abort the run and rely on re-running.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker answered with a status the operation does not handle.
    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The response body was not the JSON shape expected.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Every page up to the configured limit was non-empty.
    #[error("issue listing did not end within {max_pages} page(s)")]
    PageLimit { max_pages: u32 },

    /// Repository identifier not in `owner/name` form.
    #[error("invalid repository '{0}'; expected owner/name")]
    InvalidRepo(String),
}

impl TrackerError {
    /// HTTP status carried by the error, if the tracker produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrackerError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
