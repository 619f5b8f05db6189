//! Error types for tasksync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or reading the backlog document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// None of the candidate paths exist.
    #[error("none of the task files exist; checked: {}", display_paths(.checked))]
    NotFound { checked: Vec<PathBuf> },

    /// The document exists but could not be read (permissions, invalid UTF-8, ...).
    #[error("failed to read task file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DocumentError {
    DocumentError::Io {
        path: path.into(),
        source,
    }
}
