//! Locating and reading the backlog document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, DocumentError};

/// Candidate document paths, tried in order, relative to the working directory.
pub const DEFAULT_CANDIDATES: [&str; 2] = ["docs/issue/pl/TASKS.md", "docs/issue/TASKS.md"];

/// A loaded backlog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub content: String,
}

/// Read the first candidate that exists.
///
/// Relative candidates are resolved against `root`.
pub fn load_first<P: AsRef<Path>>(root: &Path, candidates: &[P]) -> Result<Document, DocumentError> {
    let mut checked = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let path = root.join(candidate.as_ref());
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::info!("using task file {}", path.display());
                return Ok(Document { path, content });
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("task file candidate missing: {}", path.display());
                checked.push(path);
            }
            Err(err) => return Err(io_err(path, err)),
        }
    }
    Err(DocumentError::NotFound { checked })
}
