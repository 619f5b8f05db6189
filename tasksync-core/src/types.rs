//! Domain types for backlog tasks.
//!
//! A [`TaskRecord`] is rebuilt from the document on every run. Its formatted
//! title and issue body are derived from the parsed block and cannot be set
//! independently, so identical input always yields an identical record.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parser::{extract_field, extract_priority};

static TASK_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TASK-\d+$").expect("task id regex is valid"));

/// `[TASK-<digits>]` at the very start of a title.
static TITLE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(TASK-\d+)\]").expect("title token regex is valid"));

/// Heading placed above the fenced copy of the raw block.
pub const BODY_HEADING: &str = "## Task metadata";

/// Status prefixes that mark a task as finished.
const CLOSING_GLYPHS: [&str; 2] = ["✅", "❌"];
const CLOSING_WORDS: [&str; 2] = ["done", "failed"];

// ---------------------------------------------------------------------------
// TaskId
// ---------------------------------------------------------------------------

/// A backlog task identifier of the form `TASK-<digits>`.
///
/// The sole correlation key between document blocks and remote issues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Validate `raw` as a task id. Returns `None` unless it is exactly `TASK-<digits>`.
    pub fn parse(raw: &str) -> Option<Self> {
        TASK_ID_RE.is_match(raw).then(|| Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the leading `[TASK-<digits>]` token from an issue title.
    ///
    /// Only the title start is considered; text after the token is ignored.
    pub fn from_issue_title(title: &str) -> Option<Self> {
        TITLE_TOKEN_RE
            .captures(title)
            .map(|caps| Self(caps[1].to_owned()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid task id '{s}'; expected TASK-<digits>"))
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority decoded from the emoji marker on a priority line.
///
/// An absent priority is modelled as `Option::<Priority>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Marker glyphs in the order they are checked on a priority line.
    pub const MARKERS: [(&'static str, Priority); 3] = [
        ("🔴", Priority::High),
        ("🟡", Priority::Medium),
        ("🟢", Priority::Low),
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

/// Canonical in-memory form of one backlog task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    id: TaskId,
    title: String,
    title_formatted: String,
    raw_block: String,
    status: String,
    priority: Option<Priority>,
    body: String,
}

impl TaskRecord {
    /// Build a record from a header's id and title plus the lines of its block.
    pub fn from_block<S: AsRef<str>>(id: TaskId, title: impl Into<String>, lines: &[S]) -> Self {
        let title = title.into();
        let raw_block = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_owned();
        let status = extract_field(lines, "Status").unwrap_or_default();
        let priority = extract_priority(lines);

        Self {
            title_formatted: format_title(&id, &title),
            body: render_body(&raw_block),
            id,
            title,
            raw_block,
            status,
            priority,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// `[<id>] <title>`: the remote issue title.
    pub fn title_formatted(&self) -> &str {
        &self.title_formatted
    }

    pub fn raw_block(&self) -> &str {
        &self.raw_block
    }

    /// Text of the `Status` metadata line; empty when the block has none.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Markdown issue body wrapping the raw block.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the status marks the task as done or failed.
    pub fn is_finished(&self) -> bool {
        status_is_finished(&self.status)
    }
}

/// `[<id>] <title>`.
pub fn format_title(id: &TaskId, title: &str) -> String {
    format!("[{id}] {title}")
}

/// Inverse of [`format_title`].
pub fn split_formatted_title(formatted: &str) -> Option<(TaskId, &str)> {
    let id = TaskId::from_issue_title(formatted)?;
    let rest = formatted[id.as_str().len() + 2..].strip_prefix(' ')?;
    Some((id, rest))
}

/// Render the issue body for a raw block.
pub fn render_body(raw_block: &str) -> String {
    format!("{BODY_HEADING}\n\n```md\n{raw_block}\n```")
}

/// A status closes its issue when it starts with a done/failed glyph, or its
/// first word is `done` or `failed` (ASCII case-insensitive).
pub fn status_is_finished(status: &str) -> bool {
    let status = status.trim();
    if CLOSING_GLYPHS.iter().any(|g| status.starts_with(g)) {
        return true;
    }
    let first_word = status
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .next()
        .unwrap_or_default();
    CLOSING_WORDS
        .iter()
        .any(|w| first_word.eq_ignore_ascii_case(w))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
