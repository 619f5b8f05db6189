//! Backlog document parser.
//!
//! A single left-to-right pass over the lines. A task header
//! (``#### `TASK-<n>` - <title>``) opens a block; the block runs until the next
//! line that starts another task header, starts a `## ` section, or is a bare
//! `---` divider. The terminator is not consumed, so it can open the next block.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Priority, TaskId, TaskRecord};

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#### `(?P<id>TASK-\d+)` - (?P<title>.+)$").expect("header regex is valid")
});

const TASK_HEADER_PREFIX: &str = "#### `TASK-";
const SECTION_PREFIX: &str = "## ";
const DIVIDER: &str = "---";
const PRIORITY_LABELS: [&str; 2] = ["**Priority:**", "**Priorytet:**"];

/// One task header plus the lines that belong to it, borrowed from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    pub id: TaskId,
    pub title: &'a str,
    pub lines: Vec<&'a str>,
}

impl RawBlock<'_> {
    pub fn into_record(self) -> TaskRecord {
        TaskRecord::from_block(self.id, self.title, &self.lines)
    }
}

/// Result of parsing a whole document.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Task records in document order, one per id.
    pub tasks: Vec<TaskRecord>,
    /// Ids whose earlier blocks were discarded in favour of a later one.
    pub duplicates: Vec<TaskId>,
}

/// Split the document into raw task blocks, in document order.
pub fn scan_blocks(content: &str) -> Vec<RawBlock<'_>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = HEADER_RE.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let (Some(id), Some(title)) = (caps.name("id"), caps.name("title")) else {
            i += 1;
            continue;
        };
        let Some(id) = TaskId::parse(id.as_str()) else {
            i += 1;
            continue;
        };

        i += 1;
        let start = i;
        while i < lines.len() && !is_terminator(lines[i]) {
            i += 1;
        }
        blocks.push(RawBlock {
            id,
            title: title.as_str(),
            lines: lines[start..i].to_vec(),
        });
    }

    blocks
}

/// Parse the document into task records.
///
/// When an id appears more than once, the last block wins and keeps its own
/// position; the dropped ids are reported in [`ParsedDocument::duplicates`].
pub fn parse_document(content: &str) -> ParsedDocument {
    let blocks = scan_blocks(content);

    let mut last_seen: HashMap<TaskId, usize> = HashMap::new();
    for (idx, block) in blocks.iter().enumerate() {
        last_seen.insert(block.id.clone(), idx);
    }

    let mut parsed = ParsedDocument::default();
    for (idx, block) in blocks.into_iter().enumerate() {
        if last_seen.get(&block.id) == Some(&idx) {
            parsed.tasks.push(block.into_record());
        } else {
            tracing::warn!("duplicate task id {}: earlier block discarded", block.id);
            parsed.duplicates.push(block.id);
        }
    }

    tracing::debug!("parsed {} task(s)", parsed.tasks.len());
    parsed
}

fn is_terminator(line: &str) -> bool {
    line.starts_with(TASK_HEADER_PREFIX) || line.starts_with(SECTION_PREFIX) || line.trim() == DIVIDER
}

/// Value of the first `- **<field>:** <value>` line in a block.
///
/// Returns the text after the second `**`, with leading colons and surrounding
/// whitespace stripped. `None` when no line carries the field.
pub fn extract_field<S: AsRef<str>>(lines: &[S], field: &str) -> Option<String> {
    let prefix = format!("- **{field}:**");
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| line.trim().starts_with(&prefix))
        .and_then(|line| line.splitn(3, "**").nth(2))
        .map(|rest| rest.trim().trim_start_matches(':').trim().to_owned())
}

/// Priority from the first priority line carrying a marker glyph.
///
/// Either label variant qualifies a line. A priority line without any glyph
/// does not end the scan.
pub fn extract_priority<S: AsRef<str>>(lines: &[S]) -> Option<Priority> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| PRIORITY_LABELS.iter().any(|label| line.contains(label)))
        .find_map(|line| {
            Priority::MARKERS
                .iter()
                .find(|(glyph, _)| line.contains(glyph))
                .map(|(_, priority)| *priority)
        })
}
