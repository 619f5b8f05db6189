//! tasksync core library: task records, backlog parsing, document loading.
//!
//! - [`types`]: [`TaskId`], [`Priority`], [`TaskRecord`]
//! - [`parser`]: turns backlog text into ordered task records
//! - [`document`]: locates and reads the backlog file
//! - [`error`]: [`DocumentError`]

pub mod document;
pub mod error;
pub mod parser;
pub mod types;

pub use error::DocumentError;
pub use parser::{parse_document, ParsedDocument};
pub use types::{Priority, TaskId, TaskRecord};
