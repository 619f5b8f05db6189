//! # tasksync-sync
//!
//! One-way reconciliation of backlog tasks into an issue tracker.
//!
//! [`Reconciler`] matches each task to the remote issue carrying its id and
//! either updates it or creates a new one. [`pipeline::run`] wires document
//! loading, parsing and the GitHub client together for the CLI.

pub mod error;
pub mod pipeline;
pub mod reconcile;

pub use error::SyncError;
pub use reconcile::{
    PlannedAction, PlannedTask, Reconciler, SyncOptions, SyncOutcome, SyncPlan, SyncReport,
};
