//! CRM-to-task-board synchronization.
//!
//! [`orchestrator::sync_contacts`] performs one sequential pass over the
//! CRM contact list and creates a task for every contact whose status is
//! `pending`. [`runner::SyncRunner`] runs passes in the background and keeps
//! their state observable and cancellable.

pub mod orchestrator;
pub mod runner;

pub use orchestrator::{sync_contacts, ContactOutcome, SkipReason, SyncError, SyncSummary};
pub use runner::{RunState, SyncRunSnapshot, SyncRunner, DEFAULT_RETAINED_RUNS};
