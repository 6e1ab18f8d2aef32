//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod history_log_repo;

pub use history_log_repo::HistoryLogRepo;
