//! Row models and DTOs.

pub mod history_log;
