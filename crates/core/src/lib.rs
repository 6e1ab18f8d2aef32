//! Domain building blocks shared by every syncbridge crate.
//!
//! Holds the secret store, the platform URL resolver, the contact/task
//! types exchanged with the external platforms, and the request-log port
//! that platform clients report successful calls to.

pub mod contact;
pub mod error;
pub mod request_log;
pub mod secrets;
pub mod types;
pub mod urls;
