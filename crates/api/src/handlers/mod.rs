pub mod clickup;
pub mod contacts;
pub mod history;
pub mod sync;
pub mod tables;
