// Public API for integration tests and the binary

pub mod config;
pub mod console;
pub mod content;
pub mod protocol;
pub mod public;
pub mod state;
pub mod store;
pub mod types;
