//! Configuration model for carbonlock.
//!
//! This module defines the LockConfig struct read from a YAML file.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! compiled-in defaults for every key, and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::LockConfig;
pub use types::{resolve_flag, COORDINATION_ENABLED_DEFAULT};
