//! Configuration defaults and value resolution for carbonlock.
//!
//! This module defines the compiled-in defaults used when a key is absent
//! from the config file, and the tri-state flag resolution used for
//! `coordination_lock_enabled`.

use crate::locks::{DEFAULT_ATTEMPTS, DEFAULT_INTERVAL};
use serde_yaml::Value;

/// Compiled-in default for `coordination_lock_enabled`.
pub const COORDINATION_ENABLED_DEFAULT: bool = false;

// Default value functions for serde
pub(crate) fn default_lock_retries() -> u32 {
    DEFAULT_ATTEMPTS
}
pub(crate) fn default_lock_retry_interval_secs() -> u64 {
    DEFAULT_INTERVAL.as_secs()
}
pub(crate) fn default_coordination_root() -> String {
    "/carbonlocks".to_string()
}

/// Resolve a tri-state flag value to a boolean.
///
/// Accepts YAML booleans and the strings `"true"`/`"false"` in any case.
/// Absent or unrecognized values resolve to `default`.
pub fn resolve_flag(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => true,
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}
