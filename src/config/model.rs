//! LockConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Configuration for lock acquisition.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    // =========================================================================
    // Backend selection
    // =========================================================================
    /// Raw value of the coordination-service switch.
    ///
    /// Kept unresolved so that absent, `"true"`, `"false"` and garbage can be
    /// told apart; use [`LockConfig::coordination_enabled`] to read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordination_lock_enabled: Option<Value>,

    /// Root node under which coordination-service locks are created.
    #[serde(default = "default_coordination_root")]
    pub coordination_root: String,

    // =========================================================================
    // Retry settings
    // =========================================================================
    /// Number of acquisition attempts before giving up.
    #[serde(default = "default_lock_retries")]
    pub lock_retries: u32,

    /// Seconds to wait between acquisition attempts.
    #[serde(default = "default_lock_retry_interval_secs")]
    pub lock_retry_interval_secs: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            coordination_lock_enabled: None,
            coordination_root: default_coordination_root(),
            lock_retries: default_lock_retries(),
            lock_retry_interval_secs: default_lock_retry_interval_secs(),
        }
    }
}
