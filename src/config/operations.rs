//! Config loading, validation, and derived values.

use super::model::LockConfig;
use super::types::{resolve_flag, COORDINATION_ENABLED_DEFAULT};
use crate::error::{CarbonLockError, Result};
use crate::locks::RetryPolicy;
use std::path::Path;
use std::time::Duration;

impl LockConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(LockConfig)` - Successfully loaded and validated config
    /// * `Err(CarbonLockError::ConfigError)` - Read, parse or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CarbonLockError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LockConfig = if yaml.trim().is_empty() {
            LockConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                CarbonLockError::ConfigError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            CarbonLockError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `lock_retries` must be positive
    /// - `coordination_root` must be an absolute node path
    pub fn validate(&self) -> Result<()> {
        if self.lock_retries == 0 {
            return Err(CarbonLockError::ConfigError(
                "config validation failed: lock_retries must be greater than 0".to_string(),
            ));
        }

        if !self.coordination_root.starts_with('/') {
            return Err(CarbonLockError::ConfigError(format!(
                "config validation failed: coordination_root must start with '/' (found '{}')",
                self.coordination_root
            )));
        }

        Ok(())
    }

    /// Resolved coordination-service switch.
    pub fn coordination_enabled(&self) -> bool {
        resolve_flag(
            self.coordination_lock_enabled.as_ref(),
            COORDINATION_ENABLED_DEFAULT,
        )
    }

    /// Retry policy described by this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.lock_retries,
            Duration::from_secs(self.lock_retry_interval_secs),
        )
    }
}
