//! Tests for config functionality.

use crate::config::{resolve_flag, LockConfig, COORDINATION_ENABLED_DEFAULT};
use serde_yaml::Value;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = LockConfig::default();

    assert!(config.coordination_lock_enabled.is_none());
    assert_eq!(config.coordination_root, "/carbonlocks");
    assert_eq!(config.lock_retries, 3);
    assert_eq!(config.lock_retry_interval_secs, 5);
    assert_eq!(config.coordination_enabled(), COORDINATION_ENABLED_DEFAULT);
}

#[test]
fn test_parse_empty_yaml() {
    let config = LockConfig::from_yaml("").unwrap();

    assert_eq!(config.lock_retries, 3);
    assert_eq!(config.coordination_enabled(), COORDINATION_ENABLED_DEFAULT);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
lock_retries: 10
"#;
    let config = LockConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_retries, 10);
    // Unspecified values should use defaults
    assert_eq!(config.lock_retry_interval_secs, 5);
    assert_eq!(config.coordination_root, "/carbonlocks");
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
coordination_lock_enabled: "true"
coordination_root: /locks/warehouse
lock_retries: 7
lock_retry_interval_secs: 1
"#;
    let config = LockConfig::from_yaml(yaml).unwrap();

    assert!(config.coordination_enabled());
    assert_eq!(config.coordination_root, "/locks/warehouse");
    assert_eq!(config.lock_retries, 7);
    assert_eq!(config.lock_retry_interval_secs, 1);
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
lock_retries: 2
some_future_setting: 42
"#;
    let config = LockConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.lock_retries, 2);
}

#[test]
fn test_coordination_flag_accepts_yaml_bool_and_strings() {
    let config = LockConfig::from_yaml("coordination_lock_enabled: true").unwrap();
    assert!(config.coordination_enabled());

    let config = LockConfig::from_yaml("coordination_lock_enabled: \"TRUE\"").unwrap();
    assert!(config.coordination_enabled());

    let config = LockConfig::from_yaml("coordination_lock_enabled: False").unwrap();
    assert!(!config.coordination_enabled());

    let config = LockConfig::from_yaml("coordination_lock_enabled: \"false\"").unwrap();
    assert!(!config.coordination_enabled());
}

#[test]
fn test_coordination_flag_unrecognized_uses_default() {
    let config = LockConfig::from_yaml("coordination_lock_enabled: maybe").unwrap();
    assert_eq!(config.coordination_enabled(), COORDINATION_ENABLED_DEFAULT);

    let config = LockConfig::from_yaml("coordination_lock_enabled: 1").unwrap();
    assert_eq!(config.coordination_enabled(), COORDINATION_ENABLED_DEFAULT);
}

#[test]
fn test_resolve_flag() {
    assert!(resolve_flag(None, true));
    assert!(!resolve_flag(None, false));
    assert!(resolve_flag(Some(&Value::String(" True ".to_string())), false));
    assert!(!resolve_flag(Some(&Value::String("fAlSe".to_string())), true));
    assert!(resolve_flag(Some(&Value::String("yes".to_string())), true));
    assert!(!resolve_flag(Some(&Value::Null), false));
}

#[test]
fn test_validation_rejects_zero_retries() {
    let result = LockConfig::from_yaml("lock_retries: 0");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("lock_retries"));
}

#[test]
fn test_validation_rejects_relative_coordination_root() {
    let result = LockConfig::from_yaml("coordination_root: carbonlocks");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("coordination_root"));
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let result = LockConfig::from_yaml("lock_retries: [not, a, number]");
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
}

#[test]
fn test_retry_policy_from_config() {
    let config = LockConfig::from_yaml("lock_retries: 4\nlock_retry_interval_secs: 2").unwrap();
    let policy = config.retry_policy();

    assert_eq!(policy.attempts(), 4);
    assert_eq!(policy.interval(), Duration::from_secs(2));
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("carbonlock.yaml");
    std::fs::write(&path, "lock_retries: 9\n").unwrap();

    let config = LockConfig::load(&path).unwrap();
    assert_eq!(config.lock_retries, 9);
}

#[test]
fn test_load_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let result = LockConfig::load(temp_dir.path().join("missing.yaml"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("failed to read config file"));
}

#[test]
fn test_yaml_roundtrip_keeps_flag() {
    let config = LockConfig::from_yaml("coordination_lock_enabled: true").unwrap();
    let yaml = config.to_yaml().unwrap();
    let parsed = LockConfig::from_yaml(&yaml).unwrap();
    assert!(parsed.coordination_enabled());
}
