//! Tests for configuration validation

use idle_task_queue::config::{IdleConfig, QueueConfig};

#[test]
fn test_idle_config_defaults() {
    let cfg = IdleConfig::default();
    assert_eq!(cfg.frame_budget_ms, 50);
    assert_eq!(cfg.dispatch_delay_ms, 1);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_idle_config_invalid_budget() {
    let invalid = IdleConfig {
        frame_budget_ms: 0,
        dispatch_delay_ms: 0,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_idle_config_delay_exceeds_budget() {
    let invalid = IdleConfig {
        frame_budget_ms: 10,
        dispatch_delay_ms: 10,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_queue_config_from_empty_json() {
    let config = QueueConfig::from_json_str("{}").unwrap();
    assert_eq!(config, QueueConfig::default());
}

#[test]
fn test_queue_config_from_json() {
    let json = r#"{
        "idle": {
            "frame_budget_ms": 16,
            "dispatch_delay_ms": 2
        }
    }"#;

    let config = QueueConfig::from_json_str(json).unwrap();
    assert_eq!(config.idle.frame_budget_ms, 16);
    assert_eq!(config.idle.dispatch_delay_ms, 2);
}

#[test]
fn test_queue_config_rejects_invalid_values() {
    let err = QueueConfig::from_json_str(r#"{ "idle": { "frame_budget_ms": 0 } }"#).unwrap_err();
    assert!(err.starts_with("idle config invalid"));
}

#[test]
fn test_queue_config_rejects_malformed_json() {
    let err = QueueConfig::from_json_str(r#"{ "idle": { "frame_budget_ms": "fast" } }"#).unwrap_err();
    assert!(err.starts_with("parse error"));
}
