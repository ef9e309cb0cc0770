//! Tests for queue builders

use idle_task_queue::builders::{build_idle_scheduler, build_queue};
use idle_task_queue::config::{IdleConfig, QueueConfig};
use idle_task_queue::core::SchedulerError;

#[tokio::test]
async fn test_build_queue_valid_config() {
    let queue = build_queue(&QueueConfig::default(), tokio::runtime::Handle::current()).unwrap();
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_build_rejects_invalid_config() {
    let cfg = QueueConfig {
        idle: IdleConfig {
            frame_budget_ms: 0,
            dispatch_delay_ms: 1,
        },
    };
    let err = build_idle_scheduler(&cfg, tokio::runtime::Handle::current()).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
    assert!(build_queue(&cfg, tokio::runtime::Handle::current()).is_err());
}
