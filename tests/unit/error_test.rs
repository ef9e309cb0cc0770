//! Tests for error types

use idle_task_queue::core::SchedulerError;

#[test]
fn test_invalid_argument_error() {
    let err = SchedulerError::InvalidArgument("options argument must be an object.".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid argument: options argument must be an object."
    );
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("frame_budget_ms must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: frame_budget_ms must be greater than 0"
    );
}
