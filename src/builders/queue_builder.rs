//! Builders to construct idle task queues from configuration.

use std::sync::Arc;

use crate::config::QueueConfig;
use crate::core::{IdleTaskQueue, SchedulerError};
use crate::runtime::TimerIdleScheduler;

/// Build a timer-driven idle scheduler on `handle` from validated configuration.
pub fn build_idle_scheduler(
    cfg: &QueueConfig,
    handle: tokio::runtime::Handle,
) -> Result<TimerIdleScheduler, SchedulerError> {
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;
    Ok(TimerIdleScheduler::with_config(handle, &cfg.idle))
}

/// Build a queue whose idle slices come from a timer scheduler on `handle`.
pub fn build_queue(
    cfg: &QueueConfig,
    handle: tokio::runtime::Handle,
) -> Result<IdleTaskQueue, SchedulerError> {
    let idle = build_idle_scheduler(cfg, handle)?;
    tracing::debug!(
        "building idle task queue (frame_budget_ms={}, dispatch_delay_ms={})",
        cfg.idle.frame_budget_ms,
        cfg.idle.dispatch_delay_ms
    );
    Ok(IdleTaskQueue::new(Arc::new(idle)))
}
