//! Builders to construct queues and idle schedulers from configuration.

pub mod queue_builder;

pub use queue_builder::{build_idle_scheduler, build_queue};
