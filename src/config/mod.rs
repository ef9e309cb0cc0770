//! Configuration models for queues, idle timing, and task options.

pub mod options;
pub mod queue;

pub use queue::{IdleConfig, QueueConfig};
