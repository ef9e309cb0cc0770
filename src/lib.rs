//! # Idle Task Queue
//!
//! A cooperative task scheduler that defers low-priority work to the idle
//! periods of a host event loop, while making sure work with a deadline still
//! gets dispatched under load.
//!
//! ## Model
//!
//! - **Task**: one unit of work plus its policy: run-once or repeatable,
//!   immediate or deferred until `run`, and an optional deadline in
//!   milliseconds.
//! - **IdleTaskQueue**: an ordered collection of tasks. `run` dispatches
//!   deadline tasks first, then drains the rest FIFO through as many idle
//!   slices as they need, carrying leftovers to the next slice.
//! - **IdleScheduler**: the host primitive that grants idle slices. It is
//!   injected explicitly; the crate ships a tokio timer shim and a manually
//!   dispatched scheduler for hosts that own their event loop.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use idle_task_queue::core::{task_fn, IdleTaskQueue, SliceDeadline, TaskOptions};
//! use idle_task_queue::runtime::ManualIdleScheduler;
//!
//! let idle = Arc::new(ManualIdleScheduler::new());
//! let queue = IdleTaskQueue::new(idle.clone());
//!
//! queue.add(task_fn(|_| println!("tidy up caches")), TaskOptions::new().with_immediate(false));
//! queue.add(task_fn(|_| println!("flush metrics")), TaskOptions::new().with_deadline_ms(100));
//!
//! queue.run();
//!
//! // The host decides when it is idle and how long the slice lasts.
//! idle.dispatch_pending(&SliceDeadline::starting_now(Duration::from_millis(16)));
//! assert!(queue.is_empty());
//! ```
//!
//! With tokio available, [`builders::build_queue`] wires a queue to
//! [`runtime::TimerIdleScheduler`] from a [`config::QueueConfig`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: tasks, the idle contract, and the queue.
pub mod core;
/// Configuration models for idle timing and task options.
pub mod config;
/// Builders to construct queues from configuration.
#[cfg(feature = "tokio-runtime")]
pub mod builders;
/// Idle scheduler adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{IdleTaskQueue, SchedulerError, Task, TaskOptions};
