//! Core scheduling abstractions: tasks, the idle contract, and the queue.

pub mod error;
pub mod idle;
pub mod task;
pub mod task_queue;

pub use error::SchedulerError;
pub use idle::{
    FixedDeadline, FnIdleScheduler, IdleCallback, IdleDeadline, IdleHandle, IdleRequestOptions,
    IdleScheduler, SliceDeadline,
};
pub use task::{task_fn, Invocation, Payload, Task, TaskFn, TaskId, TaskOptions};
pub use task_queue::IdleTaskQueue;
