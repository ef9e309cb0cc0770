//! Idle-time task queue.
//!
//! [`IdleTaskQueue`] holds registered tasks in insertion order and drives them
//! through idle slices:
//!
//! - `run` splits the tracked tasks into a deadline partition and a
//!   no-deadline partition, preserving order within each.
//! - Deadline tasks are dispatched first, each through its own [`Task::run`].
//! - No-deadline tasks are handed to a self-continuing drain loop that fires
//!   them FIFO while the slice has budget (or the slice timed out), and asks
//!   for another slice for whatever is left.
//!
//! The queue is a cheap `Clone` handle so continuations can capture it. The
//! tracked sequence is never locked while work runs, so work functions may
//! call back into the queue.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::core::idle::{IdleDeadline, IdleRequestOptions, IdleScheduler};
use crate::core::task::{Task, TaskFn, TaskId, TaskOptions};
use crate::core::SchedulerError;

struct QueueState {
    next_id: AtomicU64,
    tasks: Mutex<Vec<Arc<Task>>>,
    idle: Arc<dyn IdleScheduler>,
}

/// Ordered collection of tasks drained through idle slices.
#[derive(Clone)]
pub struct IdleTaskQueue {
    state: Arc<QueueState>,
}

impl IdleTaskQueue {
    /// Create an empty queue that requests slices from `idle`.
    pub fn new(idle: Arc<dyn IdleScheduler>) -> Self {
        Self {
            state: Arc::new(QueueState {
                next_id: AtomicU64::new(0),
                tasks: Mutex::new(Vec::new()),
                idle,
            }),
        }
    }

    /// Register `work` and return its id.
    ///
    /// Immediate tasks request one idle slice right away. Immediate run-once
    /// tasks are not tracked afterwards; every other combination is.
    pub fn add(&self, work: TaskFn, options: TaskOptions) -> TaskId {
        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed);
        let task = Arc::new(Task::new(work, id, options, Arc::clone(&self.state.idle)));

        if task.is_immediate() {
            task.run_deferred();
        }
        if !(task.is_immediate() && task.is_run_once()) {
            self.state.tasks.lock().push(task);
        }
        tracing::debug!("task {} added", id);
        id
    }

    /// Register `work` with options given as JSON.
    pub fn add_json(&self, work: TaskFn, options: &serde_json::Value) -> Result<TaskId, SchedulerError> {
        let options = TaskOptions::from_json_value(options)?;
        Ok(self.add(work, options))
    }

    /// Remove every tracked task registered with `work`. Returns how many were removed.
    pub fn remove(&self, work: &TaskFn) -> usize {
        let mut tasks = self.state.tasks.lock();
        let before = tasks.len();
        tasks.retain(|task| !task.matches_fn(work));
        let removed = before - tasks.len();
        drop(tasks);
        if removed > 0 {
            tracing::debug!("removed {} task(s) by function", removed);
        }
        removed
    }

    /// Remove the first tracked task with `id`. Returns whether one was found.
    pub fn remove_by_id(&self, id: TaskId) -> bool {
        let mut tasks = self.state.tasks.lock();
        let Some(index) = tasks.iter().position(|task| task.id() == id) else {
            return false;
        };
        tasks.remove(index);
        drop(tasks);
        tracing::debug!("task {} removed", id);
        true
    }

    /// Discard all tracked tasks without firing them.
    pub fn clear(&self) {
        let discarded = std::mem::take(&mut *self.state.tasks.lock());
        tracing::debug!("cleared {} task(s)", discarded.len());
    }

    /// Number of tracked tasks.
    pub fn len(&self) -> usize {
        self.state.tasks.lock().len()
    }

    /// Whether no tasks are tracked.
    pub fn is_empty(&self) -> bool {
        self.state.tasks.lock().is_empty()
    }

    /// Whether a task with `id` is tracked.
    pub fn contains(&self, id: TaskId) -> bool {
        self.state.tasks.lock().iter().any(|task| task.id() == id)
    }

    /// Ids of tracked tasks in order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.state.tasks.lock().iter().map(|task| task.id()).collect()
    }

    /// Tracked tasks in order.
    pub fn snapshot(&self) -> Vec<Arc<Task>> {
        self.state.tasks.lock().clone()
    }

    /// Dispatch every tracked task.
    ///
    /// Deadline tasks go first, each through [`Task::run`], which hands them to
    /// the idle scheduler with their deadline as the timeout hint. Tasks
    /// without a deadline are then drained FIFO across as many idle slices as
    /// they need.
    pub fn run(&self) {
        let (no_deadline, with_deadline) = self.partition();
        tracing::debug!(
            "run: {} deadline task(s), {} idle task(s)",
            with_deadline.len(),
            no_deadline.len()
        );

        for task in &with_deadline {
            self.run_task(task);
        }
        if !no_deadline.is_empty() {
            self.request_drain(no_deadline);
        }
    }

    /// Fire every tracked task once, synchronously and in order, then forget them.
    pub fn flush(&self) {
        let tasks = std::mem::take(&mut *self.state.tasks.lock());
        for task in &tasks {
            task.set_run_once(true);
        }
        tracing::debug!("flushing {} task(s)", tasks.len());
        for task in &tasks {
            task.force_run_once();
        }
    }

    fn partition(&self) -> (VecDeque<Arc<Task>>, Vec<Arc<Task>>) {
        let tasks = self.state.tasks.lock();
        let (with_deadline, no_deadline): (Vec<_>, Vec<_>) =
            tasks.iter().cloned().partition(|task| task.has_deadline());
        (no_deadline.into(), with_deadline)
    }

    fn run_task(&self, task: &Arc<Task>) {
        task.run();
        if task.is_run_once() {
            let mut tasks = self.state.tasks.lock();
            if let Some(index) = tasks.iter().position(|t| Arc::ptr_eq(t, task)) {
                tasks.remove(index);
            }
        }
    }

    fn request_drain(&self, pending: VecDeque<Arc<Task>>) {
        let queue = self.clone();
        tracing::trace!("requesting idle slice for {} task(s)", pending.len());
        self.state.idle.request_idle(
            Box::new(move |deadline: &dyn IdleDeadline| queue.drain_slice(pending, deadline)),
            IdleRequestOptions::default(),
        );
    }

    fn drain_slice(&self, mut pending: VecDeque<Arc<Task>>, deadline: &dyn IdleDeadline) {
        // A timed-out slice drains everything regardless of budget.
        while deadline.time_remaining() > Duration::ZERO || deadline.did_timeout() {
            let Some(task) = pending.pop_front() else {
                break;
            };
            self.run_task(&task);
        }

        if !pending.is_empty() {
            tracing::debug!("idle slice exhausted, {} task(s) carried over", pending.len());
            self.request_drain(pending);
        }
    }
}

impl fmt::Debug for IdleTaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleTaskQueue")
            .field("tasks", &self.ids())
            .field("next_id", &self.state.next_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
