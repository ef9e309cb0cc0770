//! Task abstraction: one unit of work plus its execution policy.
//!
//! A [`Task`] decides *how* it is invoked: synchronously, or through one idle
//! slice requested from its [`IdleScheduler`]. Run-once tasks drop their work
//! reference on first firing, so any further `fire` is a no-op even if the
//! owning queue has not yet removed them.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::idle::{IdleDeadline, IdleHandle, IdleRequestOptions, IdleScheduler};

/// Task identifier, unique within the owning queue.
pub type TaskId = u64;

/// Opaque value handed to work functions.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Unit of work. Identity is the `Arc` allocation, so keep a clone around to
/// remove a registration later.
pub type TaskFn = Arc<dyn Fn(&Invocation) + Send + Sync>;

/// Wrap a closure as a [`TaskFn`].
pub fn task_fn<F>(work: F) -> TaskFn
where
    F: Fn(&Invocation) + Send + Sync + 'static,
{
    Arc::new(work)
}

/// Values supplied to a work function when it fires.
#[derive(Clone, Default)]
pub struct Invocation {
    context: Option<Payload>,
    receiver: Option<Payload>,
}

impl Invocation {
    /// Argument value, if one was registered.
    pub const fn context(&self) -> Option<&Payload> {
        self.context.as_ref()
    }

    /// Receiver value, if one was registered.
    pub const fn receiver(&self) -> Option<&Payload> {
        self.receiver.as_ref()
    }

    /// Argument value downcast to `T`.
    pub fn context_as<T: Any>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|c| c.downcast_ref::<T>())
    }

    /// Receiver value downcast to `T`.
    pub fn receiver_as<T: Any>(&self) -> Option<&T> {
        self.receiver.as_deref().and_then(|r| r.downcast_ref::<T>())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("has_context", &self.context.is_some())
            .field("has_receiver", &self.receiver.is_some())
            .finish()
    }
}

/// Execution policy for a task.
#[derive(Clone)]
pub struct TaskOptions {
    /// Argument passed to the work function.
    pub context: Option<Payload>,
    /// Receiver the work function is invoked on.
    pub receiver: Option<Payload>,
    /// Deadline hint in milliseconds; zero means none.
    pub deadline_ms: u64,
    /// Execute at most once.
    pub run_once: bool,
    /// Request execution at registration time.
    pub immediate: bool,
    /// Idle scheduler used instead of the owner's.
    pub idle_override: Option<Arc<dyn IdleScheduler>>,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            context: None,
            receiver: None,
            deadline_ms: 0,
            run_once: true,
            immediate: true,
            idle_override: None,
        }
    }
}

impl TaskOptions {
    /// Default options: run once, immediate, no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the argument value.
    #[must_use]
    pub fn with_context<T: Any + Send + Sync>(mut self, context: T) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    /// Set the receiver value.
    #[must_use]
    pub fn with_receiver<T: Any + Send + Sync>(mut self, receiver: T) -> Self {
        self.receiver = Some(Arc::new(receiver));
        self
    }

    /// Set the deadline hint in milliseconds.
    #[must_use]
    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = deadline_ms;
        self
    }

    /// Set the run-once policy.
    #[must_use]
    pub fn with_run_once(mut self, run_once: bool) -> Self {
        self.run_once = run_once;
        self
    }

    /// Set the immediate policy.
    #[must_use]
    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Use `idle` instead of the owner's scheduler.
    #[must_use]
    pub fn with_idle_override(mut self, idle: Arc<dyn IdleScheduler>) -> Self {
        self.idle_override = Some(idle);
        self
    }
}

impl fmt::Debug for TaskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskOptions")
            .field("has_context", &self.context.is_some())
            .field("has_receiver", &self.receiver.is_some())
            .field("deadline_ms", &self.deadline_ms)
            .field("run_once", &self.run_once)
            .field("immediate", &self.immediate)
            .field("has_idle_override", &self.idle_override.is_some())
            .finish()
    }
}

/// A unit of work with its execution policy.
pub struct Task {
    id: TaskId,
    work: Mutex<Option<TaskFn>>,
    invocation: Invocation,
    run_once: AtomicBool,
    immediate: bool,
    deadline_ms: u64,
    idle: Arc<dyn IdleScheduler>,
}

impl Task {
    /// Create a task. `idle` is used unless `options` carries an override.
    pub fn new(
        work: TaskFn,
        id: TaskId,
        options: TaskOptions,
        idle: Arc<dyn IdleScheduler>,
    ) -> Self {
        let TaskOptions {
            context,
            receiver,
            deadline_ms,
            run_once,
            immediate,
            idle_override,
        } = options;
        Self {
            id,
            work: Mutex::new(Some(work)),
            invocation: Invocation { context, receiver },
            run_once: AtomicBool::new(run_once),
            immediate,
            deadline_ms,
            idle: idle_override.unwrap_or(idle),
        }
    }

    /// Task identifier.
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Deadline hint in milliseconds; zero means none.
    pub const fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    /// Whether the task carries a deadline.
    pub const fn has_deadline(&self) -> bool {
        self.deadline_ms > 0
    }

    /// Whether the task executes at most once.
    pub fn is_run_once(&self) -> bool {
        self.run_once.load(Ordering::Acquire)
    }

    /// Change the run-once policy.
    pub fn set_run_once(&self, run_once: bool) {
        self.run_once.store(run_once, Ordering::Release);
    }

    /// Whether execution is requested at registration time.
    pub const fn is_immediate(&self) -> bool {
        self.immediate
    }

    /// Whether the work reference has been dropped after a run-once firing.
    pub fn is_retired(&self) -> bool {
        self.work.lock().is_none()
    }

    /// Whether `work` is the same allocation as this task's work function.
    pub fn matches_fn(&self, work: &TaskFn) -> bool {
        self.work
            .lock()
            .as_ref()
            .is_some_and(|own| same_fn(own, work))
    }

    /// Invoke the work function synchronously. Retired tasks do nothing.
    pub fn fire(&self) {
        let work = {
            let mut slot = self.work.lock();
            if self.is_run_once() {
                slot.take()
            } else {
                slot.clone()
            }
        };
        if let Some(work) = work {
            tracing::trace!("firing task {}", self.id);
            work(&self.invocation);
        }
    }

    /// Request one idle slice and fire when it arrives. The deadline is passed
    /// along as the slice's timeout hint.
    pub fn run_deferred(self: &Arc<Self>) -> IdleHandle {
        let task = Arc::clone(self);
        let options = IdleRequestOptions::with_timeout_ms(self.deadline_ms);
        tracing::trace!("task {} requesting idle slice ({:?})", self.id, options.timeout);
        self.idle
            .request_idle(Box::new(move |_deadline: &dyn IdleDeadline| task.fire()), options)
    }

    /// Defer through the idle scheduler when a deadline is set, fire now otherwise.
    pub fn run(self: &Arc<Self>) {
        if self.has_deadline() {
            self.run_deferred();
        } else {
            self.fire();
        }
    }

    /// Make the task run-once and fire it synchronously, bypassing idle deferral.
    pub fn force_run_once(&self) {
        self.set_run_once(true);
        self.fire();
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("deadline_ms", &self.deadline_ms)
            .field("run_once", &self.is_run_once())
            .field("immediate", &self.immediate)
            .field("retired", &self.is_retired())
            .finish_non_exhaustive()
    }
}

// Data pointers only; vtable addresses are not stable across codegen units.
fn same_fn(a: &TaskFn, b: &TaskFn) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}
