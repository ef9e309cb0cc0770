//! Idle-notification contract consumed by tasks and queues.
//!
//! An [`IdleScheduler`] is the host-provided primitive that hands out idle
//! slices: it takes a callback, and later invokes it with an [`IdleDeadline`]
//! describing how much of the slice is left and whether the request already
//! overran its timeout hint. The core never reaches for a process-wide default;
//! every queue and task is given its scheduler explicitly.
//!
//! Two adapters ship with the crate under [`crate::runtime`]: a tokio-backed
//! timer shim and a manually dispatched scheduler for hosts with their own
//! event loop (and for tests).

use std::fmt;
use std::time::{Duration, Instant};

/// Budget descriptor handed to an idle-slice callback.
pub trait IdleDeadline {
    /// Time left in the current slice. Zero once the budget is spent.
    fn time_remaining(&self) -> Duration;
    /// Whether this invocation happened because the request's timeout elapsed.
    fn did_timeout(&self) -> bool;
}

/// Callback invoked once when an idle slice is granted.
pub type IdleCallback = Box<dyn FnOnce(&dyn IdleDeadline) + Send + 'static>;

/// Options accompanying an idle-slice request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleRequestOptions {
    /// Upper bound the host should honor before invoking the callback anyway.
    pub timeout: Option<Duration>,
}

impl IdleRequestOptions {
    /// Request options carrying a timeout hint in milliseconds; zero means no hint.
    pub const fn with_timeout_ms(timeout_ms: u64) -> Self {
        if timeout_ms == 0 {
            Self { timeout: None }
        } else {
            Self {
                timeout: Some(Duration::from_millis(timeout_ms)),
            }
        }
    }
}

/// Opaque handle identifying one idle-slice request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdleHandle(pub u64);

/// Host primitive that grants idle slices.
pub trait IdleScheduler: Send + Sync {
    /// Schedule `callback` to run during a later idle slice.
    fn request_idle(&self, callback: IdleCallback, options: IdleRequestOptions) -> IdleHandle;

    /// Cancel a pending request. Unknown or already-dispatched handles are ignored.
    fn cancel_idle(&self, handle: IdleHandle);
}

/// Deadline measured against a fixed budget from a starting instant.
#[derive(Debug, Clone, Copy)]
pub struct SliceDeadline {
    started: Instant,
    budget: Duration,
    did_timeout: bool,
}

impl SliceDeadline {
    /// Create a deadline whose budget started counting at `started`.
    pub const fn new(started: Instant, budget: Duration, did_timeout: bool) -> Self {
        Self {
            started,
            budget,
            did_timeout,
        }
    }

    /// Create a deadline whose budget starts counting now.
    pub fn starting_now(budget: Duration) -> Self {
        Self::new(Instant::now(), budget, false)
    }
}

impl IdleDeadline for SliceDeadline {
    fn time_remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }

    fn did_timeout(&self) -> bool {
        self.did_timeout
    }
}

/// Deadline reporting a constant remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDeadline {
    /// Reported remaining time.
    pub remaining: Duration,
    /// Reported timeout flag.
    pub did_timeout: bool,
}

impl FixedDeadline {
    /// A slice that never runs out of budget.
    pub const fn unbounded() -> Self {
        Self {
            remaining: Duration::MAX,
            did_timeout: false,
        }
    }

    /// A slice with no budget left.
    pub const fn exhausted() -> Self {
        Self {
            remaining: Duration::ZERO,
            did_timeout: false,
        }
    }

    /// A slice with no budget that was granted because its timeout elapsed.
    pub const fn timed_out() -> Self {
        Self {
            remaining: Duration::ZERO,
            did_timeout: true,
        }
    }
}

impl IdleDeadline for FixedDeadline {
    fn time_remaining(&self) -> Duration {
        self.remaining
    }

    fn did_timeout(&self) -> bool {
        self.did_timeout
    }
}

/// Adapts a plain function into an [`IdleScheduler`].
///
/// Cancellation is not supported by function adapters and is ignored.
pub struct FnIdleScheduler<F> {
    request: F,
}

impl<F> FnIdleScheduler<F>
where
    F: Fn(IdleCallback, IdleRequestOptions) -> IdleHandle + Send + Sync,
{
    /// Wrap `request` as an idle scheduler.
    pub fn new(request: F) -> Self {
        Self { request }
    }
}

impl<F> IdleScheduler for FnIdleScheduler<F>
where
    F: Fn(IdleCallback, IdleRequestOptions) -> IdleHandle + Send + Sync,
{
    fn request_idle(&self, callback: IdleCallback, options: IdleRequestOptions) -> IdleHandle {
        (self.request)(callback, options)
    }

    fn cancel_idle(&self, _handle: IdleHandle) {}
}

impl<F> fmt::Debug for FnIdleScheduler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnIdleScheduler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_timeout_hint_zero_means_none() {
        assert_eq!(IdleRequestOptions::with_timeout_ms(0).timeout, None);
        assert_eq!(
            IdleRequestOptions::with_timeout_ms(250).timeout,
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_slice_deadline_saturates() {
        let started = Instant::now().checked_sub(Duration::from_millis(20)).unwrap();
        let deadline = SliceDeadline::new(started, Duration::from_millis(5), false);
        assert_eq!(deadline.time_remaining(), Duration::ZERO);
        assert!(!deadline.did_timeout());
    }

    #[test]
    fn test_slice_deadline_reports_budget() {
        let deadline = SliceDeadline::starting_now(Duration::from_secs(60));
        assert!(deadline.time_remaining() > Duration::from_secs(59));
    }

    #[test]
    fn test_fixed_deadlines() {
        assert_eq!(FixedDeadline::exhausted().time_remaining(), Duration::ZERO);
        assert!(FixedDeadline::timed_out().did_timeout());
        assert!(FixedDeadline::unbounded().time_remaining() > Duration::ZERO);
    }

    #[test]
    fn test_fn_scheduler_invokes_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let scheduler = FnIdleScheduler::new(move |cb: IdleCallback, _opts: IdleRequestOptions| {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            cb(&FixedDeadline::unbounded());
            IdleHandle(n as u64)
        });

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        let handle = scheduler.request_idle(
            Box::new(move |_: &dyn IdleDeadline| {
                fired_clone.fetch_add(1, Ordering::SeqCst);
            }),
            IdleRequestOptions::default(),
        );

        assert_eq!(handle, IdleHandle(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        scheduler.cancel_idle(handle);
    }
}
