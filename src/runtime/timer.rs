//! Tokio-backed idle scheduler.
//!
//! Hosts without a native idle notification get an approximation: every
//! request is dispatched after a short delay with a fixed frame budget counted
//! from the moment of the request. Callbacks run inline on the runtime that
//! owns the handle; pass a current-thread runtime handle to keep all work on
//! one thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::AbortHandle;

use crate::config::IdleConfig;
use crate::core::idle::{IdleCallback, IdleHandle, IdleRequestOptions, IdleScheduler, SliceDeadline};

/// Timer-driven idle scheduler running on a tokio runtime.
#[derive(Clone)]
pub struct TimerIdleScheduler {
    handle: tokio::runtime::Handle,
    frame_budget: Duration,
    dispatch_delay: Duration,
    next_handle: Arc<AtomicU64>,
    pending: Arc<Mutex<HashMap<IdleHandle, AbortHandle>>>,
}

impl TimerIdleScheduler {
    /// Create a scheduler with the default 50 ms budget and 1 ms dispatch delay.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self::with_config(handle, &IdleConfig::default())
    }

    /// Create a scheduler using the timings in `config`.
    pub fn with_config(handle: tokio::runtime::Handle, config: &IdleConfig) -> Self {
        Self {
            handle,
            frame_budget: Duration::from_millis(config.frame_budget_ms),
            dispatch_delay: Duration::from_millis(config.dispatch_delay_ms),
            next_handle: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of requests not yet dispatched.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }
}

impl IdleScheduler for TimerIdleScheduler {
    fn request_idle(&self, callback: IdleCallback, options: IdleRequestOptions) -> IdleHandle {
        let id = IdleHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let requested_at = Instant::now();
        let budget = self.frame_budget;
        let delay = self.dispatch_delay;
        let pending = Arc::clone(&self.pending);

        // Held across spawn so the task cannot deregister before it is registered.
        let mut registry = self.pending.lock();
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            pending.lock().remove(&id);
            let did_timeout = options
                .timeout
                .is_some_and(|timeout| requested_at.elapsed() >= timeout);
            let deadline = SliceDeadline::new(requested_at, budget, did_timeout);
            tracing::trace!("idle slice {:?} dispatched (did_timeout={})", id, did_timeout);
            callback(&deadline);
        });
        registry.insert(id, join.abort_handle());
        drop(registry);

        tracing::trace!("idle slice {:?} requested ({:?})", id, options.timeout);
        id
    }

    fn cancel_idle(&self, handle: IdleHandle) {
        if let Some(abort) = self.pending.lock().remove(&handle) {
            abort.abort();
            tracing::trace!("idle slice {:?} cancelled", handle);
        }
    }
}

impl std::fmt::Debug for TimerIdleScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerIdleScheduler")
            .field("frame_budget", &self.frame_budget)
            .field("dispatch_delay", &self.dispatch_delay)
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}
