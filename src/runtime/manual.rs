//! Host-driven idle scheduler.
//!
//! `ManualIdleScheduler` never dispatches on its own. The host event loop (or
//! a test) decides when an idle period begins and what budget it carries, and
//! calls [`ManualIdleScheduler::dispatch_next`] or
//! [`ManualIdleScheduler::dispatch_pending`] with a matching deadline.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

use crate::core::idle::{IdleCallback, IdleDeadline, IdleHandle, IdleRequestOptions, IdleScheduler};

struct PendingSlice {
    handle: IdleHandle,
    callback: IdleCallback,
}

#[derive(Default)]
struct ManualState {
    next_handle: u64,
    pending: VecDeque<PendingSlice>,
    requests: Vec<IdleRequestOptions>,
}

/// Idle scheduler dispatched explicitly by its owner, in request order.
#[derive(Default)]
pub struct ManualIdleScheduler {
    state: Mutex<ManualState>,
}

impl ManualIdleScheduler {
    /// Create a scheduler with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests waiting for a slice.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Options of every request received so far, in order.
    pub fn requests(&self) -> Vec<IdleRequestOptions> {
        self.state.lock().requests.clone()
    }

    /// Grant one slice to the oldest pending request. Returns false if none was pending.
    pub fn dispatch_next(&self, deadline: &dyn IdleDeadline) -> bool {
        // Released before the callback runs; callbacks usually request again.
        let next = self.state.lock().pending.pop_front();
        match next {
            Some(slice) => {
                tracing::trace!("dispatching idle slice {:?}", slice.handle);
                (slice.callback)(deadline);
                true
            }
            None => false,
        }
    }

    /// Grant a slice to every request pending right now. Requests made by the
    /// dispatched callbacks wait for the next call. Returns how many ran.
    pub fn dispatch_pending(&self, deadline: &dyn IdleDeadline) -> usize {
        let rounds = self.pending_len();
        let mut dispatched = 0;
        for _ in 0..rounds {
            if !self.dispatch_next(deadline) {
                break;
            }
            dispatched += 1;
        }
        dispatched
    }
}

impl IdleScheduler for ManualIdleScheduler {
    fn request_idle(&self, callback: IdleCallback, options: IdleRequestOptions) -> IdleHandle {
        let mut state = self.state.lock();
        let handle = IdleHandle(state.next_handle);
        state.next_handle += 1;
        state.requests.push(options);
        state.pending.push_back(PendingSlice { handle, callback });
        handle
    }

    fn cancel_idle(&self, handle: IdleHandle) {
        self.state.lock().pending.retain(|slice| slice.handle != handle);
    }
}

impl fmt::Debug for ManualIdleScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualIdleScheduler")
            .field("pending", &state.pending.len())
            .field("requests", &state.requests.len())
            .finish()
    }
}
