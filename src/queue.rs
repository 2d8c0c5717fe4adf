//! Request queue.
//!
//! Holds submitted requests in FIFO order until they are admitted, and tracks
//! admitted requests until they complete. The queue also owns the gateway's
//! run state (paused flag and concurrency limit) so that the admission check
//! and the pop happen in one critical section.
//!
//! Callbacks are always invoked after the lock is released.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error_handling::GatewayError;
use crate::gateway::{RequestCallback, RequestResult};
use crate::request::{IssuedRequest, RequestKey};

struct QueueEntry {
    request: IssuedRequest,
    callback: RequestCallback,
}

struct QueueState {
    pending: VecDeque<QueueEntry>,
    // Identical requests may be active at once; each callback is tagged with
    // the sequence number of the handle it was admitted under.
    active: HashMap<RequestKey, VecDeque<(u64, RequestCallback)>>,
    active_count: usize,
    paused: bool,
    max_active: usize,
}

impl QueueState {
    fn activate(&mut self) -> Option<IssuedRequest> {
        let entry = self.pending.pop_front()?;
        self.active
            .entry(entry.request.key())
            .or_default()
            .push_back((entry.request.sequence(), entry.callback));
        self.active_count += 1;
        Some(entry.request)
    }
}

/// FIFO of pending requests plus the set of active ones.
pub struct RequestQueue {
    state: Mutex<QueueState>,
}

impl RequestQueue {
    /// Creates an empty, paused queue.
    pub fn new(max_active: usize) -> Self {
        RequestQueue {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                active: HashMap::new(),
                active_count: 0,
                paused: true,
                max_active,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a request at the tail of the pending list.
    pub fn append(&self, request: IssuedRequest, callback: RequestCallback) {
        self.state()
            .pending
            .push_back(QueueEntry { request, callback });
    }

    /// Moves the head of the pending list into the active set, ignoring the
    /// run state and the concurrency limit.
    pub fn next(&self) -> Option<IssuedRequest> {
        self.state().activate()
    }

    /// Like [`next`](Self::next), but only when the queue is running and
    /// below its concurrency limit.
    pub fn next_admitted(&self) -> Option<IssuedRequest> {
        let mut state = self.state();
        if state.paused || state.active_count >= state.max_active {
            return None;
        }
        state.activate()
    }

    /// Removes the first pending request with the same identity as `request`.
    ///
    /// The removed entry's callback receives [`GatewayError::Cancelled`].
    /// Returns `false` when no pending entry matches, including when the
    /// request is already active.
    pub fn cancel(&self, request: &IssuedRequest) -> bool {
        let key = request.key();
        let entry = {
            let mut state = self.state();
            let Some(index) = state.pending.iter().position(|e| e.request.key() == key) else {
                return false;
            };
            state.pending.remove(index)
        };

        match entry {
            Some(QueueEntry { request, callback }) => {
                callback(RequestResult {
                    request,
                    response: None,
                    error: Some(GatewayError::Cancelled),
                });
                true
            }
            None => false,
        }
    }

    /// Completes an active request, handing `result` to its callback.
    ///
    /// The callback admitted under the same handle is preferred; a handle
    /// that matches only by identity completes the oldest active entry.
    /// Returns `false` without side effects when the request is not active.
    pub fn fulfill(&self, request: &IssuedRequest, result: RequestResult) -> bool {
        let key = request.key();
        let callback = {
            let mut state = self.state();
            let Some(callbacks) = state.active.get_mut(&key) else {
                return false;
            };
            let position = callbacks
                .iter()
                .position(|(sequence, _)| *sequence == request.sequence())
                .unwrap_or(0);
            let callback = callbacks.remove(position).map(|(_, callback)| callback);
            if callbacks.is_empty() {
                state.active.remove(&key);
            }
            if callback.is_some() {
                state.active_count -= 1;
            }
            callback
        };

        match callback {
            Some(callback) => {
                callback(result);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the pending requests in FIFO order.
    pub fn pending_requests(&self) -> Vec<IssuedRequest> {
        self.state()
            .pending
            .iter()
            .map(|entry| entry.request.clone())
            .collect()
    }

    pub fn number_pending(&self) -> usize {
        self.state().pending.len()
    }

    pub fn number_active(&self) -> usize {
        self.state().active_count
    }

    pub fn pause(&self) {
        self.state().paused = true;
    }

    /// Returns whether the queue was paused before the call.
    pub fn resume(&self) -> bool {
        let mut state = self.state();
        std::mem::replace(&mut state.paused, false)
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    pub fn max_active(&self) -> usize {
        self.state().max_active
    }

    pub fn set_max_active(&self, max_active: usize) {
        self.state().max_active = max_active;
    }
}
