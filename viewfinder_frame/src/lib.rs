// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewfinder Frame: batch per-frame callbacks behind a single native request.
//!
//! Interactive controls routinely want to run "on the next visual frame":
//! smoothing steps, deferred layout reads, one-shot repaints. Issuing one
//! platform `requestAnimationFrame` (or equivalent) per caller is wasteful
//! and makes delivery order depend on registration timing. [`FrameScheduler`]
//! instead coalesces every registration made within one synchronous turn
//! into a single batch backed by a single native request.
//!
//! The scheduler is host-agnostic: it never calls the platform itself.
//! After feeding it registrations, the embedder asks
//! [`FrameScheduler::take_frame_request`] whether a native request is needed,
//! and calls [`FrameScheduler::run_frame`] with the timestamp when that
//! native frame fires.
//!
//! ## Ordering
//!
//! Within one batch, callbacks registered with
//! [`schedule_first`](FrameScheduler::schedule_first) run before callbacks
//! registered with [`schedule`](FrameScheduler::schedule). A callback that
//! registers another callback while the batch is running never re-enters the
//! current batch; the new registration is deferred to the next frame. This
//! makes delivery deterministic and puts a hard bound on work per frame even
//! when callbacks chain indefinitely.
//!
//! ## Example
//!
//! ```rust
//! use viewfinder_frame::FrameScheduler;
//!
//! let sched = FrameScheduler::new();
//! sched.schedule(|_time| { /* repaint */ });
//! sched.schedule_first(|_time| { /* measure before repaint */ });
//!
//! // Exactly one native request regardless of how many callbacks queued.
//! assert!(sched.take_frame_request());
//! assert!(!sched.take_frame_request());
//!
//! // The embedder's native frame fired:
//! sched.run_frame(16.7);
//! assert!(sched.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;

/// A callback invoked with the native frame timestamp in milliseconds.
type FrameCallback = Box<dyn FnOnce(f64) + 'static>;

/// How many consecutive re-registering frames pass between chain warnings.
const CHAIN_WARN_INTERVAL: u32 = 128;

struct Inner {
    queue: SmallVec<[FrameCallback; 8]>,
    /// Whether a native frame request is conceptually outstanding.
    request_outstanding: bool,
    /// Whether the embedder has yet to be told about the outstanding request.
    request_untaken: bool,
    /// Consecutive frames that ended with new registrations pending.
    chain_count: u32,
}

/// Coalesces per-frame callback registrations into single-request batches.
///
/// `FrameScheduler` is a cheaply cloneable handle; clones share one queue, so
/// callbacks can carry a clone and re-register themselves from inside a
/// running batch (the registration lands in the *next* batch).
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<RefCell<Inner>>,
}

impl FrameScheduler {
    /// Creates an empty scheduler with no outstanding frame request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                queue: SmallVec::new(),
                request_outstanding: false,
                request_untaken: false,
                chain_count: 0,
            })),
        }
    }

    /// Registers `callback` to run at the end of the next batch.
    pub fn schedule(&self, callback: impl FnOnce(f64) + 'static) {
        let mut inner = self.inner.borrow_mut();
        inner.queue.push(Box::new(callback));
        inner.note_registration();
    }

    /// Registers `callback` to run at the front of the next batch.
    ///
    /// Later `schedule_first` registrations run before earlier ones, so the
    /// most recently registered run-first callback is the very first to run.
    pub fn schedule_first(&self, callback: impl FnOnce(f64) + 'static) {
        let mut inner = self.inner.borrow_mut();
        inner.queue.insert(0, Box::new(callback));
        inner.note_registration();
    }

    /// Returns `true` if the embedder should issue a native frame request.
    ///
    /// This latches: it returns `true` at most once per batch, no matter how
    /// many registrations arrived, upholding the one-native-request
    /// invariant. The embedder calls this after any turn that may have
    /// scheduled work.
    pub fn take_frame_request(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        core::mem::replace(&mut inner.request_untaken, false)
    }

    /// Runs the current batch. Call when the native frame fires.
    ///
    /// The queue is swapped out atomically before any callback runs, so
    /// registrations made by callbacks are deferred to the following frame.
    /// Each callback in the batch runs exactly once, run-first registrations
    /// before ordinary ones.
    pub fn run_frame(&self, time: f64) {
        let batch = {
            let mut inner = self.inner.borrow_mut();
            inner.request_outstanding = false;
            inner.request_untaken = false;
            core::mem::take(&mut inner.queue)
        };

        // The borrow is released here so callbacks may schedule freely.
        for callback in batch {
            callback(time);
        }

        let mut inner = self.inner.borrow_mut();
        if inner.queue.is_empty() {
            inner.chain_count = 0;
        } else {
            inner.chain_count = inner.chain_count.wrapping_add(1);
            if inner.chain_count % CHAIN_WARN_INTERVAL == 0 {
                log::warn!(
                    "animation frame chain has re-registered for {} consecutive frames",
                    inner.chain_count
                );
            }
        }
    }

    /// Number of callbacks waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Whether no callbacks are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}

impl Inner {
    fn note_registration(&mut self) {
        if !self.request_outstanding {
            self.request_outstanding = true;
            self.request_untaken = true;
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameScheduler")
            .field("pending", &inner.queue.len())
            .field("request_outstanding", &inner.request_outstanding)
            .field("chain_count", &inner.chain_count)
            .finish_non_exhaustive()
    }
}
