// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewfinder Pan/Zoom: a smoothed, hierarchical viewport transform engine.
//!
//! [`PanZoomControl`] owns the scale and offset of a 2D viewport twice over:
//! the raw *target* state that input events mutate, and an exponentially
//! smoothed copy that trails it and is what rendering code should read. Once
//! per visual frame (driven by a [`viewfinder_frame::FrameScheduler`]) the
//! smoothed state advances toward the target, zoom stays anchored at the
//! recorded zoom center, and position clamping keeps the viewport inside its
//! configured pan bounds.
//!
//! Input events route through an ordered chain of [`ControlHandler`]s: the
//! most recently added handler is topmost and sees events first, a handler
//! holding *capture* sees all events exclusively, and parent controls route
//! into nested child controls by coordinate-mapped hit testing before
//! consulting their own handlers.
//!
//! ## Coordinates
//!
//! Events enter in element-local pixels. Internally the control works in
//! normalized viewport space: x grows rightward in `0..1`, **y grows upward**
//! (`1 − y_px/height`). Handlers receive world coordinates,
//! `offset + normalized/scale`.
//!
//! ## Driving the smoothing loop
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use viewfinder_frame::FrameScheduler;
//! use viewfinder_panzoom::{PanZoomControl, PanZoomOptions};
//!
//! let sched = FrameScheduler::new();
//! let control = Rc::new(RefCell::new(PanZoomControl::new(PanZoomOptions::default())));
//! PanZoomControl::attach(&control, &sched);
//!
//! // The embedder's frame loop:
//! assert!(sched.take_frame_request());
//! sched.run_frame(16.7);
//! // The control re-registered itself for the next frame.
//! assert!(sched.take_frame_request());
//! ```
//!
//! Calling [`PanZoomControl::dispose`] stops the re-registration chain and
//! drops all handlers, capture, focus, and children. Detaching the native
//! event listeners that feed the control is the embedder's job.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("viewfinder_panzoom requires either the `std` or `libm` feature");

extern crate alloc;

#[cfg(test)]
extern crate std;

mod control;
mod gesture;
mod handler;
mod options;

pub use control::{ChildFrame, ControlRef, PanZoomControl};
pub use gesture::DragGesture;
pub use handler::{ControlHandler, EventCtx, HandlerRef, HandlerState};
pub use options::PanZoomOptions;

/// `x.powf(y)` that works in both std and `no_std` + `libm` builds.
#[inline]
pub(crate) fn powf(x: f64, y: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        x.powf(y)
    }
    #[cfg(all(not(feature = "std"), feature = "libm"))]
    {
        libm::pow(x, y)
    }
}
