// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewfinder Pointer: normalize pointer and touch streams into contact state.
//!
//! Native input arrives as two overlapping event families (pointer events
//! and touch events) with different identifier spaces, coordinate fields,
//! and lifecycles. [`PointerTracker`] folds both into one per-contact record,
//! [`PointerData`], keyed by [`ContactId`] so a physical touch observed
//! through both families never collides with a mouse pointer.
//!
//! The tracker is headless. The embedder translates each native event into a
//! [`viewfinder_events`] value, calls the matching tracker transition, and
//! applies the returned [`EventResponse`]: whether to suppress the native
//! default action, and whether to capture or release the pointer on the
//! event target.
//!
//! ```rust
//! use kurbo::Point;
//! use viewfinder_events::PointerEvent;
//! use viewfinder_pointer::{ContactId, PointerTracker};
//!
//! let mut tracker = PointerTracker::default();
//! let down = PointerEvent {
//!     pointer_id: 7,
//!     position: Point::new(120.0, 40.0),
//!     ..PointerEvent::default()
//! };
//! let response = tracker.pointer_down(&down);
//! assert!(response.cancel);
//!
//! let data = tracker.data(ContactId::Pointer(7)).unwrap();
//! assert_eq!(data.down, 1);
//! assert_eq!(data.position, Point::new(120.0, 40.0));
//! ```
//!
//! ## Touch grace window
//!
//! A touch contact has no trailing hover: the finger lifts and is simply
//! gone. Consumers that treat a tap's trailing click as "still inside the
//! element" would otherwise see the contact as outside by the time the click
//! arrives. On touch end the tracker therefore keeps `inside`/`over` set and
//! arms a short grace deadline (200 ms by default); the embedder calls
//! [`PointerTracker::advance`] with the current time (typically once per
//! frame) to expire it.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod data;
mod tracker;

pub use data::{ButtonState, ContactId, PointerData};
pub use tracker::{CaptureRequest, EventResponse, PointerTracker, TrackerOptions};
