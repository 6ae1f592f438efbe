// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewfinder Events: shared input event data for the Viewfinder crates.
//!
//! This crate defines plain-data renderings of the native pointer, touch,
//! wheel, and keyboard event families. The Viewfinder core is headless: it
//! never talks to a DOM or a window system. Instead, the embedder translates
//! whatever events its platform delivers into these types and feeds them to
//! [`viewfinder_pointer`] and [`viewfinder_panzoom`].
//!
//! Coordinates in [`PointerEvent`] and [`TouchPoint`] are page-space pixels.
//! [`WheelEvent`] positions are element-local pixels; its deltas carry the
//! platform's `deltaMode` so consumers can normalize line- and page-scrolls
//! into pixel units via [`WheelEvent::normalized_delta`].
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use viewfinder_events::{WheelDeltaMode, WheelEvent};
//!
//! let evt = WheelEvent {
//!     delta: Vec2::new(0.0, 3.0),
//!     mode: WheelDeltaMode::Line,
//!     position: Point::new(100.0, 50.0),
//!     ..WheelEvent::default()
//! };
//! // Line-mode deltas are 16 pixels per line.
//! assert_eq!(evt.normalized_delta().y, 48.0);
//! ```
//!
//! [`viewfinder_pointer`]: https://docs.rs/viewfinder_pointer
//! [`viewfinder_panzoom`]: https://docs.rs/viewfinder_panzoom
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod keyboard;
mod pointer;
mod wheel;

pub use keyboard::KeyEvent;
pub use pointer::{PointerButton, PointerEvent, PointerKind, TouchPoint};
pub use wheel::{WheelDeltaMode, WheelEvent};

bitflags::bitflags! {
    /// Keyboard modifier keys held during an input event.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Control key.
        const CTRL = 1 << 1;
        /// Alt/Option key.
        const ALT = 1 << 2;
        /// Meta/Command/Windows key.
        const META = 1 << 3;
    }
}
