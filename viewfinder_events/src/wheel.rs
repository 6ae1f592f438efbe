// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use crate::Modifiers;

/// Pixels per line-mode wheel step.
const LINE_HEIGHT_PX: f64 = 16.0;
/// Pixels per page-mode wheel step.
const PAGE_HEIGHT_PX: f64 = 40.0;

/// The unit a wheel event's deltas are expressed in.
///
/// Mirrors the DOM `deltaMode`. Browsers disagree about which mode they
/// report for the same physical gesture, so consumers should only ever look
/// at [`WheelEvent::normalized_delta`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WheelDeltaMode {
    /// Deltas are pixels.
    #[default]
    Pixel,
    /// Deltas are lines.
    Line,
    /// Deltas are pages.
    Page,
}

/// A normalized wheel event.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelEvent {
    /// Raw deltas in the unit named by `mode`.
    pub delta: Vec2,
    /// Unit of `delta`.
    pub mode: WheelDeltaMode,
    /// Position within the receiving element, in pixels.
    pub position: Point,
    /// Modifier keys held when the event fired.
    pub modifiers: Modifiers,
    /// Event timestamp in milliseconds.
    pub time: f64,
}

impl Default for WheelEvent {
    fn default() -> Self {
        Self {
            delta: Vec2::ZERO,
            mode: WheelDeltaMode::default(),
            position: Point::ZERO,
            modifiers: Modifiers::empty(),
            time: 0.0,
        }
    }
}

impl WheelEvent {
    /// Returns the delta converted to pixel units.
    ///
    /// Line-mode deltas are multiplied by 16 and page-mode deltas by 40,
    /// flattening the device- and browser-dependent `deltaMode` into one
    /// scale that zoom speed options can be calibrated against.
    #[must_use]
    pub fn normalized_delta(&self) -> Vec2 {
        match self.mode {
            WheelDeltaMode::Pixel => self.delta,
            WheelDeltaMode::Line => self.delta * LINE_HEIGHT_PX,
            WheelDeltaMode::Page => self.delta * PAGE_HEIGHT_PX,
        }
    }
}
