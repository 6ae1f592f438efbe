// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;

/// Configuration for a [`PanZoomControl`](crate::PanZoomControl).
///
/// All fields are plain data with sensible defaults; callbacks (change
/// notification, cursor sink) are installed on the control itself so the
/// options stay `Clone` + `Debug`.
///
/// Scale bounds are normalized on use: a min larger than its max is treated
/// as a swapped range rather than rejected.
#[derive(Clone, Debug)]
pub struct PanZoomOptions {
    /// Minimum horizontal zoom factor.
    pub min_x_scale: f64,
    /// Maximum horizontal zoom factor.
    pub max_x_scale: f64,
    /// Minimum vertical zoom factor.
    pub min_y_scale: f64,
    /// Maximum vertical zoom factor.
    pub max_y_scale: f64,

    /// Minimum horizontal pan offset, in world units.
    pub min_x_pos: f64,
    /// Maximum horizontal pan offset, in world units.
    pub max_x_pos: f64,
    /// Minimum vertical pan offset, in world units.
    pub min_y_pos: f64,
    /// Maximum vertical pan offset, in world units.
    pub max_y_pos: f64,

    /// Viewport extent reserved when `include_size_in_max_pos` applies,
    /// expressed per axis in screens (`1.0` = one full viewport).
    pub min_screen_in_view: Vec2,
    /// Subtract the visible extent from the max pan bound, so the viewport
    /// cannot scroll past the end of the content.
    pub include_size_in_max_pos: bool,
    /// Divide the minimum pan bound by the current scale, letting the
    /// minimum position scale with zoom level.
    pub scale_min_pos: bool,

    /// Remap shift+wheel to a horizontal pan instead of an axis-gated zoom.
    pub scroll_x_on_wheel_using_shift: bool,
    /// Wheel zoom responsiveness: a normalized delta `d` multiplies the
    /// scale by `(1000 − d·zoom_speed)/1000`.
    pub zoom_speed: f64,
    /// Pixel margin along the left and top element edges inside which the
    /// corresponding axis is excluded from wheel zoom (reserved for axis
    /// labels and similar chrome).
    pub zoom_margin_px: f64,

    /// Per-tick exponential decay factor for the smoothed state, normalized
    /// to a 60 Hz reference tick. Must be in `(0, 1)`; closer to 1 is
    /// slower/softer.
    pub ease_factor: f64,

    /// Displacement from the down position, in normalized viewport units,
    /// beyond which a press is classified as a drag.
    pub drag_distance: f64,
    /// Additional displacement required per millisecond of hold, so the
    /// accumulated wobble of a long, touch-like press does not turn a tap
    /// into a drag.
    pub drag_speed: f64,
}

impl Default for PanZoomOptions {
    fn default() -> Self {
        Self {
            min_x_scale: 0.001,
            max_x_scale: 1000.0,
            min_y_scale: 0.001,
            max_y_scale: 1000.0,

            min_x_pos: 0.0,
            max_x_pos: 1.0,
            min_y_pos: 0.0,
            max_y_pos: 1.0,

            min_screen_in_view: Vec2::new(1.0, 1.0),
            include_size_in_max_pos: true,
            scale_min_pos: false,

            scroll_x_on_wheel_using_shift: false,
            zoom_speed: 5.0,
            zoom_margin_px: 32.0,

            ease_factor: 0.9,

            drag_distance: 0.01,
            drag_speed: 2e-5,
        }
    }
}

impl PanZoomOptions {
    /// The horizontal scale range with min/max normalized into order.
    #[must_use]
    pub(crate) fn x_scale_range(&self) -> (f64, f64) {
        ordered(self.min_x_scale, self.max_x_scale)
    }

    /// The vertical scale range with min/max normalized into order.
    #[must_use]
    pub(crate) fn y_scale_range(&self) -> (f64, f64) {
        ordered(self.min_y_scale, self.max_y_scale)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
