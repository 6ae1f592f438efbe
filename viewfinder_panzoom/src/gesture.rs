// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Per-gesture drag/click discrimination state.
///
/// One record lives on each control and is advanced by named transitions
/// from the pointer input paths. Keeping this explicit (rather than in
/// captured locals) makes the press → move → release machine inspectable and
/// testable without simulating a platform event loop.
///
/// Classification: a press becomes a drag once its displacement from the
/// down position exceeds `drag_distance` **and** exceeds
/// `drag_speed · hold-time`, so a short flick and a slow deliberate drag
/// both qualify while the accumulated wobble of a long stationary press does
/// not.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragGesture {
    /// Normalized position of the press.
    pub down_pos: Point,
    /// Timestamp of the press, milliseconds.
    pub down_time: f64,
    /// Pan offset at press time; panning is expressed relative to this.
    pub baseline: Vec2,
    /// Whether the press is panning the control (no handler consumed it).
    pub panning: bool,
    /// Whether the gesture has been classified as a drag.
    pub dragged: bool,
}

impl DragGesture {
    /// Records a press and resets classification.
    pub fn down(&mut self, pos: Point, time: f64, baseline: Vec2, panning: bool) {
        self.down_pos = pos;
        self.down_time = time;
        self.baseline = baseline;
        self.panning = panning;
        self.dragged = false;
    }

    /// Folds in a movement; returns the displacement from the down position.
    ///
    /// `drag_distance` and `drag_speed` come from
    /// [`PanZoomOptions`](crate::PanZoomOptions).
    pub fn movement(
        &mut self,
        pos: Point,
        time: f64,
        drag_distance: f64,
        drag_speed: f64,
    ) -> Vec2 {
        let delta = pos - self.down_pos;
        let displacement = delta.x.abs().max(delta.y.abs());
        let held = (time - self.down_time).max(0.0);
        if displacement >= drag_distance && displacement >= drag_speed * held {
            self.dragged = true;
        }
        delta
    }

    /// Records the release; panning stops, classification is kept so the
    /// trailing native click can be gated on it.
    pub fn up(&mut self) {
        self.panning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIST: f64 = 0.01;
    const SPEED: f64 = 2e-5;

    #[test]
    fn tap_stays_a_tap() {
        let mut g = DragGesture::default();
        g.down(Point::new(0.5, 0.5), 0.0, Vec2::ZERO, true);
        g.movement(Point::new(0.503, 0.5), 50.0, DIST, SPEED);
        g.up();
        assert!(!g.dragged);
    }

    #[test]
    fn fast_flick_is_a_drag() {
        let mut g = DragGesture::default();
        g.down(Point::new(0.5, 0.5), 0.0, Vec2::ZERO, true);
        let delta = g.movement(Point::new(0.55, 0.5), 80.0, DIST, SPEED);
        assert_eq!(delta, Vec2::new(0.05, 0.0));
        assert!(g.dragged);
    }

    #[test]
    fn slow_deliberate_drag_is_a_drag() {
        let mut g = DragGesture::default();
        g.down(Point::new(0.2, 0.2), 0.0, Vec2::ZERO, true);
        // 0.1 of travel over two seconds: well past both thresholds
        // (speed threshold at 2000 ms is 0.04).
        g.movement(Point::new(0.3, 0.2), 2000.0, DIST, SPEED);
        assert!(g.dragged);
    }

    #[test]
    fn long_press_wobble_stays_a_tap() {
        let mut g = DragGesture::default();
        g.down(Point::new(0.5, 0.5), 0.0, Vec2::ZERO, true);
        // 0.015 of wobble after 1.5 s; past the distance threshold but under
        // the hold-time-scaled one (0.03).
        g.movement(Point::new(0.515, 0.5), 1500.0, DIST, SPEED);
        assert!(!g.dragged);
    }

    #[test]
    fn classification_sticks_across_later_small_moves() {
        let mut g = DragGesture::default();
        g.down(Point::new(0.5, 0.5), 0.0, Vec2::ZERO, true);
        g.movement(Point::new(0.6, 0.5), 100.0, DIST, SPEED);
        assert!(g.dragged);
        // Returning near the down position does not undo the classification.
        g.movement(Point::new(0.501, 0.5), 200.0, DIST, SPEED);
        assert!(g.dragged);
    }
}
