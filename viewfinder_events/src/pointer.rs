// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use crate::Modifiers;

/// The device class that produced a pointer event.
///
/// Mirrors the DOM `pointerType` string. Platforms that report something
/// unrecognized map to [`PointerKind::Unknown`] rather than being dropped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PointerKind {
    /// A mouse or mouse-like device.
    #[default]
    Mouse,
    /// A stylus/pen; pressure and tilt fields are meaningful.
    Pen,
    /// A touch contact promoted to a pointer event.
    Touch,
    /// Anything the platform did not identify.
    Unknown,
}

/// A pointer button index.
///
/// Button numbering follows the DOM convention (0 = primary, 1 = auxiliary,
/// 2 = secondary, ...). Indices outside that range are legal; consumers keep
/// lazily-grown button maps rather than fixed arrays.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerButton(pub i16);

impl PointerButton {
    /// The primary button (left mouse button, pen tip, synthesized touch).
    pub const PRIMARY: Self = Self(0);
}

/// A single normalized pointer event.
///
/// One value of this type is fed to the tracker per native `pointerdown`,
/// `pointerup`, `pointermove`, `pointerenter`, `pointerleave`, `pointerover`,
/// `pointerout`, or `pointerrawupdate` event.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// The platform's pointer identifier, stable for the life of the contact.
    pub pointer_id: i64,
    /// Device class.
    pub kind: PointerKind,
    /// Whether the platform considers this the primary pointer.
    pub is_primary: bool,
    /// The button this event is about (meaningful for down/up).
    pub button: PointerButton,
    /// Position in page-space pixels.
    pub position: Point,
    /// Normalized pressure in `0..=1`, `0.5` for button-only devices.
    pub pressure: f64,
    /// Pen barrel pressure in `-1..=1`.
    pub tangential_pressure: f64,
    /// Pen tilt angles in degrees, x then y.
    pub tilt: Vec2,
    /// Pen rotation in degrees, `0..360`.
    pub twist: f64,
    /// Modifier keys held when the event fired.
    pub modifiers: Modifiers,
    /// Event timestamp in milliseconds.
    pub time: f64,
}

impl Default for PointerEvent {
    fn default() -> Self {
        Self {
            pointer_id: 0,
            kind: PointerKind::default(),
            is_primary: true,
            button: PointerButton::PRIMARY,
            position: Point::ZERO,
            pressure: 0.0,
            tangential_pressure: 0.0,
            tilt: Vec2::ZERO,
            twist: 0.0,
            modifiers: Modifiers::empty(),
            time: 0.0,
        }
    }
}

/// A single touch contact inside a native touch event.
///
/// Touch events arrive as lists of these (the platform's `changedTouches` or
/// `touches`); the tracker folds each into per-contact state using
/// `identifier` for correlation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TouchPoint {
    /// The platform's touch identifier, stable for the life of the contact.
    pub identifier: i64,
    /// Position in page-space pixels.
    pub position: Point,
    /// Contact force in `0..=1` where supported, otherwise `0`.
    pub force: f64,
    /// Event timestamp in milliseconds.
    pub time: f64,
}
