// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

use hashbrown::HashMap;
use viewfinder_events::{PointerButton, PointerKind};

/// Identifier for one physical contact, deduplicated across event families.
///
/// Pointer events and touch events use unrelated identifier spaces; a touch
/// contact reported through both families would otherwise be tracked twice
/// (or worse, merged with a mouse pointer that happens to share the number).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContactId {
    /// A contact observed through the pointer event family.
    Pointer(i64),
    /// A contact observed through the touch event family.
    Touch(i64),
}

/// State of a single button on a contact.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ButtonState {
    /// Whether the button is currently held.
    pub down: bool,
    /// Page-space position at the most recent transition of this button.
    pub position: Point,
}

/// Accumulated state for one contact point.
///
/// A record is created the first time a [`ContactId`] is seen and persists
/// for the life of the tracker; subsequent events for the same identifier
/// update it in place.
///
/// `over`, `inside`, and `down` are signed accumulators rather than
/// booleans: overlapping child elements can deliver several enter/leave
/// pairs for one physical crossing, and multi-button devices can stack
/// presses. A value greater than zero means "currently over/inside/down".
#[derive(Clone, Debug)]
pub struct PointerData {
    /// The identifier this record tracks.
    pub id: ContactId,
    /// Device class of the most recent event for this contact.
    pub kind: PointerKind,
    /// Whether the platform called this the primary pointer.
    pub is_primary: bool,
    /// Most recent page-space position.
    pub position: Point,
    /// Most recent normalized pressure.
    pub pressure: f64,
    /// Pen barrel pressure; `-1.0` until a pen event arrives.
    pub tangential_pressure: f64,
    /// Pen tilt in degrees; `(-1, -1)` until a pen event arrives.
    pub tilt: Vec2,
    /// Pen rotation in degrees; `-1.0` until a pen event arrives.
    pub twist: f64,
    /// Per-button state, grown lazily as button indices are seen.
    pub buttons: HashMap<PointerButton, ButtonState>,
    /// Over accumulator (`pointerover` / `pointerout`).
    pub over: i32,
    /// Inside accumulator (`pointerenter` / `pointerleave`).
    pub inside: i32,
    /// Held-button accumulator.
    pub down: i32,
    /// Number of events folded into this record.
    pub event_count: u64,
    /// When set, `inside`/`over` are cleared once this time passes.
    ///
    /// Armed on touch end; see the crate docs on the touch grace window.
    pub outside_deadline: Option<f64>,
}

impl PointerData {
    pub(crate) fn new(id: ContactId) -> Self {
        Self {
            id,
            kind: PointerKind::Unknown,
            is_primary: false,
            position: Point::ZERO,
            pressure: -1.0,
            tangential_pressure: -1.0,
            tilt: Vec2::new(-1.0, -1.0),
            twist: -1.0,
            buttons: HashMap::new(),
            over: 0,
            inside: 0,
            down: 0,
            event_count: 0,
            outside_deadline: None,
        }
    }

    /// Whether any button of this contact is held.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.down > 0
    }

    /// Whether the contact is inside the tracked element.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.inside > 0
    }

    /// Whether the contact is over the tracked element.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.over > 0
    }

    /// State of one button, if that index has ever been seen.
    #[must_use]
    pub fn button(&self, button: PointerButton) -> Option<&ButtonState> {
        self.buttons.get(&button)
    }
}
