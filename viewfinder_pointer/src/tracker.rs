// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;

use viewfinder_events::{PointerButton, PointerEvent, PointerKind, TouchPoint};

use crate::data::{ButtonState, ContactId, PointerData};

/// A pointer-capture side effect the embedder should apply.
///
/// The tracker cannot capture a pointer itself; it reports the intent and the
/// embedder performs `setPointerCapture`/`releasePointerCapture` (or its
/// platform's equivalent) on the event target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CaptureRequest {
    /// Capture the given pointer id on the event target.
    Capture(i64),
    /// Release the given pointer id from the event target.
    Release(i64),
}

/// What the embedder should do with the native event that was just folded in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the native default action and propagation.
    pub cancel: bool,
    /// Pointer capture side effect, if any.
    pub capture: Option<CaptureRequest>,
}

/// Tracker configuration.
#[derive(Clone, Debug)]
pub struct TrackerOptions {
    /// Suppress default action/propagation for every handled event.
    pub cancel_events: bool,
    /// How long `inside`/`over` linger after a touch lifts, in milliseconds.
    pub touch_grace_ms: f64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            cancel_events: true,
            touch_grace_ms: 200.0,
        }
    }
}

/// Folds pointer and touch event streams into per-contact state.
///
/// One transition method exists per native event type. Every transition
/// returns an [`EventResponse`] telling the embedder whether to cancel the
/// native event and whether a capture side effect is wanted. No event type
/// is ever dropped silently; the only opt-out is the
/// [`cancel_events`](TrackerOptions::cancel_events) option.
#[derive(Debug, Default)]
pub struct PointerTracker {
    options: TrackerOptions,
    contacts: HashMap<ContactId, PointerData>,
    last_primary: Option<ContactId>,
}

impl PointerTracker {
    /// Creates a tracker with the given options.
    #[must_use]
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            options,
            contacts: HashMap::new(),
            last_primary: None,
        }
    }

    /// State for a contact, if it has ever been seen.
    #[must_use]
    pub fn data(&self, id: ContactId) -> Option<&PointerData> {
        self.contacts.get(&id)
    }

    /// State of the most recently updated contact.
    #[must_use]
    pub fn last_primary(&self) -> Option<&PointerData> {
        self.contacts.get(&self.last_primary?)
    }

    /// Number of contacts ever observed (records are never evicted).
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Expires touch grace deadlines that `now` has passed.
    ///
    /// Call once per frame, or at least before querying `inside`/`over`
    /// state that may be lingering from a recent touch end.
    pub fn advance(&mut self, now: f64) {
        for data in self.contacts.values_mut() {
            if let Some(deadline) = data.outside_deadline
                && now >= deadline
            {
                data.inside = 0;
                data.over = 0;
                data.outside_deadline = None;
            }
        }
    }

    /// Forgets all contact state.
    ///
    /// Detaching the native listeners that feed this tracker is the
    /// embedder's job; the tracker has no handle on them.
    pub fn dispose(&mut self) {
        self.contacts.clear();
        self.last_primary = None;
    }

    /// `pointerenter`.
    pub fn pointer_enter(&mut self, evt: &PointerEvent) -> EventResponse {
        self.update_pointer(evt).inside += 1;
        self.response(None)
    }

    /// `pointerleave`.
    pub fn pointer_leave(&mut self, evt: &PointerEvent) -> EventResponse {
        self.update_pointer(evt).inside -= 1;
        self.response(None)
    }

    /// `pointerover`.
    pub fn pointer_over(&mut self, evt: &PointerEvent) -> EventResponse {
        self.update_pointer(evt).over += 1;
        self.response(None)
    }

    /// `pointerout`.
    pub fn pointer_out(&mut self, evt: &PointerEvent) -> EventResponse {
        self.update_pointer(evt).over -= 1;
        self.response(None)
    }

    /// `pointerdown`.
    ///
    /// The down accumulator is bumped only on a fresh transition of this
    /// button; repeated down events for a button already held (as some
    /// platforms emit) do not double-count.
    pub fn pointer_down(&mut self, evt: &PointerEvent) -> EventResponse {
        let data = self.update_pointer(evt);
        let fresh = !data.buttons.get(&evt.button).is_some_and(|b| b.down);
        if fresh {
            data.down += 1;
        }
        data.buttons.insert(
            evt.button,
            ButtonState {
                down: true,
                position: evt.position,
            },
        );
        self.response(Some(CaptureRequest::Capture(evt.pointer_id)))
    }

    /// `pointerup`.
    pub fn pointer_up(&mut self, evt: &PointerEvent) -> EventResponse {
        let data = self.update_pointer(evt);
        if data.buttons.get(&evt.button).is_some_and(|b| b.down) {
            data.down -= 1;
        }
        data.buttons.insert(
            evt.button,
            ButtonState {
                down: false,
                position: evt.position,
            },
        );
        self.response(Some(CaptureRequest::Release(evt.pointer_id)))
    }

    /// `pointermove`.
    pub fn pointer_move(&mut self, evt: &PointerEvent) -> EventResponse {
        self.update_pointer(evt);
        self.response(None)
    }

    /// `pointerrawupdate`.
    pub fn pointer_raw_update(&mut self, evt: &PointerEvent) -> EventResponse {
        self.update_pointer(evt);
        self.response(None)
    }

    /// `contextmenu`. No state change; exists so the embedder can suppress it.
    pub fn context_menu(&mut self) -> EventResponse {
        self.response(None)
    }

    /// `touchstart`, with the event's changed touches.
    pub fn touch_start(&mut self, touches: &[TouchPoint]) -> EventResponse {
        for touch in touches {
            let data = self.update_touch(touch);
            data.inside = 1;
            data.over = 1;
            data.down = 1;
            data.outside_deadline = None;
            data.buttons.insert(
                PointerButton::PRIMARY,
                ButtonState {
                    down: true,
                    position: touch.position,
                },
            );
        }
        self.response(None)
    }

    /// `touchmove`, with the event's active touches.
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> EventResponse {
        for touch in touches {
            self.update_touch(touch);
        }
        self.response(None)
    }

    /// `touchend` or `touchcancel`, with the event's changed touches.
    ///
    /// Button 0 goes up immediately; `inside`/`over` stay set until the
    /// grace deadline expires (see [`PointerTracker::advance`]), so a tap's
    /// trailing move/click still observes the contact as inside.
    pub fn touch_end(&mut self, touches: &[TouchPoint]) -> EventResponse {
        let grace = self.options.touch_grace_ms;
        for touch in touches {
            let data = self.update_touch(touch);
            data.down = 0;
            data.inside = 1;
            data.over = 1;
            data.outside_deadline = Some(touch.time + grace);
            data.buttons.insert(
                PointerButton::PRIMARY,
                ButtonState {
                    down: false,
                    position: touch.position,
                },
            );
        }
        self.response(None)
    }

    fn response(&self, capture: Option<CaptureRequest>) -> EventResponse {
        EventResponse {
            cancel: self.options.cancel_events,
            capture,
        }
    }

    fn contact(&mut self, id: ContactId) -> &mut PointerData {
        self.last_primary = Some(id);
        let data = self
            .contacts
            .entry(id)
            .or_insert_with(|| PointerData::new(id));
        data.event_count += 1;
        data
    }

    fn update_pointer(&mut self, evt: &PointerEvent) -> &mut PointerData {
        let data = self.contact(ContactId::Pointer(evt.pointer_id));
        data.kind = evt.kind;
        data.is_primary = evt.is_primary;
        data.position = evt.position;
        data.pressure = evt.pressure;
        if evt.kind == PointerKind::Pen {
            data.tangential_pressure = evt.tangential_pressure;
            data.tilt = evt.tilt;
            data.twist = evt.twist;
        }
        data
    }

    fn update_touch(&mut self, touch: &TouchPoint) -> &mut PointerData {
        let data = self.contact(ContactId::Touch(touch.identifier));
        data.kind = PointerKind::Touch;
        data.is_primary = false;
        data.position = touch.position;
        data.pressure = touch.force;
        data
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::{Point, Vec2};
    use viewfinder_events::PointerKind;

    use super::*;

    fn pointer(id: i64) -> PointerEvent {
        PointerEvent {
            pointer_id: id,
            ..PointerEvent::default()
        }
    }

    fn touch(id: i64, x: f64, y: f64, time: f64) -> TouchPoint {
        TouchPoint {
            identifier: id,
            position: Point::new(x, y),
            force: 0.7,
            time,
        }
    }

    #[test]
    fn records_are_created_lazily_and_reused() {
        let mut tracker = PointerTracker::default();
        assert!(tracker.data(ContactId::Pointer(3)).is_none());

        tracker.pointer_move(&pointer(3));
        tracker.pointer_move(&pointer(3));
        let data = tracker.data(ContactId::Pointer(3)).unwrap();
        assert_eq!(data.event_count, 2);
        assert_eq!(tracker.contact_count(), 1);
    }

    #[test]
    fn touch_and_pointer_identifiers_never_collide() {
        let mut tracker = PointerTracker::default();
        tracker.pointer_move(&pointer(1));
        tracker.touch_start(&[touch(1, 0.0, 0.0, 0.0)]);

        assert_eq!(tracker.contact_count(), 2);
        assert_eq!(
            tracker.data(ContactId::Pointer(1)).unwrap().kind,
            PointerKind::Mouse
        );
        assert_eq!(
            tracker.data(ContactId::Touch(1)).unwrap().kind,
            PointerKind::Touch
        );
    }

    #[test]
    fn enter_leave_accumulators_are_signed() {
        let mut tracker = PointerTracker::default();
        let evt = pointer(1);
        tracker.pointer_enter(&evt);
        tracker.pointer_enter(&evt);
        tracker.pointer_leave(&evt);
        let data = tracker.data(ContactId::Pointer(1)).unwrap();
        assert_eq!(data.inside, 1);
        assert!(data.is_inside());

        // An unbalanced extra leave goes negative instead of saturating.
        let mut tracker = PointerTracker::default();
        tracker.pointer_leave(&pointer(1));
        assert_eq!(tracker.data(ContactId::Pointer(1)).unwrap().inside, -1);
    }

    #[test]
    fn down_counts_only_fresh_button_transitions() {
        let mut tracker = PointerTracker::default();
        let evt = pointer(1);
        tracker.pointer_down(&evt);
        tracker.pointer_down(&evt);
        assert_eq!(tracker.data(ContactId::Pointer(1)).unwrap().down, 1);

        tracker.pointer_up(&evt);
        tracker.pointer_up(&evt);
        assert_eq!(tracker.data(ContactId::Pointer(1)).unwrap().down, 0);
    }

    #[test]
    fn unknown_button_indices_grow_the_map() {
        let mut tracker = PointerTracker::default();
        let evt = PointerEvent {
            button: PointerButton(7),
            ..pointer(1)
        };
        tracker.pointer_down(&evt);
        let data = tracker.data(ContactId::Pointer(1)).unwrap();
        assert!(data.button(PointerButton(7)).unwrap().down);
        assert!(data.button(PointerButton::PRIMARY).is_none());
    }

    #[test]
    fn down_requests_capture_and_up_requests_release() {
        let mut tracker = PointerTracker::default();
        let resp = tracker.pointer_down(&pointer(5));
        assert_eq!(resp.capture, Some(CaptureRequest::Capture(5)));
        let resp = tracker.pointer_up(&pointer(5));
        assert_eq!(resp.capture, Some(CaptureRequest::Release(5)));
    }

    #[test]
    fn cancel_follows_the_option() {
        let mut tracker = PointerTracker::default();
        assert!(tracker.pointer_move(&pointer(1)).cancel);

        let mut quiet = PointerTracker::new(TrackerOptions {
            cancel_events: false,
            ..TrackerOptions::default()
        });
        assert!(!quiet.pointer_move(&pointer(1)).cancel);
        assert!(!quiet.context_menu().cancel);
    }

    #[test]
    fn pen_fields_update_only_for_pens() {
        let mut tracker = PointerTracker::default();
        tracker.pointer_move(&PointerEvent {
            tilt: Vec2::new(10.0, 20.0),
            twist: 90.0,
            ..pointer(1)
        });
        let data = tracker.data(ContactId::Pointer(1)).unwrap();
        // Mouse events never touch the pen sentinels.
        assert_eq!(data.tilt, Vec2::new(-1.0, -1.0));
        assert_eq!(data.twist, -1.0);

        tracker.pointer_move(&PointerEvent {
            kind: PointerKind::Pen,
            tilt: Vec2::new(10.0, 20.0),
            twist: 90.0,
            tangential_pressure: 0.25,
            ..pointer(1)
        });
        let data = tracker.data(ContactId::Pointer(1)).unwrap();
        assert_eq!(data.tilt, Vec2::new(10.0, 20.0));
        assert_eq!(data.twist, 90.0);
        assert_eq!(data.tangential_pressure, 0.25);
    }

    #[test]
    fn touch_start_synthesizes_primary_button() {
        let mut tracker = PointerTracker::default();
        tracker.touch_start(&[touch(9, 50.0, 60.0, 100.0)]);
        let data = tracker.data(ContactId::Touch(9)).unwrap();
        assert_eq!(data.down, 1);
        assert_eq!(data.inside, 1);
        assert_eq!(data.over, 1);
        let btn = data.button(PointerButton::PRIMARY).unwrap();
        assert!(btn.down);
        assert_eq!(btn.position, Point::new(50.0, 60.0));
    }

    #[test]
    fn touch_end_lingers_inside_until_grace_expires() {
        let mut tracker = PointerTracker::default();
        tracker.touch_start(&[touch(9, 0.0, 0.0, 0.0)]);
        tracker.touch_end(&[touch(9, 0.0, 0.0, 1000.0)]);

        let data = tracker.data(ContactId::Touch(9)).unwrap();
        assert_eq!(data.down, 0);
        assert!(data.is_inside());

        // Within the grace window nothing changes.
        tracker.advance(1100.0);
        assert!(tracker.data(ContactId::Touch(9)).unwrap().is_inside());

        // At the deadline the contact goes outside.
        tracker.advance(1200.0);
        let data = tracker.data(ContactId::Touch(9)).unwrap();
        assert!(!data.is_inside());
        assert!(!data.is_over());
        assert!(data.outside_deadline.is_none());
    }

    #[test]
    fn new_touch_cancels_pending_grace_deadline() {
        let mut tracker = PointerTracker::default();
        tracker.touch_start(&[touch(9, 0.0, 0.0, 0.0)]);
        tracker.touch_end(&[touch(9, 0.0, 0.0, 100.0)]);
        tracker.touch_start(&[touch(9, 0.0, 0.0, 150.0)]);

        tracker.advance(400.0);
        assert!(tracker.data(ContactId::Touch(9)).unwrap().is_inside());
    }

    #[test]
    fn last_primary_tracks_most_recent_contact() {
        let mut tracker = PointerTracker::default();
        assert!(tracker.last_primary().is_none());

        tracker.pointer_move(&pointer(1));
        tracker.touch_move(&[touch(2, 0.0, 0.0, 0.0)]);
        assert_eq!(tracker.last_primary().unwrap().id, ContactId::Touch(2));

        tracker.pointer_move(&pointer(1));
        assert_eq!(tracker.last_primary().unwrap().id, ContactId::Pointer(1));
    }

    #[test]
    fn dispose_forgets_contacts() {
        let mut tracker = PointerTracker::default();
        tracker.pointer_down(&pointer(1));
        tracker.dispose();
        assert_eq!(tracker.contact_count(), 0);
        assert!(tracker.last_primary().is_none());
    }
}
