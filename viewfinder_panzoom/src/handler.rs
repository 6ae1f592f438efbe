// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Point;
use viewfinder_events::KeyEvent;

/// Shared handle to a registered [`ControlHandler`].
pub type HandlerRef = Rc<RefCell<dyn ControlHandler>>;

/// Mutable per-handler flags read by the dispatching control.
///
/// A handler is dispatch-eligible iff `visible && enabled`. `captured` and
/// `focused` are maintained by the control's mediation
/// ([`PanZoomControl::handle_capture_change`] /
/// [`PanZoomControl::handle_focus_change`]); handlers should treat them as
/// read-only and request changes through [`EventCtx`] instead.
///
/// [`PanZoomControl::handle_capture_change`]: crate::PanZoomControl::handle_capture_change
/// [`PanZoomControl::handle_focus_change`]: crate::PanZoomControl::handle_focus_change
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerState {
    /// Hidden handlers receive no events.
    pub visible: bool,
    /// Disabled handlers receive no events.
    pub enabled: bool,
    /// Whether this handler currently holds the exclusive pointer capture.
    pub captured: bool,
    /// Whether this handler is the logical keyboard/interaction target.
    pub focused: bool,
    /// CSS-style cursor this handler wants while it is the topmost eligible
    /// handler (empty = no preference).
    pub cursor: String,
}

impl Default for HandlerState {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            captured: false,
            focused: false,
            cursor: String::new(),
        }
    }
}

/// Requests a handler makes while an event is being dispatched to it.
///
/// Dispatch hands every capability method an `EventCtx`; the control applies
/// the collected requests after the handler returns. This keeps capture and
/// focus handler-initiated but control-mediated, and avoids re-entrant
/// mutation of the control mid-dispatch.
#[derive(Debug, Default)]
pub struct EventCtx {
    pub(crate) capture: Option<bool>,
    pub(crate) focus: Option<bool>,
    pub(crate) removals: Vec<HandlerRef>,
}

impl EventCtx {
    /// Request exclusive capture: all subsequent events route to this
    /// handler alone until it releases.
    pub fn capture(&mut self) {
        self.capture = Some(true);
    }

    /// Release a previously taken capture.
    pub fn release_capture(&mut self) {
        self.capture = Some(false);
    }

    /// Request focus.
    pub fn focus(&mut self) {
        self.focus = Some(true);
    }

    /// Give up focus.
    pub fn blur(&mut self) {
        self.focus = Some(false);
    }

    /// Request that `handler` be unregistered from the dispatching control.
    ///
    /// Applied after the current handler returns. The event in flight still
    /// runs to completion against the dispatch snapshot, so a handler
    /// sitting later in the chain sees this event even while being removed;
    /// subsequent events skip it. A handler may also remove itself.
    pub fn remove(&mut self, handler: &HandlerRef) {
        self.removals.push(handler.clone());
    }
}

/// A capability record dispatched to by a [`PanZoomControl`].
///
/// Each `on_*` method is an optional capability: the default body declines
/// the event, so implementors override only what they handle. Returning
/// `true` consumes the event and stops propagation to handlers below.
///
/// Positions are world coordinates (`offset + normalized/scale` of the
/// dispatching control).
///
/// [`PanZoomControl`]: crate::PanZoomControl
pub trait ControlHandler {
    /// The control-readable flags for this handler.
    fn state(&self) -> &HandlerState;

    /// Mutable access to the flags, used by the control's mediation.
    fn state_mut(&mut self) -> &mut HandlerState;

    /// A click (a press and release without an intervening drag).
    fn on_click(&mut self, ctx: &mut EventCtx, pos: Point) -> bool {
        let _ = (ctx, pos);
        false
    }

    /// A double click.
    fn on_double_click(&mut self, ctx: &mut EventCtx, pos: Point) -> bool {
        let _ = (ctx, pos);
        false
    }

    /// Pointer movement.
    fn on_move(&mut self, ctx: &mut EventCtx, pos: Point) -> bool {
        let _ = (ctx, pos);
        false
    }

    /// Pointer press. Consuming this suppresses the control's own panning.
    fn on_down(&mut self, ctx: &mut EventCtx, pos: Point) -> bool {
        let _ = (ctx, pos);
        false
    }

    /// Pointer release.
    fn on_up(&mut self, ctx: &mut EventCtx, pos: Point) -> bool {
        let _ = (ctx, pos);
        false
    }

    /// The pointer left the control (or this handler's hit region, for
    /// handlers wrapping child controls).
    fn on_leave(&mut self, ctx: &mut EventCtx) -> bool {
        let _ = ctx;
        false
    }

    /// A key press (`up == false`) or release (`up == true`) while the
    /// pointer is over the control.
    fn on_key(&mut self, ctx: &mut EventCtx, pos: Point, key: &KeyEvent, up: bool) -> bool {
        let _ = (ctx, pos, key, up);
        false
    }
}

impl core::fmt::Debug for dyn ControlHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControlHandler")
            .field("state", self.state())
            .finish()
    }
}
