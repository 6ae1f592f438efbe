// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Point, Size, Vec2};
use smallvec::SmallVec;

use viewfinder_events::{KeyEvent, Modifiers, PointerEvent, WheelEvent};
use viewfinder_frame::FrameScheduler;

use crate::gesture::DragGesture;
use crate::handler::{EventCtx, HandlerRef};
use crate::options::PanZoomOptions;
use crate::powf;

/// Shared handle to a control, used for nesting and for the smoothing loop.
pub type ControlRef = Rc<RefCell<PanZoomControl>>;

/// Reference tick the ease factor is calibrated against (60 Hz).
const REF_TICK_MS: f64 = 1000.0 / 60.0;
/// Blend factor for a nested control's sub-offset smoothing.
const SUB_OFFSET_BLEND: f64 = 0.15;
/// Relative raw/smoothed scale disparity above which an axis counts as
/// actively zooming and position clamping is suppressed.
const CLAMP_SUPPRESS_RATIO: f64 = 0.01;
/// Child hit-test slop in child-normalized units, divided by the child scale.
const CHILD_HIT_TOLERANCE: f64 = 0.01;
/// Floor for the wheel zoom factor so extreme deltas cannot flip the scale
/// sign.
const MIN_WHEEL_FACTOR: f64 = 0.01;

/// Placement of a nested control inside its parent's normalized space.
///
/// `width`/`height`/`x_offset`/`y_offset` are the sub-rectangle the child
/// occupies. `offset` is the child's own pan state (the *sub-offset*): a
/// nested control's scale and offset are re-derived from the parent's
/// smoothed state every tick, so its input-driven panning accumulates here
/// and is folded into the derivation after its own smoothing pass.
#[derive(Clone, Copy, Debug)]
pub struct ChildFrame {
    /// Width of the sub-rectangle in the parent's normalized space.
    pub width: f64,
    /// Height of the sub-rectangle in the parent's normalized space.
    pub height: f64,
    /// Horizontal placement of the sub-rectangle.
    pub x_offset: f64,
    /// Vertical placement of the sub-rectangle.
    pub y_offset: f64,
    /// The child's own pan state.
    pub offset: Vec2,
    /// Smoothed counterpart of `offset`.
    pub offset_smooth: Vec2,
}

impl ChildFrame {
    /// A frame covering the given sub-rectangle with no pan.
    #[must_use]
    pub fn new(width: f64, height: f64, x_offset: f64, y_offset: f64) -> Self {
        Self {
            width,
            height,
            x_offset,
            y_offset,
            offset: Vec2::ZERO,
            offset_smooth: Vec2::ZERO,
        }
    }
}

#[derive(Debug)]
struct ChildSlot {
    control: ControlRef,
    /// Whether events were flowing into this child at the last dispatch.
    was_inside: bool,
    /// Whether a pointer press was routed into this child and not yet
    /// released, which keeps it hit-eligible outside its bounds.
    down: bool,
}

/// One routed event category; all categories travel the same chain.
///
/// Down and move carry the event timestamp so a hit child can drive its own
/// drag machine.
#[derive(Clone, Copy)]
enum Routed<'a> {
    Click,
    DoubleClick,
    Move(f64),
    Down(f64),
    Up,
    Leave,
    Key(&'a KeyEvent, bool),
}

/// The owner of a 2D pan/zoom viewport: raw target state, smoothed state,
/// an ordered handler chain with capture/focus, and nested child controls.
///
/// See the crate docs for the coordinate conventions and the smoothing loop
/// wiring.
pub struct PanZoomControl {
    options: PanZoomOptions,
    view_size: Size,

    scale: Vec2,
    offset: Vec2,
    scale_smooth: Vec2,
    offset_smooth: Vec2,
    /// Normalized point zoom changes stay anchored to.
    zoom_center: Point,
    current_ease: f64,
    last_time: Option<f64>,

    handlers: Vec<HandlerRef>,
    captured: Option<HandlerRef>,
    focused: Option<HandlerRef>,
    cursor: String,

    gesture: DragGesture,
    /// Last pointer position in world coordinates.
    mouse: Point,
    /// Last pointer position in normalized coordinates.
    mouse_norm: Point,
    pointer_inside: bool,
    key_still_down: bool,

    frame: Option<ChildFrame>,
    children: Vec<ChildSlot>,

    disposed: bool,
    on_change: Option<Box<dyn FnMut()>>,
    cursor_sink: Option<Box<dyn FnMut(&str)>>,
}

impl PanZoomControl {
    /// Creates a root control at identity transform.
    #[must_use]
    pub fn new(options: PanZoomOptions) -> Self {
        Self {
            current_ease: options.ease_factor,
            options,
            view_size: Size::new(1.0, 1.0),
            scale: Vec2::new(1.0, 1.0),
            offset: Vec2::ZERO,
            scale_smooth: Vec2::new(1.0, 1.0),
            offset_smooth: Vec2::ZERO,
            zoom_center: Point::ZERO,
            last_time: None,
            handlers: Vec::new(),
            captured: None,
            focused: None,
            cursor: String::new(),
            gesture: DragGesture::default(),
            mouse: Point::ZERO,
            mouse_norm: Point::ZERO,
            pointer_inside: false,
            key_still_down: false,
            frame: None,
            children: Vec::new(),
            disposed: false,
            on_change: None,
            cursor_sink: None,
        }
    }

    /// Creates a control nested inside `parent` at the given frame.
    ///
    /// The child's scale and offset are re-derived from the parent's
    /// smoothed state on every tick of the parent's smoothing loop; do not
    /// attach a child to a scheduler separately.
    pub fn add_child(parent: &ControlRef, options: PanZoomOptions, frame: ChildFrame) -> ControlRef {
        let mut child = Self::new(options);
        child.frame = Some(frame);
        let child = Rc::new(RefCell::new(child));
        parent.borrow_mut().children.push(ChildSlot {
            control: child.clone(),
            was_inside: false,
            down: false,
        });
        child
    }

    /// Starts the recurring smoothing loop on `scheduler`.
    ///
    /// The control re-registers itself every frame (with run-first
    /// priority, so smoothing lands before repaint callbacks) until
    /// [`dispose`](Self::dispose) is called.
    pub fn attach(this: &ControlRef, scheduler: &FrameScheduler) {
        let control = this.clone();
        let sched = scheduler.clone();
        scheduler.schedule_first(move |time| Self::smooth_tick(control, sched, time));
    }

    fn smooth_tick(control: ControlRef, sched: FrameScheduler, time: f64) {
        if control.borrow().disposed {
            return;
        }
        control.borrow_mut().update_smooth(time);
        let again = control.clone();
        let sched2 = sched.clone();
        sched.schedule_first(move |t| Self::smooth_tick(again, sched2, t));
    }

    /// Current configuration.
    #[must_use]
    pub fn options(&self) -> &PanZoomOptions {
        &self.options
    }

    /// Sets the viewport size in pixels, used to normalize event positions.
    pub fn set_view_size(&mut self, size: Size) {
        self.view_size = size;
    }

    /// Raw target scale.
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Raw target offset in world units.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Smoothed scale; what rendering code should read.
    #[must_use]
    pub fn scale_smooth(&self) -> Vec2 {
        self.scale_smooth
    }

    /// Smoothed offset; what rendering code should read.
    #[must_use]
    pub fn offset_smooth(&self) -> Vec2 {
        self.offset_smooth
    }

    /// Normalized point the current zoom is anchored at.
    #[must_use]
    pub fn zoom_center(&self) -> Point {
        self.zoom_center
    }

    /// Effective cursor for the control (empty = no preference).
    #[must_use]
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Nesting frame, for nested controls.
    #[must_use]
    pub fn frame(&self) -> Option<&ChildFrame> {
        self.frame.as_ref()
    }

    /// Mutable nesting frame, e.g. to reposition a child or set its pan.
    #[must_use]
    pub fn frame_mut(&mut self) -> Option<&mut ChildFrame> {
        self.frame.as_mut()
    }

    /// Ease factor in effect for the next tick.
    #[must_use]
    pub fn current_ease(&self) -> f64 {
        self.current_ease
    }

    /// Number of live nested controls.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Drag/click discrimination state of the current or last gesture.
    #[must_use]
    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Installs a callback invoked after every state-affecting input event.
    pub fn set_on_change(&mut self, callback: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Installs the cursor application hook (a root control typically
    /// writes the string to its element's style).
    pub fn set_cursor_sink(&mut self, sink: impl FnMut(&str) + 'static) {
        self.cursor_sink = Some(Box::new(sink));
    }

    /// Sets the target scale directly, clamped to the configured bounds.
    pub fn set_scale(&mut self, scale: Vec2) {
        let (min_x, max_x) = self.options.x_scale_range();
        let (min_y, max_y) = self.options.y_scale_range();
        self.scale = Vec2::new(
            scale.x.min(max_x).max(min_x),
            scale.y.min(max_y).max(min_y),
        );
    }

    /// Sets the target pan offset directly, then re-clamps.
    pub fn set_offset(&mut self, offset: Vec2) {
        *self.pan_mut() = offset;
        self.restrict_pos();
    }

    /// Briefly overrides smoothing responsiveness; the override itself
    /// eases back toward the configured factor over the following ticks.
    pub fn set_current_ease(&mut self, ease: f64) {
        self.current_ease = ease;
    }

    /// Resets scale to 1 and offset to 0, immediately and smoothed.
    pub fn clear(&mut self) {
        self.scale = Vec2::new(1.0, 1.0);
        self.scale_smooth = Vec2::new(1.0, 1.0);
        self.offset = Vec2::ZERO;
        self.offset_smooth = Vec2::ZERO;
        self.zoom_center = Point::ZERO;
        if let Some(frame) = &mut self.frame {
            frame.offset = Vec2::ZERO;
            frame.offset_smooth = Vec2::ZERO;
        }
    }

    /// Stops the smoothing loop and drops handlers, capture, focus, and
    /// children (children are disposed recursively).
    ///
    /// Detaching the native event listeners that feed this control is the
    /// embedder's job. A disposed control stops re-registering with the
    /// scheduler, and a disposed child is pruned from its parent on the
    /// parent's next tick.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.handlers.clear();
        self.captured = None;
        self.focused = None;
        for slot in self.children.drain(..) {
            slot.control.borrow_mut().dispose();
        }
    }

    /// Registers a handler; the most recently added handler is topmost.
    pub fn add_handler(&mut self, handler: HandlerRef) {
        self.handlers.insert(0, handler);
        self.recompute_cursor();
    }

    /// Unregisters a handler, releasing its capture/focus if held.
    pub fn remove_handler(&mut self, handler: &HandlerRef) {
        self.handlers.retain(|h| !Rc::ptr_eq(h, handler));
        if self.captured.as_ref().is_some_and(|c| Rc::ptr_eq(c, handler)) {
            self.captured = None;
        }
        if self.focused.as_ref().is_some_and(|c| Rc::ptr_eq(c, handler)) {
            self.focused = None;
        }
        self.recompute_cursor();
    }

    /// Grants or releases exclusive capture for `handler`.
    ///
    /// At most one handler holds capture; granting it to one releases the
    /// previous holder. Handlers normally request this through
    /// [`EventCtx`] during dispatch rather than calling it directly.
    pub fn handle_capture_change(&mut self, handler: &HandlerRef, captured: bool) {
        if captured {
            if let Some(prev) = self.captured.take()
                && !Rc::ptr_eq(&prev, handler)
            {
                prev.borrow_mut().state_mut().captured = false;
            }
            handler.borrow_mut().state_mut().captured = true;
            self.captured = Some(handler.clone());
        } else {
            if self.captured.as_ref().is_some_and(|c| Rc::ptr_eq(c, handler)) {
                self.captured = None;
            }
            handler.borrow_mut().state_mut().captured = false;
        }
        self.recompute_cursor();
    }

    /// Grants or releases focus for `handler`. At most one handler holds
    /// focus at a time.
    pub fn handle_focus_change(&mut self, handler: &HandlerRef, focused: bool) {
        if focused {
            if let Some(prev) = self.focused.take()
                && !Rc::ptr_eq(&prev, handler)
            {
                prev.borrow_mut().state_mut().focused = false;
            }
            handler.borrow_mut().state_mut().focused = true;
            self.focused = Some(handler.clone());
        } else {
            if self.focused.as_ref().is_some_and(|c| Rc::ptr_eq(c, handler)) {
                self.focused = None;
            }
            handler.borrow_mut().state_mut().focused = false;
        }
        self.recompute_cursor();
    }

    /// Advances the smoothed state by one frame.
    ///
    /// Normally driven by [`attach`](Self::attach); exposed so tests and
    /// custom loops can step time explicitly. The decay is frame-rate
    /// independent: the configured ease factor applies per 60 Hz reference
    /// tick, raised to `Δt/16.7ms` for the actual elapsed time.
    pub fn update_smooth(&mut self, time: f64) {
        let dt = match self.last_time {
            Some(prev) => (time - prev).max(0.0),
            None => REF_TICK_MS,
        };
        self.last_time = Some(time);
        let ease = self.current_ease.clamp(1e-6, 1.0 - 1e-6);
        let keep = powf(ease, dt / REF_TICK_MS);

        // The transient responsiveness override decays back to the
        // configured factor.
        self.current_ease += (self.options.ease_factor - self.current_ease) * (1.0 - keep);

        // Scale smoothing, anchored at the zoom center: every change of the
        // smoothed scale shifts both offsets so the world point under the
        // center stays put. Summed over the convergence this telescopes to
        // exactly the correction for the full raw-scale step.
        let zc = self.zoom_center;
        let old = self.scale_smooth;
        let new = Vec2::new(
            old.x * keep + self.scale.x * (1.0 - keep),
            old.y * keep + self.scale.y * (1.0 - keep),
        );
        if new.x != old.x {
            let corr = zc.x / old.x - zc.x / new.x;
            self.offset.x += corr;
            self.offset_smooth.x += corr;
        }
        if new.y != old.y {
            let corr = zc.y / old.y - zc.y / new.y;
            self.offset.y += corr;
            self.offset_smooth.y += corr;
        }
        self.scale_smooth = new;

        self.offset_smooth = Vec2::new(
            self.offset_smooth.x * keep + self.offset.x * (1.0 - keep),
            self.offset_smooth.y * keep + self.offset.y * (1.0 - keep),
        );

        self.restrict_pos();
        self.update_children(time);
    }

    fn update_children(&mut self, time: f64) {
        if self.children.is_empty() {
            return;
        }
        self.children.retain(|s| !s.control.borrow().disposed);

        let (pw, ph) = self.extent();
        let ps = self.scale_smooth;
        let po = self.offset_smooth;
        for slot in &self.children {
            let mut child = slot.control.borrow_mut();
            let Some(mut frame) = child.frame else {
                continue;
            };
            frame.offset_smooth += (frame.offset - frame.offset_smooth) * SUB_OFFSET_BLEND;
            let wf = frame.width / pw;
            let hf = frame.height / ph;
            child.scale = Vec2::new(ps.x * wf, ps.y * hf);
            child.scale_smooth = child.scale;
            child.offset = Vec2::new(
                po.x / wf - frame.offset_smooth.x / frame.width,
                po.y / hf - frame.offset_smooth.y / frame.height,
            );
            child.offset_smooth = child.offset;
            child.frame = Some(frame);
            child.last_time = Some(time);
            child.update_children(time);
        }
    }

    /// Clamps the pan offset into the configured bounds, per axis.
    ///
    /// An axis whose raw and smoothed scales differ by more than 1% is
    /// actively zooming and is left unclamped until it settles, avoiding a
    /// visible snap mid-gesture.
    pub fn restrict_pos(&mut self) {
        let o = &self.options;
        let settled_x =
            (self.scale.x - self.scale_smooth.x).abs() <= CLAMP_SUPPRESS_RATIO * self.scale.x.abs();
        let settled_y =
            (self.scale.y - self.scale_smooth.y).abs() <= CLAMP_SUPPRESS_RATIO * self.scale.y.abs();

        let mut min_x = o.min_x_pos;
        let mut max_x = o.max_x_pos;
        let mut min_y = o.min_y_pos;
        let mut max_y = o.max_y_pos;
        if o.include_size_in_max_pos {
            max_x -= o.min_screen_in_view.x / self.scale.x;
            max_y -= o.min_screen_in_view.y / self.scale.y;
        }
        if o.scale_min_pos {
            min_x /= self.scale.x;
            min_y /= self.scale.y;
        }

        let pan = self.pan_mut();
        if settled_x {
            pan.x = pan.x.min(max_x).max(min_x);
        }
        if settled_y {
            pan.y = pan.y.min(max_y).max(min_y);
        }
    }

    /// Wheel input: axis-gated zoom (or shift-scroll), anchored at the
    /// cursor.
    pub fn handle_wheel(&mut self, evt: &WheelEvent) {
        let delta = evt.normalized_delta().y;
        if !delta.is_finite() || delta == 0.0 {
            return;
        }

        if self.options.scroll_x_on_wheel_using_shift && evt.modifiers.contains(Modifiers::SHIFT) {
            let width = self.view_size.width.max(1.0);
            let step = (delta / width) / self.scale.x;
            self.pan_mut().x += step;
            self.restrict_pos();
            self.notify_change();
            return;
        }

        let factor = ((1000.0 - delta * self.options.zoom_speed) / 1000.0).max(MIN_WHEEL_FACTOR);
        let margin = self.options.zoom_margin_px;
        if evt.position.x > margin && !evt.modifiers.contains(Modifiers::ALT) {
            let (min_x, max_x) = self.options.x_scale_range();
            self.scale.x = (self.scale.x * factor).min(max_x).max(min_x);
        }
        if evt.position.y > margin && !evt.modifiers.contains(Modifiers::SHIFT) {
            let (min_y, max_y) = self.options.y_scale_range();
            self.scale.y = (self.scale.y * factor).min(max_y).max(min_y);
        }
        self.zoom_center = self.normalized(evt.position);
        self.restrict_pos();
        self.notify_change();
    }

    /// Pointer press: routes `down` through the chain; if no handler
    /// consumes it the press starts panning the control.
    pub fn handle_pointer_down(&mut self, evt: &PointerEvent) {
        let norm = self.normalized(evt.position);
        self.pointer_down_at(norm, evt.time);
    }

    /// Pointer movement: routes `move`, advances drag classification, and
    /// pans while a panning press is held.
    pub fn handle_pointer_move(&mut self, evt: &PointerEvent) {
        let norm = self.normalized(evt.position);
        self.pointer_move_at(norm, evt.time);
    }

    /// Pointer release: routes `up` and ends any panning.
    pub fn handle_pointer_up(&mut self, evt: &PointerEvent) {
        let norm = self.normalized(evt.position);
        self.pointer_up_at(norm);
    }

    // The normalized-space press/move/release machine. Called with
    // element-derived coordinates at the root and with mapped coordinates
    // when a parent delegates into a hit child.
    fn pointer_down_at(&mut self, norm: Point, time: f64) {
        let world = self.world(norm);
        self.mouse = world;
        self.mouse_norm = norm;
        let consumed = self.route(norm, world, Routed::Down(time));
        let baseline = self.pan();
        self.gesture.down(norm, time, baseline, !consumed);
        self.recompute_cursor();
    }

    fn pointer_move_at(&mut self, norm: Point, time: f64) {
        let world = self.world(norm);
        self.mouse = world;
        self.mouse_norm = norm;
        self.route(norm, world, Routed::Move(time));

        let delta = self.gesture.movement(
            norm,
            time,
            self.options.drag_distance,
            self.options.drag_speed,
        );
        if self.gesture.panning {
            let baseline = self.gesture.baseline;
            let scale = self.scale;
            let pan = self.pan_mut();
            pan.x = baseline.x - delta.x / scale.x;
            pan.y = baseline.y - delta.y / scale.y;
            self.restrict_pos();
            self.notify_change();
        }
        self.recompute_cursor();
    }

    fn pointer_up_at(&mut self, norm: Point) {
        let world = self.world(norm);
        self.mouse = world;
        self.mouse_norm = norm;
        self.route(norm, world, Routed::Up);
        self.gesture.up();
        self.recompute_cursor();
    }

    /// Native click, gated on drag classification: a press that panned or
    /// dragged does not also click.
    pub fn handle_click(&mut self, evt: &PointerEvent) {
        if self.gesture.dragged {
            return;
        }
        let norm = self.normalized(evt.position);
        let world = self.world(norm);
        self.route(norm, world, Routed::Click);
    }

    /// Native double click, gated like [`handle_click`](Self::handle_click).
    pub fn handle_double_click(&mut self, evt: &PointerEvent) {
        if self.gesture.dragged {
            return;
        }
        let norm = self.normalized(evt.position);
        let world = self.world(norm);
        self.route(norm, world, Routed::DoubleClick);
    }

    /// The pointer entered the control's element; keyboard events are
    /// delivered while it stays inside.
    pub fn handle_pointer_enter(&mut self) {
        self.pointer_inside = true;
    }

    /// The pointer left the control's element.
    pub fn handle_pointer_leave(&mut self) {
        self.pointer_inside = false;
        let (norm, world) = (self.mouse_norm, self.mouse);
        self.route(norm, world, Routed::Leave);
        self.recompute_cursor();
    }

    /// Key press, routed at the last pointer position while the pointer is
    /// inside.
    pub fn handle_key_down(&mut self, key: &KeyEvent) {
        if !self.pointer_inside {
            return;
        }
        self.key_still_down = true;
        let (norm, world) = (self.mouse_norm, self.mouse);
        self.route(norm, world, Routed::Key(key, false));
    }

    /// Key release; still delivered after the pointer leaves if the press
    /// was seen, so handlers observe a balanced down/up pair.
    pub fn handle_key_up(&mut self, key: &KeyEvent) {
        if !self.pointer_inside && !self.key_still_down {
            return;
        }
        self.key_still_down = false;
        let (norm, world) = (self.mouse_norm, self.mouse);
        self.route(norm, world, Routed::Key(key, true));
    }

    /// Converts an element-local pixel position to normalized (y-up) space.
    #[must_use]
    pub fn normalized(&self, px: Point) -> Point {
        let w = self.view_size.width.max(f64::MIN_POSITIVE);
        let h = self.view_size.height.max(f64::MIN_POSITIVE);
        Point::new(px.x / w, 1.0 - px.y / h)
    }

    /// Converts a normalized position to world coordinates.
    #[must_use]
    pub fn world(&self, norm: Point) -> Point {
        Point::new(
            self.offset.x + norm.x / self.scale.x,
            self.offset.y + norm.y / self.scale.y,
        )
    }

    fn extent(&self) -> (f64, f64) {
        self.frame.as_ref().map_or((1.0, 1.0), |f| (f.width, f.height))
    }

    fn pan(&self) -> Vec2 {
        self.frame.as_ref().map_or(self.offset, |f| f.offset)
    }

    fn pan_mut(&mut self) -> &mut Vec2 {
        match &mut self.frame {
            Some(frame) => &mut frame.offset,
            None => &mut self.offset,
        }
    }

    fn notify_change(&mut self) {
        if let Some(callback) = &mut self.on_change {
            callback();
        }
    }

    /// Routes one event through capture, children, then own handlers.
    fn route(&mut self, norm: Point, world: Point, ev: Routed<'_>) -> bool {
        if let Some(captured) = self.captured.clone() {
            return self.invoke(&captured, world, ev);
        }

        if self.route_children(norm, ev) {
            return true;
        }

        // Snapshot so a handler may unregister others mid-dispatch.
        let snapshot: SmallVec<[HandlerRef; 8]> = self.handlers.iter().cloned().collect();
        for handler in &snapshot {
            if self.invoke(handler, world, ev) {
                return true;
            }
        }
        false
    }

    fn invoke(&mut self, handler: &HandlerRef, world: Point, ev: Routed<'_>) -> bool {
        let mut ctx = EventCtx::default();
        let consumed = {
            let mut h = handler.borrow_mut();
            let state = h.state();
            if !(state.visible && state.enabled) {
                false
            } else {
                match ev {
                    Routed::Click => h.on_click(&mut ctx, world),
                    Routed::DoubleClick => h.on_double_click(&mut ctx, world),
                    Routed::Move(_) => h.on_move(&mut ctx, world),
                    Routed::Down(_) => h.on_down(&mut ctx, world),
                    Routed::Up => h.on_up(&mut ctx, world),
                    Routed::Leave => h.on_leave(&mut ctx),
                    Routed::Key(key, up) => h.on_key(&mut ctx, world, key, up),
                }
            }
        };
        if let Some(captured) = ctx.capture {
            self.handle_capture_change(handler, captured);
        }
        if let Some(focused) = ctx.focus {
            self.handle_focus_change(handler, focused);
        }
        for removed in &ctx.removals {
            self.remove_handler(removed);
        }
        consumed
    }

    fn route_children(&mut self, norm: Point, ev: Routed<'_>) -> bool {
        if self.children.is_empty() {
            return false;
        }
        self.children.retain(|s| !s.control.borrow().disposed);
        let (pw, ph) = self.extent();

        for index in 0..self.children.len() {
            let (control, was_inside, down) = {
                let slot = &self.children[index];
                (slot.control.clone(), slot.was_inside, slot.down)
            };

            let Some((mapped, in_range)) = ({
                let child = control.borrow();
                child.frame.map(|frame| {
                    let mapped = Point::new(
                        (norm.x * pw - frame.x_offset) / frame.width,
                        (norm.y * ph - frame.y_offset) / frame.height,
                    );
                    let tol_x = CHILD_HIT_TOLERANCE / child.scale.x;
                    let tol_y = CHILD_HIT_TOLERANCE / child.scale.y;
                    let in_range = mapped.x >= -tol_x
                        && mapped.x <= 1.0 + tol_x
                        && mapped.y >= -tol_y
                        && mapped.y <= 1.0 + tol_y;
                    (mapped, in_range)
                })
            }) else {
                continue;
            };

            let held = down || control.borrow().captured.is_some();
            if in_range || held {
                // Press, move, and release are delegated to the child's own
                // input machine, so an unconsumed press pans the child's
                // sub-offset, never the parent. Other categories bubble back
                // up when the child's chain declines them.
                let consumed = {
                    let mut child = control.borrow_mut();
                    match ev {
                        Routed::Down(time) => {
                            child.pointer_down_at(mapped, time);
                            true
                        }
                        Routed::Move(time) => {
                            child.pointer_move_at(mapped, time);
                            true
                        }
                        Routed::Up => {
                            child.pointer_up_at(mapped);
                            true
                        }
                        _ => {
                            let world = child.world(mapped);
                            child.mouse = world;
                            child.mouse_norm = mapped;
                            child.route(mapped, world, ev)
                        }
                    }
                };
                let slot = &mut self.children[index];
                slot.was_inside = true;
                match ev {
                    Routed::Down(_) => slot.down = true,
                    Routed::Up => slot.down = false,
                    _ => {}
                }
                if consumed {
                    return true;
                }
            } else if was_inside {
                let mut child = control.borrow_mut();
                let (cn, cw) = (child.mouse_norm, child.mouse);
                child.route(cn, cw, Routed::Leave);
                drop(child);
                self.children[index].was_inside = false;
            }
        }
        false
    }

    /// Recomputes the effective cursor: the captured handler's cursor wins;
    /// otherwise the first active child or eligible handler with a
    /// non-empty cursor; otherwise empty.
    fn recompute_cursor(&mut self) {
        let mut cursor = String::new();
        if let Some(captured) = &self.captured {
            cursor = captured.borrow().state().cursor.clone();
        } else {
            for slot in &self.children {
                if !slot.was_inside {
                    continue;
                }
                let child = slot.control.borrow();
                if !child.cursor.is_empty() {
                    cursor = child.cursor.clone();
                    break;
                }
            }
            if cursor.is_empty() {
                for handler in &self.handlers {
                    let h = handler.borrow();
                    let state = h.state();
                    if state.visible && state.enabled && !state.cursor.is_empty() {
                        cursor = state.cursor.clone();
                        break;
                    }
                }
            }
        }
        if cursor != self.cursor {
            self.cursor = cursor;
            if let Some(sink) = &mut self.cursor_sink {
                sink(&self.cursor);
            }
        }
    }
}

impl fmt::Debug for PanZoomControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanZoomControl")
            .field("scale", &self.scale)
            .field("offset", &self.offset)
            .field("scale_smooth", &self.scale_smooth)
            .field("offset_smooth", &self.offset_smooth)
            .field("zoom_center", &self.zoom_center)
            .field("handlers", &self.handlers.len())
            .field("captured", &self.captured.is_some())
            .field("focused", &self.focused.is_some())
            .field("children", &self.children.len())
            .field("frame", &self.frame)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
