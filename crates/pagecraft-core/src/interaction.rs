//! Move and resize gestures driven by pointer events.
//!
//! Each gesture kind is a two-state machine (`Idle` / `Active`). Starting a
//! gesture registers a global pointer listener; ending it deregisters. A
//! restart while active drops the stale registration first, so at most one
//! registration per kind is ever live.

use crate::canvas::Canvas;
use crate::element::{Coordinate, Dimension, ElementId};
use crate::input::{MouseButton, PointerEvent, drag_delta};
use crate::snap::snap;
use kurbo::Point;

/// Smallest width or height a resize can produce.
pub const MIN_RESIZE_SIZE: f64 = 20.0;
/// Width assumed when resizing an element whose width isn't in pixels.
pub const RESIZE_FALLBACK_WIDTH: f64 = 100.0;
/// Height assumed when resizing an element whose height isn't in pixels.
pub const RESIZE_FALLBACK_HEIGHT: f64 = 50.0;

/// Gesture kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Move,
    Resize,
}

/// Handle for one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

/// Global pointer listeners currently registered, one entry per
/// registration.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    next_token: u64,
    registrations: Vec<(ListenerToken, GestureKind)>,
}

impl ListenerRegistry {
    pub fn register(&mut self, kind: GestureKind) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.registrations.push((token, kind));
        token
    }

    /// Remove a registration. Returns false if it was already gone.
    pub fn deregister(&mut self, token: ListenerToken) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|(t, _)| *t != token);
        self.registrations.len() != before
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn count(&self, kind: GestureKind) -> usize {
        self.registrations.iter().filter(|(_, k)| *k == kind).count()
    }
}

/// State captured when a move starts.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCapture {
    pub element_id: ElementId,
    pub start_pointer: Point,
    pub origin: Point,
}

/// State captured when a resize starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeCapture {
    pub element_id: ElementId,
    pub start_pointer: Point,
    pub orig_width: f64,
    pub orig_height: f64,
}

/// A gesture's state.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureState<C> {
    Idle,
    Active { capture: C, listener: ListenerToken },
}

impl<C> Default for GestureState<C> {
    fn default() -> Self {
        GestureState::Idle
    }
}

impl<C> GestureState<C> {
    pub fn is_active(&self) -> bool {
        matches!(self, GestureState::Active { .. })
    }

    pub fn capture(&self) -> Option<&C> {
        match self {
            GestureState::Active { capture, .. } => Some(capture),
            GestureState::Idle => None,
        }
    }

    /// Go idle, handing back the listener to deregister.
    fn take_listener(&mut self) -> Option<ListenerToken> {
        match std::mem::take(self) {
            GestureState::Active { listener, .. } => Some(listener),
            GestureState::Idle => None,
        }
    }
}

/// Routes pointer events to the move and resize gestures.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    move_gesture: GestureState<MoveCapture>,
    resize_gesture: GestureState<ResizeCapture>,
    listeners: ListenerRegistry,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_state(&self) -> &GestureState<MoveCapture> {
        &self.move_gesture
    }

    pub fn resize_state(&self) -> &GestureState<ResizeCapture> {
        &self.resize_gesture
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Check if any gesture is in progress.
    pub fn is_active(&self) -> bool {
        self.move_gesture.is_active() || self.resize_gesture.is_active()
    }

    /// Start moving an element. Only the primary button starts a move; the
    /// element is selected right away.
    pub fn start_move(&mut self, canvas: &mut Canvas, id: &str, pointer: Point, button: MouseButton) -> bool {
        if !button.is_primary() {
            return false;
        }
        let Some(element) = canvas.element(id) else {
            return false;
        };
        let capture = MoveCapture {
            element_id: element.id.clone(),
            start_pointer: pointer,
            origin: element.position.resolved_origin(canvas.size),
        };
        canvas.select(id);

        if let Some(stale) = self.move_gesture.take_listener() {
            self.listeners.deregister(stale);
        }
        let listener = self.listeners.register(GestureKind::Move);
        self.move_gesture = GestureState::Active { capture, listener };
        log::debug!("Move started on {}", id);
        true
    }

    /// Start resizing an element from its bottom-right corner.
    pub fn start_resize(&mut self, canvas: &Canvas, id: &str, pointer: Point) -> bool {
        let Some(element) = canvas.element(id) else {
            return false;
        };
        let capture = ResizeCapture {
            element_id: element.id.clone(),
            start_pointer: pointer,
            orig_width: element.position.width.fixed_or(RESIZE_FALLBACK_WIDTH),
            orig_height: element.position.height.fixed_or(RESIZE_FALLBACK_HEIGHT),
        };

        if let Some(stale) = self.resize_gesture.take_listener() {
            self.listeners.deregister(stale);
        }
        let listener = self.listeners.register(GestureKind::Resize);
        self.resize_gesture = GestureState::Active { capture, listener };
        log::debug!("Resize started on {}", id);
        true
    }

    /// Apply a pointer move to the active gestures. Returns true if an
    /// element changed.
    pub fn pointer_move(&mut self, canvas: &mut Canvas, pointer: Point) -> bool {
        let mut changed = false;

        if let Some(capture) = self.move_gesture.capture() {
            let delta = drag_delta(capture.start_pointer, pointer);
            if let Some(element) = canvas.element(&capture.element_id) {
                let mut position = element.position.clone();
                position.x = Coordinate::Px(snap(capture.origin.x + delta.x, &canvas.grid));
                position.y = Coordinate::Px(snap(capture.origin.y + delta.y, &canvas.grid));
                let moved = element.with_position(position);
                changed |= canvas.replace_element(moved);
            }
        }

        if let Some(capture) = self.resize_gesture.capture() {
            let delta = drag_delta(capture.start_pointer, pointer);
            if let Some(element) = canvas.element(&capture.element_id) {
                let width = snap(capture.orig_width + delta.x, &canvas.grid).max(MIN_RESIZE_SIZE);
                let height = snap(capture.orig_height + delta.y, &canvas.grid).max(MIN_RESIZE_SIZE);
                let mut position = element.position.clone();
                position.width = Dimension::Fixed(width);
                position.height = Dimension::Fixed(height);
                let resized = element.with_position(position);
                changed |= canvas.replace_element(resized);
            }
        }

        changed
    }

    /// Pointer released: every active gesture ends.
    pub fn pointer_up(&mut self) {
        self.release_all();
    }

    /// End both gestures and drop their listeners.
    pub fn release_all(&mut self) {
        if let Some(listener) = self.move_gesture.take_listener() {
            self.listeners.deregister(listener);
            log::debug!("Move ended");
        }
        if let Some(listener) = self.resize_gesture.take_listener() {
            self.listeners.deregister(listener);
            log::debug!("Resize ended");
        }
    }

    /// Dispatch a raw pointer event.
    ///
    /// A press on the selected element's resize handle starts a resize, a
    /// press on an element starts a move, and a press on empty canvas clears
    /// the selection. Moves and releases are only seen while a gesture holds
    /// a listener.
    pub fn handle_pointer_event(&mut self, canvas: &mut Canvas, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position, button } => {
                if let Some(selected) = canvas.selection.clone() {
                    let on_handle = canvas
                        .resize_handle(&selected)
                        .is_some_and(|handle| handle.contains(position));
                    if on_handle {
                        return self.start_resize(canvas, &selected, position);
                    }
                }
                match canvas.element_at(position).map(|e| e.id.clone()) {
                    Some(id) => self.start_move(canvas, &id, position, button),
                    None => {
                        canvas.clear_selection();
                        false
                    }
                }
            }
            PointerEvent::Move { position } => {
                if self.listeners.is_empty() {
                    return false;
                }
                self.pointer_move(canvas, position)
            }
            PointerEvent::Up { .. } => {
                let was_active = self.is_active();
                self.pointer_up();
                was_active
            }
        }
    }
}
