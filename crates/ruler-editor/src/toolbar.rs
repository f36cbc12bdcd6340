//! Toolbar drag controller.
//!
//! Pressing the toolbar header picks the toolbar up; moves reposition its
//! top-left, clamped so the whole toolbar stays inside the viewport; the
//! primary release (or a cancel) drops it and leaves the final position for
//! the overlay to persist. Runs alongside the shape editor and never
//! touches shapes.

use crate::gesture::{DocumentListeners, TrackingGuard};
use crate::input::{InputEvent, PRIMARY_BUTTON};
use crate::shapes::Tool;
use ruler_core::geometry::clamp_to_viewport;
use ruler_core::{ToolbarPosition, Viewport};
use ruler_render::HitTarget;
use std::rc::Rc;

#[derive(Debug)]
struct Tracking {
    pointer_id: i32,
    /// Pointer minus toolbar top-left at press time.
    offset: (f32, f32),
    size: (f32, f32),
    _guard: TrackingGuard,
}

pub struct ToolbarDrag {
    /// Current `(top, left)` in pixels.
    position: (f32, f32),
    viewport: Viewport,
    tracking: Option<Tracking>,
    /// Position from the last finished drag, not yet persisted.
    released: Option<ToolbarPosition>,
    listeners: Rc<dyn DocumentListeners>,
}

impl ToolbarDrag {
    pub fn new(
        top: f32,
        left: f32,
        viewport: Viewport,
        listeners: Rc<dyn DocumentListeners>,
    ) -> Self {
        Self {
            position: (top, left),
            viewport,
            tracking: None,
            released: None,
            listeners,
        }
    }

    /// `(top, left)` in pixels.
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Move the toolbar without a drag (load-time or resize clamp).
    pub fn set_position(&mut self, top: f32, left: f32) {
        self.position = (top, left);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn is_dragging(&self) -> bool {
        self.tracking.is_some()
    }

    /// Pointer-down on the header. `size` is the toolbar's rendered
    /// `(width, height)`.
    pub fn begin(&mut self, x: f32, y: f32, pointer_id: i32, size: (f32, f32)) -> bool {
        if self.tracking.is_some() {
            return false;
        }
        let (top, left) = self.position;
        self.tracking = Some(Tracking {
            pointer_id,
            offset: (x - left, y - top),
            size,
            _guard: TrackingGuard::acquire(&self.listeners),
        });
        log::debug!("toolbar drag start at top={top} left={left}");
        true
    }

    pub fn update(&mut self, x: f32, y: f32, pointer_id: i32) -> bool {
        let Some(t) = self.tracking.as_ref().filter(|t| t.pointer_id == pointer_id) else {
            return false;
        };
        let (left, top) = clamp_to_viewport(
            x - t.offset.0,
            y - t.offset.1,
            t.size.0,
            t.size.1,
            self.viewport,
        );
        let moved = (top, left) != self.position;
        self.position = (top, left);
        moved
    }

    /// Finish the drag owned by `pointer_id`. Returns the position to
    /// persist.
    pub fn end(&mut self, pointer_id: i32) -> Option<ToolbarPosition> {
        if !self
            .tracking
            .as_ref()
            .is_some_and(|t| t.pointer_id == pointer_id)
        {
            return None;
        }
        self.tracking = None;
        let (top, left) = self.position;
        log::debug!("toolbar drag end at top={top} left={left}");
        Some(ToolbarPosition::from_px(top, left))
    }

    /// The position left by a drag finished through `Tool::handle`.
    pub fn take_released(&mut self) -> Option<ToolbarPosition> {
        self.released.take()
    }

    /// Drop tracking without persisting.
    pub fn abort(&mut self) {
        self.tracking = None;
        self.released = None;
    }
}

impl Tool for ToolbarDrag {
    /// Presses are started through `begin`, which needs the toolbar size;
    /// here only moves, releases and cancels are consumed.
    fn handle(&mut self, event: &InputEvent, _target: HitTarget) -> bool {
        let finished = match *event {
            InputEvent::PointerMove { x, y, pointer_id } => return self.update(x, y, pointer_id),
            InputEvent::PointerUp {
                button, pointer_id, ..
            } if button == PRIMARY_BUTTON => self.end(pointer_id),
            InputEvent::PointerCancel { pointer_id } => self.end(pointer_id),
            _ => None,
        };
        match finished {
            Some(pos) => {
                self.released = Some(pos);
                true
            }
            None => false,
        }
    }

    fn is_tracking(&self) -> bool {
        self.is_dragging()
    }
}
