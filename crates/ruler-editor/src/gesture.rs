//! Gesture state and scoped document tracking.
//!
//! A gesture keeps following the pointer after it leaves the element it
//! started on, which needs document-level move/up listeners. Those listeners
//! are owned by a `TrackingGuard`: acquiring the guard attaches them and
//! dropping it detaches them, so every exit path (up, cancel, removal of the
//! shape, reset, unmount) releases them exactly once.

use ruler_core::{Rect, ResizeDir, ShapeId};
use std::rc::Rc;

/// Host hook that attaches and detaches document-level pointer listeners.
pub trait DocumentListeners {
    fn attach(&self);
    fn detach(&self);
}

/// Listeners for hosts that deliver every pointer event anyway (tests,
/// native embedding).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListeners;

impl DocumentListeners for NoopListeners {
    fn attach(&self) {}
    fn detach(&self) {}
}

/// Holds document tracking for as long as it lives.
pub struct TrackingGuard {
    listeners: Rc<dyn DocumentListeners>,
}

impl TrackingGuard {
    pub fn acquire(listeners: &Rc<dyn DocumentListeners>) -> Self {
        listeners.attach();
        Self {
            listeners: Rc::clone(listeners),
        }
    }
}

impl Drop for TrackingGuard {
    fn drop(&mut self) {
        self.listeners.detach();
    }
}

impl std::fmt::Debug for TrackingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TrackingGuard")
    }
}

/// What an in-flight gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureKind {
    Drawing {
        origin: (f32, f32),
        shape: ShapeId,
    },
    Resizing {
        shape: ShapeId,
        dir: ResizeDir,
        origin: (f32, f32),
        original: Rect,
    },
    Dragging {
        shape: ShapeId,
        offset: (f32, f32),
    },
}

impl GestureKind {
    pub fn shape(&self) -> ShapeId {
        match *self {
            GestureKind::Drawing { shape, .. }
            | GestureKind::Resizing { shape, .. }
            | GestureKind::Dragging { shape, .. } => shape,
        }
    }
}

/// A gesture bound to the pointer that started it. No gesture means idle.
#[derive(Debug)]
pub struct ActiveGesture {
    pub kind: GestureKind,
    pub pointer_id: i32,
    _tracking: TrackingGuard,
}

impl ActiveGesture {
    pub fn start(kind: GestureKind, pointer_id: i32, listeners: &Rc<dyn DocumentListeners>) -> Self {
        Self {
            kind,
            pointer_id,
            _tracking: TrackingGuard::acquire(listeners),
        }
    }
}
