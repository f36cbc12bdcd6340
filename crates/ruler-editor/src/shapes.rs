//! Shape annotation engine.
//!
//! Owns the shape registry and the current gesture for one mounted overlay.
//! Pointer-downs are classified into a `HitTarget` by the caller and routed
//! here to exactly one action; moves and ups are forwarded to the gesture
//! that owns the pointer.
//!
//! ## Routing
//!
//! | Target | Primary press |
//! |--------|---------------|
//! | Handle of active shape | begin resize |
//! | Delete control of active shape | remove shape |
//! | Shape body | double activation toggles, else drag if active |
//! | Empty canvas | begin draw |
//! | Other | deactivate only |

use crate::gesture::{ActiveGesture, DocumentListeners, GestureKind};
use crate::input::{InputEvent, PRIMARY_BUTTON};
use crate::tap::TapDetector;
use ruler_core::geometry::{normalize_rect, nudge_rect, resize_rect};
use ruler_core::{NudgeDir, OverlayConfig, Rect, ResizeDir, ShapeId, ShapeRegistry};
use ruler_render::HitTarget;
use std::rc::Rc;

/// Something that consumes pointer input against a classified target.
///
/// Returns `true` when anything visible changed and the overlay should
/// repaint.
pub trait Tool {
    fn handle(&mut self, event: &InputEvent, target: HitTarget) -> bool;

    /// Whether a gesture currently owns the pointer.
    fn is_tracking(&self) -> bool;
}

/// Double-activation key: taps on different targets never pair up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapTarget {
    Canvas,
    Shape(ShapeId),
}

pub struct ShapeEditor {
    registry: ShapeRegistry,
    gesture: Option<ActiveGesture>,
    taps: TapDetector<TapTarget>,
    listeners: Rc<dyn DocumentListeners>,
    config: OverlayConfig,
}

impl ShapeEditor {
    pub fn new(config: OverlayConfig, listeners: Rc<dyn DocumentListeners>) -> Self {
        Self {
            registry: ShapeRegistry::new(),
            gesture: None,
            taps: TapDetector::new(config.double_tap_ms, config.double_tap_distance),
            listeners,
            config,
        }
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn gesture(&self) -> Option<&GestureKind> {
        self.gesture.as_ref().map(|g| &g.kind)
    }

    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    fn start(&mut self, kind: GestureKind, pointer_id: i32) {
        log::debug!("gesture start: {kind:?}");
        self.gesture = Some(ActiveGesture::start(kind, pointer_id, &self.listeners));
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Insert a zero-size inactive shape at the pointer and start drawing it.
    /// Returns `None` while another gesture is running.
    pub fn begin_draw(&mut self, x: f32, y: f32, pointer_id: i32) -> Option<ShapeId> {
        if !self.is_idle() {
            return None;
        }
        let shape = self.registry.insert(Rect::new(x, y, 0.0, 0.0));
        self.start(
            GestureKind::Drawing {
                origin: (x, y),
                shape,
            },
            pointer_id,
        );
        Some(shape)
    }

    /// Stretch the shape being drawn to the box between origin and pointer.
    pub fn update_draw(&mut self, shape: ShapeId, x: f32, y: f32) -> bool {
        let Some(GestureKind::Drawing { origin, shape: drawing }) = self.gesture() else {
            return false;
        };
        if *drawing != shape {
            return false;
        }
        let rect = normalize_rect(origin.0, origin.1, x, y);
        self.registry.set_rect(shape, rect)
    }

    /// Keep the shape if both sides reach the minimum size, else drop it.
    /// Returns `true` if the shape was kept.
    pub fn commit_or_discard_draw(&mut self, shape: ShapeId) -> bool {
        let Some(rect) = self.registry.rect(shape) else {
            return false;
        };
        if rect.meets_min_size(self.config.min_size) {
            log::debug!("committed {shape} ({} x {})", rect.width, rect.height);
            true
        } else {
            self.registry.remove(shape);
            log::debug!("discarded {shape}: below minimum size");
            false
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn activate(&mut self, shape: ShapeId) -> bool {
        if self.registry.active_id() == Some(shape) {
            return false;
        }
        self.registry.activate(shape)
    }

    pub fn deactivate(&mut self, shape: ShapeId) -> bool {
        self.registry.deactivate(shape)
    }

    /// Deactivate whichever shape is active.
    pub fn deactivate_all(&mut self) -> bool {
        match self.registry.active_id() {
            Some(id) => self.registry.deactivate(id),
            None => false,
        }
    }

    pub fn toggle_active(&mut self, shape: ShapeId) -> bool {
        if self.registry.active_id() == Some(shape) {
            self.deactivate(shape)
        } else {
            self.activate(shape)
        }
    }

    /// Remove a shape. A gesture operating on it ends without committing.
    pub fn remove(&mut self, shape: ShapeId) -> bool {
        if self.gesture().is_some_and(|g| g.shape() == shape) {
            self.gesture = None;
        }
        match self.registry.remove(shape) {
            Some(_) => {
                log::debug!("removed {shape}");
                true
            }
            None => {
                log::debug!("remove ignored: {shape} no longer exists");
                false
            }
        }
    }

    /// One-pixel keyboard adjustment of the active shape. `grow` moves the
    /// leading edge outward; otherwise the trailing edge moves inward and
    /// the change is refused below the minimum size.
    pub fn nudge(&mut self, dir: NudgeDir, grow: bool) -> bool {
        let Some(active) = self.registry.active() else {
            return false;
        };
        let id = active.id;
        match nudge_rect(active.rect, dir, grow, self.config.min_size) {
            Some(rect) => self.registry.set_rect(id, rect),
            None => false,
        }
    }

    // ─── Resize & drag ───────────────────────────────────────────────────

    /// Start resizing the active shape from handle `dir`.
    pub fn begin_resize(
        &mut self,
        shape: ShapeId,
        dir: ResizeDir,
        x: f32,
        y: f32,
        pointer_id: i32,
    ) -> bool {
        if !self.is_idle() || self.registry.active_id() != Some(shape) {
            return false;
        }
        let Some(original) = self.registry.rect(shape) else {
            return false;
        };
        self.start(
            GestureKind::Resizing {
                shape,
                dir,
                origin: (x, y),
                original,
            },
            pointer_id,
        );
        true
    }

    pub fn update_resize(&mut self, x: f32, y: f32) -> bool {
        let Some(&GestureKind::Resizing {
            shape,
            dir,
            origin,
            original,
        }) = self.gesture()
        else {
            return false;
        };
        let rect = resize_rect(
            original,
            dir,
            x - origin.0,
            y - origin.1,
            self.config.min_size,
        );
        self.registry.set_rect(shape, rect)
    }

    /// Start dragging the active shape. The grab offset stays fixed.
    pub fn begin_drag(&mut self, shape: ShapeId, x: f32, y: f32, pointer_id: i32) -> bool {
        if !self.is_idle() || self.registry.active_id() != Some(shape) {
            return false;
        }
        let Some(rect) = self.registry.rect(shape) else {
            return false;
        };
        self.start(
            GestureKind::Dragging {
                shape,
                offset: (x - rect.x, y - rect.y),
            },
            pointer_id,
        );
        true
    }

    pub fn update_drag(&mut self, x: f32, y: f32) -> bool {
        let Some(&GestureKind::Dragging { shape, offset }) = self.gesture() else {
            return false;
        };
        let Some(rect) = self.registry.rect(shape) else {
            return false;
        };
        self.registry.set_rect(
            shape,
            Rect {
                x: x - offset.0,
                y: y - offset.1,
                ..rect
            },
        )
    }

    /// Finish whatever gesture is running and release tracking. A draw is
    /// committed or discarded.
    pub fn end_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        log::debug!("gesture end: {:?}", gesture.kind);
        match gesture.kind {
            GestureKind::Drawing { shape, .. } => {
                self.commit_or_discard_draw(shape);
                true
            }
            GestureKind::Resizing { .. } | GestureKind::Dragging { .. } => false,
        }
    }

    /// Drop every shape and any running gesture.
    pub fn clear(&mut self) {
        self.gesture = None;
        self.taps.reset();
        self.registry.clear();
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    fn pointer_down(&mut self, x: f32, y: f32, pointer_id: i32, time_ms: f64, target: HitTarget) -> bool {
        let active = self.registry.active_id();
        let mut changed = false;

        if let Some(active) = active
            && target.shape() != Some(active)
        {
            changed |= self.deactivate(active);
        }

        match target {
            HitTarget::Handle { shape, dir } if active == Some(shape) => {
                changed | self.begin_resize(shape, dir, x, y, pointer_id)
            }
            HitTarget::Delete(shape) if active == Some(shape) => {
                self.taps.reset();
                changed | self.remove(shape)
            }
            HitTarget::Handle { shape, .. } | HitTarget::Delete(shape) | HitTarget::ShapeBody(shape) => {
                if !self.registry.contains(shape) {
                    log::debug!("press on stale {shape} ignored");
                    return changed;
                }
                if self.taps.register(TapTarget::Shape(shape), x, y, time_ms) {
                    return changed | self.toggle_active(shape);
                }
                if active == Some(shape) {
                    self.begin_drag(shape, x, y, pointer_id);
                }
                changed
            }
            HitTarget::EmptyCanvas => {
                self.taps.register(TapTarget::Canvas, x, y, time_ms);
                changed | self.begin_draw(x, y, pointer_id).is_some()
            }
            HitTarget::Other => changed,
        }
    }

    fn owns(&self, pointer_id: i32) -> bool {
        self.gesture
            .as_ref()
            .is_some_and(|g| g.pointer_id == pointer_id)
    }
}

impl Tool for ShapeEditor {
    fn handle(&mut self, event: &InputEvent, target: HitTarget) -> bool {
        match *event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                pointer_id,
                time_ms,
                ..
            } => {
                if !self.is_idle() || button != PRIMARY_BUTTON {
                    return false;
                }
                self.pointer_down(x, y, pointer_id, time_ms, target)
            }
            InputEvent::PointerMove { x, y, pointer_id } => {
                if !self.owns(pointer_id) {
                    return false;
                }
                match self.gesture().copied() {
                    Some(GestureKind::Drawing { shape, .. }) => self.update_draw(shape, x, y),
                    Some(GestureKind::Resizing { .. }) => self.update_resize(x, y),
                    Some(GestureKind::Dragging { .. }) => self.update_drag(x, y),
                    None => false,
                }
            }
            InputEvent::PointerUp {
                button, pointer_id, ..
            } => {
                if !self.owns(pointer_id) || button != PRIMARY_BUTTON {
                    return false;
                }
                self.end_gesture()
            }
            InputEvent::PointerCancel { pointer_id } => {
                if !self.owns(pointer_id) {
                    return false;
                }
                self.end_gesture()
            }
            InputEvent::Key { .. } => false,
        }
    }

    fn is_tracking(&self) -> bool {
        !self.is_idle()
    }
}
