//! Pointer target classification.
//!
//! A pointer-down is routed to exactly one action by the kind of thing it
//! landed on, in strict precedence: resize handle > delete control > shape
//! body > empty canvas > anything else. Two sources feed the same
//! classification: the tag path reported by the page (event target up to
//! the overlay root) and geometric hit testing against the registry for
//! shapes painted onto a canvas.

use ruler_core::{OverlayConfig, Rect, ResizeDir, ShapeId, ShapeRegistry};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A resize handle of the (active) shape.
    Handle { shape: ShapeId, dir: ResizeDir },
    /// The delete control of the (active) shape.
    Delete(ShapeId),
    /// Anywhere else inside a shape.
    ShapeBody(ShapeId),
    /// The bare drawing surface.
    EmptyCanvas,
    /// Something that isn't part of the drawing layer (toolbar, page).
    Other,
}

impl HitTarget {
    pub fn shape(&self) -> Option<ShapeId> {
        match *self {
            HitTarget::Handle { shape, .. } | HitTarget::Delete(shape) | HitTarget::ShapeBody(shape) => {
                Some(shape)
            }
            HitTarget::EmptyCanvas | HitTarget::Other => None,
        }
    }
}

/// A single element tag on the event path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTag {
    Canvas,
    Toolbar,
    Delete,
    Handle(ResizeDir),
    Shape(ShapeId),
}

impl TargetTag {
    /// Parse a `data-ruler` attribute value. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "canvas" => Some(TargetTag::Canvas),
            "toolbar" => Some(TargetTag::Toolbar),
            "delete" => Some(TargetTag::Delete),
            _ => {
                if let Some(dir) = tag.strip_prefix("handle-") {
                    return ResizeDir::from_name(dir).map(TargetTag::Handle);
                }
                ShapeId::parse(tag).map(TargetTag::Shape)
            }
        }
    }
}

/// Classify an event path, innermost element first.
///
/// Handles and the delete control only count when a shape encloses them.
/// The canvas only counts when it is the event target itself; a press that
/// bubbled up to it from some unrelated child is `Other`.
pub fn classify_path<'a>(path: impl IntoIterator<Item = &'a str>) -> HitTarget {
    let mut handle = None;
    let mut delete = false;
    let mut shape = None;
    let mut innermost_canvas = false;

    for (depth, raw) in path.into_iter().enumerate() {
        match TargetTag::parse(raw) {
            Some(TargetTag::Toolbar) => return HitTarget::Other,
            Some(TargetTag::Canvas) => {
                innermost_canvas = depth == 0;
                break;
            }
            Some(TargetTag::Handle(dir)) => handle = handle.or(Some(dir)),
            Some(TargetTag::Delete) => delete = true,
            Some(TargetTag::Shape(id)) => {
                shape = Some(id);
                break;
            }
            None => {}
        }
    }

    match (shape, handle) {
        (Some(shape), Some(dir)) => HitTarget::Handle { shape, dir },
        (Some(id), None) if delete => HitTarget::Delete(id),
        (Some(id), None) => HitTarget::ShapeBody(id),
        (None, _) if innermost_canvas => HitTarget::EmptyCanvas,
        (None, _) => HitTarget::Other,
    }
}

/// Rectangle of the resize handle `dir` on `rect`.
pub fn handle_rect(rect: &Rect, dir: ResizeDir, config: &OverlayConfig) -> Rect {
    let (cx, cy) = dir.anchor(rect);
    Rect::centered(cx, cy, config.handle_size)
}

/// Rectangle of the delete control, just outside the top-right corner so it
/// never overlaps the `ne` handle.
pub fn delete_rect(rect: &Rect, config: &OverlayConfig) -> Rect {
    let size = config.delete_size;
    Rect::new(rect.right() + 2.0, rect.y - size - 2.0, size, size)
}

/// Geometric hit test over the registry.
///
/// Only the active shape exposes handles and a delete control. Bodies are
/// tested topmost (last inserted) first.
pub fn hit_test(registry: &ShapeRegistry, px: f32, py: f32, config: &OverlayConfig) -> HitTarget {
    if let Some(active) = registry.active() {
        for dir in ResizeDir::ALL {
            if handle_rect(&active.rect, dir, config).contains(px, py) {
                return HitTarget::Handle {
                    shape: active.id,
                    dir,
                };
            }
        }
        if delete_rect(&active.rect, config).contains(px, py) {
            return HitTarget::Delete(active.id);
        }
    }

    registry
        .iter()
        .rev()
        .find(|shape| shape.rect.contains(px, py))
        .map(|shape| HitTarget::ShapeBody(shape.id))
        .unwrap_or(HitTarget::EmptyCanvas)
}

/// Classify a press using the page's tag path first, refining a bare canvas
/// hit geometrically for shapes that only exist as painted pixels.
pub fn resolve_target<'a>(
    path: impl IntoIterator<Item = &'a str>,
    registry: &ShapeRegistry,
    px: f32,
    py: f32,
    config: &OverlayConfig,
) -> HitTarget {
    match classify_path(path) {
        HitTarget::EmptyCanvas => hit_test(registry, px, py, config),
        other => other,
    }
}
