//! Overlay state → presentation view model.
//!
//! The view is rebuilt from scratch after every mutation, so affordances
//! that only exist while a shape is active (handles, delete control) are
//! recreated identically on every activation. Painters (the canvas
//! renderer, the DOM shim) consume this instead of the registry.

use crate::hit::{delete_rect, handle_rect};
use ruler_core::model::hex_to_rgba;
use ruler_core::{OverlayConfig, Rect, ResizeDir, Settings, Shape, ShapeId, ShapeRegistry};
use serde::Serialize;
use smallvec::SmallVec;

/// Crosshair guide lines through the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideLines {
    pub x: f32,
    pub y: f32,
    pub thickness: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandleView {
    pub dir: ResizeDir,
    pub rect: Rect,
    pub cursor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeView {
    pub id: ShapeId,
    pub rect: Rect,
    pub fill: String,
    pub active: bool,
    pub label: String,
    pub handles: SmallVec<[HandleView; 8]>,
    pub delete: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub visible: bool,
    /// Dimming layer color, `rgba(0, 0, 0, opacity)`.
    pub dim: String,
    pub lines: Option<GuideLines>,
    pub shapes: Vec<ShapeView>,
}

fn shape_view(shape: &Shape, fill: &str, config: &OverlayConfig) -> ShapeView {
    let (handles, delete) = if shape.active {
        let handles = ResizeDir::ALL
            .into_iter()
            .map(|dir| HandleView {
                dir,
                rect: handle_rect(&shape.rect, dir, config),
                cursor: dir.cursor(),
            })
            .collect();
        (handles, Some(delete_rect(&shape.rect, config)))
    } else {
        (SmallVec::new(), None)
    };

    ShapeView {
        id: shape.id,
        rect: shape.rect,
        fill: fill.to_string(),
        active: shape.active,
        label: shape.size_label(),
        handles,
        delete,
    }
}

/// Build the full view for one frame.
pub fn build_view(
    registry: &ShapeRegistry,
    settings: &Settings,
    pointer: (f32, f32),
    visible: bool,
    config: &OverlayConfig,
) -> OverlayView {
    let fill = hex_to_rgba(&settings.shape_color, settings.shape_opacity);
    let lines = settings.lines_visible.then(|| GuideLines {
        x: pointer.0,
        y: pointer.1,
        thickness: settings.line_thickness,
        color: settings.line_color.clone(),
    });

    OverlayView {
        visible,
        dim: format!("rgba(0, 0, 0, {})", settings.opacity),
        lines,
        shapes: registry
            .iter()
            .map(|shape| shape_view(shape, &fill, config))
            .collect(),
    }
}
