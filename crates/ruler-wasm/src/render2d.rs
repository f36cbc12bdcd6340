//! Canvas2D renderer for the overlay view.
//!
//! Paints, bottom to top: the dimming layer, shapes with their size labels,
//! the active shape's outline/handles/delete control, then the crosshair.

use ruler_core::Rect;
use ruler_render::view::{GuideLines, ShapeView};
use ruler_render::OverlayView;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const ACTIVE_OUTLINE: &str = "#4FC3F7";
const HANDLE_FILL: &str = "#FFFFFF";
const DELETE_FILL: &str = "#EF4444";
const LABEL_FONT: &str = "11px -apple-system, BlinkMacSystemFont, sans-serif";

pub fn render_overlay(ctx: &CanvasRenderingContext2d, view: &OverlayView, width: f64, height: f64) {
    ctx.clear_rect(0.0, 0.0, width, height);
    if !view.visible {
        return;
    }

    ctx.set_fill_style_str(&view.dim);
    ctx.fill_rect(0.0, 0.0, width, height);

    for shape in &view.shapes {
        draw_shape(ctx, shape);
    }

    if let Some(lines) = &view.lines {
        draw_guides(ctx, lines, width, height);
    }
}

fn xywh(r: &Rect) -> (f64, f64, f64, f64) {
    (r.x as f64, r.y as f64, r.width as f64, r.height as f64)
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &ShapeView) {
    let (x, y, w, h) = xywh(&shape.rect);

    ctx.save();
    ctx.set_fill_style_str(&shape.fill);
    ctx.fill_rect(x, y, w, h);

    if shape.active {
        ctx.set_stroke_style_str(ACTIVE_OUTLINE);
        ctx.set_line_width(1.0);
        let _ = ctx.set_line_dash(&js_sys::Array::of2(
            &JsValue::from_f64(4.0),
            &JsValue::from_f64(3.0),
        ));
        ctx.stroke_rect(x, y, w, h);
        let _ = ctx.set_line_dash(&js_sys::Array::new());
    }

    draw_label(ctx, &shape.label, x + w / 2.0, y + h / 2.0);

    for handle in &shape.handles {
        let (hx, hy, hw, hh) = xywh(&handle.rect);
        ctx.set_fill_style_str(HANDLE_FILL);
        ctx.fill_rect(hx, hy, hw, hh);
        ctx.set_stroke_style_str(ACTIVE_OUTLINE);
        ctx.stroke_rect(hx, hy, hw, hh);
    }

    if let Some(delete) = &shape.delete {
        draw_delete(ctx, delete);
    }
    ctx.restore();
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &str, cx: f64, cy: f64) {
    ctx.set_font(LABEL_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
    let _ = ctx.fill_text(label, cx, cy);
}

fn draw_delete(ctx: &CanvasRenderingContext2d, r: &Rect) {
    let (x, y, w, h) = xywh(r);
    ctx.set_fill_style_str(DELETE_FILL);
    ctx.fill_rect(x, y, w, h);

    let inset = w * 0.3;
    ctx.set_stroke_style_str(HANDLE_FILL);
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(x + inset, y + inset);
    ctx.line_to(x + w - inset, y + h - inset);
    ctx.move_to(x + w - inset, y + inset);
    ctx.line_to(x + inset, y + h - inset);
    ctx.stroke();
}

fn draw_guides(ctx: &CanvasRenderingContext2d, lines: &GuideLines, width: f64, height: f64) {
    let t = lines.thickness as f64;
    let (px, py) = (lines.x as f64, lines.y as f64);
    ctx.set_fill_style_str(&lines.color);
    ctx.fill_rect(0.0, py - t / 2.0, width, t);
    ctx.fill_rect(px - t / 2.0, 0.0, t, height);
}
