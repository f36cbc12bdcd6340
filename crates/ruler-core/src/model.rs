//! Core data model: rectangles, shapes, colors, and the viewport.
//!
//! All coordinates are viewport (client) pixels. Shapes are not clamped to
//! the viewport; only the toolbar is.

use crate::id::ShapeId;
use serde::{Deserialize, Serialize};

// ─── Geometry primitives ─────────────────────────────────────────────────

/// The page viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Rectangle of the given size centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(cx - half, cy - half, size, size)
    }

    pub fn meets_min_size(&self, min: f32) -> bool {
        self.width >= min && self.height >= min
    }
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// A rectangular annotation drawn over the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub rect: Rect,
    pub active: bool,
}

impl Shape {
    pub fn new(id: ShapeId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            active: false,
        }
    }

    /// Size caption shown inside the shape, e.g. `50 x 40`.
    pub fn size_label(&self) -> String {
        format!(
            "{} x {}",
            self.rect.width.round() as i64,
            self.rect.height.round() as i64
        )
    }
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Color used when a hex string can't be parsed.
pub const FALLBACK_RGB: Rgb = Rgb { r: 255, g: 0, b: 0 };

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Rgb {
    /// Parse `#RGB` or `#RRGGBB`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self {
                    r: r * 17,
                    g: g * 17,
                    b: b * 17,
                })
            }
            6 => {
                let pair = |i: usize| -> Option<u8> {
                    Some(hex_val(bytes[i])? * 16 + hex_val(bytes[i + 1])?)
                };
                Some(Self {
                    r: pair(0)?,
                    g: pair(2)?,
                    b: pair(4)?,
                })
            }
            _ => None,
        }
    }

    pub fn to_rgba_css(self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Convert a hex color to a translucent CSS `rgba(...)` string.
///
/// Unparseable input falls back to red; alpha is clamped to `[0, 1]`.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> String {
    Rgb::from_hex(hex)
        .unwrap_or(FALLBACK_RGB)
        .to_rgba_css(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_to_rgba_long_and_short_forms() {
        assert_eq!(hex_to_rgba("#00ff00", 0.5), "rgba(0, 255, 0, 0.5)");
        assert_eq!(hex_to_rgba("#0f0", 0.5), "rgba(0, 255, 0, 0.5)");
        assert_eq!(hex_to_rgba("336699", 1.0), "rgba(51, 102, 153, 1)");
    }

    #[test]
    fn hex_to_rgba_falls_back_to_red() {
        assert_eq!(hex_to_rgba("#12345", 0.3), "rgba(255, 0, 0, 0.3)");
        assert_eq!(hex_to_rgba("#gg0000", 0.3), "rgba(255, 0, 0, 0.3)");
    }

    #[test]
    fn hex_to_rgba_clamps_alpha() {
        assert_eq!(hex_to_rgba("#000", 1.7), "rgba(0, 0, 0, 1)");
        assert_eq!(hex_to_rgba("#000", -0.2), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(30.0, 30.0));
        assert!(!r.contains(30.5, 15.0));
    }

    #[test]
    fn size_label_rounds() {
        let shape = Shape::new(ShapeId::new(0), Rect::new(0.0, 0.0, 49.6, 40.2));
        assert_eq!(shape.size_label(), "50 x 40");
    }
}
