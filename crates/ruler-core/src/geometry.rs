//! Pure rectangle math used by the interaction engine.

use crate::config::OverlayConfig;
use crate::model::{Rect, Viewport};
use serde::{Deserialize, Serialize};

/// Compass direction of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDir {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeDir {
    /// Handle order, clockwise from the top-left corner.
    pub const ALL: [ResizeDir; 8] = [
        ResizeDir::Nw,
        ResizeDir::N,
        ResizeDir::Ne,
        ResizeDir::E,
        ResizeDir::Se,
        ResizeDir::S,
        ResizeDir::Sw,
        ResizeDir::W,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeDir::N => "n",
            ResizeDir::Ne => "ne",
            ResizeDir::E => "e",
            ResizeDir::Se => "se",
            ResizeDir::S => "s",
            ResizeDir::Sw => "sw",
            ResizeDir::W => "w",
            ResizeDir::Nw => "nw",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.as_str() == name)
    }

    pub fn has_north(self) -> bool {
        matches!(self, ResizeDir::N | ResizeDir::Ne | ResizeDir::Nw)
    }

    pub fn has_south(self) -> bool {
        matches!(self, ResizeDir::S | ResizeDir::Se | ResizeDir::Sw)
    }

    pub fn has_east(self) -> bool {
        matches!(self, ResizeDir::E | ResizeDir::Ne | ResizeDir::Se)
    }

    pub fn has_west(self) -> bool {
        matches!(self, ResizeDir::W | ResizeDir::Nw | ResizeDir::Sw)
    }

    /// CSS cursor shown over the handle.
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeDir::N | ResizeDir::S => "ns-resize",
            ResizeDir::E | ResizeDir::W => "ew-resize",
            ResizeDir::Ne | ResizeDir::Sw => "nesw-resize",
            ResizeDir::Nw | ResizeDir::Se => "nwse-resize",
        }
    }

    /// Handle anchor point on the border of `rect`.
    pub fn anchor(self, rect: &Rect) -> (f32, f32) {
        let x = if self.has_west() {
            rect.x
        } else if self.has_east() {
            rect.right()
        } else {
            rect.x + rect.width / 2.0
        };
        let y = if self.has_north() {
            rect.y
        } else if self.has_south() {
            rect.bottom()
        } else {
            rect.y + rect.height / 2.0
        };
        (x, y)
    }
}

/// Arrow-key direction for keyboard nudging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDir {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDir {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(NudgeDir::Up),
            "ArrowDown" => Some(NudgeDir::Down),
            "ArrowLeft" => Some(NudgeDir::Left),
            "ArrowRight" => Some(NudgeDir::Right),
            _ => None,
        }
    }
}

/// Bounding box of two points.
pub fn normalize_rect(ax: f32, ay: f32, bx: f32, by: f32) -> Rect {
    Rect::new(ax.min(bx), ay.min(by), (bx - ax).abs(), (by - ay).abs())
}

/// Floor width and height at `min`, keeping the top-left corner.
pub fn clamp_min_size(rect: Rect, min: f32) -> Rect {
    Rect {
        width: rect.width.max(min),
        height: rect.height.max(min),
        ..rect
    }
}

/// Recompute a rectangle from the one captured at resize start.
///
/// `dx`/`dy` are the pointer travel since the gesture began. When the floor
/// kicks in on a west or north drag, the opposite edge stays where it was.
pub fn resize_rect(original: Rect, dir: ResizeDir, dx: f32, dy: f32, min: f32) -> Rect {
    let mut r = original;

    if dir.has_east() {
        r.width = original.width + dx;
    } else if dir.has_west() {
        r.width = original.width - dx;
        r.x = original.x + dx;
    }
    if dir.has_south() {
        r.height = original.height + dy;
    } else if dir.has_north() {
        r.height = original.height - dy;
        r.y = original.y + dy;
    }

    if r.width < min {
        if dir.has_west() {
            r.x = original.right() - min;
        }
        r.width = min;
    }
    if r.height < min {
        if dir.has_north() {
            r.y = original.bottom() - min;
        }
        r.height = min;
    }
    r
}

/// One-pixel keyboard adjustment.
///
/// The arrow names the direction an edge moves: growing moves the leading
/// edge outward, shrinking moves the trailing edge inward. Returns `None`
/// when a shrink would drop below `min`.
pub fn nudge_rect(rect: Rect, dir: NudgeDir, grow: bool, min: f32) -> Option<Rect> {
    let mut r = rect;
    if grow {
        match dir {
            NudgeDir::Up => {
                r.y -= 1.0;
                r.height += 1.0;
            }
            NudgeDir::Down => r.height += 1.0,
            NudgeDir::Left => {
                r.x -= 1.0;
                r.width += 1.0;
            }
            NudgeDir::Right => r.width += 1.0,
        }
        return Some(r);
    }

    match dir {
        NudgeDir::Up | NudgeDir::Down => {
            if rect.height - 1.0 < min {
                return None;
            }
            r.height -= 1.0;
            if dir == NudgeDir::Down {
                r.y += 1.0;
            }
        }
        NudgeDir::Left | NudgeDir::Right => {
            if rect.width - 1.0 < min {
                return None;
            }
            r.width -= 1.0;
            if dir == NudgeDir::Right {
                r.x += 1.0;
            }
        }
    }
    Some(r)
}

/// Keep a `width` x `height` box at `(x, y)` fully inside the viewport.
///
/// A box larger than the viewport is pinned to the top-left corner.
pub fn clamp_to_viewport(x: f32, y: f32, width: f32, height: f32, viewport: Viewport) -> (f32, f32) {
    let max_x = (viewport.width - width).max(0.0);
    let max_y = (viewport.height - height).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Clamp a stored toolbar `(top, left)` so the toolbar stays reachable
/// after a resolution change. The lower bound wins on tiny viewports.
pub fn safe_toolbar_position(
    top: f32,
    left: f32,
    viewport: Viewport,
    config: &OverlayConfig,
) -> (f32, f32) {
    let pad = config.toolbar_padding;
    let safe_top = top
        .min(viewport.height - config.toolbar_height - pad)
        .max(pad);
    let safe_left = left.min(viewport.width - config.toolbar_width - pad).max(pad);
    (safe_top, safe_left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MIN: f32 = 5.0;

    #[test]
    fn normalize_rect_any_drag_direction() {
        assert_eq!(
            normalize_rect(150.0, 140.0, 100.0, 100.0),
            Rect::new(100.0, 100.0, 50.0, 40.0)
        );
    }

    #[test]
    fn resize_se_grows_both() {
        let r = resize_rect(Rect::new(100.0, 100.0, 50.0, 40.0), ResizeDir::Se, 10.0, 10.0, MIN);
        assert_eq!(r, Rect::new(100.0, 100.0, 60.0, 50.0));
    }

    #[test]
    fn resize_nw_moves_origin() {
        let r = resize_rect(Rect::new(100.0, 100.0, 50.0, 40.0), ResizeDir::Nw, 10.0, -5.0, MIN);
        assert_eq!(r, Rect::new(110.0, 95.0, 40.0, 45.0));
    }

    #[test]
    fn resize_west_floor_pins_right_edge() {
        let original = Rect::new(100.0, 100.0, 50.0, 40.0);
        let r = resize_rect(original, ResizeDir::W, 80.0, 0.0, MIN);
        assert_eq!(r.width, MIN);
        assert_eq!(r.right(), original.right());
    }

    #[test]
    fn resize_north_floor_pins_bottom_edge() {
        let original = Rect::new(100.0, 100.0, 50.0, 40.0);
        let r = resize_rect(original, ResizeDir::N, 0.0, 300.0, MIN);
        assert_eq!(r.height, MIN);
        assert_eq!(r.bottom(), original.bottom());
    }

    #[test]
    fn resize_east_floor_keeps_left_edge() {
        let original = Rect::new(100.0, 100.0, 50.0, 40.0);
        let r = resize_rect(original, ResizeDir::E, -100.0, 0.0, MIN);
        assert_eq!(r, Rect::new(100.0, 100.0, MIN, 40.0));
    }

    #[test]
    fn resize_edge_handles_ignore_other_axis() {
        let original = Rect::new(0.0, 0.0, 20.0, 20.0);
        let r = resize_rect(original, ResizeDir::S, 50.0, 5.0, MIN);
        assert_eq!(r, Rect::new(0.0, 0.0, 20.0, 25.0));
    }

    #[test]
    fn nudge_grow_moves_leading_edge() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(
            nudge_rect(r, NudgeDir::Up, true, MIN),
            Some(Rect::new(10.0, 9.0, 20.0, 21.0))
        );
        assert_eq!(
            nudge_rect(r, NudgeDir::Right, true, MIN),
            Some(Rect::new(10.0, 10.0, 21.0, 20.0))
        );
    }

    #[test]
    fn nudge_shrink_moves_trailing_edge() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(
            nudge_rect(r, NudgeDir::Up, false, MIN),
            Some(Rect::new(10.0, 10.0, 20.0, 19.0))
        );
        assert_eq!(
            nudge_rect(r, NudgeDir::Right, false, MIN),
            Some(Rect::new(11.0, 10.0, 19.0, 20.0))
        );
    }

    #[test]
    fn nudge_shrink_refuses_below_min() {
        let r = Rect::new(0.0, 0.0, MIN, MIN);
        assert_eq!(nudge_rect(r, NudgeDir::Left, false, MIN), None);
        assert_eq!(nudge_rect(r, NudgeDir::Down, false, MIN), None);
    }

    #[test]
    fn clamp_to_viewport_keeps_box_inside() {
        let vp = Viewport {
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(clamp_to_viewport(-20.0, 590.0, 100.0, 50.0, vp), (0.0, 550.0));
        assert_eq!(clamp_to_viewport(10.0, 10.0, 1000.0, 50.0, vp), (0.0, 10.0));
    }

    #[test]
    fn safe_toolbar_position_applies_padding() {
        let vp = Viewport {
            width: 800.0,
            height: 600.0,
        };
        let config = OverlayConfig::default();
        assert_eq!(safe_toolbar_position(2000.0, 2000.0, vp, &config), (533.0, 430.0));
        assert_eq!(safe_toolbar_position(-5.0, 3.0, vp, &config), (10.0, 10.0));
    }

    #[test]
    fn handle_names_roundtrip() {
        for dir in ResizeDir::ALL {
            assert_eq!(ResizeDir::from_name(dir.as_str()), Some(dir));
        }
        assert_eq!(ResizeDir::from_name("up"), None);
    }
}
