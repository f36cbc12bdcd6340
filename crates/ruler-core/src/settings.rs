//! User-facing settings and their persisted representation.
//!
//! Settings are stored as flat key/value pairs. Keys are namespaced by
//! group (`ruler_*` for the ruler and toolbar, `shape_*` for annotations);
//! values are JSON primitives except the toolbar position, which is a
//! `{ "top": "10px", "left": "10px" }` object.

use crate::model::Rgb;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every persisted setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Opacity,
    LineColor,
    LineThickness,
    CursorType,
    ToolbarVisible,
    ToolbarPosition,
    ToggleToolbarKey,
    ToggleExtensionKey,
    LinesVisible,
    ShapeOpacity,
    ShapeColor,
}

impl SettingKey {
    pub const ALL: [SettingKey; 11] = [
        SettingKey::Opacity,
        SettingKey::LineColor,
        SettingKey::LineThickness,
        SettingKey::CursorType,
        SettingKey::ToolbarVisible,
        SettingKey::ToolbarPosition,
        SettingKey::ToggleToolbarKey,
        SettingKey::ToggleExtensionKey,
        SettingKey::LinesVisible,
        SettingKey::ShapeOpacity,
        SettingKey::ShapeColor,
    ];

    /// Key under which the value lives in the settings store.
    pub fn storage_key(self) -> &'static str {
        match self {
            SettingKey::Opacity => "ruler_opacity",
            SettingKey::LineColor => "ruler_lineColor",
            SettingKey::LineThickness => "ruler_lineThickness",
            SettingKey::CursorType => "ruler_cursorType",
            SettingKey::ToolbarVisible => "ruler_toolbarVisible",
            SettingKey::ToolbarPosition => "ruler_toolbarPosition",
            SettingKey::ToggleToolbarKey => "ruler_toggleToolbarKey",
            SettingKey::ToggleExtensionKey => "ruler_toggleExtensionKey",
            SettingKey::LinesVisible => "ruler_linesVisible",
            SettingKey::ShapeOpacity => "shape_opacity",
            SettingKey::ShapeColor => "shape_color",
        }
    }

    pub fn from_storage_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.storage_key() == key)
    }
}

/// All storage keys, in declaration order.
pub fn storage_keys() -> Vec<&'static str> {
    SettingKey::ALL.iter().map(|k| k.storage_key()).collect()
}

// ─── Value types ─────────────────────────────────────────────────────────

/// Page cursor applied while the overlay is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorType {
    #[default]
    Default,
    None,
    Crosshair,
    AllScroll,
}

impl CursorType {
    pub fn as_css(self) -> &'static str {
        match self {
            CursorType::Default => "default",
            CursorType::None => "none",
            CursorType::Crosshair => "crosshair",
            CursorType::AllScroll => "all-scroll",
        }
    }

    pub fn from_css(s: &str) -> Option<Self> {
        match s {
            "default" => Some(CursorType::Default),
            "none" => Some(CursorType::None),
            "crosshair" => Some(CursorType::Crosshair),
            "all-scroll" => Some(CursorType::AllScroll),
            _ => None,
        }
    }
}

/// Toolbar top-left as CSS pixel strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarPosition {
    pub top: String,
    pub left: String,
}

impl Default for ToolbarPosition {
    fn default() -> Self {
        Self::from_px(10.0, 10.0)
    }
}

impl ToolbarPosition {
    pub fn from_px(top: f32, left: f32) -> Self {
        Self {
            top: format!("{top}px"),
            left: format!("{left}px"),
        }
    }

    /// Numeric `(top, left)`, or `None` if either string has no leading
    /// integer.
    pub fn to_px(&self) -> Option<(f32, f32)> {
        Some((parse_px(&self.top)?, parse_px(&self.left)?))
    }
}

/// Leading signed integer of a CSS length (`"12.7px"` is 12).
pub fn parse_px(s: &str) -> Option<f32> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<f32>().ok().map(|n| sign * n)
}

/// Normalize a hotkey entry: first character, uppercased.
pub fn normalize_hotkey(s: &str) -> Option<char> {
    s.trim().chars().next()?.to_uppercase().next()
}

// ─── Typed setting values ────────────────────────────────────────────────

/// A single setting with its typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    Opacity(f32),
    LineColor(String),
    LineThickness(u32),
    CursorType(CursorType),
    ToolbarVisible(bool),
    ToolbarPosition(ToolbarPosition),
    ToggleToolbarKey(char),
    ToggleExtensionKey(char),
    LinesVisible(bool),
    ShapeOpacity(f32),
    ShapeColor(String),
}

impl Setting {
    pub fn key(&self) -> SettingKey {
        match self {
            Setting::Opacity(_) => SettingKey::Opacity,
            Setting::LineColor(_) => SettingKey::LineColor,
            Setting::LineThickness(_) => SettingKey::LineThickness,
            Setting::CursorType(_) => SettingKey::CursorType,
            Setting::ToolbarVisible(_) => SettingKey::ToolbarVisible,
            Setting::ToolbarPosition(_) => SettingKey::ToolbarPosition,
            Setting::ToggleToolbarKey(_) => SettingKey::ToggleToolbarKey,
            Setting::ToggleExtensionKey(_) => SettingKey::ToggleExtensionKey,
            Setting::LinesVisible(_) => SettingKey::LinesVisible,
            Setting::ShapeOpacity(_) => SettingKey::ShapeOpacity,
            Setting::ShapeColor(_) => SettingKey::ShapeColor,
        }
    }

    /// JSON form written to the store.
    pub fn to_value(&self) -> Value {
        match self {
            Setting::Opacity(v) | Setting::ShapeOpacity(v) => decimal_value(*v),
            Setting::LineThickness(v) => Value::from(*v),
            Setting::LineColor(s) | Setting::ShapeColor(s) => Value::from(s.as_str()),
            Setting::CursorType(c) => Value::from(c.as_css()),
            Setting::ToolbarVisible(b) | Setting::LinesVisible(b) => Value::from(*b),
            Setting::ToolbarPosition(p) => serde_json::json!({ "top": p.top, "left": p.left }),
            Setting::ToggleToolbarKey(c) | Setting::ToggleExtensionKey(c) => {
                Value::from(c.to_string())
            }
        }
    }

    /// Decode a stored JSON value for `key`.
    pub fn from_value(key: SettingKey, value: &Value) -> Result<Self, String> {
        Ok(match key {
            SettingKey::Opacity => Setting::Opacity(as_number(value)? as f32),
            SettingKey::ShapeOpacity => Setting::ShapeOpacity(as_number(value)? as f32),
            SettingKey::LineThickness => {
                Setting::LineThickness(as_number(value)?.round().max(0.0) as u32)
            }
            SettingKey::LineColor => Setting::LineColor(as_string(value)?.to_string()),
            SettingKey::ShapeColor => Setting::ShapeColor(as_string(value)?.to_string()),
            SettingKey::CursorType => Setting::CursorType(
                CursorType::from_css(as_string(value)?)
                    .ok_or_else(|| format!("unknown cursor: {value}"))?,
            ),
            SettingKey::ToolbarVisible => Setting::ToolbarVisible(as_bool(value)?),
            SettingKey::LinesVisible => Setting::LinesVisible(as_bool(value)?),
            SettingKey::ToolbarPosition => {
                let pos: ToolbarPosition =
                    serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
                if pos.to_px().is_none() {
                    return Err(format!("unparseable toolbar position: {value}"));
                }
                Setting::ToolbarPosition(pos)
            }
            SettingKey::ToggleToolbarKey => Setting::ToggleToolbarKey(as_hotkey(value)?),
            SettingKey::ToggleExtensionKey => Setting::ToggleExtensionKey(as_hotkey(value)?),
        })
    }

    /// Bring a value into the range the toolbar controls allow.
    /// Returns `None` for values that can't be repaired.
    pub fn normalized(self) -> Option<Self> {
        Some(match self {
            Setting::Opacity(v) if v.is_finite() => Setting::Opacity(v.clamp(0.0, 0.8)),
            Setting::ShapeOpacity(v) if v.is_finite() => Setting::ShapeOpacity(v.clamp(0.1, 1.0)),
            Setting::Opacity(_) | Setting::ShapeOpacity(_) => return None,
            Setting::LineThickness(v) => Setting::LineThickness(v.clamp(1, 5)),
            Setting::LineColor(s) => {
                Rgb::from_hex(&s)?;
                Setting::LineColor(s)
            }
            Setting::ShapeColor(s) => {
                Rgb::from_hex(&s)?;
                Setting::ShapeColor(s)
            }
            Setting::ToggleToolbarKey(c) => Setting::ToggleToolbarKey(c.to_uppercase().next()?),
            Setting::ToggleExtensionKey(c) => {
                Setting::ToggleExtensionKey(c.to_uppercase().next()?)
            }
            Setting::ToolbarPosition(p) if p.to_px().is_none() => return None,
            other => other,
        })
    }
}

/// An `f32` as the shortest decimal that reads back to it, so `0.1` is
/// stored as `0.1` and not its widened `f64` expansion.
fn decimal_value(v: f32) -> Value {
    let widened = v.to_string().parse::<f64>().unwrap_or(f64::from(v));
    Value::from(widened)
}

fn as_number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("bad number: {n}")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("not a number: {s:?}")),
        other => Err(format!("expected number, got {other}")),
    }
}

fn as_string(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected string, got {value}"))
}

fn as_bool(value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("expected bool, got {value}"))
}

fn as_hotkey(value: &Value) -> Result<char, String> {
    normalize_hotkey(as_string(value)?).ok_or_else(|| "empty hotkey".to_string())
}

// ─── Settings ────────────────────────────────────────────────────────────

/// In-memory settings for one mounted overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub opacity: f32,
    pub line_color: String,
    pub line_thickness: u32,
    pub cursor_type: CursorType,
    pub toolbar_visible: bool,
    pub toolbar_position: ToolbarPosition,
    pub toggle_toolbar_key: char,
    pub toggle_extension_key: char,
    pub lines_visible: bool,
    pub shape_opacity: f32,
    pub shape_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opacity: 0.1,
            line_color: "#ff0000".to_string(),
            line_thickness: 1,
            cursor_type: CursorType::Default,
            toolbar_visible: true,
            toolbar_position: ToolbarPosition::default(),
            toggle_toolbar_key: 'X',
            toggle_extension_key: 'Z',
            lines_visible: true,
            shape_opacity: 0.5,
            shape_color: "#00ff00".to_string(),
        }
    }
}

impl Settings {
    /// Build settings from a store snapshot. Missing keys use defaults;
    /// malformed values are logged and also fall back.
    pub fn from_stored(items: &Map<String, Value>) -> Self {
        let mut settings = Self::default();
        for key in SettingKey::ALL {
            let Some(raw) = items.get(key.storage_key()) else {
                continue;
            };
            if raw.is_null() {
                continue;
            }
            match Setting::from_value(key, raw) {
                Ok(setting) => {
                    if settings.apply(setting).is_none() {
                        log::warn!(
                            "stored {} out of range ({raw}), using default",
                            key.storage_key()
                        );
                    }
                }
                Err(e) => log::warn!("ignoring stored {}: {e}", key.storage_key()),
            }
        }
        settings
    }

    pub fn get(&self, key: SettingKey) -> Setting {
        match key {
            SettingKey::Opacity => Setting::Opacity(self.opacity),
            SettingKey::LineColor => Setting::LineColor(self.line_color.clone()),
            SettingKey::LineThickness => Setting::LineThickness(self.line_thickness),
            SettingKey::CursorType => Setting::CursorType(self.cursor_type),
            SettingKey::ToolbarVisible => Setting::ToolbarVisible(self.toolbar_visible),
            SettingKey::ToolbarPosition => {
                Setting::ToolbarPosition(self.toolbar_position.clone())
            }
            SettingKey::ToggleToolbarKey => Setting::ToggleToolbarKey(self.toggle_toolbar_key),
            SettingKey::ToggleExtensionKey => {
                Setting::ToggleExtensionKey(self.toggle_extension_key)
            }
            SettingKey::LinesVisible => Setting::LinesVisible(self.lines_visible),
            SettingKey::ShapeOpacity => Setting::ShapeOpacity(self.shape_opacity),
            SettingKey::ShapeColor => Setting::ShapeColor(self.shape_color.clone()),
        }
    }

    /// Normalize and apply a change. Returns the value actually stored, or
    /// `None` when the change was rejected and nothing changed.
    pub fn apply(&mut self, setting: Setting) -> Option<Setting> {
        let setting = setting.normalized()?;
        match &setting {
            Setting::Opacity(v) => self.opacity = *v,
            Setting::LineColor(s) => self.line_color = s.clone(),
            Setting::LineThickness(v) => self.line_thickness = *v,
            Setting::CursorType(c) => self.cursor_type = *c,
            Setting::ToolbarVisible(b) => self.toolbar_visible = *b,
            Setting::ToolbarPosition(p) => self.toolbar_position = p.clone(),
            Setting::ToggleToolbarKey(c) => self.toggle_toolbar_key = *c,
            Setting::ToggleExtensionKey(c) => self.toggle_extension_key = *c,
            Setting::LinesVisible(b) => self.lines_visible = *b,
            Setting::ShapeOpacity(v) => self.shape_opacity = *v,
            Setting::ShapeColor(s) => self.shape_color = s.clone(),
        }
        Some(setting)
    }

    /// Snapshot of every setting in storage form.
    pub fn to_map(&self) -> Map<String, Value> {
        SettingKey::ALL
            .into_iter()
            .map(|k| (k.storage_key().to_string(), self.get(k).to_value()))
            .collect()
    }
}
