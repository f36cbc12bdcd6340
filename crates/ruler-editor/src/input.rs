//! Input abstraction layer.
//!
//! Normalizes mouse, touch and pen pointer events plus key presses into a
//! unified `InputEvent` consumed by the shape editor and the toolbar drag.

/// Primary button (left mouse, touch contact, pen tip).
pub const PRIMARY_BUTTON: i16 = 0;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ctrl on most systems, ⌘ on macOS.
    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed. `time_ms` is the host's monotonic event timestamp.
    PointerDown {
        x: f32,
        y: f32,
        button: i16,
        pointer_id: i32,
        time_ms: f64,
        modifiers: Modifiers,
    },

    PointerMove { x: f32, y: f32, pointer_id: i32 },

    PointerUp {
        x: f32,
        y: f32,
        button: i16,
        pointer_id: i32,
    },

    /// The host took the pointer away (capture lost, touch interrupted).
    PointerCancel { pointer_id: i32 },

    /// Key press. `key` is the `KeyboardEvent.key` value.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    /// Primary-button press with no modifiers.
    pub fn down(x: f32, y: f32, pointer_id: i32, time_ms: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PRIMARY_BUTTON,
            pointer_id,
            time_ms,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn moved(x: f32, y: f32, pointer_id: i32) -> Self {
        Self::PointerMove { x, y, pointer_id }
    }

    /// Primary-button release.
    pub fn up(x: f32, y: f32, pointer_id: i32) -> Self {
        Self::PointerUp {
            x,
            y,
            button: PRIMARY_BUTTON,
            pointer_id,
        }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a positioned pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some((*x, *y)),
            Self::PointerCancel { .. } | Self::Key { .. } => None,
        }
    }

    pub fn pointer_id(&self) -> Option<i32> {
        match self {
            Self::PointerDown { pointer_id, .. }
            | Self::PointerMove { pointer_id, .. }
            | Self::PointerUp { pointer_id, .. }
            | Self::PointerCancel { pointer_id } => Some(*pointer_id),
            Self::Key { .. } => None,
        }
    }
}
