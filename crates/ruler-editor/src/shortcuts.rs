//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The two
//! visibility hotkeys are user-configurable single letters, compared in
//! uppercase; arrows nudge the active shape.

use crate::input::Modifiers;
use ruler_core::NudgeDir;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Show or hide the settings toolbar.
    ToggleToolbar,
    /// Show or hide the whole overlay.
    ToggleOverlay,
    /// Move an edge of the active shape by one pixel. `grow` is false when
    /// ctrl/⌘ is held.
    Nudge { dir: NudgeDir, grow: bool },
}

/// Resolves key events against the configured hotkeys.
pub struct ShortcutMap {
    pub toolbar_key: char,
    pub overlay_key: char,
}

impl ShortcutMap {
    pub fn new(toolbar_key: char, overlay_key: char) -> Self {
        Self {
            toolbar_key,
            overlay_key,
        }
    }

    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"x"`, `"ArrowUp"`).
    /// The toolbar hotkey wins over the overlay hotkey when both are bound
    /// to the same letter.
    pub fn resolve(&self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if let Some(letter) = single_char_upper(key) {
            if letter == self.toolbar_key {
                return Some(ShortcutAction::ToggleToolbar);
            }
            if letter == self.overlay_key {
                return Some(ShortcutAction::ToggleOverlay);
            }
        }

        NudgeDir::from_key(key).map(|dir| ShortcutAction::Nudge {
            dir,
            grow: !modifiers.cmd(),
        })
    }
}

fn single_char_upper(key: &str) -> Option<char> {
    let mut chars = key.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    c.to_uppercase().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> ShortcutMap {
        ShortcutMap::new('X', 'Z')
    }

    #[test]
    fn hotkeys_match_either_case() {
        let m = map();
        assert_eq!(m.resolve("x", Modifiers::NONE), Some(ShortcutAction::ToggleToolbar));
        assert_eq!(m.resolve("X", Modifiers::NONE), Some(ShortcutAction::ToggleToolbar));
        assert_eq!(m.resolve("z", Modifiers::NONE), Some(ShortcutAction::ToggleOverlay));
        assert_eq!(m.resolve("q", Modifiers::NONE), None);
    }

    #[test]
    fn toolbar_key_wins_a_tie() {
        let m = ShortcutMap::new('A', 'A');
        assert_eq!(m.resolve("a", Modifiers::NONE), Some(ShortcutAction::ToggleToolbar));
    }

    #[test]
    fn arrows_nudge_and_cmd_shrinks() {
        let m = map();
        assert_eq!(
            m.resolve("ArrowUp", Modifiers::NONE),
            Some(ShortcutAction::Nudge {
                dir: NudgeDir::Up,
                grow: true
            })
        );
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(
            m.resolve("ArrowLeft", meta),
            Some(ShortcutAction::Nudge {
                dir: NudgeDir::Left,
                grow: false
            })
        );
    }

    #[test]
    fn named_keys_never_match_letters() {
        let m = ShortcutMap::new('E', 'Z');
        assert_eq!(m.resolve("Escape", Modifiers::NONE), None);
    }
}
