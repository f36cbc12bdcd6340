//! Overlay controller: one mounted ruler.
//!
//! Owns the shape editor, the toolbar drag and the settings sync, plus the
//! crosshair position and overlay visibility. Constructed at mount and
//! dropped at unmount, which releases any tracking a gesture still holds.

use crate::gesture::DocumentListeners;
use crate::input::{InputEvent, Modifiers, PRIMARY_BUTTON};
use crate::shapes::{ShapeEditor, Tool};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::sync::{SettingsStore, SettingsSync};
use crate::toolbar::ToolbarDrag;
use ruler_core::{CursorType, OverlayConfig, Setting, Settings, ShapeRegistry, Viewport};
use ruler_render::{HitTarget, OverlayView, build_view};
use std::rc::Rc;

pub struct OverlayController {
    editor: ShapeEditor,
    toolbar: ToolbarDrag,
    sync: SettingsSync,
    config: OverlayConfig,
    viewport: Viewport,
    pointer: (f32, f32),
    visible: bool,
}

impl OverlayController {
    /// Load settings and build a fresh overlay for `viewport`.
    pub fn mount(
        viewport: Viewport,
        store: Rc<dyn SettingsStore>,
        listeners: Rc<dyn DocumentListeners>,
        config: OverlayConfig,
    ) -> Self {
        let sync = SettingsSync::load(store, viewport, &config);
        let (top, left) = sync
            .settings()
            .toolbar_position
            .to_px()
            .unwrap_or((config.toolbar_padding, config.toolbar_padding));

        Self {
            editor: ShapeEditor::new(config.clone(), Rc::clone(&listeners)),
            toolbar: ToolbarDrag::new(top, left, viewport, listeners),
            sync,
            config,
            viewport,
            pointer: viewport.center(),
            visible: true,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.sync.settings()
    }

    pub fn registry(&self) -> &ShapeRegistry {
        self.editor.registry()
    }

    pub fn editor(&self) -> &ShapeEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ShapeEditor {
        &mut self.editor
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Crosshair position.
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn is_toolbar_dragging(&self) -> bool {
        self.toolbar.is_dragging()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toolbar `(top, left)`, live while it is being dragged.
    pub fn toolbar_position(&self) -> (f32, f32) {
        self.toolbar.position()
    }

    /// Cursor the page should show; `None` means restore the page's own.
    pub fn cursor(&self) -> Option<CursorType> {
        self.visible.then_some(self.settings().cursor_type)
    }

    pub fn view(&self) -> OverlayView {
        build_view(
            self.editor.registry(),
            self.settings(),
            self.pointer,
            self.visible,
            &self.config,
        )
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Route a pointer event. Returns `true` if anything visible changed.
    pub fn handle_pointer(&mut self, event: &InputEvent, target: HitTarget) -> bool {
        if !self.visible {
            return false;
        }

        if self.toolbar.is_dragging() {
            return self.handle_toolbar_pointer(event);
        }

        let mut changed = false;
        if let InputEvent::PointerMove { x, y, .. } = *event {
            self.pointer = (x, y);
            changed = true;
        }
        changed | self.editor.handle(event, target)
    }

    fn handle_toolbar_pointer(&mut self, event: &InputEvent) -> bool {
        let mut changed = false;
        if let InputEvent::PointerMove { x, y, .. } = *event {
            self.pointer = (x, y);
            changed = true;
        }
        changed |= self.toolbar.handle(event, HitTarget::Other);
        if let Some(pos) = self.toolbar.take_released() {
            self.sync.change(Setting::ToolbarPosition(pos));
        }
        changed
    }

    /// Pointer-down on the toolbar header. `size` is the toolbar's
    /// rendered `(width, height)`. A press outside the active shape also
    /// deactivates it.
    pub fn toolbar_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: i16,
        pointer_id: i32,
        size: (f32, f32),
    ) -> bool {
        if !self.visible || button != PRIMARY_BUTTON || self.editor.is_tracking() {
            return false;
        }
        let deactivated = self.editor.deactivate_all();
        self.toolbar.begin(x, y, pointer_id, size) | deactivated
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key press: toolbar hotkey, then overlay hotkey, then
    /// arrow nudges. While hidden only the overlay hotkey is live.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let settings = self.settings();
        let map = ShortcutMap::new(settings.toggle_toolbar_key, settings.toggle_extension_key);
        let Some(action) = map.resolve(key, modifiers) else {
            return false;
        };

        if !self.visible && action != ShortcutAction::ToggleOverlay {
            return false;
        }

        match action {
            ShortcutAction::ToggleToolbar => {
                let visible = !self.settings().toolbar_visible;
                self.sync.change(Setting::ToolbarVisible(visible));
                true
            }
            ShortcutAction::ToggleOverlay => {
                let visible = !self.visible;
                self.set_visible(visible)
            }
            ShortcutAction::Nudge { dir, grow } => self.editor.nudge(dir, grow),
        }
    }

    // ─── Visibility & settings ───────────────────────────────────────────

    /// Show or hide the overlay. Hiding deactivates the active shape and
    /// ends any gesture or toolbar drag.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        if !visible {
            self.editor.end_gesture();
            self.editor.deactivate_all();
            self.toolbar.abort();
        }
        log::debug!("overlay {}", if visible { "shown" } else { "hidden" });
        true
    }

    /// A user-driven setting change from the toolbar controls.
    pub fn change_setting(&mut self, setting: Setting) -> bool {
        let Some(applied) = self.sync.change(setting) else {
            return false;
        };
        if let Setting::ToolbarPosition(pos) = &applied
            && let Some((top, left)) = pos.to_px()
        {
            self.toolbar.set_position(top, left);
        }
        true
    }

    /// Restore default settings and clear every shape.
    pub fn reset(&mut self) {
        self.editor.clear();
        self.toolbar.abort();
        self.sync.reset();
        if let Some((top, left)) = self.settings().toolbar_position.to_px() {
            self.toolbar.set_position(top, left);
        }
        log::info!("overlay reset to defaults");
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    /// The viewport changed size at host time `now_ms`.
    pub fn resize(&mut self, viewport: Viewport, now_ms: f64) {
        self.viewport = viewport;
        self.toolbar.set_viewport(viewport);
        self.sync.viewport_resized(now_ms);
    }

    /// Milliseconds until `tick` has debounced work to do.
    pub fn pending_ms(&self, now_ms: f64) -> Option<f64> {
        self.sync.resize_pending_ms(now_ms)
    }

    /// Run debounced work that is due. Returns `true` if the toolbar moved.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.sync.poll_resize(now_ms, self.viewport, &self.config) {
            Some((top, left)) => {
                if !self.toolbar.is_dragging() {
                    self.toolbar.set_position(top, left);
                }
                true
            }
            None => false,
        }
    }
}
