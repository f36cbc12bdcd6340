//! WASM bridge for Pixel Ruler: exposes the overlay engine to the
//! extension's content script.
//!
//! Compiled via `wasm-pack build --target web`. The script forwards DOM
//! events here, repaints the overlay canvas whenever a handler returns
//! `true`, and owns the document-level listeners that gestures ask for.

mod listeners;
mod logger;
mod render2d;
mod storage;

use listeners::JsListeners;
use ruler_core::{OverlayConfig, Setting, SettingKey, Viewport};
use ruler_editor::{
    DocumentListeners, InputEvent, Message, Modifiers, OverlayController, OverlayHost,
    SettingsStore,
};
use ruler_render::{HitTarget, resolve_target};
use std::rc::Rc;
use storage::ChromeStorage;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// One content-script instance of the ruler.
///
/// Every method is safe to call in any state: calls that need a mounted
/// overlay return `false` (or an empty value) when there is none.
#[wasm_bindgen]
pub struct RulerOverlay {
    host: OverlayHost,
    viewport: Viewport,
}

#[wasm_bindgen]
impl RulerOverlay {
    /// `snapshot_json` is the object returned by
    /// `chrome.storage.local.get(storage_keys())`. `on_tracking` is called
    /// with `true`/`false` to add/remove document pointer listeners.
    /// `messaging_available` tells whether `chrome.runtime.onMessage` exists.
    #[wasm_bindgen(constructor)]
    pub fn new(
        extension_id: &str,
        width: f64,
        height: f64,
        snapshot_json: &str,
        on_tracking: js_sys::Function,
        messaging_available: bool,
    ) -> Self {
        console_error_panic_hook_setup();
        logger::init(log::LevelFilter::Info);

        let store: Rc<dyn SettingsStore> = Rc::new(ChromeStorage::from_snapshot(snapshot_json));
        let listeners: Rc<dyn DocumentListeners> = Rc::new(JsListeners::new(on_tracking));

        Self {
            host: OverlayHost::new(extension_id, store, listeners, OverlayConfig::default())
                .with_messaging(messaging_available),
            viewport: viewport(width, height),
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    pub fn mount(&mut self) -> bool {
        self.host.mount(self.viewport)
    }

    pub fn unmount(&mut self) -> bool {
        self.host.unmount()
    }

    pub fn toggle(&mut self) -> bool {
        self.host.toggle(self.viewport)
    }

    pub fn cleanup(&mut self, reason: &str) -> bool {
        self.host.cleanup(reason)
    }

    pub fn is_mounted(&self) -> bool {
        self.host.is_mounted()
    }

    pub fn has_messaging(&self) -> bool {
        self.host.has_messaging()
    }

    /// Route a runtime message. `sender_id` is `MessageSender.id`.
    pub fn handle_message(&mut self, message_json: &str, sender_id: Option<String>) -> bool {
        let message = match Message::from_json(message_json) {
            Ok(m) => m,
            Err(e) => {
                log::debug!("ignoring malformed message: {e}");
                return false;
            }
        };
        self.host
            .handle_message(&message, sender_id.as_deref(), self.viewport)
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let (w, h) = (self.viewport.width as f64, self.viewport.height as f64);
        match self.host.overlay() {
            Some(overlay) => render2d::render_overlay(ctx, &overlay.view(), w, h),
            None => ctx.clear_rect(0.0, 0.0, w, h),
        }
    }

    /// The overlay view as JSON, for DOM-based painting.
    pub fn get_view_json(&self) -> String {
        self.host
            .overlay()
            .and_then(|o| serde_json::to_string(&o.view()).ok())
            .unwrap_or_default()
    }

    /// Cursor for `document.body`; empty means restore the page's own.
    pub fn get_cursor(&self) -> String {
        self.host
            .overlay()
            .and_then(OverlayController::cursor)
            .map(|c| c.as_css().to_string())
            .unwrap_or_default()
    }

    /// `{"top":..,"left":..,"visible":..}` for the toolbar element.
    pub fn get_toolbar_json(&self) -> String {
        let Some(overlay) = self.host.overlay() else {
            return String::new();
        };
        let (top, left) = overlay.toolbar_position();
        serde_json::json!({
            "top": top,
            "left": left,
            "visible": overlay.settings().toolbar_visible,
        })
        .to_string()
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Pointer-down on the overlay. `path` is the space-separated list of
    /// `data-ruler` tags from the event target outwards.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: i16,
        pointer_id: i32,
        time_ms: f64,
        path: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let Some(overlay) = self.host.overlay_mut() else {
            return false;
        };
        let target = target_for(overlay, path, x, y);
        let event = InputEvent::PointerDown {
            x,
            y,
            button,
            pointer_id,
            time_ms,
            modifiers: modifiers(ctrl, shift, alt, meta),
        };
        overlay.handle_pointer(&event, target)
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32, pointer_id: i32) -> bool {
        self.pointer(InputEvent::moved(x, y, pointer_id))
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32, button: i16, pointer_id: i32) -> bool {
        self.pointer(InputEvent::PointerUp {
            x,
            y,
            button,
            pointer_id,
        })
    }

    pub fn handle_pointer_cancel(&mut self, pointer_id: i32) -> bool {
        self.pointer(InputEvent::PointerCancel { pointer_id })
    }

    /// Pointer-down on the toolbar header; `width`/`height` are the
    /// toolbar's bounding box.
    pub fn handle_toolbar_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: i16,
        pointer_id: i32,
        width: f32,
        height: f32,
    ) -> bool {
        match self.host.overlay_mut() {
            Some(o) => o.toolbar_pointer_down(x, y, button, pointer_id, (width, height)),
            None => false,
        }
    }

    // ─── Keyboard & settings ─────────────────────────────────────────────

    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        match self.host.overlay_mut() {
            Some(o) => o.handle_key(key, modifiers(ctrl, shift, alt, meta)),
            None => false,
        }
    }

    /// Apply a toolbar control change. `storage_key` is e.g.
    /// `"ruler_opacity"`, `value_json` its JSON value.
    pub fn set_setting(&mut self, storage_key: &str, value_json: &str) -> bool {
        let Some(overlay) = self.host.overlay_mut() else {
            return false;
        };
        match decode_setting(storage_key, value_json) {
            Ok(setting) => overlay.change_setting(setting),
            Err(e) => {
                log::warn!("rejected setting {storage_key}: {e}");
                false
            }
        }
    }

    /// Current settings as a storage-shaped JSON object.
    pub fn get_settings_json(&self) -> String {
        self.host
            .overlay()
            .map(|o| serde_json::Value::Object(o.settings().to_map()).to_string())
            .unwrap_or_default()
    }

    pub fn reset(&mut self) -> bool {
        match self.host.overlay_mut() {
            Some(o) => {
                o.reset();
                true
            }
            None => false,
        }
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn resize(&mut self, width: f64, height: f64, now_ms: f64) {
        self.viewport = viewport(width, height);
        if let Some(o) = self.host.overlay_mut() {
            o.resize(self.viewport, now_ms);
        }
    }

    /// Milliseconds until `tick` should run, or -1 if nothing is pending.
    pub fn pending_ms(&self, now_ms: f64) -> f64 {
        self.host
            .overlay()
            .and_then(|o| o.pending_ms(now_ms))
            .unwrap_or(-1.0)
    }

    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.host.overlay_mut() {
            Some(o) => o.tick(now_ms),
            None => false,
        }
    }
}

impl RulerOverlay {
    fn pointer(&mut self, event: InputEvent) -> bool {
        match self.host.overlay_mut() {
            Some(o) => o.handle_pointer(&event, HitTarget::Other),
            None => false,
        }
    }
}

/// Every key the overlay reads from `chrome.storage.local`.
#[wasm_bindgen]
pub fn storage_keys() -> Vec<String> {
    ruler_core::settings::storage_keys()
        .into_iter()
        .map(String::from)
        .collect()
}

fn viewport(width: f64, height: f64) -> Viewport {
    Viewport {
        width: width as f32,
        height: height as f32,
    }
}

fn modifiers(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        ctrl,
        shift,
        alt,
        meta,
    }
}

fn target_for(overlay: &OverlayController, path: &str, x: f32, y: f32) -> HitTarget {
    resolve_target(
        path.split_whitespace(),
        overlay.registry(),
        x,
        y,
        overlay.config(),
    )
}

fn decode_setting(storage_key: &str, value_json: &str) -> Result<Setting, String> {
    let key = SettingKey::from_storage_key(storage_key)
        .ok_or_else(|| format!("unknown setting {storage_key:?}"))?;
    let value: serde_json::Value = serde_json::from_str(value_json).map_err(|e| e.to_string())?;
    Setting::from_value(key, &value)
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Pixel Ruler WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
