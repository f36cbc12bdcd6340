//! Settings synchronization: in-memory settings ↔ external key/value store.
//!
//! - **Load**: one batched `get` of every key at mount. Missing or malformed
//!   values fall back to defaults; a failed read is logged and treated as an
//!   empty store. The toolbar position is clamped to the viewport.
//! - **Change**: memory is updated synchronously and the new value is
//!   written through. Write failures are logged and dropped; the in-memory
//!   value stays authoritative for the session.
//! - **Resize**: viewport changes are debounced (trailing edge) and then the
//!   toolbar position is re-clamped, saving it if it moved.
//! - **Reset**: defaults in memory, stored keys removed in one call.

use ruler_core::geometry::safe_toolbar_position;
use ruler_core::settings::storage_keys;
use ruler_core::{OverlayConfig, Setting, SettingKey, Settings, ToolbarPosition, Viewport};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;

/// Failure reported by a settings store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings store is not available in this context")]
    Unavailable,
    #[error("settings store error: {0}")]
    Backend(String),
    #[error("malformed settings data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flat key/value settings storage.
///
/// Calls are fire-and-forget from the overlay's point of view: the result
/// only decides what gets logged.
pub trait SettingsStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, keys: &[&str]) -> Result<(), StoreError>;
}

// ─── In-memory store ─────────────────────────────────────────────────────

/// Store backed by a JSON map. Used natively and in tests; can be switched
/// into a failing mode to exercise the error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<Map<String, Value>>,
    unavailable: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Map<String, Value>) -> Self {
        Self {
            items: RefCell::new(items),
            unavailable: Cell::new(false),
        }
    }

    /// Seed from a JSON object such as `{"ruler_opacity": 0.3}`.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let items: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self::with_items(items))
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        self.items.borrow().clone()
    }

    /// Make every call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.get() {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError> {
        self.check()?;
        let items = self.items.borrow();
        Ok(keys
            .iter()
            .filter_map(|k| items.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.check()?;
        self.items.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.check()?;
        let mut items = self.items.borrow_mut();
        for k in keys {
            items.remove(*k);
        }
        Ok(())
    }
}

// ─── Debounce ────────────────────────────────────────────────────────────

/// Trailing-edge debouncer driven by host timestamps.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: f64,
    last_trigger: Option<f64>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            last_trigger: None,
        }
    }

    /// Record an event, restarting the quiet period.
    pub fn trigger(&mut self, now_ms: f64) {
        self.last_trigger = Some(now_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.last_trigger.is_some()
    }

    /// Returns `true` once when the quiet period since the last trigger
    /// has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.last_trigger {
            Some(at) if now_ms - at >= self.delay_ms => {
                self.last_trigger = None;
                true
            }
            _ => false,
        }
    }

    /// Milliseconds until `poll` would fire, for scheduling a host timer.
    pub fn remaining(&self, now_ms: f64) -> Option<f64> {
        self.last_trigger
            .map(|at| (self.delay_ms - (now_ms - at)).max(0.0))
    }
}

// ─── Sync engine ─────────────────────────────────────────────────────────

pub struct SettingsSync {
    settings: Settings,
    store: Rc<dyn SettingsStore>,
    resize: Debouncer,
}

impl SettingsSync {
    /// Read every setting in one batch and clamp the toolbar into
    /// `viewport`. Never fails: store errors degrade to defaults.
    pub fn load(store: Rc<dyn SettingsStore>, viewport: Viewport, config: &OverlayConfig) -> Self {
        let keys = storage_keys();
        let items = match store.get(&keys) {
            Ok(items) => items,
            Err(e) => {
                log::error!("error loading settings: {e}");
                Map::new()
            }
        };

        let mut settings = Settings::from_stored(&items);
        if let Some(safe) = clamp_position(&settings.toolbar_position, viewport, config) {
            settings.toolbar_position = safe;
        }
        log::debug!("settings loaded: {} stored keys", items.len());

        Self {
            settings,
            store,
            resize: Debouncer::new(config.resize_debounce_ms),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a change in memory and write it through. Returns the
    /// normalized value, or `None` if the change was rejected.
    pub fn change(&mut self, setting: Setting) -> Option<Setting> {
        let key = setting.key();
        let Some(applied) = self.settings.apply(setting) else {
            log::warn!("rejected value for {}", key.storage_key());
            return None;
        };
        self.save(&applied);
        Some(applied)
    }

    fn save(&self, setting: &Setting) {
        let key = setting.key().storage_key();
        if let Err(e) = self.store.set(key, setting.to_value()) {
            log::error!("error saving setting {key}: {e}");
        }
    }

    /// Restore defaults and clear the store so the next load yields them.
    pub fn reset(&mut self) {
        self.settings = Settings::default();
        self.resize = Debouncer::new(self.resize.delay_ms);
        if let Err(e) = self.store.remove(&storage_keys()) {
            log::error!("error clearing settings: {e}");
        }
    }

    /// Note a viewport resize; the re-clamp runs after the quiet period.
    pub fn viewport_resized(&mut self, now_ms: f64) {
        self.resize.trigger(now_ms);
    }

    pub fn resize_pending_ms(&self, now_ms: f64) -> Option<f64> {
        self.resize.remaining(now_ms)
    }

    /// Run the debounced re-clamp if it is due. Returns the new
    /// `(top, left)` when the toolbar had to move.
    pub fn poll_resize(
        &mut self,
        now_ms: f64,
        viewport: Viewport,
        config: &OverlayConfig,
    ) -> Option<(f32, f32)> {
        if !self.resize.poll(now_ms) {
            return None;
        }
        let current = &self.settings.toolbar_position;
        let safe = clamp_position(current, viewport, config)?;
        if &safe == current {
            return None;
        }
        let moved = safe.to_px();
        self.change(Setting::ToolbarPosition(safe));
        moved
    }

    /// Current value of one setting in storage form.
    pub fn value(&self, key: SettingKey) -> Value {
        self.settings.get(key).to_value()
    }
}

fn clamp_position(
    pos: &ToolbarPosition,
    viewport: Viewport,
    config: &OverlayConfig,
) -> Option<ToolbarPosition> {
    let (top, left) = pos.to_px()?;
    let (top, left) = safe_toolbar_position(top, left, viewport, config);
    Some(ToolbarPosition::from_px(top, left))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 720.0,
    };

    fn store_with(value: Value) -> Rc<MemoryStore> {
        let Value::Object(items) = value else {
            panic!("expected object");
        };
        Rc::new(MemoryStore::with_items(items))
    }

    #[test]
    fn load_clamps_stranded_toolbar_without_saving() {
        let store = store_with(json!({
            "ruler_toolbarPosition": { "top": "5000px", "left": "-40px" }
        }));
        let sync = SettingsSync::load(store.clone(), VIEWPORT, &OverlayConfig::default());
        assert_eq!(
            sync.settings().toolbar_position,
            ToolbarPosition::from_px(653.0, 10.0)
        );
        assert_eq!(
            store.snapshot()["ruler_toolbarPosition"],
            json!({ "top": "5000px", "left": "-40px" })
        );
    }

    #[test]
    fn failed_read_falls_back_to_defaults() {
        let store = store_with(json!({ "ruler_opacity": 0.5 }));
        store.set_unavailable(true);
        let sync = SettingsSync::load(store, VIEWPORT, &OverlayConfig::default());
        assert_eq!(sync.settings(), &Settings::default());
    }

    #[test]
    fn change_writes_through_and_survives_store_failure() {
        let store = Rc::new(MemoryStore::new());
        let mut sync = SettingsSync::load(store.clone(), VIEWPORT, &OverlayConfig::default());

        sync.change(Setting::LineThickness(9));
        assert_eq!(sync.settings().line_thickness, 5);
        assert_eq!(store.snapshot()["ruler_lineThickness"], json!(5));

        store.set_unavailable(true);
        sync.change(Setting::LinesVisible(false));
        assert!(!sync.settings().lines_visible);
    }

    #[test]
    fn rejected_hotkey_keeps_previous() {
        let mut sync = SettingsSync::load(Rc::new(MemoryStore::new()), VIEWPORT, &OverlayConfig::default());
        let rejected = Setting::from_value(SettingKey::ToggleToolbarKey, &json!(""));
        assert!(rejected.is_err());
        assert_eq!(sync.change(Setting::ToggleToolbarKey('q')), Some(Setting::ToggleToolbarKey('Q')));
        assert_eq!(sync.value(SettingKey::ToggleToolbarKey), json!("Q"));
    }

    #[test]
    fn debouncer_fires_once_after_quiet_period() {
        let mut d = Debouncer::new(150.0);
        d.trigger(0.0);
        d.trigger(100.0);
        assert!(!d.poll(200.0));
        assert_eq!(d.remaining(200.0), Some(50.0));
        assert!(d.poll(250.0));
        assert!(!d.poll(400.0));
    }

    #[test]
    fn memory_store_rejects_malformed_json() {
        assert!(matches!(
            MemoryStore::from_json("not json"),
            Err(StoreError::Serialization(_))
        ));
    }
}
