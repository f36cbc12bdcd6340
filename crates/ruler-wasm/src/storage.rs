//! `chrome.storage.local` settings store.
//!
//! The content script reads the stored settings once before constructing
//! the overlay and hands them over as a JSON snapshot, so reads are served
//! from that cache synchronously. Writes update the cache and are then
//! forwarded to `chrome.storage.local` without waiting; a rejected promise
//! is logged.

use ruler_editor::{SettingsStore, StoreError};
use serde_json::{Map, Value};
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub struct ChromeStorage {
    cache: RefCell<Map<String, Value>>,
}

impl ChromeStorage {
    /// Build from the script's snapshot. A malformed snapshot is logged and
    /// treated as an empty store.
    pub fn from_snapshot(json: &str) -> Self {
        let items = parse_snapshot(json).unwrap_or_else(|e| {
            log::error!("error loading settings: {e}");
            Map::new()
        });
        Self {
            cache: RefCell::new(items),
        }
    }
}

/// Decode a snapshot object. Empty input means nothing stored.
pub fn parse_snapshot(json: &str) -> Result<Map<String, Value>, StoreError> {
    if json.trim().is_empty() {
        return Ok(Map::new());
    }
    Ok(serde_json::from_str(json)?)
}

impl SettingsStore for ChromeStorage {
    fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StoreError> {
        let cache = self.cache.borrow();
        Ok(keys
            .iter()
            .filter_map(|k| cache.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let js_value = to_js(&value)?;
        self.cache.borrow_mut().insert(key.to_string(), value);

        let items = js_sys::Object::new();
        js_sys::Reflect::set(&items, &JsValue::from_str(key), &js_value).map_err(js_error)?;
        call_storage("set", &items)
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        {
            let mut cache = self.cache.borrow_mut();
            for k in keys {
                cache.remove(*k);
            }
        }
        let array: js_sys::Array = keys.iter().map(|k| JsValue::from_str(k)).collect();
        call_storage("remove", &array)
    }
}

// ─── JS plumbing ─────────────────────────────────────────────────────────

fn js_error(e: JsValue) -> StoreError {
    StoreError::Backend(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn to_js(value: &Value) -> Result<JsValue, StoreError> {
    let text = serde_json::to_string(value)?;
    js_sys::JSON::parse(&text).map_err(js_error)
}

/// `chrome.storage.local`, if this context has it.
fn storage_area() -> Result<JsValue, StoreError> {
    #[cfg(target_arch = "wasm32")]
    {
        let mut area: JsValue = js_sys::global().into();
        for name in ["chrome", "storage", "local"] {
            area = js_sys::Reflect::get(&area, &JsValue::from_str(name)).map_err(js_error)?;
            if area.is_undefined() || area.is_null() {
                return Err(StoreError::Unavailable);
            }
        }
        Ok(area)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Err(StoreError::Unavailable)
    }
}

fn call_storage(method: &'static str, arg: &JsValue) -> Result<(), StoreError> {
    let area = storage_area()?;
    let func: js_sys::Function = js_sys::Reflect::get(&area, &JsValue::from_str(method))
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| StoreError::Backend(format!("chrome.storage.local.{method} is not a function")))?;

    let result = func.call1(&area, arg).map_err(js_error)?;
    if let Ok(promise) = result.dyn_into::<js_sys::Promise>() {
        let on_error = Closure::once(move |e: JsValue| {
            log::error!("chrome.storage.local.{method} failed: {e:?}");
        });
        let _ = promise.catch(&on_error);
        on_error.forget();
    }
    Ok(())
}
