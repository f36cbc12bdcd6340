//! Document tracking forwarded to the content script.
//!
//! The script owns the actual `pointermove`/`pointerup` listeners on
//! `document`; it is told to add them with `true` and remove them with
//! `false`.

use ruler_editor::DocumentListeners;
use wasm_bindgen::JsValue;

pub struct JsListeners {
    callback: js_sys::Function,
}

impl JsListeners {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }

    fn notify(&self, tracking: bool) {
        if let Err(e) = self
            .callback
            .call1(&JsValue::NULL, &JsValue::from_bool(tracking))
        {
            log::error!("tracking callback failed: {e:?}");
        }
    }
}

impl DocumentListeners for JsListeners {
    fn attach(&self) {
        self.notify(true);
    }

    fn detach(&self) {
        self.notify(false);
    }
}
