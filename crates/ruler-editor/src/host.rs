//! Host lifecycle and cross-context messaging.
//!
//! The host mounts and unmounts the overlay on command. `cleanup` is the
//! terminal teardown (extension reload, page unload): it is idempotent and
//! a cleaned-up host never mounts again.

use crate::gesture::DocumentListeners;
use crate::overlay::OverlayController;
use crate::sync::SettingsStore;
use ruler_core::{OverlayConfig, Viewport};
use serde::Deserialize;
use std::rc::Rc;

/// Cleanup reason used when another context asks for teardown.
pub const CLEANUP_MESSAGE_REASON: &str = "cleanup_message_received";

/// A message delivered from another extension context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub command: String,
}

impl Message {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Commands the page context understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Toggle,
    Cleanup,
}

impl HostCommand {
    pub fn parse(command: &str) -> Option<Self> {
        match command {
            "toggle" | "toggle_extension" => Some(HostCommand::Toggle),
            "cleanup_extension" => Some(HostCommand::Cleanup),
            _ => None,
        }
    }
}

pub struct OverlayHost {
    extension_id: String,
    store: Rc<dyn SettingsStore>,
    listeners: Rc<dyn DocumentListeners>,
    config: OverlayConfig,
    overlay: Option<OverlayController>,
    cleaned_up: bool,
    messaging: bool,
}

impl OverlayHost {
    pub fn new(
        extension_id: &str,
        store: Rc<dyn SettingsStore>,
        listeners: Rc<dyn DocumentListeners>,
        config: OverlayConfig,
    ) -> Self {
        Self {
            extension_id: extension_id.to_string(),
            store,
            listeners,
            config,
            overlay: None,
            cleaned_up: false,
            messaging: true,
        }
    }

    /// Record whether the cross-context messaging capability exists. The
    /// overlay keeps working without it; it just can't be toggled remotely.
    pub fn with_messaging(mut self, available: bool) -> Self {
        if !available {
            log::error!("runtime messaging is unavailable; remote toggle disabled");
        }
        self.messaging = available;
        self
    }

    pub fn has_messaging(&self) -> bool {
        self.messaging
    }

    pub fn is_mounted(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.cleaned_up
    }

    pub fn overlay(&self) -> Option<&OverlayController> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut OverlayController> {
        self.overlay.as_mut()
    }

    /// Build and show the overlay. No-op when already mounted or after
    /// cleanup.
    pub fn mount(&mut self, viewport: Viewport) -> bool {
        if self.cleaned_up {
            log::warn!("mount refused: host was cleaned up");
            return false;
        }
        if self.overlay.is_some() {
            return false;
        }
        self.overlay = Some(OverlayController::mount(
            viewport,
            Rc::clone(&self.store),
            Rc::clone(&self.listeners),
            self.config.clone(),
        ));
        log::info!("overlay mounted ({} x {})", viewport.width, viewport.height);
        true
    }

    /// Tear the overlay down, releasing any tracking it still holds.
    pub fn unmount(&mut self) -> bool {
        if self.overlay.take().is_none() {
            return false;
        }
        log::info!("overlay unmounted");
        true
    }

    pub fn toggle(&mut self, viewport: Viewport) -> bool {
        if self.is_mounted() {
            self.unmount()
        } else {
            self.mount(viewport)
        }
    }

    /// Terminal teardown. A second call does nothing.
    pub fn cleanup(&mut self, reason: &str) -> bool {
        if self.cleaned_up {
            return false;
        }
        log::info!("cleaning up overlay: {reason}");
        self.unmount();
        self.cleaned_up = true;
        true
    }

    /// Act on a message from `sender_id`. Messages from anyone other than
    /// this extension, and unknown commands, are ignored.
    pub fn handle_message(
        &mut self,
        message: &Message,
        sender_id: Option<&str>,
        viewport: Viewport,
    ) -> bool {
        if sender_id != Some(self.extension_id.as_str()) {
            log::warn!("ignoring {:?} from foreign sender {sender_id:?}", message.command);
            return false;
        }
        match HostCommand::parse(&message.command) {
            Some(HostCommand::Toggle) => self.toggle(viewport),
            Some(HostCommand::Cleanup) => self.cleanup(CLEANUP_MESSAGE_REASON),
            None => {
                log::debug!("unknown command {:?}", message.command);
                false
            }
        }
    }
}
