pub mod gesture;
pub mod host;
pub mod input;
pub mod overlay;
pub mod shapes;
pub mod shortcuts;
pub mod sync;
pub mod tap;
pub mod toolbar;

pub use gesture::{DocumentListeners, GestureKind, NoopListeners, TrackingGuard};
pub use host::{HostCommand, Message, OverlayHost};
pub use input::{InputEvent, Modifiers};
pub use overlay::OverlayController;
pub use shapes::{ShapeEditor, Tool};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use sync::{MemoryStore, SettingsStore, SettingsSync, StoreError};
