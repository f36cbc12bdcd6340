pub mod config;
pub mod geometry;
pub mod id;
pub mod model;
pub mod registry;
pub mod settings;

pub use config::{MIN_SIZE, OverlayConfig};
pub use geometry::{NudgeDir, ResizeDir};
pub use id::ShapeId;
pub use model::*;
pub use registry::ShapeRegistry;
pub use settings::{CursorType, Setting, SettingKey, Settings, ToolbarPosition};
