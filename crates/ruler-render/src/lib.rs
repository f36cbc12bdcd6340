pub mod hit;
pub mod view;

pub use hit::{HitTarget, TargetTag, classify_path, hit_test, resolve_target};
pub use view::{OverlayView, ShapeView, build_view};
