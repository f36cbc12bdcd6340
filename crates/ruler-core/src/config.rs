//! Interaction constants for one overlay instance.

/// Minimum width/height of a committed or resized shape, in pixels.
pub const MIN_SIZE: f32 = 5.0;

/// Tunables for the interaction engine.
///
/// `Default` carries the values the extension ships with; tests override
/// individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Shapes smaller than this in either dimension are discarded on release
    /// and resizes are floored at it.
    pub min_size: f32,

    /// Maximum delay between two taps of a double activation.
    pub double_tap_ms: f64,

    /// Maximum pointer travel between two taps of a double activation.
    pub double_tap_distance: f32,

    /// Side of the square resize handles.
    pub handle_size: f32,

    /// Side of the square delete control beside the top-right corner.
    pub delete_size: f32,

    /// Quiet period after the last viewport resize before the toolbar is
    /// re-clamped.
    pub resize_debounce_ms: f64,

    /// Toolbar footprint assumed when clamping a stored position.
    pub toolbar_width: f32,
    pub toolbar_height: f32,

    /// Distance kept between a clamped toolbar and the viewport edge.
    pub toolbar_padding: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            double_tap_ms: 300.0,
            double_tap_distance: 10.0,
            handle_size: 8.0,
            delete_size: 16.0,
            resize_debounce_ms: 150.0,
            toolbar_width: 360.0,
            toolbar_height: 57.0,
            toolbar_padding: 10.0,
        }
    }
}
