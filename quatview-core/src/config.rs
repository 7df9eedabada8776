/// Tunable tolerances and visibility switches for a viewing session

/// Axes shorter than this are refused as rotation axes.
pub const DEFAULT_ROTATION_TOLERANCE: f64 = 0.001;

/// Axes shorter than this are not drawn by the overlay.
pub const DEFAULT_OVERLAY_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationConfig {
    pub axis_tolerance: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            axis_tolerance: DEFAULT_ROTATION_TOLERANCE,
        }
    }
}

/// Which overlay layers to generate, and when to treat an axis as degenerate.
///
/// The angle readout is only drawn while the rotation axis is shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub axis_tolerance: f64,
    pub show_axes: bool,
    pub show_axis_labels: bool,
    pub show_rotation_axis: bool,
    pub show_angle_label: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            axis_tolerance: DEFAULT_OVERLAY_TOLERANCE,
            show_axes: true,
            show_axis_labels: true,
            show_rotation_axis: true,
            show_angle_label: true,
        }
    }
}

/// Which mesh layers the frame composer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub show_original: bool,
    pub show_rotated: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            show_original: true,
            show_rotated: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewerConfig {
    pub rotation: RotationConfig,
    pub overlay: OverlayConfig,
    pub visibility: Visibility,
}
