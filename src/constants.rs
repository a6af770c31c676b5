// Board-wide tuning values. All lengths are world-space pixels unless noted.

/// Card footprint and base grid spacing.
pub const SIZE: f64 = 60.0;
/// A dragged card hard-snaps when both axes are closer than this to an intersection.
pub const SNAP_THRESHOLD: f64 = 10.0;

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 3.0;
/// Zoom factor per wheel notch.
pub const ZOOM_STEP: f64 = 1.1;
/// Zoom factor per toolbar button press.
pub const BUTTON_ZOOM_STEP: f64 = 1.25;

/// Below this scale the grid uses its coarsest tier.
pub const GRID_COARSE_BELOW: f64 = 0.35;
/// Below this scale (and at or above the coarse bound) the grid uses its medium tier.
pub const GRID_MEDIUM_BELOW: f64 = 0.6;
/// Grid dots extend this many viewport extents (in screen px, divided by scale) past the origin of view.
pub const GRID_PADDING: f64 = 2.0;

pub const CARD_FONT_PX: f64 = 35.0;

/// localStorage key for the applied character set.
pub const APPLIED_CHARSET_KEY: &str = "kb_applied_charset";
