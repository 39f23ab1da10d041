//! Panel geometry and small math helpers
//!
//! All vertical measurements are offsets from the bottom edge of the
//! container, so the bottom of the screen is 0 on the Y axis. The geometry is
//! recomputed wholesale on every layout notification and never partially
//! updated.

/// Tolerance used for float comparisons on offsets and ratios.
pub const F_EPSILON: f64 = 0.001;

/// A point in raw screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Dimensions the panel depends on. Owned by the panel core; everything else
/// reads it through accessors so layout changes are never observed stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelGeometry {
    /// Width of the view containing the panel.
    pub container_width: f64,
    /// Height of the view containing the panel.
    pub container_height: f64,
    /// Height of the toolbar (the bottom sheet's peeking strip, or the
    /// contextual panel's search bar).
    pub toolbar_height: f64,
    /// Height currently obscured by the on-screen keyboard.
    pub keyboard_inset: f64,
    /// Height of the shadow that bleeds above the fully-open panel.
    pub shadow_height: f64,
}

impl PanelGeometry {
    /// Whether a layout pass has produced usable dimensions yet.
    pub fn is_valid(&self) -> bool {
        self.container_height > 0.0
    }

    /// Container height minus the keyboard inset.
    pub fn visible_height(&self) -> f64 {
        (self.container_height - self.keyboard_inset).max(0.0)
    }
}

/// Compare two floats with the panel-wide tolerance.
pub fn floats_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < F_EPSILON
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
