//! Panel tuning constants
//!
//! Every threshold that shapes how the panels feel lives here, so a device
//! profile can override them from a TOML file. The defaults are the values
//! the sheet was designed around.

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Tuning knobs shared by both panels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PanelTuning {
    /// Base duration of the settle animation in milliseconds. 218 ms is the
    /// minimum time a user is guaranteed to pay attention to a transition.
    pub settle_duration_ms: u64,

    /// Fraction of the way to the next detent a release must reach to snap
    /// there when three detents are in play.
    pub threshold_three_state: f64,

    /// Same as `threshold_three_state` but when a detent was skipped and only
    /// two remain. Smaller, so a smaller swipe still moves the panel.
    pub threshold_two_state: f64,

    /// Minimum y/x ratio a movement must have to count as a vertical drag of
    /// the panel rather than a gesture for the hosted content.
    pub min_vertical_slope: f64,

    /// Height of the half-open sheet relative to the container.
    pub half_height_ratio: f64,

    /// Minimum distance between a skippable detent and the detent above it
    /// for the skippable one to stay selectable.
    pub min_detent_separation: f64,

    /// Velocity (px/s) a release must exceed to be treated as a fling.
    pub fling_min_velocity: f64,

    /// Movement (px) below which a touch has not yet committed to anything.
    pub touch_slop: f64,

    /// Height of the shadow above the fully-open panel.
    pub shadow_height: f64,

    /// Height of the expanded contextual panel relative to the container.
    pub expanded_height_ratio: f64,

    /// Expanded height ratio when the panel runs in its narrow configuration.
    pub narrow_expanded_ratio: f64,

    /// Maximized height ratio in the narrow configuration.
    pub narrow_maximized_ratio: f64,

    /// Container widths above this use the narrow panel configuration.
    pub narrow_width_threshold: f64,
}

impl Default for PanelTuning {
    fn default() -> Self {
        Self {
            settle_duration_ms: 218,
            threshold_three_state: 0.5,
            threshold_two_state: 0.3,
            min_vertical_slope: 2.0,
            half_height_ratio: 0.55,
            min_detent_separation: 160.0,
            fling_min_velocity: 500.0,
            touch_slop: 8.0,
            shadow_height: 16.0,
            expanded_height_ratio: 0.7,
            narrow_expanded_ratio: 0.3,
            narrow_maximized_ratio: 0.9,
            narrow_width_threshold: 620.0,
        }
    }
}

impl PanelTuning {
    /// Load tuning overrides from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        let tuning: PanelTuning = toml::from_str(&raw)?;
        Ok(tuning)
    }
}
