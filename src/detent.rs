//! Detent sets and their resting heights
//!
//! A detent is a named, stable resting position of a panel. Each panel
//! flavor declares its detents as a closed enum implementing [`DetentSet`];
//! the [`DetentMap`] resolves them to concrete heights against the current
//! geometry. Heights are recomputed wholesale on every layout pass.
//!
//! Detents are totally ordered by resting height. A recomputation that
//! breaks the strict ordering does not panic: the map is flagged unordered,
//! a warning is logged, and the settle engine's skip policy keeps the panel
//! usable (a detent squeezed against its neighbor stops being selectable).

use std::fmt;

use tracing::warn;

use crate::config::PanelTuning;
use crate::geometry::PanelGeometry;

/// A closed, ordered set of detents.
pub trait DetentSet: Copy + Eq + fmt::Debug + 'static {
    /// All detents, ordered from lowest to highest resting height.
    const ALL: &'static [Self];

    /// Resting height as a ratio of the container height. May exceed 1.0 to
    /// allow for shadow bleed above the container.
    fn height_ratio(self, geom: &PanelGeometry, tuning: &PanelTuning) -> f64;

    /// Whether the settle engine may skip this detent when projecting a
    /// release (closing motion, or too little separation from its neighbor).
    fn is_skippable(self) -> bool {
        false
    }

    /// Whether this detent participates at all under the current geometry.
    fn is_enabled(self, geom: &PanelGeometry, tuning: &PanelTuning) -> bool {
        let _ = (geom, tuning);
        true
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|d| *d == self)
            .expect("detent missing from ALL")
    }
}

/// Resolved heights for a detent set under one geometry.
#[derive(Debug, Clone)]
pub struct DetentMap<D: DetentSet> {
    heights: Vec<f64>,
    enabled: Vec<bool>,
    ordered: bool,
    _marker: std::marker::PhantomData<D>,
}

impl<D: DetentSet> DetentMap<D> {
    pub fn new() -> Self {
        assert!(!D::ALL.is_empty(), "detent set must not be empty");
        Self {
            heights: vec![0.0; D::ALL.len()],
            enabled: vec![true; D::ALL.len()],
            ordered: false,
            _marker: std::marker::PhantomData,
        }
    }

    /// Recompute every height and enabled flag from scratch.
    pub fn recompute(&mut self, geom: &PanelGeometry, tuning: &PanelTuning) {
        for (i, &d) in D::ALL.iter().enumerate() {
            self.heights[i] = d.height_ratio(geom, tuning) * geom.container_height;
            self.enabled[i] = d.is_enabled(geom, tuning);
        }

        // Strict ordering over the enabled detents.
        let mut ordered = true;
        let mut prev: Option<f64> = None;
        for (i, &h) in self.heights.iter().enumerate() {
            if !self.enabled[i] {
                continue;
            }
            if let Some(p) = prev {
                if h <= p {
                    ordered = false;
                    break;
                }
            }
            prev = Some(h);
        }
        self.ordered = ordered;

        if !ordered && geom.is_valid() {
            warn!(
                container_height = geom.container_height,
                "detent heights not strictly ordered after layout"
            );
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn height(&self, d: D) -> f64 {
        self.heights[d.index()]
    }

    pub fn is_enabled(&self, d: D) -> bool {
        self.enabled[d.index()]
    }

    /// Lowest enabled detent.
    pub fn lowest(&self) -> D {
        *D::ALL
            .iter()
            .find(|d| self.enabled[d.index()])
            .expect("no enabled detents")
    }

    /// Highest enabled detent.
    pub fn highest(&self) -> D {
        *D::ALL
            .iter()
            .rev()
            .find(|d| self.enabled[d.index()])
            .expect("no enabled detents")
    }

    pub fn min_height(&self) -> f64 {
        self.height(self.lowest())
    }

    pub fn max_height(&self) -> f64 {
        self.height(self.highest())
    }

    /// The detent one position above the lowest, if any. Drives the
    /// peek-transition events.
    pub fn second_lowest(&self) -> Option<D> {
        let lowest = self.lowest();
        D::ALL
            .iter()
            .copied()
            .filter(|d| self.enabled[d.index()])
            .find(|&d| d != lowest)
    }

    /// Distance from `d` to the next enabled non-skippable detent above it.
    /// Infinite when nothing sits above it.
    pub fn separation_above(&self, d: D) -> f64 {
        let base = self.height(d);
        D::ALL
            .iter()
            .copied()
            .filter(|&o| self.enabled[o.index()] && !o.is_skippable() && o.index() > d.index())
            .map(|o| self.height(o) - base)
            .next()
            .unwrap_or(f64::INFINITY)
    }
}

impl<D: DetentSet> Default for DetentMap<D> {
    fn default() -> Self {
        Self::new()
    }
}
