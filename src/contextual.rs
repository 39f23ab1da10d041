//! The contextual search panel
//!
//! An in-page panel that surfaces a search for the user's selection. Four
//! states: CLOSED (off screen), PEEKED (just the search bar), EXPANDED
//! (most of the screen), MAXIMIZED (everything).
//!
//! On wide layouts the panel runs in a narrow configuration: it no longer
//! spans the screen, the expanded state drops out of the ladder, and the
//! maximized height shrinks so the page behind stays visible.
//!
//! Unlike the bottom sheet, this panel owns every vertical drag over it:
//! its content scrolls only while the panel is maximized, and closing from
//! maximized resets the content's scroll so the next open starts at the
//! top.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::debug;

use crate::config::PanelTuning;
use crate::detent::DetentSet;
use crate::events::{ObserverId, PanelPosition, SharedObserver};
use crate::geometry::PanelGeometry;
use crate::metrics::{PanelMetrics, StateChangeReason};
use crate::panel::{PanelContent, PanelCore, TouchDisposition};
use crate::touch::TouchEvent;

/// The states of the contextual search panel, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPanelState {
    Closed,
    Peeked,
    Expanded,
    Maximized,
}

/// Whether the panel runs in its narrow configuration for this geometry.
fn is_narrow(geom: &PanelGeometry, tuning: &PanelTuning) -> bool {
    geom.container_width > tuning.narrow_width_threshold
}

impl DetentSet for SearchPanelState {
    const ALL: &'static [SearchPanelState] = &[
        SearchPanelState::Closed,
        SearchPanelState::Peeked,
        SearchPanelState::Expanded,
        SearchPanelState::Maximized,
    ];

    fn height_ratio(self, geom: &PanelGeometry, tuning: &PanelTuning) -> f64 {
        if geom.container_height <= 0.0 {
            return 0.0;
        }
        match self {
            SearchPanelState::Closed => 0.0,
            SearchPanelState::Peeked => geom.toolbar_height / geom.container_height,
            SearchPanelState::Expanded => {
                if is_narrow(geom, tuning) {
                    tuning.narrow_expanded_ratio
                } else {
                    tuning.expanded_height_ratio
                }
            }
            SearchPanelState::Maximized => {
                if is_narrow(geom, tuning) {
                    tuning.narrow_maximized_ratio
                } else {
                    (geom.container_height + geom.shadow_height) / geom.container_height
                }
            }
        }
    }

    fn is_enabled(self, geom: &PanelGeometry, tuning: &PanelTuning) -> bool {
        match self {
            SearchPanelState::Expanded => !is_narrow(geom, tuning),
            _ => true,
        }
    }
}

pub struct ContextualSearchPanel {
    core: PanelCore<SearchPanelState>,
    metrics: Rc<RefCell<PanelMetrics>>,
    content_ready: bool,
}

impl ContextualSearchPanel {
    pub fn new(tuning: PanelTuning) -> Self {
        let core = PanelCore::new(tuning, SearchPanelState::Closed, false);
        let metrics = Rc::new(RefCell::new(PanelMetrics::new("contextual_search_panel")));
        let shared: SharedObserver<SearchPanelState> = metrics.clone();
        core.add_observer(shared);
        Self {
            core,
            metrics,
            content_ready: false,
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn panel_state(&self) -> PanelPosition<SearchPanelState> {
        self.core.position()
    }

    pub fn is_showing(&self) -> bool {
        self.core.is_open()
    }

    pub fn offset_from_bottom(&self) -> f64 {
        self.core.offset()
    }

    pub fn is_maximized(&self) -> bool {
        self.core.position() == PanelPosition::Stable(SearchPanelState::Maximized)
    }

    /// Show the peeking bar for a new search.
    pub fn peek(&mut self, reason: StateChangeReason, now: Instant) {
        self.metrics.borrow_mut().record_open_reason(reason);
        self.core
            .request_state(SearchPanelState::Peeked, true, now);
    }

    /// Open the panel to its reading height. In the narrow configuration
    /// there is no expanded state, so the panel maximizes instead.
    pub fn expand(&mut self, reason: StateChangeReason, now: Instant) {
        debug!(?reason, "expanding search panel");
        let target = if self
            .core
            .detents()
            .is_enabled(SearchPanelState::Expanded)
        {
            SearchPanelState::Expanded
        } else {
            SearchPanelState::Maximized
        };
        self.core.request_state(target, true, now);
    }

    pub fn maximize(&mut self, reason: StateChangeReason, now: Instant) {
        debug!(?reason, "maximizing search panel");
        self.core
            .request_state(SearchPanelState::Maximized, true, now);
    }

    pub fn close(&mut self, reason: StateChangeReason, animate: bool, now: Instant) {
        self.metrics.borrow_mut().set_close_reason(reason);
        self.core
            .request_state(SearchPanelState::Closed, animate, now);
    }

    /// A tap on the search bar walks the panel through its states.
    pub fn on_bar_tapped(&mut self, now: Instant) {
        match self.core.position() {
            PanelPosition::Stable(SearchPanelState::Peeked) => {
                self.expand(StateChangeReason::BarTap, now);
            }
            PanelPosition::Stable(SearchPanelState::Expanded) => {
                self.peek(StateChangeReason::BarTap, now);
            }
            PanelPosition::Stable(SearchPanelState::Maximized) => {
                // Promotion to a full tab is the host's move; the panel just
                // reports the intent.
                self.metrics
                    .borrow_mut()
                    .set_close_reason(StateChangeReason::Promotion);
            }
            _ => {}
        }
    }

    pub fn cancel_animation(&mut self) {
        self.core.cancel_animation();
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.core.tick(now)
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Until the search content is ready every touch passes through
    /// untouched.
    pub fn set_content_ready(&mut self, ready: bool) {
        self.content_ready = ready;
    }

    pub fn show_content(&mut self, content: Box<dyn PanelContent>) {
        self.core.show_content(content);
    }

    // ------------------------------------------------------------------
    // Input and layout
    // ------------------------------------------------------------------

    pub fn handle_touch(&mut self, event: &TouchEvent) -> TouchDisposition {
        self.core.handle_touch(event, self.content_ready)
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.core.set_container_size(width, height);
    }

    /// The search bar height plays the toolbar's role in the geometry.
    pub fn set_bar_height(&mut self, height: f64) {
        self.core.set_toolbar_height(height);
    }

    pub fn set_keyboard_inset(&mut self, inset: f64) {
        self.core.set_keyboard_inset(inset);
    }

    pub fn add_observer(&self, observer: SharedObserver<SearchPanelState>) -> ObserverId {
        self.core.add_observer(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) {
        self.core.observers().remove(id);
    }

    pub fn metrics(&self) -> Rc<RefCell<PanelMetrics>> {
        Rc::clone(&self.metrics)
    }

    pub fn core(&self) -> &PanelCore<SearchPanelState> {
        &self.core
    }
}
