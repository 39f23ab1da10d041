//! The bottom sheet
//!
//! A phone-wide panel with a persistently showing toolbar and three states:
//! - PEEK: only the toolbar is visible at the bottom of the screen.
//! - HALF: the sheet consumes around half of the screen.
//! - FULL: the sheet is expanded to its full height.
//!
//! This is a thin adapter: the detent machinery, gesture handling, and
//! settling all live in [`PanelCore`]. What belongs here is the sheet's
//! detent geometry, its movability policy (overview mode, find-in-page, and
//! an injectable swipe predicate for features like the expand button), and
//! the metrics reasons only this layer can know.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::config::PanelTuning;
use crate::detent::DetentSet;
use crate::events::{ObserverId, PanelPosition, SharedObserver};
use crate::geometry::PanelGeometry;
use crate::metrics::{PanelMetrics, StateChangeReason};
use crate::panel::{PanelContent, PanelCore, TouchDisposition};
use crate::touch::{TouchEvent, TouchPhase};

/// The resting states of the bottom sheet, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetState {
    Peek,
    Half,
    Full,
}

impl DetentSet for SheetState {
    const ALL: &'static [SheetState] = &[SheetState::Peek, SheetState::Half, SheetState::Full];

    fn height_ratio(self, geom: &PanelGeometry, tuning: &PanelTuning) -> f64 {
        if geom.container_height <= 0.0 {
            return 0.0;
        }
        match self {
            SheetState::Peek => geom.toolbar_height / geom.container_height,
            SheetState::Half => tuning.half_height_ratio,
            // Greater than 1 to account for the toolbar shadow.
            SheetState::Full => (geom.container_height + geom.shadow_height) / geom.container_height,
        }
    }

    fn is_skippable(self) -> bool {
        self == SheetState::Half
    }
}

/// Gate context handed to an injected swipe predicate.
#[derive(Debug, Clone, Copy)]
pub struct SwipeGate {
    pub position: PanelPosition<SheetState>,
    pub is_open: bool,
}

pub struct BottomSheet {
    core: PanelCore<SheetState>,
    metrics: Rc<RefCell<PanelMetrics>>,
    overview_mode: bool,
    find_in_page_visible: bool,
    swipe_predicate: Option<Box<dyn Fn(&SwipeGate) -> bool>>,
}

impl BottomSheet {
    pub fn new(tuning: PanelTuning) -> Self {
        let core = PanelCore::new(tuning, SheetState::Peek, true);
        let metrics = Rc::new(RefCell::new(PanelMetrics::new("bottom_sheet")));
        let shared: SharedObserver<SheetState> = metrics.clone();
        core.add_observer(shared);
        Self {
            core,
            metrics,
            overview_mode: false,
            find_in_page_visible: false,
            swipe_predicate: None,
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Move the sheet to the provided state.
    pub fn set_sheet_state(&mut self, state: SheetState, animate: bool, now: Instant) {
        self.core.request_state(state, animate, now);
    }

    pub fn sheet_state(&self) -> PanelPosition<SheetState> {
        self.core.position()
    }

    pub fn target_state(&self) -> Option<SheetState> {
        self.core.target()
    }

    pub fn is_open(&self) -> bool {
        self.core.is_open()
    }

    pub fn offset_from_bottom(&self) -> f64 {
        self.core.offset()
    }

    pub fn is_running_settle_animation(&self) -> bool {
        self.core.is_animating()
    }

    pub fn cancel_animation(&mut self) {
        self.core.cancel_animation();
    }

    /// Advance the settle animation; true while one is still running.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.core.tick(now)
    }

    // ------------------------------------------------------------------
    // Collaborator state
    // ------------------------------------------------------------------

    pub fn set_overview_mode(&mut self, in_overview: bool) {
        self.overview_mode = in_overview;
    }

    pub fn set_find_in_page_visible(&mut self, visible: bool) {
        self.find_in_page_visible = visible;
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.core.set_touch_enabled(enabled);
    }

    /// Install a policy predicate evaluated before each gesture claims the
    /// sheet. Features layer swipe restrictions here instead of patching the
    /// classifier; with the expand button enabled, for instance, swiping is
    /// blocked while the sheet is peeking:
    ///
    /// ```ignore
    /// sheet.set_swipe_predicate(|gate| {
    ///     gate.position != PanelPosition::Stable(SheetState::Peek)
    /// });
    /// ```
    pub fn set_swipe_predicate(&mut self, predicate: impl Fn(&SwipeGate) -> bool + 'static) {
        self.swipe_predicate = Some(Box::new(predicate));
    }

    pub fn clear_swipe_predicate(&mut self) {
        self.swipe_predicate = None;
    }

    /// Whether the sheet may be moved right now.
    fn can_move(&self) -> bool {
        if self.overview_mode || self.find_in_page_visible {
            return false;
        }
        if let Some(predicate) = &self.swipe_predicate {
            let gate = SwipeGate {
                position: self.core.position(),
                is_open: self.core.is_open(),
            };
            if !predicate(&gate) {
                return false;
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Feed one touch sample to the sheet.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> TouchDisposition {
        let was_open = self.core.is_open();
        let movable = self.can_move();
        let disposition = self.core.handle_touch(event, movable);

        if !was_open && self.core.is_open() {
            self.metrics
                .borrow_mut()
                .record_open_reason(StateChangeReason::Swipe);
        }
        if matches!(event.phase, TouchPhase::Up | TouchPhase::Cancel)
            && self.core.target() == Some(SheetState::Peek)
        {
            self.metrics
                .borrow_mut()
                .set_close_reason(StateChangeReason::Swipe);
        }
        disposition
    }

    /// The expand button opens the sheet halfway.
    pub fn on_expand_button_pressed(&mut self, now: Instant) {
        self.metrics
            .borrow_mut()
            .record_open_reason(StateChangeReason::ExpandButton);
        self.set_sheet_state(SheetState::Half, true, now);
    }

    /// A tap on the scrim behind the sheet minimizes it.
    pub fn on_scrim_tapped(&mut self, now: Instant) {
        self.metrics
            .borrow_mut()
            .set_close_reason(StateChangeReason::TapScrim);
        self.set_sheet_state(SheetState::Peek, true, now);
    }

    /// A navigation in the hosted content minimizes the sheet.
    pub fn on_navigation(&mut self, now: Instant) {
        self.metrics
            .borrow_mut()
            .set_close_reason(StateChangeReason::Navigation);
        self.set_sheet_state(SheetState::Peek, true, now);
    }

    // ------------------------------------------------------------------
    // Layout, content, observers
    // ------------------------------------------------------------------

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.core.set_container_size(width, height);
    }

    pub fn set_toolbar_height(&mut self, height: f64) {
        self.core.set_toolbar_height(height);
    }

    pub fn set_keyboard_inset(&mut self, inset: f64) {
        self.core.set_keyboard_inset(inset);
    }

    pub fn show_content(&mut self, content: Box<dyn PanelContent>) {
        self.core.show_content(content);
    }

    pub fn add_observer(&self, observer: SharedObserver<SheetState>) -> ObserverId {
        self.core.add_observer(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) {
        self.core.observers().remove(id);
    }

    pub fn metrics(&self) -> Rc<RefCell<PanelMetrics>> {
        Rc::clone(&self.metrics)
    }

    pub fn core(&self) -> &PanelCore<SheetState> {
        &self.core
    }
}
