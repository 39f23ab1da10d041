//! Panel core: the detent state machine
//!
//! Owns the geometry, the resolved detent heights, the continuous offset,
//! the live settle animation, the swipe detector, the hosted content, and
//! the observer registry. Everything runs on one thread; animation progress
//! comes from the host ticking [`PanelCore::tick`] on its frame callbacks,
//! so a caller requesting an animated transition returns immediately and
//! hears about completion through the observers.
//!
//! At most one animation is live at any time. Starting a new one, or
//! touching the panel, cancels the previous one synchronously: once
//! cancelled, no further position updates from that animation are delivered.
//!
//! All computation is based off the bottom of the screen: the bottom edge is
//! 0 on the Y axis and the offset grows upward.

use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::animator::SettleAnimation;
use crate::config::PanelTuning;
use crate::detent::{DetentMap, DetentSet};
use crate::events::{ContentId, ObserverRegistry, PanelPosition, SharedObserver};
use crate::geometry::{floats_equal, PanelGeometry};
use crate::gesture::{SwipeContext, SwipeDetector, SwipeResponse};
use crate::settle;
use crate::touch::{TouchEvent, TouchPhase};

/// Content hosted inside a panel.
pub trait PanelContent {
    fn id(&self) -> ContentId;

    /// Vertical scroll offset of the content view. Consulted only while
    /// dragging at the maximum detent.
    fn vertical_scroll_offset(&self) -> i32;

    /// Whether the content is ready to be interacted with.
    fn is_ready(&self) -> bool {
        true
    }

    /// Scroll the content back to its top.
    fn reset_scroll(&mut self) {}
}

/// What the panel did with a touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchDisposition {
    /// The panel consumed the event.
    Consumed,
    /// The event is not the panel's; route it to the content underneath.
    Ignored,
}

pub struct PanelCore<D: DetentSet> {
    tuning: PanelTuning,
    geometry: PanelGeometry,
    detents: DetentMap<D>,
    position: PanelPosition<D>,
    target: Option<D>,
    offset: f64,
    is_open: bool,
    animation: Option<SettleAnimation<D>>,
    swipe: SwipeDetector,
    content: Option<Box<dyn PanelContent>>,
    observers: Rc<ObserverRegistry<D>>,
    touch_enabled: bool,
    /// Whether moves at the maximum detent are handed to the content.
    yields_to_content: bool,
    /// Last peek-transition fraction sent, to guarantee a final 1.0.
    last_peek_fraction: f64,
}

impl<D: DetentSet> PanelCore<D> {
    pub fn new(tuning: PanelTuning, initial: D, yields_to_content: bool) -> Self {
        let swipe = SwipeDetector::new(&tuning);
        let geometry = PanelGeometry {
            shadow_height: tuning.shadow_height,
            ..Default::default()
        };
        Self {
            tuning,
            geometry,
            detents: DetentMap::new(),
            position: PanelPosition::Stable(initial),
            target: None,
            offset: 0.0,
            is_open: false,
            animation: None,
            swipe,
            content: None,
            observers: Rc::new(ObserverRegistry::new()),
            touch_enabled: true,
            yields_to_content,
            last_peek_fraction: 0.0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn tuning(&self) -> &PanelTuning {
        &self.tuning
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub fn detents(&self) -> &DetentMap<D> {
        &self.detents
    }

    pub fn position(&self) -> PanelPosition<D> {
        self.position
    }

    /// The detent the panel is moving toward, while a transition is in
    /// flight. `None` when the panel is at rest.
    pub fn target(&self) -> Option<D> {
        self.target
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.swipe.is_dragging()
    }

    pub fn observers(&self) -> Rc<ObserverRegistry<D>> {
        Rc::clone(&self.observers)
    }

    pub fn add_observer(&self, observer: SharedObserver<D>) -> crate::events::ObserverId {
        self.observers.add(observer)
    }

    pub fn content(&self) -> Option<&dyn PanelContent> {
        self.content.as_deref()
    }

    /// When disabled the panel consumes every touch without acting on it.
    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.touch_enabled = enabled;
    }

    // ------------------------------------------------------------------
    // Programmatic control
    // ------------------------------------------------------------------

    /// Move the panel to `detent`, animated or instantly.
    ///
    /// Requesting the detent the panel already rests at, with no transition
    /// in flight, is a no-op. Any running animation is cancelled first.
    pub fn request_state(&mut self, detent: D, animate: bool, now: Instant) {
        assert!(
            !D::ALL.is_empty(),
            "request_state on an empty detent ladder"
        );
        if self.animation.is_none()
            && self.position == PanelPosition::Stable(detent)
            && (!self.geometry.is_valid() || floats_equal(self.offset, self.detents.height(detent)))
        {
            return;
        }

        self.abort_animation();
        self.target = Some(detent);

        if !self.geometry.is_valid() {
            // Layout has not happened yet: record the resting state, move
            // nothing, animate nothing.
            self.set_position(PanelPosition::Stable(detent));
            self.target = None;
            return;
        }

        if animate {
            let to = self.detents.height(detent);
            self.animation = Some(SettleAnimation::new(
                detent,
                self.offset,
                to,
                now,
                Duration::from_millis(self.tuning.settle_duration_ms),
            ));
            self.set_position(PanelPosition::Scrolling);
        } else {
            self.set_offset(self.detents.height(detent));
            self.set_position(PanelPosition::Stable(detent));
            self.target = None;
        }
    }

    /// Cancel a running settle animation. The panel freezes at its current
    /// offset and the nearest detent becomes its resting state.
    pub fn cancel_animation(&mut self) {
        if self.animation.take().is_none() {
            return;
        }
        self.target = None;
        if self.position == PanelPosition::Scrolling && !self.swipe.is_dragging() {
            let resting = if self.geometry.is_valid() {
                settle::project(&self.detents, &self.tuning, self.offset, 0.0)
            } else {
                self.detents.lowest()
            };
            self.set_position(PanelPosition::Stable(resting));
        }
    }

    /// Drop the animation without resolving the discrete position. Used when
    /// a newer transition or gesture immediately takes over.
    fn abort_animation(&mut self) {
        if self.animation.take().is_some() {
            self.target = None;
        }
    }

    /// Advance the settle animation. Returns true while one is still
    /// running, so the host knows to keep its frame timer armed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        self.set_offset(anim.offset_at(now));
        if anim.is_finished(now) {
            self.animation = None;
            self.set_position(PanelPosition::Stable(anim.target()));
            self.target = None;
            return false;
        }
        true
    }

    // ------------------------------------------------------------------
    // Layout notifications
    // ------------------------------------------------------------------

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        if floats_equal(self.geometry.container_width, width)
            && floats_equal(self.geometry.container_height, height)
        {
            return;
        }
        self.geometry.container_width = width;
        self.geometry.container_height = height;
        self.relayout();
    }

    pub fn set_toolbar_height(&mut self, height: f64) {
        if floats_equal(self.geometry.toolbar_height, height) {
            return;
        }
        self.geometry.toolbar_height = height;
        self.relayout();
    }

    pub fn set_keyboard_inset(&mut self, inset: f64) {
        if floats_equal(self.geometry.keyboard_inset, inset) {
            return;
        }
        self.geometry.keyboard_inset = inset;
        self.relayout();
    }

    /// Recompute every derived dimension and re-snap to the resting detent.
    fn relayout(&mut self) {
        self.detents.recompute(&self.geometry, &self.tuning);
        if !self.geometry.is_valid() {
            return;
        }

        let window_height = self.geometry.container_height;
        let container_height = self.geometry.visible_height();
        self.observers
            .notify(|o| o.on_layout_changed(window_height, container_height));

        // A live gesture keeps control of the offset through the layout
        // change; the next projection starts from wherever the finger is.
        if self.swipe.is_dragging() {
            return;
        }

        match self.position {
            PanelPosition::Stable(detent) => {
                self.abort_animation();
                self.set_offset(self.detents.height(detent));
            }
            PanelPosition::Scrolling => {
                // Mid-animation: finish the transition instantly at the
                // target's new height.
                if let Some(target) = self.target {
                    self.abort_animation();
                    self.set_offset(self.detents.height(target));
                    self.set_position(PanelPosition::Stable(target));
                } else {
                    let resting =
                        settle::project(&self.detents, &self.tuning, self.offset, 0.0);
                    self.set_offset(self.detents.height(resting));
                    self.set_position(PanelPosition::Stable(resting));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Swap the hosted content. Re-showing the current content is a no-op.
    pub fn show_content(&mut self, content: Box<dyn PanelContent>) {
        if let Some(current) = &self.content {
            if current.id() == content.id() {
                return;
            }
        }
        let id = content.id();
        self.content = Some(content);
        debug!(content = id.0, "panel content changed");
        self.observers.notify(|o| o.on_content_changed(id));
    }

    // ------------------------------------------------------------------
    // Touch input
    // ------------------------------------------------------------------

    /// Feed one touch sample. `movable` is the host's gate for the current
    /// moment (overview mode, find-in-page, policy predicates).
    pub fn handle_touch(&mut self, event: &TouchEvent, movable: bool) -> TouchDisposition {
        if !self.touch_enabled {
            // Act like a black hole: consume without doing anything.
            return TouchDisposition::Consumed;
        }

        let movable = movable && self.geometry.is_valid();
        if event.phase == TouchPhase::Down && movable {
            // The most recent input wins: a fresh touch takes over from any
            // settling animation, and the interrupted position becomes the
            // next projection's starting offset.
            self.abort_animation();
        }

        let at_max = self.geometry.is_valid()
            && floats_equal(self.offset, self.detents.max_height());
        let ctx = SwipeContext {
            movable,
            offset: self.offset,
            at_max,
            content_scroll: self
                .content
                .as_ref()
                .map(|c| c.vertical_scroll_offset())
                .unwrap_or(0),
            yields_to_content: self.yields_to_content,
        };

        let disposition = match self.swipe.on_touch(event, &ctx) {
            SwipeResponse::Pass => TouchDisposition::Ignored,
            SwipeResponse::Capture => TouchDisposition::Consumed,
            SwipeResponse::ContentScroll => TouchDisposition::Ignored,
            SwipeResponse::Drag { offset } => {
                self.apply_drag(offset, at_max);
                TouchDisposition::Consumed
            }
            SwipeResponse::Settle { velocity, fling } => {
                self.settle_from_gesture(velocity, fling, event.time);
                TouchDisposition::Consumed
            }
        };

        // A touch that interrupted a settle without ever becoming a drag
        // leaves the panel parked mid-flight; project it home from where it
        // froze.
        if matches!(event.phase, TouchPhase::Up | TouchPhase::Cancel)
            && !self.is_animating()
            && !self.swipe.is_dragging()
            && self.position == PanelPosition::Scrolling
            && self.geometry.is_valid()
        {
            let target = settle::project(&self.detents, &self.tuning, self.offset, 0.0);
            self.request_state(target, true, event.time);
        }

        disposition
    }

    fn apply_drag(&mut self, offset: f64, was_at_max: bool) {
        let clamped = offset.clamp(self.detents.min_height(), self.detents.max_height());
        if !self.yields_to_content && was_at_max && clamped < self.offset {
            // Closing from fully open: the content's scroll position resets
            // so the next open starts at its top.
            if let Some(content) = &mut self.content {
                content.reset_scroll();
            }
        }
        self.set_offset(clamped);
        self.set_position(PanelPosition::Scrolling);
    }

    fn settle_from_gesture(&mut self, velocity: f64, fling: bool, now: Instant) {
        self.observers.notify(|o| o.on_released());

        if !self.geometry.is_valid() || !self.detents.is_ordered() {
            return;
        }

        let projected = if fling {
            self.offset + settle::fling_distance(velocity, &self.tuning)
        } else {
            self.offset
        };
        let target = settle::project(&self.detents, &self.tuning, projected, velocity);
        debug!(?target, velocity, fling, "settling after gesture");
        self.request_state(target, true, now);
    }

    // ------------------------------------------------------------------
    // Internal state transitions
    // ------------------------------------------------------------------

    fn set_position(&mut self, position: PanelPosition<D>) {
        if position == self.position {
            return;
        }
        self.position = position;
        self.observers.notify(|o| o.on_state_changed(position));
    }

    /// Move the continuous offset, firing open/close transitions exactly
    /// once per crossing of the lowest detent's height.
    fn set_offset(&mut self, offset: f64) {
        if floats_equal(offset, self.offset) {
            return;
        }

        let min = self.detents.min_height();
        let was = self.offset;
        self.offset = offset;

        if floats_equal(was, min) && offset > min {
            self.mark_opened();
        } else if floats_equal(offset, min) && was > min {
            self.mark_closed();
        }

        self.send_offset_events();
    }

    fn mark_opened(&mut self) {
        if self.is_open {
            return;
        }
        self.is_open = true;
        debug!("panel opened");
        self.observers.notify(|o| o.on_opened());
    }

    fn mark_closed(&mut self) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        debug!("panel closed");
        self.observers.notify(|o| o.on_closed());
    }

    fn send_offset_events(&mut self) {
        let min = self.detents.min_height();
        let max = self.detents.max_height();
        let offset = self.offset;

        let span = max - min;
        let mut fraction = if span > 0.0 {
            ((offset - min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if floats_equal(fraction, 0.0) {
            fraction = 0.0;
        }
        self.observers
            .notify(|o| o.on_offset_changed(offset, fraction));

        // Transition from the lowest detent to the one above it. The final
        // value delivered after leaving the range is exactly 1.0.
        let Some(second) = self.detents.second_lowest() else {
            return;
        };
        let span = self.detents.height(second) - min;
        if span <= 0.0 {
            return;
        }
        let mut peek_fraction = ((offset - min) / span).clamp(0.0, 1.0);
        if floats_equal(peek_fraction, 0.0) {
            peek_fraction = 0.0;
        }
        if self.last_peek_fraction < 1.0 || peek_fraction < 1.0 {
            self.last_peek_fraction = peek_fraction;
            self.observers
                .notify(|o| o.on_peek_transition(peek_fraction));
        }
    }
}

impl<D: DetentSet> std::fmt::Debug for PanelCore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelCore")
            .field("position", &self.position)
            .field("target", &self.target)
            .field("offset", &self.offset)
            .field("is_open", &self.is_open)
            .field("animating", &self.animation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PanelObserver;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sheet {
        Peek,
        Half,
        Full,
    }

    impl DetentSet for Sheet {
        const ALL: &'static [Sheet] = &[Sheet::Peek, Sheet::Half, Sheet::Full];

        fn height_ratio(self, geom: &PanelGeometry, tuning: &PanelTuning) -> f64 {
            if geom.container_height <= 0.0 {
                return 0.0;
            }
            match self {
                Sheet::Peek => geom.toolbar_height / geom.container_height,
                Sheet::Half => tuning.half_height_ratio,
                Sheet::Full => {
                    (geom.container_height + geom.shadow_height) / geom.container_height
                }
            }
        }

        fn is_skippable(self) -> bool {
            self == Sheet::Half
        }
    }

    #[derive(Default)]
    struct Recorder {
        opened: usize,
        closed: usize,
        released: usize,
        state_changes: Vec<PanelPosition<Sheet>>,
        offsets: Vec<f64>,
        peek_fractions: Vec<f64>,
    }

    impl PanelObserver<Sheet> for Recorder {
        fn on_opened(&mut self) {
            self.opened += 1;
        }
        fn on_closed(&mut self) {
            self.closed += 1;
        }
        fn on_released(&mut self) {
            self.released += 1;
        }
        fn on_state_changed(&mut self, position: PanelPosition<Sheet>) {
            self.state_changes.push(position);
        }
        fn on_offset_changed(&mut self, offset: f64, _fraction: f64) {
            self.offsets.push(offset);
        }
        fn on_peek_transition(&mut self, fraction: f64) {
            self.peek_fractions.push(fraction);
        }
    }

    fn panel_with_recorder() -> (PanelCore<Sheet>, Rc<RefCell<Recorder>>) {
        let mut tuning = PanelTuning::default();
        tuning.shadow_height = 20.0;
        let mut panel = PanelCore::new(tuning, Sheet::Peek, true);
        panel.set_toolbar_height(56.0);
        panel.set_container_size(600.0, 1000.0);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        panel.add_observer(recorder.clone());
        (panel, recorder)
    }

    #[test]
    fn test_instant_jump_to_full() {
        let (mut panel, recorder) = panel_with_recorder();
        panel.request_state(Sheet::Full, false, Instant::now());

        assert_eq!(panel.offset(), 1020.0);
        assert_eq!(panel.position(), PanelPosition::Stable(Sheet::Full));
        assert!(panel.is_open());
        assert_eq!(recorder.borrow().opened, 1);
        assert_eq!(panel.target(), None);
    }

    #[test]
    fn test_request_current_state_is_noop() {
        let (mut panel, recorder) = panel_with_recorder();
        panel.request_state(Sheet::Peek, false, Instant::now());
        assert_eq!(recorder.borrow().state_changes.len(), 0);
        assert_eq!(recorder.borrow().offsets.len(), 0);
    }

    #[test]
    fn test_open_close_edges_fire_once() {
        let (mut panel, recorder) = panel_with_recorder();
        let now = Instant::now();

        panel.request_state(Sheet::Full, false, now);
        panel.request_state(Sheet::Half, false, now);
        panel.request_state(Sheet::Peek, false, now);
        panel.request_state(Sheet::Peek, false, now);

        let recorder = recorder.borrow();
        assert_eq!(recorder.opened, 1);
        assert_eq!(recorder.closed, 1);
    }

    #[test]
    fn test_animated_transition_completes() {
        let (mut panel, recorder) = panel_with_recorder();
        let now = Instant::now();

        panel.request_state(Sheet::Half, true, now);
        assert!(panel.is_animating());
        assert_eq!(panel.position(), PanelPosition::Scrolling);
        assert_eq!(panel.target(), Some(Sheet::Half));

        assert!(panel.tick(now + Duration::from_millis(100)));
        assert!(panel.is_open());

        assert!(!panel.tick(now + Duration::from_millis(218)));
        assert_eq!(panel.offset(), 550.0);
        assert_eq!(panel.position(), PanelPosition::Stable(Sheet::Half));
        assert_eq!(panel.target(), None);

        let recorder = recorder.borrow();
        assert_eq!(
            recorder.state_changes.last(),
            Some(&PanelPosition::Stable(Sheet::Half))
        );
    }

    #[test]
    fn test_restart_keeps_single_animation_and_terminal_event() {
        let (mut panel, recorder) = panel_with_recorder();
        let now = Instant::now();

        panel.request_state(Sheet::Full, true, now);
        panel.tick(now + Duration::from_millis(50));
        panel.request_state(Sheet::Peek, true, now + Duration::from_millis(60));

        // Run the second animation to completion.
        let mut t = now + Duration::from_millis(60);
        while panel.tick(t) {
            t += Duration::from_millis(16);
        }

        let recorder = recorder.borrow();
        let stable_changes: Vec<_> = recorder
            .state_changes
            .iter()
            .filter(|p| p.is_stable())
            .collect();
        assert_eq!(stable_changes, vec![&PanelPosition::Stable(Sheet::Peek)]);
        assert_eq!(panel.position(), PanelPosition::Stable(Sheet::Peek));
    }

    #[test]
    fn test_cancel_freezes_offset() {
        let (mut panel, _recorder) = panel_with_recorder();
        let now = Instant::now();

        panel.request_state(Sheet::Full, true, now);
        panel.tick(now + Duration::from_millis(100));
        let frozen = panel.offset();
        assert!(frozen > 56.0 && frozen < 1020.0);

        panel.cancel_animation();
        assert!(!panel.is_animating());
        assert_eq!(panel.offset(), frozen);
        // No further ticks move the panel.
        panel.tick(now + Duration::from_millis(300));
        assert_eq!(panel.offset(), frozen);
        // The discrete position resolved to a detent, not Scrolling.
        assert!(panel.position().is_stable());
    }

    #[test]
    fn test_drag_moves_offset_and_reports_scrolling() {
        let (mut panel, recorder) = panel_with_recorder();
        let t0 = Instant::now();
        panel.request_state(Sheet::Half, false, t0);

        panel.handle_touch(&TouchEvent::new(TouchPhase::Down, 300.0, 900.0, t0), true);
        let disposition = panel.handle_touch(
            &TouchEvent::new(TouchPhase::Move, 300.0, 850.0, t0 + Duration::from_millis(16)),
            true,
        );
        assert_eq!(disposition, TouchDisposition::Consumed);
        assert_eq!(panel.offset(), 600.0);
        assert_eq!(panel.position(), PanelPosition::Scrolling);
        assert_eq!(recorder.borrow().released, 0);
    }

    #[test]
    fn test_release_settles_and_fires_released() {
        let (mut panel, recorder) = panel_with_recorder();
        let t0 = Instant::now();
        panel.request_state(Sheet::Half, false, t0);

        panel.handle_touch(&TouchEvent::new(TouchPhase::Down, 300.0, 900.0, t0), true);
        panel.handle_touch(
            &TouchEvent::new(TouchPhase::Move, 300.0, 700.0, t0 + Duration::from_millis(50)),
            true,
        );
        panel.handle_touch(
            &TouchEvent::new(TouchPhase::Up, 300.0, 650.0, t0 + Duration::from_millis(80)),
            true,
        );

        assert_eq!(recorder.borrow().released, 1);
        assert!(panel.is_animating());
        // Fast upward movement projects to full.
        assert_eq!(panel.target(), Some(Sheet::Full));
    }

    #[test]
    fn test_scrolled_content_blocks_drag_at_full() {
        struct ScrolledList;
        impl PanelContent for ScrolledList {
            fn id(&self) -> ContentId {
                ContentId(7)
            }
            fn vertical_scroll_offset(&self) -> i32 {
                40
            }
        }

        let (mut panel, _recorder) = panel_with_recorder();
        let t0 = Instant::now();
        panel.show_content(Box::new(ScrolledList));
        panel.request_state(Sheet::Full, false, t0);

        panel.handle_touch(&TouchEvent::new(TouchPhase::Down, 300.0, 400.0, t0), true);
        let disposition = panel.handle_touch(
            &TouchEvent::new(TouchPhase::Move, 300.0, 350.0, t0 + Duration::from_millis(16)),
            true,
        );
        assert_eq!(disposition, TouchDisposition::Ignored);
        assert_eq!(panel.offset(), 1020.0);
    }

    #[test]
    fn test_closing_drag_at_min_is_absorbed() {
        let (mut panel, _recorder) = panel_with_recorder();
        let t0 = Instant::now();

        panel.handle_touch(&TouchEvent::new(TouchPhase::Down, 300.0, 970.0, t0), true);
        let disposition = panel.handle_touch(
            &TouchEvent::new(TouchPhase::Move, 300.0, 990.0, t0 + Duration::from_millis(16)),
            true,
        );
        // The panel keeps the gesture; the offset just clamps at the peek
        // height.
        assert_eq!(disposition, TouchDisposition::Consumed);
        assert_eq!(panel.offset(), 56.0);
    }

    #[test]
    fn test_new_touch_cancels_animation() {
        let (mut panel, _recorder) = panel_with_recorder();
        let now = Instant::now();

        panel.request_state(Sheet::Full, true, now);
        panel.tick(now + Duration::from_millis(50));
        assert!(panel.is_animating());

        panel.handle_touch(
            &TouchEvent::new(TouchPhase::Down, 300.0, 500.0, now + Duration::from_millis(60)),
            true,
        );
        assert!(!panel.is_animating());
    }

    #[test]
    fn test_tap_interrupting_animation_settles_again() {
        let (mut panel, _recorder) = panel_with_recorder();
        let now = Instant::now();

        panel.request_state(Sheet::Full, true, now);
        panel.tick(now + Duration::from_millis(100));
        let frozen = panel.offset();

        // A tap with no movement: down cancels the settle, up may not leave
        // the panel parked between detents.
        panel.handle_touch(
            &TouchEvent::new(TouchPhase::Down, 300.0, 500.0, now + Duration::from_millis(110)),
            true,
        );
        assert!(!panel.is_animating());
        panel.handle_touch(
            &TouchEvent::new(TouchPhase::Up, 300.0, 500.0, now + Duration::from_millis(150)),
            true,
        );
        assert!(panel.is_animating());

        let mut t = now + Duration::from_millis(150);
        while panel.tick(t) {
            t += Duration::from_millis(16);
        }
        assert!(panel.position().is_stable());
        assert_ne!(panel.offset(), frozen);
    }

    #[test]
    fn test_touch_disabled_black_hole() {
        let (mut panel, _recorder) = panel_with_recorder();
        let t0 = Instant::now();
        panel.set_touch_enabled(false);

        let disposition =
            panel.handle_touch(&TouchEvent::new(TouchPhase::Down, 300.0, 900.0, t0), true);
        assert_eq!(disposition, TouchDisposition::Consumed);
        assert!(!panel.is_dragging());
    }

    #[test]
    fn test_layout_resnaps_resting_panel() {
        let (mut panel, _recorder) = panel_with_recorder();
        panel.request_state(Sheet::Half, false, Instant::now());
        assert_eq!(panel.offset(), 550.0);

        panel.set_container_size(600.0, 800.0);
        assert_eq!(panel.offset(), 440.0);
        assert_eq!(panel.position(), PanelPosition::Stable(Sheet::Half));
    }

    #[test]
    fn test_layout_mid_animation_jumps_to_target() {
        let (mut panel, _recorder) = panel_with_recorder();
        let now = Instant::now();
        panel.request_state(Sheet::Full, true, now);
        panel.tick(now + Duration::from_millis(50));

        panel.set_container_size(600.0, 800.0);
        assert!(!panel.is_animating());
        assert_eq!(panel.position(), PanelPosition::Stable(Sheet::Full));
        assert_eq!(panel.offset(), 820.0);
    }

    #[test]
    fn test_request_before_layout_moves_nothing() {
        let tuning = PanelTuning::default();
        let mut panel = PanelCore::<Sheet>::new(tuning, Sheet::Peek, true);
        panel.request_state(Sheet::Full, true, Instant::now());

        assert_eq!(panel.offset(), 0.0);
        assert!(!panel.is_animating());
        assert_eq!(panel.position(), PanelPosition::Stable(Sheet::Full));
    }

    #[test]
    fn test_peek_transition_reaches_one_exactly_once() {
        let (mut panel, recorder) = panel_with_recorder();
        let now = Instant::now();

        panel.request_state(Sheet::Full, false, now);
        panel.request_state(Sheet::Peek, false, now);

        let recorder = recorder.borrow();
        // Jumping straight past the peek-half range still delivers 1.0, and
        // returning to rest delivers 0.0.
        assert_eq!(recorder.peek_fractions, vec![1.0, 0.0]);
    }

    #[test]
    fn test_content_swap_fires_once() {
        struct Fixed(u32);
        impl PanelContent for Fixed {
            fn id(&self) -> ContentId {
                ContentId(self.0)
            }
            fn vertical_scroll_offset(&self) -> i32 {
                0
            }
        }

        #[derive(Default)]
        struct ContentRecorder {
            changes: Vec<ContentId>,
        }
        impl PanelObserver<Sheet> for ContentRecorder {
            fn on_content_changed(&mut self, content: ContentId) {
                self.changes.push(content);
            }
        }

        let (mut panel, _recorder) = panel_with_recorder();
        let content_recorder = Rc::new(RefCell::new(ContentRecorder::default()));
        panel.add_observer(content_recorder.clone());

        panel.show_content(Box::new(Fixed(1)));
        panel.show_content(Box::new(Fixed(1)));
        panel.show_content(Box::new(Fixed(2)));

        assert_eq!(
            content_recorder.borrow().changes,
            vec![ContentId(1), ContentId(2)]
        );
    }
}
