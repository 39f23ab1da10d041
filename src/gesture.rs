//! Touch classification for panel drags
//!
//! One explicit session object threaded through a single entry point,
//! instead of the two-phase intercept/handle split a view toolkit would
//! impose. Each gesture is claimed or yielded exactly once, on its first
//! significant movement: a movement steeper than the vertical slope
//! threshold makes it a panel drag, anything else belongs to the hosted
//! content.
//!
//! While a claimed drag is in progress the detector can still hand
//! individual moves to the content: at the maximum detent a further-opening
//! move (or any move while the content is scrolled away from its top) has to
//! reach the content so a long list can scroll internally once the panel is
//! fully open.

use tracing::debug;

use crate::config::PanelTuning;
use crate::geometry::Point;
use crate::touch::{TouchEvent, TouchPhase, VelocityTracker};

/// Per-move context the panel core computes for the detector.
#[derive(Debug, Clone, Copy)]
pub struct SwipeContext {
    /// Whether the panel may be moved at all right now.
    pub movable: bool,
    /// Current continuous offset of the panel.
    pub offset: f64,
    /// Whether the panel currently rests at its maximum detent.
    pub at_max: bool,
    /// Vertical scroll offset reported by the hosted content.
    pub content_scroll: i32,
    /// Whether moves at the maximum detent should be handed to the content.
    pub yields_to_content: bool,
}

/// What the panel should do with one touch sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeResponse {
    /// Not ours; the host should route the event to whatever is underneath.
    Pass,
    /// Ours, but nothing to act on yet.
    Capture,
    /// Move the panel to this offset (caller clamps).
    Drag { offset: f64 },
    /// A claimed drag is letting the content consume this move.
    ContentScroll,
    /// The gesture ended; settle the panel. Velocity is in panel
    /// coordinates: positive opens.
    Settle { velocity: f64, fling: bool },
}

#[derive(Debug, Clone, Copy)]
enum SwipeState {
    Idle,
    /// Touch is down but the claim decision has not been made.
    Pending { start: Point },
    /// The gesture is a panel drag; `last_y` is the last processed sample.
    Dragging { last_y: f64 },
    /// The gesture was yielded; ignore it until the finger lifts.
    Refused,
}

/// Classifies a raw touch stream into panel drags and settles.
#[derive(Debug)]
pub struct SwipeDetector {
    state: SwipeState,
    tracker: VelocityTracker,
    touch_slop: f64,
    min_slope: f64,
    fling_velocity: f64,
}

impl SwipeDetector {
    pub fn new(tuning: &PanelTuning) -> Self {
        Self {
            state: SwipeState::Idle,
            tracker: VelocityTracker::new(),
            touch_slop: tuning.touch_slop,
            min_slope: tuning.min_vertical_slope,
            fling_velocity: tuning.fling_min_velocity,
        }
    }

    /// Whether a claimed drag is currently in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SwipeState::Dragging { .. })
    }

    /// Feed one touch sample.
    pub fn on_touch(&mut self, event: &TouchEvent, ctx: &SwipeContext) -> SwipeResponse {
        match event.phase {
            TouchPhase::Down => self.on_down(event, ctx),
            TouchPhase::Move => self.on_move(event, ctx),
            TouchPhase::Up => self.on_up(event),
            TouchPhase::Cancel => self.on_cancel(event),
        }
    }

    fn on_down(&mut self, event: &TouchEvent, ctx: &SwipeContext) -> SwipeResponse {
        if !ctx.movable {
            self.state = SwipeState::Refused;
            return SwipeResponse::Pass;
        }
        self.state = SwipeState::Pending {
            start: event.position,
        };
        self.tracker.clear();
        self.tracker.add_movement(event.time, event.position.y);
        SwipeResponse::Capture
    }

    fn on_move(&mut self, event: &TouchEvent, ctx: &SwipeContext) -> SwipeResponse {
        match self.state {
            SwipeState::Idle | SwipeState::Refused => SwipeResponse::Pass,
            SwipeState::Pending { start } => {
                self.tracker.add_movement(event.time, event.position.y);
                let dx = (event.position.x - start.x).abs();
                let dy = (event.position.y - start.y).abs();
                if dx * dx + dy * dy < self.touch_slop * self.touch_slop {
                    return SwipeResponse::Capture;
                }
                // Claim decision, made once per gesture.
                let slope = if dx > 0.0 { dy / dx } else { f64::INFINITY };
                if slope < self.min_slope {
                    debug!(slope, "yielding gesture to content");
                    self.state = SwipeState::Refused;
                    self.tracker.clear();
                    return SwipeResponse::Pass;
                }
                self.state = SwipeState::Dragging { last_y: start.y };
                self.drag_move(event, ctx)
            }
            SwipeState::Dragging { .. } => {
                self.tracker.add_movement(event.time, event.position.y);
                self.drag_move(event, ctx)
            }
        }
    }

    fn drag_move(&mut self, event: &TouchEvent, ctx: &SwipeContext) -> SwipeResponse {
        let SwipeState::Dragging { last_y } = self.state else {
            return SwipeResponse::Pass;
        };
        let delta = event.position.y - last_y;
        let opening = delta < 0.0;

        if ctx.at_max && ctx.yields_to_content {
            // Fully open: the content scrolls internally, in either direction
            // while it is away from its top, and for any further-opening move.
            if ctx.content_scroll > 0 || opening {
                self.state = SwipeState::Dragging {
                    last_y: event.position.y,
                };
                return SwipeResponse::ContentScroll;
            }
        }

        self.state = SwipeState::Dragging {
            last_y: event.position.y,
        };
        // Upward finger motion (negative delta) raises the offset.
        SwipeResponse::Drag {
            offset: ctx.offset - delta,
        }
    }

    fn on_up(&mut self, event: &TouchEvent) -> SwipeResponse {
        let state = self.state;
        self.state = SwipeState::Idle;
        match state {
            SwipeState::Dragging { .. } => {
                self.tracker.add_movement(event.time, event.position.y);
                let velocity = -self.tracker.velocity();
                let fling = velocity.abs() >= self.fling_velocity;
                debug!(velocity, fling, "drag released");
                SwipeResponse::Settle { velocity, fling }
            }
            _ => SwipeResponse::Pass,
        }
    }

    fn on_cancel(&mut self, _event: &TouchEvent) -> SwipeResponse {
        let state = self.state;
        self.state = SwipeState::Idle;
        match state {
            // An interrupted drag settles from wherever it was, without any
            // fling projection.
            SwipeState::Dragging { .. } => SwipeResponse::Settle {
                velocity: -self.tracker.velocity(),
                fling: false,
            },
            _ => SwipeResponse::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn ctx(offset: f64, at_max: bool, content_scroll: i32) -> SwipeContext {
        SwipeContext {
            movable: true,
            offset,
            at_max,
            content_scroll,
            yields_to_content: true,
        }
    }

    fn event(phase: TouchPhase, x: f64, y: f64, t: Instant) -> TouchEvent {
        TouchEvent::new(phase, x, y, t)
    }

    #[test]
    fn test_steep_movement_claims_gesture() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let c = ctx(550.0, false, 0);

        assert_eq!(
            detector.on_touch(&event(TouchPhase::Down, 300.0, 900.0, t0), &c),
            SwipeResponse::Capture
        );
        let response = detector.on_touch(
            &event(TouchPhase::Move, 302.0, 850.0, t0 + Duration::from_millis(16)),
            &c,
        );
        assert_eq!(response, SwipeResponse::Drag { offset: 600.0 });
        assert!(detector.is_dragging());
    }

    #[test]
    fn test_shallow_movement_yields() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let c = ctx(550.0, false, 0);

        detector.on_touch(&event(TouchPhase::Down, 300.0, 900.0, t0), &c);
        let response = detector.on_touch(
            &event(TouchPhase::Move, 360.0, 880.0, t0 + Duration::from_millis(16)),
            &c,
        );
        assert_eq!(response, SwipeResponse::Pass);

        // The refusal is sticky for the rest of the gesture.
        let response = detector.on_touch(
            &event(TouchPhase::Move, 360.0, 700.0, t0 + Duration::from_millis(32)),
            &c,
        );
        assert_eq!(response, SwipeResponse::Pass);
    }

    #[test]
    fn test_sub_slop_movement_stays_undecided() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let c = ctx(550.0, false, 0);

        detector.on_touch(&event(TouchPhase::Down, 300.0, 900.0, t0), &c);
        let response = detector.on_touch(
            &event(TouchPhase::Move, 301.0, 897.0, t0 + Duration::from_millis(8)),
            &c,
        );
        assert_eq!(response, SwipeResponse::Capture);
        assert!(!detector.is_dragging());
    }

    #[test]
    fn test_scrolled_content_absorbs_at_max() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let c = ctx(1020.0, true, 40);

        detector.on_touch(&event(TouchPhase::Down, 300.0, 400.0, t0), &c);
        let response = detector.on_touch(
            &event(TouchPhase::Move, 300.0, 350.0, t0 + Duration::from_millis(16)),
            &c,
        );
        assert_eq!(response, SwipeResponse::ContentScroll);
    }

    #[test]
    fn test_closing_drag_at_max_moves_panel_when_content_at_top() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let c = ctx(1020.0, true, 0);

        detector.on_touch(&event(TouchPhase::Down, 300.0, 200.0, t0), &c);
        let response = detector.on_touch(
            &event(TouchPhase::Move, 300.0, 260.0, t0 + Duration::from_millis(16)),
            &c,
        );
        assert_eq!(response, SwipeResponse::Drag { offset: 960.0 });
    }

    #[test]
    fn test_fast_release_is_a_fling() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let c = ctx(550.0, false, 0);

        detector.on_touch(&event(TouchPhase::Down, 300.0, 900.0, t0), &c);
        detector.on_touch(
            &event(TouchPhase::Move, 300.0, 860.0, t0 + Duration::from_millis(25)),
            &c,
        );
        detector.on_touch(
            &event(TouchPhase::Move, 300.0, 820.0, t0 + Duration::from_millis(50)),
            &c,
        );
        let response = detector.on_touch(
            &event(TouchPhase::Up, 300.0, 780.0, t0 + Duration::from_millis(75)),
            &c,
        );
        match response {
            SwipeResponse::Settle { velocity, fling } => {
                assert!(fling, "1600 px/s upward should qualify as a fling");
                assert!(velocity > 500.0);
            }
            other => panic!("expected settle, got {other:?}"),
        }
    }

    #[test]
    fn test_slow_release_is_plain() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let c = ctx(550.0, false, 0);

        detector.on_touch(&event(TouchPhase::Down, 300.0, 900.0, t0), &c);
        detector.on_touch(
            &event(TouchPhase::Move, 300.0, 880.0, t0 + Duration::from_millis(100)),
            &c,
        );
        let response = detector.on_touch(
            &event(TouchPhase::Up, 300.0, 878.0, t0 + Duration::from_millis(200)),
            &c,
        );
        match response {
            SwipeResponse::Settle { fling, .. } => assert!(!fling),
            other => panic!("expected settle, got {other:?}"),
        }
    }

    #[test]
    fn test_immovable_panel_passes_everything() {
        let mut detector = SwipeDetector::new(&PanelTuning::default());
        let t0 = Instant::now();
        let mut c = ctx(56.0, false, 0);
        c.movable = false;

        assert_eq!(
            detector.on_touch(&event(TouchPhase::Down, 300.0, 900.0, t0), &c),
            SwipeResponse::Pass
        );
        assert_eq!(
            detector.on_touch(
                &event(TouchPhase::Move, 300.0, 700.0, t0 + Duration::from_millis(16)),
                &c
            ),
            SwipeResponse::Pass
        );
    }
}
