//! Raw touch samples and velocity tracking
//!
//! Hosts hand the panel standard down/move/up/cancel samples with raw
//! (unadjusted) coordinates and a timestamp. Velocity is measured over a
//! short trailing window so a finger that paused before lifting does not
//! carry stale speed into the settle projection.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::geometry::Point;

/// Samples older than this no longer contribute to the measured velocity.
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One touch sample in raw screen coordinates.
#[derive(Debug, Clone, Copy)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub position: Point,
    pub time: Instant,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, x: f64, y: f64, time: Instant) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            time,
        }
    }
}

/// Tracks vertical velocity from a trailing window of touch samples.
///
/// Positive values mean downward finger motion (screen y grows downward).
#[derive(Debug, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f64)>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Record a sample and drop any that fell out of the window.
    pub fn add_movement(&mut self, time: Instant, y: f64) {
        while let Some(&(t, _)) = self.samples.front() {
            if time.duration_since(t) > VELOCITY_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        self.samples.push_back((time, y));
    }

    /// Current vertical velocity in px/s, 0.0 when there is not enough data.
    pub fn velocity(&self) -> f64 {
        let (Some(&(t0, y0)), Some(&(t1, y1))) = (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let dt = t1.duration_since(t0).as_secs_f64();
        if dt < 0.001 {
            return 0.0;
        }
        (y1 - y0) / dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_from_samples() {
        let mut tracker = VelocityTracker::new();
        let start = Instant::now();
        tracker.add_movement(start, 1000.0);
        tracker.add_movement(start + Duration::from_millis(50), 960.0);
        // 40 px upward over 50 ms -> -800 px/s.
        assert!((tracker.velocity() + 800.0).abs() < 1.0);
    }

    #[test]
    fn test_stale_samples_dropped() {
        let mut tracker = VelocityTracker::new();
        let start = Instant::now();
        tracker.add_movement(start, 1000.0);
        tracker.add_movement(start + Duration::from_millis(500), 900.0);
        tracker.add_movement(start + Duration::from_millis(520), 898.0);
        // The first sample is outside the window; velocity reflects the
        // recent, slow movement only.
        assert!(tracker.velocity().abs() < 150.0);
    }

    #[test]
    fn test_empty_tracker_is_zero() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), 0.0);
    }
}
