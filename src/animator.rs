//! Settle animation
//!
//! Interpolates the continuous offset from its current value to a target
//! detent height over a fixed duration with a quadratic deceleration curve.
//! The animation itself is just arithmetic over timestamps; the panel core
//! ticks it from the host's frame callbacks and drops it to cancel, which
//! freezes the offset at its last ticked value.

use std::time::{Duration, Instant};

use crate::detent::DetentSet;
use crate::geometry::lerp;

#[derive(Debug, Clone, Copy)]
pub struct SettleAnimation<D: DetentSet> {
    target: D,
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl<D: DetentSet> SettleAnimation<D> {
    pub fn new(target: D, from: f64, to: f64, started: Instant, duration: Duration) -> Self {
        Self {
            target,
            from,
            to,
            started,
            duration,
        }
    }

    pub fn target(&self) -> D {
        self.target
    }

    /// Offset at `now`, clamped to the animation's endpoints.
    pub fn offset_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() || now >= self.started + self.duration {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let t = (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        // Decelerate: fast start, slow finish.
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        lerp(self.from, self.to, eased)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now >= self.started + self.duration
    }
}
