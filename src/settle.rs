//! Settle projection: where a released panel comes to rest
//!
//! Pure functions of geometry and velocity, so the snapping behavior can be
//! tested without a panel, a clock, or a touch stream.
//!
//! Velocity here uses panel coordinates: positive means the panel is being
//! opened (the finger moved up the screen). Callers converting from raw
//! touch velocity must negate it first.

use crate::config::PanelTuning;
use crate::detent::{DetentMap, DetentSet};

/// Distance a fling carries the panel past the release point, assuming the
/// deceleration curve is quadratic: displacement = velocity * duration / 2.
/// The divisor includes the seconds-to-milliseconds conversion.
pub fn fling_distance(velocity: f64, tuning: &PanelTuning) -> f64 {
    velocity * tuning.settle_duration_ms as f64 / 2000.0
}

/// Project the detent a panel at `offset` should settle into, given the
/// release velocity.
///
/// A skippable detent drops out of consideration when the motion is closing
/// or when it sits closer than `min_detent_separation` to the detent above
/// it (a half state visually indistinguishable from full on a small screen).
/// The snap threshold is direction-dependent and lower for the two-state
/// choice than the three-state one; ties go to the higher detent.
pub fn project<D: DetentSet>(
    map: &DetentMap<D>,
    tuning: &PanelTuning,
    offset: f64,
    velocity: f64,
) -> D {
    let lowest = map.lowest();
    let highest = map.highest();

    if offset <= map.height(lowest) {
        return lowest;
    }
    if offset >= map.height(highest) {
        return highest;
    }

    let closing = velocity < 0.0;
    let squeezed = D::ALL.iter().any(|&d| {
        map.is_enabled(d)
            && d.is_skippable()
            && map.separation_above(d) < tuning.min_detent_separation
    });
    let has_skippable = D::ALL
        .iter()
        .any(|&d| map.is_enabled(d) && d.is_skippable());
    let skipping = has_skippable && (closing || squeezed);

    // Find the pair of adjacent detents bracketing the offset.
    let mut prev = lowest;
    let mut next = lowest;
    for &d in D::ALL {
        if !map.is_enabled(d) {
            continue;
        }
        if skipping && d.is_skippable() {
            continue;
        }
        prev = next;
        next = d;
        if offset >= map.height(prev) && offset < map.height(next) {
            break;
        }
    }

    let lower = map.height(prev);
    let span = map.height(next) - lower;
    if span <= 0.0 {
        return prev;
    }

    let threshold = if skipping {
        tuning.threshold_two_state
    } else {
        tuning.threshold_three_state
    };
    // Velocity sign biases the snap in the direction of travel.
    let to_next = if closing { 1.0 - threshold } else { threshold };

    // Ties favor the next, higher, detent.
    if (offset - lower) / span >= to_next {
        next
    } else {
        prev
    }
}
