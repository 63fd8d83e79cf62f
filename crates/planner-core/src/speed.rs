//! Required leg speed and feasibility tiers.

use crate::models::{Position, SpeedTier, Waypoint};
use crate::rules::FeasibilityRules;
use crate::spatial::distance_3d;

/// Round to one decimal place.
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average speed (m/s) needed to fly from `from` to `to` in the allotted time.
///
/// `preview` replaces the horizontal position of `to` while a new waypoint is
/// still being placed; altitude and time are always taken from `to`.
///
/// Returns 0 when no time is available for the leg or the inputs are not
/// finite. Never panics.
pub fn calculate_speed(from: &Waypoint, to: &Waypoint, preview: Option<Position>) -> f64 {
    let from_time = if from.time_from_start_s.is_finite() {
        from.time_from_start_s
    } else {
        0.0
    };
    let time_diff = to.time_from_start_s - from_time;
    if !time_diff.is_finite() {
        tracing::warn!(
            from = %from.id,
            to = %to.id,
            "non-finite time on leg, speed defaults to 0"
        );
        return 0.0;
    }
    if time_diff <= 0.0 {
        return 0.0;
    }

    let target = preview.unwrap_or_else(|| to.position());
    let distance = distance_3d(from.position(), from.altitude_m, target, to.altitude_m);
    if !distance.is_finite() {
        tracing::warn!(
            from = %from.id,
            to = %to.id,
            "leg distance is not finite, speed defaults to 0"
        );
        return 0.0;
    }

    round_tenth(distance / time_diff)
}

/// Classify a speed using the default thresholds.
pub fn validate_speed(speed_mps: f64) -> SpeedTier {
    classify_speed(speed_mps, &FeasibilityRules::default())
}

/// Classify a speed against the given thresholds.
pub fn classify_speed(speed_mps: f64, rules: &FeasibilityRules) -> SpeedTier {
    if speed_mps.is_nan() || speed_mps < rules.min_meaningful_mps {
        SpeedTier::Unknown
    } else if speed_mps <= rules.max_feasible_mps {
        SpeedTier::Feasible
    } else if speed_mps <= rules.max_marginal_mps {
        SpeedTier::Marginal
    } else {
        SpeedTier::Impossible
    }
}

/// True when the speed exceeds the hard safety ceiling.
pub fn exceeds_absolute_limit(speed_mps: f64, rules: &FeasibilityRules) -> bool {
    speed_mps > rules.absolute_max_mps
}
