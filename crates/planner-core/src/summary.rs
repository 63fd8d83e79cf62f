//! Aggregate route metrics for a waypoint sequence.

use crate::models::{SpeedTier, Waypoint};
use crate::rules::FeasibilityRules;
use crate::spatial::total_distance_3d;
use crate::speed::{calculate_speed, classify_speed};
use serde::{Deserialize, Serialize};

/// Number of legs per feasibility tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub unknown: usize,
    pub feasible: usize,
    pub marginal: usize,
    pub impossible: usize,
}

impl TierCounts {
    fn record(&mut self, tier: SpeedTier) {
        match tier {
            SpeedTier::Unknown => self.unknown += 1,
            SpeedTier::Feasible => self.feasible += 1,
            SpeedTier::Marginal => self.marginal += 1,
            SpeedTier::Impossible => self.impossible += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.unknown + self.feasible + self.marginal + self.impossible
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub waypoint_count: usize,
    pub leg_count: usize,
    pub total_distance_m: f64,
    /// Time between the first and last waypoint
    pub total_duration_s: f64,
    pub max_leg_speed_mps: f64,
    pub legs_by_tier: TierCounts,
    pub min_altitude_m: Option<f64>,
    pub max_altitude_m: Option<f64>,
}

pub fn summarize(waypoints: &[Waypoint]) -> TrajectorySummary {
    summarize_with_rules(waypoints, &FeasibilityRules::default())
}

pub fn summarize_with_rules(waypoints: &[Waypoint], rules: &FeasibilityRules) -> TrajectorySummary {
    let mut total_distance_m = 0.0;
    let mut max_leg_speed_mps: f64 = 0.0;
    let mut legs_by_tier = TierCounts::default();

    for pair in waypoints.windows(2) {
        let distance = total_distance_3d(&pair[0], &pair[1]);
        if distance.is_finite() {
            total_distance_m += distance;
        }
        let speed = calculate_speed(&pair[0], &pair[1], None);
        max_leg_speed_mps = max_leg_speed_mps.max(speed);
        legs_by_tier.record(classify_speed(speed, rules));
    }

    let total_duration_s = match (waypoints.first(), waypoints.last()) {
        (Some(first), Some(last)) => {
            let span = last.time_from_start_s - first.time_from_start_s;
            if span.is_finite() {
                span.max(0.0)
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    let altitudes = waypoints
        .iter()
        .map(|wp| wp.altitude_m)
        .filter(|alt| alt.is_finite());
    let min_altitude_m = altitudes.clone().reduce(f64::min);
    let max_altitude_m = altitudes.reduce(f64::max);

    TrajectorySummary {
        waypoint_count: waypoints.len(),
        leg_count: waypoints.len().saturating_sub(1),
        total_distance_m,
        total_duration_s,
        max_leg_speed_mps,
        legs_by_tier,
        min_altitude_m,
        max_altitude_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence() {
        let summary = summarize(&[]);
        assert_eq!(summary.waypoint_count, 0);
        assert_eq!(summary.leg_count, 0);
        assert_eq!(summary.total_distance_m, 0.0);
        assert!(summary.min_altitude_m.is_none());
    }

    #[test]
    fn counts_legs_and_extremes() {
        let waypoints = vec![
            Waypoint::new("A", 35.0, 51.0, 100.0, 0.0),
            Waypoint::new("B", 35.0, 51.0, 160.0, 10.0),
            Waypoint::new("C", 35.0, 51.0, 120.0, 11.0),
        ];
        let summary = summarize(&waypoints);

        assert_eq!(summary.leg_count, 2);
        assert!((summary.total_distance_m - 100.0).abs() < 1e-9);
        assert_eq!(summary.total_duration_s, 11.0);
        assert_eq!(summary.max_leg_speed_mps, 40.0);
        assert_eq!(summary.legs_by_tier.feasible, 1);
        assert_eq!(summary.legs_by_tier.impossible, 1);
        assert_eq!(summary.legs_by_tier.total(), 2);
        assert_eq!(summary.min_altitude_m, Some(100.0));
        assert_eq!(summary.max_altitude_m, Some(160.0));
    }
}
