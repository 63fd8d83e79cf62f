//! Advisory checks over a waypoint sequence.
//!
//! Validation never changes the sequence and never blocks computation. The
//! caller decides whether an issue warns or blocks.

use crate::models::{Waypoint, WaypointId};
use crate::rules::FeasibilityRules;
use crate::speed::{calculate_speed, exceeds_absolute_limit};
use crate::terrain::{ground_clearance_m, ElevationSource};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A problem found in a waypoint sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequenceIssue {
    /// Waypoint is not later than the one before it
    TimeOrder {
        index: usize,
        waypoint_id: WaypointId,
        name: String,
        previous_name: String,
        previous_time_s: f64,
        time_s: f64,
    },
    /// Leg speed above the hard ceiling
    SpeedLimit {
        index: usize,
        waypoint_id: WaypointId,
        name: String,
        speed_mps: f64,
        limit_mps: f64,
    },
    /// Waypoint too close to (or below) the ground
    GroundClearance {
        index: usize,
        waypoint_id: WaypointId,
        name: String,
        altitude_m: f64,
        ground_elevation_m: f64,
        clearance_m: f64,
        min_clearance_m: f64,
    },
}

impl SequenceIssue {
    pub fn index(&self) -> usize {
        match self {
            SequenceIssue::TimeOrder { index, .. }
            | SequenceIssue::SpeedLimit { index, .. }
            | SequenceIssue::GroundClearance { index, .. } => *index,
        }
    }

    pub fn waypoint_id(&self) -> WaypointId {
        match self {
            SequenceIssue::TimeOrder { waypoint_id, .. }
            | SequenceIssue::SpeedLimit { waypoint_id, .. }
            | SequenceIssue::GroundClearance { waypoint_id, .. } => *waypoint_id,
        }
    }
}

impl fmt::Display for SequenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceIssue::TimeOrder {
                name,
                previous_name,
                previous_time_s,
                time_s,
                ..
            } => write!(
                f,
                "Waypoint \"{name}\" time ({time_s}s) must be after \"{previous_name}\" ({previous_time_s}s)"
            ),
            SequenceIssue::SpeedLimit {
                name,
                speed_mps,
                limit_mps,
                ..
            } => write!(
                f,
                "Waypoint \"{name}\" requires {speed_mps:.1} m/s, exceeding safe operational limit of {limit_mps:.1} m/s"
            ),
            SequenceIssue::GroundClearance {
                name,
                clearance_m,
                min_clearance_m,
                ..
            } => write!(
                f,
                "Waypoint \"{name}\" is {clearance_m:.1}m above ground, below minimum clearance of {min_clearance_m:.1}m"
            ),
        }
    }
}

/// Result of a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<SequenceIssue>,
}

impl ValidationReport {
    pub fn from_issues(issues: Vec<SequenceIssue>) -> Self {
        Self {
            valid: issues.is_empty(),
            issues,
        }
    }

    /// Human-readable issue messages.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Fold another report into this one.
    pub fn merge(mut self, other: ValidationReport) -> Self {
        self.issues.extend(other.issues);
        self.valid = self.issues.is_empty();
        self
    }
}

/// Check time ordering and absolute speed with default rules.
pub fn validate_waypoint_sequence(waypoints: &[Waypoint]) -> ValidationReport {
    validate_waypoint_sequence_with_rules(waypoints, &FeasibilityRules::default())
}

/// Check time ordering and absolute speed.
pub fn validate_waypoint_sequence_with_rules(
    waypoints: &[Waypoint],
    rules: &FeasibilityRules,
) -> ValidationReport {
    let mut issues = Vec::new();

    for (index, pair) in waypoints.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        // NaN times compare as unordered and are reported too
        if current.time_from_start_s.partial_cmp(&previous.time_from_start_s)
            != Some(Ordering::Greater)
        {
            issues.push(SequenceIssue::TimeOrder {
                index: index + 1,
                waypoint_id: current.id,
                name: current.name.clone(),
                previous_name: previous.name.clone(),
                previous_time_s: previous.time_from_start_s,
                time_s: current.time_from_start_s,
            });
        }
    }

    if waypoints.len() >= 2 {
        let last = waypoints.len() - 1;
        for (index, waypoint) in waypoints.iter().enumerate() {
            let speed = if index < last {
                calculate_speed(waypoint, &waypoints[index + 1], None)
            } else {
                calculate_speed(&waypoints[index - 1], waypoint, None)
            };
            if exceeds_absolute_limit(speed, rules) {
                issues.push(SequenceIssue::SpeedLimit {
                    index,
                    waypoint_id: waypoint.id,
                    name: waypoint.name.clone(),
                    speed_mps: speed,
                    limit_mps: rules.absolute_max_mps,
                });
            }
        }
    }

    ValidationReport::from_issues(issues)
}

/// Check every waypoint keeps the minimum clearance above known ground.
///
/// Waypoints without a known ground elevation are skipped.
pub fn validate_terrain_clearance(
    waypoints: &[Waypoint],
    terrain: &dyn ElevationSource,
    rules: &FeasibilityRules,
) -> ValidationReport {
    let mut issues = Vec::new();

    for (index, waypoint) in waypoints.iter().enumerate() {
        if !waypoint.position().is_valid() || !waypoint.altitude_m.is_finite() {
            continue;
        }
        let Some(ground_m) = terrain.ground_elevation_m(waypoint.lat, waypoint.lon) else {
            continue;
        };
        let clearance = ground_clearance_m(waypoint, ground_m);
        if clearance < rules.min_ground_clearance_m {
            issues.push(SequenceIssue::GroundClearance {
                index,
                waypoint_id: waypoint.id,
                name: waypoint.name.clone(),
                altitude_m: waypoint.altitude_m,
                ground_elevation_m: ground_m,
                clearance_m: clearance,
                min_clearance_m: rules.min_ground_clearance_m,
            });
        }
    }

    ValidationReport::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;

    fn pair(t_b: f64) -> Vec<Waypoint> {
        vec![
            Waypoint::new("A", 35.0, 51.0, 100.0, 0.0),
            Waypoint::new("B", 35.0009, 51.0, 100.0, t_b),
        ]
    }

    #[test]
    fn feasible_sequence_is_valid() {
        let report = validate_waypoint_sequence(&pair(10.0));
        assert!(report.valid);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn impossible_leg_is_reported() {
        let report = validate_waypoint_sequence(&pair(1.0));
        assert!(!report.valid);
        assert!(report
            .issues
            .iter()
            .any(|issue| matches!(issue, SequenceIssue::SpeedLimit { name, .. } if name == "A")));
        let message = report.messages().join("\n");
        assert!(message.contains("exceeding safe operational limit"), "{message}");
    }

    #[test]
    fn marginal_speed_below_ceiling_is_not_reported() {
        // ~25 m/s: impossible tier but under the 30 m/s ceiling
        let report = validate_waypoint_sequence(&pair(4.0));
        assert!(report.valid, "{:?}", report.messages());
    }

    #[test]
    fn time_order_violation_names_both_times() {
        let mut waypoints = pair(10.0);
        waypoints.push(Waypoint::new("C", 35.0018, 51.0, 100.0, 10.0));
        let report = validate_waypoint_sequence(&waypoints);

        assert!(!report.valid);
        let time_issue = report
            .issues
            .iter()
            .find(|issue| matches!(issue, SequenceIssue::TimeOrder { .. }))
            .expect("time order issue");
        assert_eq!(time_issue.index(), 2);
        assert_eq!(time_issue.waypoint_id(), waypoints[2].id);
        let message = time_issue.to_string();
        assert!(message.contains("\"C\""), "{message}");
        assert!(message.contains("10s"), "{message}");
    }

    #[test]
    fn validation_does_not_mutate_input() {
        let waypoints = pair(1.0);
        let snapshot = waypoints.clone();
        let _ = validate_waypoint_sequence(&waypoints);
        assert_eq!(waypoints, snapshot);
    }

    #[test]
    fn short_sequences_are_valid() {
        assert!(validate_waypoint_sequence(&[]).valid);
        assert!(validate_waypoint_sequence(&pair(1.0)[..1]).valid);
    }

    #[test]
    fn clearance_below_minimum_is_reported() {
        let waypoints = pair(10.0);
        let report = validate_terrain_clearance(
            &waypoints,
            &FlatTerrain { elevation_m: 97.0 },
            &FeasibilityRules::default(),
        );
        assert_eq!(report.issues.len(), 2);
        assert!(matches!(
            report.issues[0],
            SequenceIssue::GroundClearance { clearance_m, .. } if clearance_m == 3.0
        ));

        let clear = validate_terrain_clearance(
            &waypoints,
            &FlatTerrain { elevation_m: 50.0 },
            &FeasibilityRules::default(),
        );
        assert!(clear.valid);
    }

    #[test]
    fn merge_combines_reports() {
        let speed = validate_waypoint_sequence(&pair(1.0));
        let clear = ValidationReport::from_issues(Vec::new());
        let merged = clear.merge(speed.clone());
        assert_eq!(merged, speed);
    }
}
