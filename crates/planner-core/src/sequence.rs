//! Recomputation of derived waypoint fields across an ordered sequence.
//!
//! Each waypoint's speed and heading describe the leg that *leaves* it: speed
//! from this waypoint to the next, bearing toward the next. The final waypoint
//! has no outgoing leg, so it reports the leg that arrives at it instead. That
//! asymmetry is relied upon by the display layer and must not be normalized.

use crate::heading::{calculate_heading, normalize_heading};
use crate::models::{HeadingMode, SpeedTier, Waypoint, WaypointId};
use crate::rules::FeasibilityRules;
use crate::speed::{calculate_speed, classify_speed};
use std::collections::BTreeSet;

/// Recompute every waypoint's derived fields with default rules.
pub fn calculate_waypoint_speeds(waypoints: &[Waypoint]) -> Vec<Waypoint> {
    calculate_waypoint_speeds_with_rules(waypoints, &FeasibilityRules::default())
}

/// Recompute every waypoint's derived fields.
pub fn calculate_waypoint_speeds_with_rules(
    waypoints: &[Waypoint],
    rules: &FeasibilityRules,
) -> Vec<Waypoint> {
    let mut result = waypoints.to_vec();
    for index in 0..result.len() {
        refresh_at(&mut result, index, rules);
    }
    tracing::debug!(count = result.len(), "recomputed waypoint sequence");
    result
}

/// Refresh derived fields after one waypoint was moved or edited.
///
/// `waypoints` is the sequence *after* the change. Only the legs touched by
/// the change are recomputed; the result is identical to
/// [`calculate_waypoint_speeds`] on the same sequence.
pub fn recalculate_after_drag(waypoints: &[Waypoint], moved_id: &WaypointId) -> Vec<Waypoint> {
    recalculate_after_drag_with_rules(waypoints, moved_id, &FeasibilityRules::default())
}

/// Incremental variant of [`calculate_waypoint_speeds_with_rules`].
pub fn recalculate_after_drag_with_rules(
    waypoints: &[Waypoint],
    moved_id: &WaypointId,
    rules: &FeasibilityRules,
) -> Vec<Waypoint> {
    if waypoints.len() < 2 {
        return calculate_waypoint_speeds_with_rules(waypoints, rules);
    }

    let Some(moved_index) = waypoints.iter().position(|wp| wp.id == *moved_id) else {
        tracing::warn!(%moved_id, "moved waypoint not in sequence, recomputing all legs");
        return calculate_waypoint_speeds_with_rules(waypoints, rules);
    };

    let last = waypoints.len() - 1;
    let mut dirty = BTreeSet::new();

    // The moved waypoint's outgoing leg and the leg that now points at it.
    dirty.insert(moved_index);
    if moved_index > 0 {
        dirty.insert(moved_index - 1);
    }
    // The final waypoint reports the leg arriving from its predecessor.
    if moved_index + 1 == last {
        dirty.insert(last);
    }
    // Legs whose recorded peer is no longer their neighbour, e.g. the
    // waypoint that used to precede the moved one.
    for (index, waypoint) in waypoints.iter().enumerate() {
        if waypoint.leg_peer != Some(expected_peer(waypoints, index)) {
            dirty.insert(index);
        }
    }

    let mut result = waypoints.to_vec();
    for &index in &dirty {
        refresh_at(&mut result, index, rules);
    }
    tracing::debug!(
        %moved_id,
        refreshed = dirty.len(),
        count = result.len(),
        "incrementally recomputed waypoint sequence"
    );
    result
}

/// Give an auto-mode final waypoint a manual heading along its arrival leg.
///
/// Used when a waypoint is placed at the tail: with no next point to aim at,
/// its heading defaults to manual. Derived fields must already be current.
pub(crate) fn pin_tail_heading(waypoints: &mut [Waypoint]) {
    if waypoints.len() < 2 {
        return;
    }
    if let Some(last) = waypoints.last_mut() {
        if last.heading_mode.is_auto() {
            last.heading_mode = HeadingMode::Manual(last.calculated_heading_deg);
            last.heading_deg = normalize_heading(last.calculated_heading_deg);
        }
    }
}

/// Id of the waypoint a leg at `index` is computed against. Needs len >= 2.
fn expected_peer(waypoints: &[Waypoint], index: usize) -> WaypointId {
    if index + 1 < waypoints.len() {
        waypoints[index + 1].id
    } else {
        waypoints[index - 1].id
    }
}

fn effective_heading(mode: HeadingMode, calculated_deg: f64) -> f64 {
    match mode {
        HeadingMode::Auto => calculated_deg,
        HeadingMode::Manual(heading_deg) => normalize_heading(heading_deg),
    }
}

/// Recompute the derived fields of the waypoint at `index` from its neighbours.
fn refresh_at(waypoints: &mut [Waypoint], index: usize, rules: &FeasibilityRules) {
    let len = waypoints.len();

    let (speed, calculated, peer) = if len < 2 {
        (0.0, 0.0, None)
    } else if index + 1 < len {
        let current = &waypoints[index];
        let next = &waypoints[index + 1];
        (
            calculate_speed(current, next, None),
            calculate_heading(current.position(), next.position()),
            Some(next.id),
        )
    } else {
        // Final waypoint: speed needed to reach it, heading continues the
        // previous leg.
        let previous = &waypoints[index - 1];
        let current = &waypoints[index];
        (
            calculate_speed(previous, current, None),
            calculate_heading(previous.position(), current.position()),
            Some(previous.id),
        )
    };

    let waypoint = &mut waypoints[index];
    waypoint.estimated_speed_mps = speed;
    waypoint.speed_feasible = classify_speed(speed, rules) == SpeedTier::Feasible;
    waypoint.calculated_heading_deg = calculated;
    waypoint.heading_deg = effective_heading(waypoint.heading_mode, calculated);
    waypoint.leg_peer = peer;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Waypoint> {
        vec![
            Waypoint::new("A", 35.0, 51.0, 100.0, 0.0),
            Waypoint::new("B", 35.0009, 51.0, 100.0, 10.0),
            Waypoint::new("C", 35.0009, 51.0011, 120.0, 40.0),
        ]
    }

    #[test]
    fn speed_describes_outgoing_leg() {
        let input = abc();
        let out = calculate_waypoint_speeds(&input);

        assert_eq!(out[0].estimated_speed_mps, calculate_speed(&input[0], &input[1], None));
        assert_eq!(out[1].estimated_speed_mps, calculate_speed(&input[1], &input[2], None));
        assert!((out[0].estimated_speed_mps - 10.0).abs() < 0.05);
        assert!(out[0].speed_feasible);
    }

    #[test]
    fn last_waypoint_reports_arrival_speed() {
        let input = abc();
        let out = calculate_waypoint_speeds(&input);

        let arrival = calculate_speed(&input[1], &input[2], None);
        assert!(arrival > 0.0);
        assert_eq!(out[2].estimated_speed_mps, arrival);
        assert_eq!(out[2].leg_peer, Some(input[1].id));
    }

    #[test]
    fn auto_heading_follows_next_leg() {
        let out = calculate_waypoint_speeds(&abc());

        // A -> B is due north, B -> C roughly east
        assert!(out[0].heading_deg < 0.1 || out[0].heading_deg > 359.9);
        assert!((out[1].calculated_heading_deg - 90.0).abs() < 0.5);
        assert_eq!(out[1].heading_deg, out[1].calculated_heading_deg);
        // Final waypoint continues the previous leg
        assert_eq!(out[2].calculated_heading_deg, out[1].calculated_heading_deg);
        assert_eq!(out[2].heading_deg, out[1].calculated_heading_deg);
    }

    #[test]
    fn manual_heading_is_kept_and_bearing_still_computed() {
        let mut input = abc();
        input[1].heading_mode = HeadingMode::Manual(-45.0);
        input[2].heading_mode = HeadingMode::Manual(180.0);
        let out = calculate_waypoint_speeds(&input);

        assert_eq!(out[1].heading_deg, 315.0);
        assert!((out[1].calculated_heading_deg - 90.0).abs() < 0.5);
        assert_eq!(out[2].heading_deg, 180.0);
    }

    #[test]
    fn short_sequences_have_zero_speed() {
        assert!(calculate_waypoint_speeds(&[]).is_empty());

        let single = vec![Waypoint::new("A", 35.0, 51.0, 100.0, 5.0)
            .with_heading_mode(HeadingMode::Manual(400.0))];
        let out = calculate_waypoint_speeds(&single);
        assert_eq!(out[0].estimated_speed_mps, 0.0);
        assert!(!out[0].speed_feasible);
        assert_eq!(out[0].heading_deg, 40.0);
        assert_eq!(out[0].calculated_heading_deg, 0.0);
        assert!(out[0].leg_peer.is_none());
    }

    #[test]
    fn input_is_not_mutated() {
        let input = abc();
        let snapshot = input.clone();
        let _ = calculate_waypoint_speeds(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn drag_to_front_matches_full_recompute() {
        let computed = calculate_waypoint_speeds(&abc());
        let mut moved = computed.clone();
        let c = moved.remove(2);
        let c_id = c.id;
        moved.insert(0, c);

        let incremental = recalculate_after_drag(&moved, &c_id);
        let full = calculate_waypoint_speeds(&moved);
        assert_eq!(incremental, full);
    }

    #[test]
    fn position_edit_matches_full_recompute() {
        let computed = calculate_waypoint_speeds(&abc());
        let mut edited = computed.clone();
        edited[1].lat += 0.002;
        edited[1].altitude_m = 180.0;
        let id = edited[1].id;

        let incremental = recalculate_after_drag(&edited, &id);
        assert_eq!(incremental, calculate_waypoint_speeds(&edited));
        // Both neighbours of the edited point changed
        assert_ne!(incremental[0].estimated_speed_mps, computed[0].estimated_speed_mps);
        assert_ne!(incremental[2].estimated_speed_mps, computed[2].estimated_speed_mps);
    }

    #[test]
    fn unknown_id_falls_back_to_full_recompute() {
        let input = abc();
        let out = recalculate_after_drag(&input, &WaypointId::new());
        assert_eq!(out, calculate_waypoint_speeds(&input));
    }

    #[test]
    fn tail_pin_keeps_arrival_bearing() {
        let mut out = calculate_waypoint_speeds(&abc());
        let arrival = out[2].calculated_heading_deg;
        pin_tail_heading(&mut out);

        assert_eq!(out[2].heading_mode, HeadingMode::Manual(arrival));
        assert_eq!(out[2].heading_deg, arrival);
        assert!(out[1].heading_mode.is_auto());
        // Pinning does not disturb the derived fields
        assert_eq!(out, calculate_waypoint_speeds(&out));

        let mut single = calculate_waypoint_speeds(&abc()[..1]);
        pin_tail_heading(&mut single);
        assert!(single[0].heading_mode.is_auto());
    }

    #[test]
    fn feasibility_uses_supplied_rules() {
        let rules = FeasibilityRules {
            max_feasible_mps: 5.0,
            max_marginal_mps: 20.0,
            ..FeasibilityRules::default()
        };
        let out = calculate_waypoint_speeds_with_rules(&abc(), &rules);
        assert!(!out[0].speed_feasible);
    }
}
