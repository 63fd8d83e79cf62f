//! Owned, versioned trajectory state.
//!
//! A `Trajectory` is never edited in place. Every operation returns a new
//! value with derived fields refreshed and the version bumped; on error the
//! original value is left as it was.

use crate::error::TrajectoryError;
use crate::models::{HeadingMode, Waypoint, WaypointId};
use crate::rules::FeasibilityRules;
use crate::sequence::{
    calculate_waypoint_speeds_with_rules, pin_tail_heading, recalculate_after_drag_with_rules,
};
use crate::summary::{summarize_with_rules, TrajectorySummary};
use crate::validation::{validate_waypoint_sequence_with_rules, ValidationReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Partial edit of a waypoint. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointUpdate {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub altitude_m: Option<f64>,
    pub time_from_start_s: Option<f64>,
    pub heading_mode: Option<HeadingMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    version: u64,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    rules: FeasibilityRules,
    waypoints: Vec<Waypoint>,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new(FeasibilityRules::default())
    }
}

impl Trajectory {
    /// Empty trajectory at version 0.
    pub fn new(rules: FeasibilityRules) -> Self {
        Self {
            version: 0,
            updated_at: Utc::now(),
            rules,
            waypoints: Vec::new(),
        }
    }

    /// Build from an existing sequence, recomputing all derived fields.
    pub fn from_waypoints(
        waypoints: Vec<Waypoint>,
        rules: FeasibilityRules,
    ) -> Result<Self, TrajectoryError> {
        let mut seen = HashSet::with_capacity(waypoints.len());
        for waypoint in &waypoints {
            check_position(waypoint)?;
            if !seen.insert(waypoint.id) {
                return Err(TrajectoryError::DuplicateWaypoint(waypoint.id));
            }
        }

        let waypoints = calculate_waypoint_speeds_with_rules(&waypoints, &rules);
        Ok(Self {
            version: 0,
            updated_at: Utc::now(),
            rules,
            waypoints,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn rules(&self) -> &FeasibilityRules {
        &self.rules
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, id: &WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|wp| wp.id == *id)
    }

    pub fn index_of(&self, id: &WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|wp| wp.id == *id)
    }

    /// Advisory report for the current sequence.
    pub fn validate(&self) -> ValidationReport {
        validate_waypoint_sequence_with_rules(&self.waypoints, &self.rules)
    }

    pub fn summary(&self) -> TrajectorySummary {
        summarize_with_rules(&self.waypoints, &self.rules)
    }

    /// Add a waypoint at the end of the sequence.
    pub fn append(&self, waypoint: Waypoint) -> Result<Self, TrajectoryError> {
        self.insert(self.waypoints.len(), waypoint)
    }

    /// Insert a waypoint before `index` (`index == len` appends).
    ///
    /// A waypoint placed at the tail in auto mode gets a manual heading along
    /// its arrival leg; switch it back with [`Trajectory::update`] if needed.
    pub fn insert(&self, index: usize, waypoint: Waypoint) -> Result<Self, TrajectoryError> {
        if index > self.waypoints.len() {
            return Err(TrajectoryError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            });
        }
        if self.get(&waypoint.id).is_some() {
            return Err(TrajectoryError::DuplicateWaypoint(waypoint.id));
        }
        check_position(&waypoint)?;

        let id = waypoint.id;
        let mut waypoints = self.waypoints.clone();
        waypoints.insert(index, waypoint);
        let at_tail = index == self.waypoints.len();
        tracing::debug!(%id, index, at_tail, "inserting waypoint");
        let mut waypoints = recalculate_after_drag_with_rules(&waypoints, &id, &self.rules);
        if at_tail {
            pin_tail_heading(&mut waypoints);
        }
        Ok(self.next(waypoints))
    }

    /// Remove a waypoint by id.
    pub fn remove(&self, id: &WaypointId) -> Result<Self, TrajectoryError> {
        let index = self
            .index_of(id)
            .ok_or(TrajectoryError::UnknownWaypoint(*id))?;

        let mut waypoints = self.waypoints.clone();
        waypoints.remove(index);
        tracing::debug!(%id, index, "removing waypoint");
        Ok(self.next(calculate_waypoint_speeds_with_rules(&waypoints, &self.rules)))
    }

    /// Move a waypoint so it ends up at `new_index`.
    pub fn move_waypoint(&self, id: &WaypointId, new_index: usize) -> Result<Self, TrajectoryError> {
        let index = self
            .index_of(id)
            .ok_or(TrajectoryError::UnknownWaypoint(*id))?;
        if new_index >= self.waypoints.len() {
            return Err(TrajectoryError::IndexOutOfRange {
                index: new_index,
                len: self.waypoints.len(),
            });
        }

        let mut waypoints = self.waypoints.clone();
        let waypoint = waypoints.remove(index);
        waypoints.insert(new_index, waypoint);
        tracing::debug!(%id, from = index, to = new_index, "moving waypoint");
        Ok(self.next(recalculate_after_drag_with_rules(&waypoints, id, &self.rules)))
    }

    /// Apply a partial edit to one waypoint.
    pub fn update(&self, id: &WaypointId, update: WaypointUpdate) -> Result<Self, TrajectoryError> {
        let index = self
            .index_of(id)
            .ok_or(TrajectoryError::UnknownWaypoint(*id))?;

        let mut edited = self.waypoints[index].clone();
        if let Some(name) = update.name {
            edited.name = name;
        }
        if let Some(lat) = update.lat {
            edited.lat = lat;
        }
        if let Some(lon) = update.lon {
            edited.lon = lon;
        }
        if let Some(altitude_m) = update.altitude_m {
            edited.altitude_m = altitude_m;
        }
        if let Some(time_from_start_s) = update.time_from_start_s {
            edited.time_from_start_s = time_from_start_s;
        }
        if let Some(heading_mode) = update.heading_mode {
            edited.heading_mode = heading_mode;
        }
        check_position(&edited)?;

        let mut waypoints = self.waypoints.clone();
        waypoints[index] = edited;
        Ok(self.next(recalculate_after_drag_with_rules(&waypoints, id, &self.rules)))
    }

    /// Drop every waypoint.
    pub fn clear(&self) -> Self {
        self.next(Vec::new())
    }

    /// Swap the rules and recompute everything under them.
    pub fn with_rules(&self, rules: FeasibilityRules) -> Self {
        let waypoints = calculate_waypoint_speeds_with_rules(&self.waypoints, &rules);
        let mut next = self.next(waypoints);
        next.rules = rules;
        next
    }

    fn next(&self, waypoints: Vec<Waypoint>) -> Self {
        Self {
            version: self.version + 1,
            updated_at: Utc::now(),
            rules: self.rules.clone(),
            waypoints,
        }
    }
}

fn check_position(waypoint: &Waypoint) -> Result<(), TrajectoryError> {
    if waypoint.position().is_valid() && waypoint.altitude_m.is_finite() {
        Ok(())
    } else {
        Err(TrajectoryError::InvalidPosition {
            id: waypoint.id,
            lat: waypoint.lat,
            lon: waypoint.lon,
            altitude_m: waypoint.altitude_m,
        })
    }
}
