//! Errors for trajectory editing operations.
//!
//! The computation functions never fail; these only come out of the
//! [`Trajectory`](crate::trajectory::Trajectory) state object and grid loading.

use crate::models::WaypointId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrajectoryError {
    #[error("waypoint {0} not found in trajectory")]
    UnknownWaypoint(WaypointId),

    #[error("index {index} out of range for trajectory of {len} waypoints")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("waypoint {0} already exists in trajectory")]
    DuplicateWaypoint(WaypointId),

    #[error("invalid position for waypoint {id}: lat={lat}, lon={lon}, altitude={altitude_m}")]
    InvalidPosition {
        id: WaypointId,
        lat: f64,
        lon: f64,
        altitude_m: f64,
    },

    #[error("invalid terrain grid: {0}")]
    InvalidTerrainGrid(String),
}
