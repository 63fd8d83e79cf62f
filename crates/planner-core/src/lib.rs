//! Trajectory feasibility engine for drone show planning.
//!
//! Given an ordered sequence of timed 3D waypoints, computes the speed each
//! leg requires, classifies it into a feasibility tier, derives headings and
//! keeps those fields consistent as waypoints are added, moved and removed.

pub mod error;
pub mod generate;
pub mod heading;
pub mod models;
pub mod rules;
pub mod sequence;
pub mod spatial;
pub mod speed;
pub mod summary;
pub mod terrain;
pub mod trajectory;
pub mod validation;

pub use error::TrajectoryError;
pub use generate::{generate_random_trajectory, GeneratorConfig};
pub use heading::{calculate_heading, format_heading, normalize_heading};
pub use models::{HeadingMode, Position, SpeedTier, Waypoint, WaypointId};
pub use rules::FeasibilityRules;
pub use sequence::{
    calculate_waypoint_speeds, calculate_waypoint_speeds_with_rules, recalculate_after_drag,
    recalculate_after_drag_with_rules,
};
pub use spatial::{haversine_distance, horizontal_distance, total_distance_3d};
pub use speed::{calculate_speed, classify_speed, validate_speed};
pub use summary::{summarize, summarize_with_rules, TierCounts, TrajectorySummary};
pub use terrain::{ground_clearance_m, ElevationSource, FlatTerrain, TerrainGrid};
pub use trajectory::{Trajectory, WaypointUpdate};
pub use validation::{
    validate_terrain_clearance, validate_waypoint_sequence, validate_waypoint_sequence_with_rules,
    SequenceIssue, ValidationReport,
};
