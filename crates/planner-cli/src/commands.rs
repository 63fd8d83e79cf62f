//! Subcommand implementations. Each returns a serializable result; printing
//! and exit codes are left to `main`.

use anyhow::{Context, Result};
use planner_core::{
    calculate_heading, format_heading, generate_random_trajectory, validate_terrain_clearance,
    ElevationSource, GeneratorConfig, Position, Trajectory, TrajectorySummary, ValidationReport,
    Waypoint, WaypointId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::Config;

pub fn recalc(waypoints: Vec<Waypoint>, config: &Config) -> Result<Vec<Waypoint>> {
    let trajectory = Trajectory::from_waypoints(waypoints, config.rules.clone())
        .context("loading trajectory")?;
    Ok(trajectory.into_waypoints())
}

pub fn drag(
    waypoints: Vec<Waypoint>,
    id: &WaypointId,
    to: usize,
    config: &Config,
) -> Result<Vec<Waypoint>> {
    let trajectory = Trajectory::from_waypoints(waypoints, config.rules.clone())
        .context("loading trajectory")?;
    let moved = trajectory
        .move_waypoint(id, to)
        .with_context(|| format!("moving waypoint {id} to index {to}"))?;
    tracing::info!(%id, to, version = moved.version(), "waypoint moved");
    Ok(moved.into_waypoints())
}

pub fn validate(
    waypoints: Vec<Waypoint>,
    terrain: Option<&dyn ElevationSource>,
    config: &Config,
) -> Result<ValidationReport> {
    let trajectory = Trajectory::from_waypoints(waypoints, config.rules.clone())
        .context("loading trajectory")?;
    let mut report = trajectory.validate();
    if let Some(terrain) = terrain {
        report = report.merge(validate_terrain_clearance(
            trajectory.waypoints(),
            terrain,
            &config.rules,
        ));
    }
    for message in report.messages() {
        tracing::warn!("{message}");
    }
    Ok(report)
}

pub fn summary(waypoints: Vec<Waypoint>, config: &Config) -> Result<TrajectorySummary> {
    let trajectory = Trajectory::from_waypoints(waypoints, config.rules.clone())
        .context("loading trajectory")?;
    Ok(trajectory.summary())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingOutput {
    pub heading_deg: f64,
    pub formatted: String,
}

pub fn heading(from: Position, to: Position) -> HeadingOutput {
    let heading_deg = calculate_heading(from, to);
    HeadingOutput {
        heading_deg,
        formatted: format_heading(heading_deg),
    }
}

pub fn generate(count: usize, seed: Option<u64>, config: &Config) -> Vec<Waypoint> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let generator = GeneratorConfig {
        base_altitude_m: config.home_altitude_m,
        ..GeneratorConfig::default()
    };
    generate_random_trajectory(config.home, count, &generator, &mut rng)
}
