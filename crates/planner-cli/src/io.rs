//! Reading trajectory and terrain files, writing JSON output.

use anyhow::{Context, Result};
use planner_core::{Position, TerrainGrid, Waypoint};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Accepted trajectory file layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TrajectoryFile {
    /// Bare list of waypoints
    List(Vec<Waypoint>),
    /// Any object carrying a `waypoints` list (e.g. a saved trajectory state)
    Document { waypoints: Vec<Waypoint> },
}

pub fn parse_waypoints(raw: &str) -> Result<Vec<Waypoint>> {
    let file: TrajectoryFile = serde_json::from_str(raw).context("parsing waypoint JSON")?;
    Ok(match file {
        TrajectoryFile::List(waypoints) => waypoints,
        TrajectoryFile::Document { waypoints } => waypoints,
    })
}

pub fn read_waypoints(path: &Path) -> Result<Vec<Waypoint>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading trajectory file {}", path.display()))?;
    let waypoints =
        parse_waypoints(&raw).with_context(|| format!("in trajectory file {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = waypoints.len(), "loaded waypoints");
    Ok(waypoints)
}

pub fn read_terrain(path: &Path) -> Result<TerrainGrid> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading terrain file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing terrain file {}", path.display()))
}

/// Pretty-print a value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value).context("writing JSON output")?;
    writeln!(handle)?;
    Ok(())
}

/// Parse `"lat,lon"` into a position.
pub fn parse_position(value: &str) -> Result<Position, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lon:?}"))?;
    let position = Position::new(lat, lon);
    if !position.is_valid() {
        return Err(format!("position out of range: {lat},{lon}"));
    }
    Ok(position)
}
