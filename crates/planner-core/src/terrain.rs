//! Ground elevation lookups for clearance checks.
//!
//! Elevation data is resolved outside the planner; it only samples values it
//! has already been given.

use crate::error::TrajectoryError;
use crate::models::Waypoint;
use serde::{Deserialize, Serialize};

/// Source of ground elevation (meters MSL) per coordinate.
pub trait ElevationSource {
    /// Ground elevation at the coordinate, or `None` when unknown.
    fn ground_elevation_m(&self, lat: f64, lon: f64) -> Option<f64>;
}

/// Height of a waypoint above the given ground elevation.
pub fn ground_clearance_m(waypoint: &Waypoint, ground_elevation_m: f64) -> f64 {
    waypoint.altitude_m - ground_elevation_m
}

/// Same elevation everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatTerrain {
    pub elevation_m: f64,
}

impl ElevationSource for FlatTerrain {
    fn ground_elevation_m(&self, lat: f64, lon: f64) -> Option<f64> {
        if !lat.is_finite() || !lon.is_finite() || !self.elevation_m.is_finite() {
            return None;
        }
        Some(self.elevation_m)
    }
}

/// Regular lat/lon grid of elevations, row-major from the south-west corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTerrainGrid", into = "RawTerrainGrid")]
pub struct TerrainGrid {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
    lat_step_deg: f64,
    lon_step_deg: f64,
    rows: usize,
    cols: usize,
    elevations_m: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTerrainGrid {
    min_lat: f64,
    min_lon: f64,
    lat_step_deg: f64,
    lon_step_deg: f64,
    rows: usize,
    cols: usize,
    elevations_m: Vec<f64>,
}

impl TryFrom<RawTerrainGrid> for TerrainGrid {
    type Error = TrajectoryError;

    fn try_from(raw: RawTerrainGrid) -> Result<Self, Self::Error> {
        TerrainGrid::new(
            raw.min_lat,
            raw.min_lon,
            raw.lat_step_deg,
            raw.lon_step_deg,
            raw.rows,
            raw.cols,
            raw.elevations_m,
        )
    }
}

impl From<TerrainGrid> for RawTerrainGrid {
    fn from(grid: TerrainGrid) -> Self {
        Self {
            min_lat: grid.min_lat,
            min_lon: grid.min_lon,
            lat_step_deg: grid.lat_step_deg,
            lon_step_deg: grid.lon_step_deg,
            rows: grid.rows,
            cols: grid.cols,
            elevations_m: grid.elevations_m,
        }
    }
}

impl TerrainGrid {
    pub fn new(
        min_lat: f64,
        min_lon: f64,
        lat_step_deg: f64,
        lon_step_deg: f64,
        rows: usize,
        cols: usize,
        elevations_m: Vec<f64>,
    ) -> Result<Self, TrajectoryError> {
        if rows == 0 || cols == 0 {
            return Err(TrajectoryError::InvalidTerrainGrid(
                "grid needs at least one row and one column".to_string(),
            ));
        }
        if elevations_m.len() != rows.saturating_mul(cols) {
            return Err(TrajectoryError::InvalidTerrainGrid(format!(
                "expected {} elevations for {rows}x{cols}, got {}",
                rows.saturating_mul(cols),
                elevations_m.len()
            )));
        }
        if !min_lat.is_finite()
            || !min_lon.is_finite()
            || !lat_step_deg.is_finite()
            || !lon_step_deg.is_finite()
            || lat_step_deg <= 0.0
            || lon_step_deg <= 0.0
        {
            return Err(TrajectoryError::InvalidTerrainGrid(
                "origin and steps must be finite, steps positive".to_string(),
            ));
        }

        Ok(Self {
            min_lat,
            min_lon,
            max_lat: min_lat + (rows - 1) as f64 * lat_step_deg,
            max_lon: min_lon + (cols - 1) as f64 * lon_step_deg,
            lat_step_deg,
            lon_step_deg,
            rows,
            cols,
            elevations_m,
        })
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Bilinear sample inside the grid bounds.
    pub fn sample(&self, lat: f64, lon: f64) -> Option<f64> {
        if !lat.is_finite() || !lon.is_finite() || !self.contains(lat, lon) {
            return None;
        }

        let max_y = (self.rows - 1) as f64;
        let max_x = (self.cols - 1) as f64;
        let y = ((lat - self.min_lat) / self.lat_step_deg).clamp(0.0, max_y);
        let x = ((lon - self.min_lon) / self.lon_step_deg).clamp(0.0, max_x);

        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(self.rows - 1);
        let x1 = (x0 + 1).min(self.cols - 1);
        let dy = y - y0 as f64;
        let dx = x - x0 as f64;

        let v00 = self.value_at(y0, x0);
        let v10 = self.value_at(y0, x1);
        let v01 = self.value_at(y1, x0);
        let v11 = self.value_at(y1, x1);

        let v0 = v00 + (v10 - v00) * dx;
        let v1 = v01 + (v11 - v01) * dx;
        let value = v0 + (v1 - v0) * dy;
        value.is_finite().then_some(value)
    }

    fn value_at(&self, row: usize, col: usize) -> f64 {
        let idx = row.saturating_mul(self.cols) + col.min(self.cols - 1);
        self.elevations_m.get(idx).copied().unwrap_or(0.0)
    }
}

impl ElevationSource for TerrainGrid {
    fn ground_elevation_m(&self, lat: f64, lon: f64) -> Option<f64> {
        self.sample(lat, lon)
    }
}
