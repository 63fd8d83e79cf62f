//! Random demo trajectories around a home point.

use crate::models::{Position, Waypoint};
use crate::sequence::{calculate_waypoint_speeds, pin_tail_heading};
use crate::spatial::{haversine_distance, offset_by_bearing};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Waypoints are scattered within this radius of home (meters)
    pub radius_m: f64,
    /// Altitude of home, meters MSL
    pub base_altitude_m: f64,
    /// Waypoints climb up to this far above the base altitude
    pub altitude_band_m: f64,
    /// Speed used to space waypoints in time
    pub cruise_speed_mps: f64,
    /// Extra seconds added to every leg
    pub hover_s: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            radius_m: 300.0,
            base_altitude_m: 50.0,
            altitude_band_m: 40.0,
            cruise_speed_mps: 8.0,
            hover_s: 2.0,
        }
    }
}

/// Generate `count` time-ordered waypoints near `home`, with derived fields
/// computed. The first waypoint sits on home at t = 0.
pub fn generate_random_trajectory<R: Rng>(
    home: Position,
    count: usize,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Vec<Waypoint> {
    let mut waypoints: Vec<Waypoint> = Vec::with_capacity(count);

    for i in 0..count {
        let (lat, lon, altitude_m) = if i == 0 {
            (home.lat, home.lon, config.base_altitude_m)
        } else {
            random_point_near(home, config, rng)
        };

        let time_from_start_s = match waypoints.last() {
            None => 0.0,
            Some(previous) => {
                let horizontal = haversine_distance(previous.lat, previous.lon, lat, lon);
                let vertical = (altitude_m - previous.altitude_m).abs();
                let distance = (horizontal * horizontal + vertical * vertical).sqrt();
                let leg_s = (distance / config.cruise_speed_mps.max(0.1)).ceil() + config.hover_s;
                previous.time_from_start_s + leg_s.max(1.0)
            }
        };

        waypoints.push(Waypoint::new(
            format!("WP{}", i + 1),
            lat,
            lon,
            altitude_m,
            time_from_start_s,
        ));
    }

    let mut waypoints = calculate_waypoint_speeds(&waypoints);
    pin_tail_heading(&mut waypoints);
    waypoints
}

fn random_point_near<R: Rng>(
    home: Position,
    config: &GeneratorConfig,
    rng: &mut R,
) -> (f64, f64, f64) {
    let radius = config.radius_m.max(1.0);
    let distance_m = rng.random_range(0.0..radius);
    let bearing_rad = rng.random_range(0.0..std::f64::consts::TAU);
    let (lat, lon) = offset_by_bearing(home.lat, home.lon, distance_m, bearing_rad);
    let climb = if config.altitude_band_m > 0.0 {
        rng.random_range(0.0..config.altitude_band_m)
    } else {
        0.0
    };
    (lat, lon, config.base_altitude_m + climb)
}
