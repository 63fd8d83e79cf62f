//! Spatial math for leg distances and bearings.

use crate::models::{Position, Waypoint};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using Haversine formula.
///
/// This is the standard formula for calculating great-circle distance
/// between two points on a sphere given their latitudes and longitudes.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Horizontal distance between two positions in meters.
pub fn horizontal_distance(a: Position, b: Position) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon)
}

/// Combine horizontal and vertical displacement as orthogonal components.
pub fn distance_3d(from: Position, from_alt_m: f64, to: Position, to_alt_m: f64) -> f64 {
    let horizontal = horizontal_distance(from, to);
    let vertical = (to_alt_m - from_alt_m).abs();
    (horizontal * horizontal + vertical * vertical).sqrt()
}

/// 3D distance between two waypoints in meters.
pub fn total_distance_3d(a: &Waypoint, b: &Waypoint) -> f64 {
    distance_3d(a.position(), a.altitude_m, b.position(), b.altitude_m)
}

/// Calculate bearing from point 1 to point 2 in radians.
/// Returns bearing in radians, 0 = north, π/2 = east.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y)
}

/// Offset a position by distance and bearing.
///
/// # Arguments
/// * `lat`, `lon` - Starting position in degrees
/// * `distance_m` - Distance in meters
/// * `bearing_rad` - Bearing in radians (0 = north, π/2 = east)
///
/// # Returns
/// (new_lat, new_lon) in degrees
pub fn offset_by_bearing(lat: f64, lon: f64, distance_m: f64, bearing_rad: f64) -> (f64, f64) {
    if distance_m.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    (lat2.to_degrees(), lon2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_distance(35.0, 51.0, 35.0, 51.0);
        assert!(dist < 0.001);
    }

    #[test]
    fn horizontal_distance_is_symmetric() {
        let a = Position::new(35.0, 51.0);
        let b = Position::new(35.0123, 51.0456);
        assert_eq!(horizontal_distance(a, b), horizontal_distance(b, a));
    }

    #[test]
    fn vertical_only_leg_is_altitude_difference() {
        let a = Waypoint::new("A", 35.0, 51.0, 100.0, 0.0);
        let b = Waypoint::new("B", 35.0, 51.0, 160.0, 10.0);
        assert!((total_distance_3d(&a, &b) - 60.0).abs() < 1e-9);
        assert!((total_distance_3d(&b, &a) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn slant_distance_combines_components() {
        let (lat, lon) = offset_by_bearing(35.0, 51.0, 300.0, 0.0);
        let a = Waypoint::new("A", 35.0, 51.0, 100.0, 0.0);
        let b = Waypoint::new("B", lat, lon, 500.0, 10.0);
        // 300 m horizontal, 400 m vertical
        assert!((total_distance_3d(&a, &b) - 500.0).abs() < 0.01);
    }

    #[test]
    fn bearing_due_east_is_half_pi() {
        let b = bearing(0.0, 0.0, 0.0, 1.0);
        assert!((b - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
