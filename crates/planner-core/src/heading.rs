//! Aviation headings: 0 = North, 90 = East, 180 = South, 270 = West.

use crate::models::Position;
use crate::spatial::bearing;
use crate::speed::round_tenth;

/// Heading used when a bearing cannot be computed.
pub const DEFAULT_HEADING_DEG: f64 = 0.0;

/// Initial great-circle bearing from `from` to `to`, in [0, 360), one decimal.
pub fn calculate_heading(from: Position, to: Position) -> f64 {
    let bearing_deg = bearing(from.lat, from.lon, to.lat, to.lon).to_degrees();
    if !bearing_deg.is_finite() {
        tracing::warn!(
            from_lat = from.lat,
            from_lon = from.lon,
            to_lat = to.lat,
            to_lon = to.lon,
            "bearing computation failed, using default heading"
        );
        return DEFAULT_HEADING_DEG;
    }
    normalize_heading(round_tenth(normalize_heading(bearing_deg)))
}

/// Reduce any angle into [0, 360).
pub fn normalize_heading(angle_deg: f64) -> f64 {
    if !angle_deg.is_finite() {
        tracing::warn!(angle_deg, "non-finite heading, using default heading");
        return DEFAULT_HEADING_DEG;
    }
    let normalized = angle_deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Three-digit heading string, e.g. `"090°"`.
pub fn format_heading(angle_deg: f64) -> String {
    let degrees = normalize_heading(angle_deg).round() as u32 % 360;
    format!("{degrees:03}°")
}
