//! Core data models for trajectory planning.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a waypoint. Assigned once at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(Uuid);

impl WaypointId {
    /// Allocate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WaypointId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WaypointId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A horizontal position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// True when the coordinates are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// How the effective heading of a waypoint is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "heading_deg", rename_all = "lowercase")]
pub enum HeadingMode {
    /// Point toward the next waypoint
    #[default]
    Auto,
    /// Operator supplied heading in degrees (0 = North)
    Manual(f64),
}

impl HeadingMode {
    pub fn is_auto(&self) -> bool {
        matches!(self, HeadingMode::Auto)
    }
}

/// Feasibility tier for a required speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    /// No meaningful speed (no time elapsed, single waypoint)
    #[default]
    Unknown,
    /// Within normal operating envelope
    Feasible,
    /// Achievable but aggressive
    Marginal,
    /// Beyond what the airframe can fly
    Impossible,
}

impl SpeedTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedTier::Unknown => "unknown",
            SpeedTier::Feasible => "feasible",
            SpeedTier::Marginal => "marginal",
            SpeedTier::Impossible => "impossible",
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed, positioned point in a planned trajectory.
///
/// The fields below `heading_mode` are derived and are overwritten by every
/// recompute; callers should treat them as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default)]
    pub id: WaypointId,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Meters above mean sea level
    #[serde(alias = "alt", alias = "altitude")]
    pub altitude_m: f64,
    /// Seconds since mission start at which this waypoint must be reached
    #[serde(alias = "time_from_start")]
    pub time_from_start_s: f64,
    #[serde(default)]
    pub heading_mode: HeadingMode,
    /// Effective heading in degrees, [0, 360)
    #[serde(default)]
    pub heading_deg: f64,
    #[serde(default)]
    pub estimated_speed_mps: f64,
    #[serde(default)]
    pub speed_feasible: bool,
    /// Bearing toward the next waypoint, kept even in manual mode
    #[serde(default)]
    pub calculated_heading_deg: f64,
    /// Waypoint the derived leg was computed against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leg_peer: Option<WaypointId>,
}

impl Waypoint {
    /// Create a waypoint with a fresh id and empty derived fields.
    pub fn new(
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        altitude_m: f64,
        time_from_start_s: f64,
    ) -> Self {
        Self {
            id: WaypointId::new(),
            name: name.into(),
            lat,
            lon,
            altitude_m,
            time_from_start_s,
            heading_mode: HeadingMode::Auto,
            heading_deg: 0.0,
            estimated_speed_mps: 0.0,
            speed_feasible: false,
            calculated_heading_deg: 0.0,
            leg_peer: None,
        }
    }

    /// Set the heading mode.
    pub fn with_heading_mode(mut self, mode: HeadingMode) -> Self {
        self.heading_mode = mode;
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }

    /// Tier of the currently stored speed under default rules.
    pub fn speed_tier(&self) -> SpeedTier {
        crate::speed::validate_speed(self.estimated_speed_mps)
    }

    /// True when both waypoints carry the same derived fields.
    pub fn derived_eq(&self, other: &Waypoint) -> bool {
        same_f64(self.heading_deg, other.heading_deg)
            && same_f64(self.estimated_speed_mps, other.estimated_speed_mps)
            && self.speed_feasible == other.speed_feasible
            && same_f64(self.calculated_heading_deg, other.calculated_heading_deg)
            && self.leg_peer == other.leg_peer
    }
}

fn same_f64(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_mode_serializes_tagged() {
        let auto = serde_json::to_value(HeadingMode::Auto).unwrap();
        assert_eq!(auto, serde_json::json!({ "mode": "auto" }));

        let manual = serde_json::to_value(HeadingMode::Manual(270.0)).unwrap();
        assert_eq!(manual, serde_json::json!({ "mode": "manual", "heading_deg": 270.0 }));
    }

    #[test]
    fn waypoint_deserializes_with_defaults() {
        let wp: Waypoint = serde_json::from_value(serde_json::json!({
            "name": "Start",
            "lat": 35.0,
            "lon": 51.0,
            "alt": 100.0,
            "time_from_start": 0.0
        }))
        .unwrap();

        assert_eq!(wp.altitude_m, 100.0);
        assert_eq!(wp.heading_mode, HeadingMode::Auto);
        assert_eq!(wp.estimated_speed_mps, 0.0);
        assert!(wp.leg_peer.is_none());
    }

    #[test]
    fn waypoint_ids_are_unique_and_parse_back() {
        let a = WaypointId::new();
        let b = WaypointId::new();
        assert_ne!(a, b);

        let parsed: WaypointId = a.to_string().parse().unwrap();
        assert_eq!(parsed, a);
    }

    #[test]
    fn tiers_order_by_severity() {
        assert!(SpeedTier::Unknown < SpeedTier::Feasible);
        assert!(SpeedTier::Feasible < SpeedTier::Marginal);
        assert!(SpeedTier::Marginal < SpeedTier::Impossible);
        assert_eq!(SpeedTier::Marginal.to_string(), "marginal");
    }
}
