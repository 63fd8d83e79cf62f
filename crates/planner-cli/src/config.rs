//! CLI configuration from environment.

use anyhow::{bail, Context, Result};
use planner_core::{FeasibilityRules, Position};
use std::env;
use std::path::Path;

const DEFAULT_HOME_LAT: f64 = 35.6892;
const DEFAULT_HOME_LON: f64 = 51.3890;
const DEFAULT_HOME_ALT_M: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub rules: FeasibilityRules,
    pub home: Position,
    pub home_altitude_m: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: f64| -> f64 {
            lookup(key)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
        };

        let defaults = FeasibilityRules::default();
        Self {
            rules: FeasibilityRules {
                min_meaningful_mps: read("PLANNER_MIN_MEANINGFUL_MPS", defaults.min_meaningful_mps),
                max_feasible_mps: read("PLANNER_MAX_FEASIBLE_MPS", defaults.max_feasible_mps),
                max_marginal_mps: read("PLANNER_MAX_MARGINAL_MPS", defaults.max_marginal_mps),
                absolute_max_mps: read("PLANNER_ABSOLUTE_MAX_MPS", defaults.absolute_max_mps),
                min_ground_clearance_m: read(
                    "PLANNER_MIN_CLEARANCE_M",
                    defaults.min_ground_clearance_m,
                ),
            },
            home: Position::new(
                read("PLANNER_HOME_LAT", DEFAULT_HOME_LAT),
                read("PLANNER_HOME_LON", DEFAULT_HOME_LON),
            ),
            home_altitude_m: read("PLANNER_HOME_ALT_M", DEFAULT_HOME_ALT_M),
        }
    }

    /// Replace the rules with the contents of a JSON file.
    pub fn with_rules_file(mut self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules file {}", path.display()))?;
        self.rules = serde_json::from_str(&raw)
            .with_context(|| format!("parsing rules file {}", path.display()))?;
        Ok(self)
    }

    /// Reject threshold sets that would misclassify speeds.
    pub fn validate(&self) -> Result<()> {
        let errors = self.rules.validate();
        if !errors.is_empty() {
            bail!("invalid feasibility rules: {}", errors.join("; "));
        }
        if !self.home.is_valid() {
            bail!(
                "invalid home position: lat={}, lon={}",
                self.home.lat,
                self.home.lon
            );
        }
        Ok(())
    }
}
