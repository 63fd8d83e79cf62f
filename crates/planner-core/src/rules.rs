//! Speed thresholds and clearance limits used by the planner.

use serde::{Deserialize, Serialize};

/// Configuration for feasibility rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeasibilityRules {
    /// Speeds below this are treated as "no meaningful speed" (m/s)
    pub min_meaningful_mps: f64,
    /// Upper bound of the feasible tier (m/s, inclusive)
    pub max_feasible_mps: f64,
    /// Upper bound of the marginal tier (m/s, inclusive)
    pub max_marginal_mps: f64,
    /// Hard safety ceiling reported by sequence validation (m/s)
    pub absolute_max_mps: f64,
    /// Minimum height above ground for terrain checks (meters)
    pub min_ground_clearance_m: f64,
}

impl Default for FeasibilityRules {
    fn default() -> Self {
        Self {
            min_meaningful_mps: 0.1,
            max_feasible_mps: 12.0,
            max_marginal_mps: 20.0,
            absolute_max_mps: 30.0,
            min_ground_clearance_m: 5.0,
        }
    }
}

impl FeasibilityRules {
    /// Check the thresholds are finite and ordered.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let values = [
            ("min_meaningful_mps", self.min_meaningful_mps),
            ("max_feasible_mps", self.max_feasible_mps),
            ("max_marginal_mps", self.max_marginal_mps),
            ("absolute_max_mps", self.absolute_max_mps),
            ("min_ground_clearance_m", self.min_ground_clearance_m),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                errors.push(format!("{name} must be finite"));
            }
        }

        if self.min_meaningful_mps < 0.0 {
            errors.push("min_meaningful_mps cannot be negative".to_string());
        }
        if self.min_meaningful_mps > self.max_feasible_mps {
            errors.push(format!(
                "min_meaningful_mps ({}) must not exceed max_feasible_mps ({})",
                self.min_meaningful_mps, self.max_feasible_mps
            ));
        }
        if self.max_feasible_mps > self.max_marginal_mps {
            errors.push(format!(
                "max_feasible_mps ({}) must not exceed max_marginal_mps ({})",
                self.max_feasible_mps, self.max_marginal_mps
            ));
        }
        if self.max_marginal_mps > self.absolute_max_mps {
            errors.push(format!(
                "max_marginal_mps ({}) must not exceed absolute_max_mps ({})",
                self.max_marginal_mps, self.absolute_max_mps
            ));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
