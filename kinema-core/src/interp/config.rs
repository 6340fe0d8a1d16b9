//! Solver configuration for cubic interpolators.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric tuning for inverting a cubic-bezier timing curve.
///
/// Each curve owns its own copy, so differently tuned curves can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum Newton-Raphson refinement steps.
    pub newton_iterations: u32,

    /// Smallest initial slope for which Newton-Raphson is used. Below this
    /// the solver bisects instead. Zero sends even stationary guesses
    /// through Newton, which then returns them unrefined.
    pub newton_min_slope: f32,

    /// Bisection stops once the absolute residual drops to this value.
    pub subdivision_precision: f32,

    /// Maximum bisection halvings.
    pub subdivision_max_iterations: u32,
}

impl SolverConfig {
    pub const DEFAULT: SolverConfig = SolverConfig {
        newton_iterations: 4,
        newton_min_slope: 0.001,
        subdivision_precision: 0.000_000_1,
        subdivision_max_iterations: 10,
    };

    /// Parse and validate a JSON configuration. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the solver.
    pub fn validate(&self) -> Result<()> {
        if self.newton_iterations == 0 {
            return Err(Error::InvalidConfig(
                "newton_iterations must be at least 1".into(),
            ));
        }
        if self.subdivision_max_iterations == 0 {
            return Err(Error::InvalidConfig(
                "subdivision_max_iterations must be at least 1".into(),
            ));
        }
        if !(self.newton_min_slope.is_finite() && self.newton_min_slope >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "newton_min_slope must be non-negative, got {}",
                self.newton_min_slope
            )));
        }
        if !(self.subdivision_precision.is_finite() && self.subdivision_precision > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "subdivision_precision must be positive, got {}",
                self.subdivision_precision
            )));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
