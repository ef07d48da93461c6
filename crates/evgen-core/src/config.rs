//! Numerical tolerances and budgets shared by interpolation, quadrature,
//! root finding and rejection sampling.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, EvgenError};

/// Romberg levels computed before the convergence test is trusted; a smaller
/// `romberg_max_iterations` could never converge.
pub const MIN_ROMBERG_LEVELS: usize = 4;

/// YAML-configurable numerics knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericsConfig {
    /// Relative spread of grid spacings under which an axis counts as regular.
    #[serde(default = "default_regularity_tolerance")]
    pub regularity_tolerance: f64,
    /// Relative tolerance of the Romberg integrator.
    #[serde(default = "default_romberg_tolerance")]
    pub romberg_tolerance: f64,
    /// Maximum number of Romberg refinement levels.
    #[serde(default = "default_romberg_max_iterations")]
    pub romberg_max_iterations: usize,
    /// Absolute tolerance of the bracketed Newton-Raphson solver.
    #[serde(default = "default_root_tolerance")]
    pub root_tolerance: f64,
    /// Iteration budget of the bracketed Newton-Raphson solver.
    #[serde(default = "default_root_max_iterations")]
    pub root_max_iterations: usize,
    /// Number of rejected draws tolerated before a sampler gives up.
    #[serde(default = "default_max_sampling_trials")]
    pub max_sampling_trials: usize,
    /// Number of points used to scan a dipole differential for its maximum.
    #[serde(default = "default_dipole_scan_points")]
    pub dipole_scan_points: usize,
}

fn default_regularity_tolerance() -> f64 {
    1e-4
}

fn default_romberg_tolerance() -> f64 {
    1e-6
}

fn default_romberg_max_iterations() -> usize {
    20
}

fn default_root_tolerance() -> f64 {
    1e-6
}

fn default_root_max_iterations() -> usize {
    100
}

fn default_max_sampling_trials() -> usize {
    10_000
}

fn default_dipole_scan_points() -> usize {
    100
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            regularity_tolerance: default_regularity_tolerance(),
            romberg_tolerance: default_romberg_tolerance(),
            romberg_max_iterations: default_romberg_max_iterations(),
            root_tolerance: default_root_tolerance(),
            root_max_iterations: default_root_max_iterations(),
            max_sampling_trials: default_max_sampling_trials(),
            dipole_scan_points: default_dipole_scan_points(),
        }
    }
}

impl NumericsConfig {
    /// Parses a configuration from YAML, filling omitted keys with defaults,
    /// and validates it.
    pub fn from_yaml_str(text: &str) -> Result<Self, EvgenError> {
        let config: NumericsConfig = serde_yaml::from_str(text).map_err(|err| {
            EvgenError::Config(
                ErrorInfo::new("config-parse", "failed to parse numerics config")
                    .with_context("reason", err),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that tolerances are positive and finite, budgets non-zero and
    /// the Romberg budget at least [`MIN_ROMBERG_LEVELS`].
    pub fn validate(&self) -> Result<(), EvgenError> {
        let tolerances = [
            ("regularity_tolerance", self.regularity_tolerance),
            ("romberg_tolerance", self.romberg_tolerance),
            ("root_tolerance", self.root_tolerance),
        ];
        for (name, value) in tolerances {
            if !(value.is_finite() && value > 0.0) {
                return Err(EvgenError::Config(
                    ErrorInfo::new("invalid-tolerance", "tolerance must be positive and finite")
                        .with_context("field", name)
                        .with_context("value", value),
                ));
            }
        }
        let budgets = [
            ("romberg_max_iterations", self.romberg_max_iterations),
            ("root_max_iterations", self.root_max_iterations),
            ("max_sampling_trials", self.max_sampling_trials),
        ];
        for (name, value) in budgets {
            if value == 0 {
                return Err(EvgenError::Config(
                    ErrorInfo::new("invalid-budget", "iteration budget must be non-zero")
                        .with_context("field", name),
                ));
            }
        }
        if self.romberg_max_iterations < MIN_ROMBERG_LEVELS {
            return Err(EvgenError::Config(
                ErrorInfo::new("invalid-budget", "romberg budget is below its minimum level count")
                    .with_context("field", "romberg_max_iterations")
                    .with_context("value", self.romberg_max_iterations)
                    .with_context("minimum", MIN_ROMBERG_LEVELS),
            ));
        }
        if self.dipole_scan_points < 2 {
            return Err(EvgenError::Config(
                ErrorInfo::new("invalid-budget", "dipole scan needs at least two points")
                    .with_context("field", "dipole_scan_points")
                    .with_context("value", self.dipole_scan_points),
            ));
        }
        Ok(())
    }
}
