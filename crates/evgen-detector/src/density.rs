//! Density fields built from an axis and a profile, with column-depth
//! integrals along rays and their inverse.
//!
//! Three evaluation strategies are picked at runtime from the capabilities of
//! the parts: a constant profile is handled in closed form, a profile along an
//! axis with constant gradient goes through the profile's antiderivative, and
//! everything else falls back to Romberg quadrature. Inversion mirrors this
//! with bracketed Newton-Raphson.

use std::fmt::Debug;

use evgen_core::NumericsConfig;
use evgen_math::{newton_raphson, romberg, QuadratureError, RootError, RootOptions};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::axis::Axis1D;
use crate::distribution::Distribution1D;

/// Returned by [`DensityDistribution::inverse_integral`] when no distance
/// within reach accumulates the requested column depth, and by the integrals
/// when quadrature fails.
pub const NO_VALID_DISTANCE: f64 = -1.0;

/// A scalar density over space.
///
/// Directions are unit vectors. Column depths are in density units times
/// length.
pub trait DensityDistribution: Debug + Send + Sync {
    /// Density at `point`.
    fn evaluate(&self, point: &Vector3<f64>) -> f64;

    /// Rate of change of the density when moving from `point` along `direction`.
    fn derivative(&self, point: &Vector3<f64>, direction: &Vector3<f64>) -> f64;

    /// Column depth accumulated along `direction` up to `point`, measured
    /// from a reference that depends only on the line. Differences between
    /// two points on the same line equal the integral between them.
    fn antiderivative(&self, point: &Vector3<f64>, direction: &Vector3<f64>) -> f64;

    /// Column depth from `point` over `distance` along `direction`.
    fn integral(&self, point: &Vector3<f64>, direction: &Vector3<f64>, distance: f64) -> f64;

    /// Column depth on the segment from `from` to `to`.
    fn integral_between(&self, from: &Vector3<f64>, to: &Vector3<f64>) -> f64;

    /// Distance from `point` along `direction` at which the column depth
    /// reaches `target`, or [`NO_VALID_DISTANCE`] when it is not reached
    /// within `max_distance`.
    fn inverse_integral(
        &self,
        point: &Vector3<f64>,
        direction: &Vector3<f64>,
        target: f64,
        max_distance: f64,
    ) -> f64;

    /// [`DensityDistribution::inverse_integral`] without a distance limit.
    fn inverse_integral_unbounded(
        &self,
        point: &Vector3<f64>,
        direction: &Vector3<f64>,
        target: f64,
    ) -> f64 {
        self.inverse_integral(point, direction, target, f64::INFINITY)
    }
}

/// A profile `D` evaluated in the coordinate of axis `A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityDistribution1D<A, D> {
    axis: A,
    distribution: D,
    #[serde(default)]
    numerics: NumericsConfig,
}

impl<A: Axis1D, D: Distribution1D> DensityDistribution1D<A, D> {
    /// Combines an axis with a profile.
    pub fn new(axis: A, distribution: D) -> Self {
        Self {
            axis,
            distribution,
            numerics: NumericsConfig::default(),
        }
    }

    /// Replaces the numerics configuration.
    pub fn with_numerics(mut self, numerics: NumericsConfig) -> Self {
        self.numerics = numerics;
        self
    }

    /// The coordinate axis.
    pub fn axis(&self) -> &A {
        &self.axis
    }

    /// The density profile.
    pub fn distribution(&self) -> &D {
        &self.distribution
    }

    fn root_options(&self) -> RootOptions {
        RootOptions::from(&self.numerics)
    }

    fn quadrature(
        &self,
        point: &Vector3<f64>,
        direction: &Vector3<f64>,
        distance: f64,
    ) -> Result<f64, QuadratureError> {
        romberg(
            |t| self.evaluate(&(point + direction * t)),
            0.0,
            distance,
            self.numerics.romberg_tolerance,
            self.numerics.romberg_max_iterations,
        )
    }

    fn column_depth(
        &self,
        point: &Vector3<f64>,
        direction: &Vector3<f64>,
        distance: f64,
    ) -> Result<f64, QuadratureError> {
        if let Some(rho) = self.distribution.constant_value() {
            return Ok(rho * distance);
        }
        if self.axis.has_constant_gradient() {
            let a = self.axis.coordinate(point);
            let dx = self.axis.directional_derivative(point, direction);
            if dx == 0.0 {
                return Ok(self.distribution.evaluate(a) * distance);
            }
            let b = self.axis.coordinate(&(point + direction * distance));
            return Ok((self.distribution.antiderivative(b) - self.distribution.antiderivative(a)) / dx);
        }
        self.quadrature(point, direction, distance)
    }

    /// Distance no further than `max_distance` at which the column depth is
    /// finite and at least `target`. Doubles from a first guess at most
    /// `root_max_iterations` times, pulling back when the depth overflows.
    fn bracket(
        &self,
        point: &Vector3<f64>,
        direction: &Vector3<f64>,
        target: f64,
        max_distance: f64,
    ) -> Option<f64> {
        let rho = self.evaluate(point);
        let guess = if rho > 0.0 && rho.is_finite() {
            target / rho
        } else {
            1.0
        };
        // Depth is finite below `lo` and overflows at `ceiling` once seen.
        let mut lo = 0.0;
        let mut ceiling = f64::INFINITY;
        let mut hi = guess.min(max_distance);
        for _ in 0..self.numerics.root_max_iterations {
            let depth = self.column_depth(point, direction, hi).ok()?;
            if depth.is_nan() || depth == f64::NEG_INFINITY {
                return None;
            }
            if depth.is_infinite() {
                ceiling = hi;
                hi = if lo > 0.0 {
                    0.5 * (lo + hi)
                } else {
                    hi.sqrt().min(0.5 * hi)
                };
                continue;
            }
            if depth >= target {
                return Some(hi);
            }
            if hi >= max_distance {
                return None;
            }
            lo = hi;
            hi = if 2.0 * hi < ceiling {
                (2.0 * hi).min(max_distance)
            } else {
                0.5 * (hi + ceiling)
            };
        }
        None
    }

    fn uniform_inverse(rho: f64, target: f64, max_distance: f64) -> f64 {
        if rho.is_nan() || rho <= 0.0 {
            debug!(rho, target, "no column depth accumulates in a non-positive density");
            return NO_VALID_DISTANCE;
        }
        let distance = target / rho;
        if distance > max_distance {
            debug!(distance, max_distance, "column depth not reached within the limit");
            return NO_VALID_DISTANCE;
        }
        distance
    }
}

fn settle(result: Result<f64, RootError>, target: f64, max_distance: f64) -> Option<f64> {
    match result {
        Ok(x) => Some(x),
        Err(error) => {
            debug!(%error, target, max_distance, "inverse column depth failed");
            None
        }
    }
}

impl<A: Axis1D, D: Distribution1D> DensityDistribution for DensityDistribution1D<A, D> {
    fn evaluate(&self, point: &Vector3<f64>) -> f64 {
        self.distribution.evaluate(self.axis.coordinate(point))
    }

    fn derivative(&self, point: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
        if self.distribution.constant_value().is_some() {
            return 0.0;
        }
        self.distribution.derivative(self.axis.coordinate(point))
            * self.axis.directional_derivative(point, direction)
    }

    fn antiderivative(&self, point: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
        let along = point.dot(direction);
        if let Some(rho) = self.distribution.constant_value() {
            return along * rho;
        }
        if self.axis.has_constant_gradient() {
            let x = self.axis.coordinate(point);
            let dx = self.axis.directional_derivative(point, direction);
            if dx == 0.0 {
                return along * self.distribution.evaluate(x);
            }
            return (self.distribution.antiderivative(x) - self.distribution.antiderivative(0.0)) / dx;
        }
        let closest = point - direction * along;
        self.integral(&closest, direction, along)
    }

    fn integral(&self, point: &Vector3<f64>, direction: &Vector3<f64>, distance: f64) -> f64 {
        debug_assert!((direction.norm() - 1.0).abs() < 1e-9, "direction must be a unit vector");
        match self.column_depth(point, direction, distance) {
            Ok(depth) => depth,
            Err(error) => {
                debug!(%error, distance, "column depth quadrature failed");
                NO_VALID_DISTANCE
            }
        }
    }

    fn integral_between(&self, from: &Vector3<f64>, to: &Vector3<f64>) -> f64 {
        let offset = to - from;
        let distance = offset.norm();
        if distance == 0.0 {
            return 0.0;
        }
        self.integral(from, &(offset / distance), distance)
    }

    fn inverse_integral(
        &self,
        point: &Vector3<f64>,
        direction: &Vector3<f64>,
        target: f64,
        max_distance: f64,
    ) -> f64 {
        debug_assert!((direction.norm() - 1.0).abs() < 1e-9, "direction must be a unit vector");
        if !target.is_finite() || target < 0.0 || max_distance.is_nan() || max_distance < 0.0 {
            debug!(target, max_distance, "invalid inverse column depth request");
            return NO_VALID_DISTANCE;
        }
        if target == 0.0 {
            return 0.0;
        }
        if let Some(rho) = self.distribution.constant_value() {
            return Self::uniform_inverse(rho, target, max_distance);
        }

        let limit = match self.bracket(point, direction, target, max_distance) {
            Some(limit) => limit,
            None => {
                debug!(target, max_distance, "column depth not reachable along the ray");
                return NO_VALID_DISTANCE;
            }
        };

        if self.axis.has_constant_gradient() {
            let a = self.axis.coordinate(point);
            let dx = self.axis.directional_derivative(point, direction);
            if dx == 0.0 {
                return Self::uniform_inverse(self.distribution.evaluate(a), target, max_distance);
            }
            let b = self.axis.coordinate(&(point + direction * limit));
            let base = self.distribution.antiderivative(a);
            let scaled = target * dx;
            let root = newton_raphson(
                |x| self.distribution.antiderivative(x) - base - scaled,
                |x| self.distribution.evaluate(x),
                a,
                b,
                0.5 * (a + b),
                self.root_options(),
            );
            return match settle(root, target, max_distance) {
                Some(x) => (x - a) / dx,
                None => NO_VALID_DISTANCE,
            };
        }

        let rho = self.evaluate(point);
        let init = if rho > 0.0 && target / rho < limit {
            target / rho
        } else {
            0.5 * limit
        };
        let root = newton_raphson(
            |t| {
                self.quadrature(point, direction, t)
                    .map_or(f64::NAN, |depth| depth - target)
            },
            |t| self.evaluate(&(point + direction * t)),
            0.0,
            limit,
            init,
            self.root_options(),
        );
        settle(root, target, max_distance)
            .unwrap_or(NO_VALID_DISTANCE)
    }
}
