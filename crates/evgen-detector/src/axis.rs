//! Maps from 3D points to the scalar coordinate a density profile is written in.

use std::fmt::Debug;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A scalar coordinate over space.
pub trait Axis1D: Debug + Send + Sync {
    /// Coordinate of `point`.
    fn coordinate(&self, point: &Vector3<f64>) -> f64;

    /// Rate of change of the coordinate when moving from `point` along the
    /// unit vector `direction`.
    fn directional_derivative(&self, point: &Vector3<f64>, direction: &Vector3<f64>) -> f64;

    /// Whether the coordinate is affine in space, so that its directional
    /// derivative does not depend on the point.
    fn has_constant_gradient(&self) -> bool {
        false
    }
}

/// Distance from a centre point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RadialAxis1D {
    /// Centre of the radial coordinate.
    pub origin: Vector3<f64>,
}

impl RadialAxis1D {
    /// Radial axis centred on `origin`.
    pub fn new(origin: Vector3<f64>) -> Self {
        Self { origin }
    }
}

impl Axis1D for RadialAxis1D {
    fn coordinate(&self, point: &Vector3<f64>) -> f64 {
        (point - self.origin).norm()
    }

    fn directional_derivative(&self, point: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
        let offset = point - self.origin;
        let r = offset.norm();
        if r == 0.0 {
            return 0.0;
        }
        direction.dot(&offset) / r
    }
}

/// Projection onto a fixed axis through an origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianAxis1D {
    /// Direction of increasing coordinate. Not normalised.
    pub axis: Vector3<f64>,
    /// Point at which the coordinate is zero.
    pub origin: Vector3<f64>,
}

impl Default for CartesianAxis1D {
    fn default() -> Self {
        Self::new(Vector3::z(), Vector3::zeros())
    }
}

impl CartesianAxis1D {
    /// Cartesian axis along `axis` with zero at `origin`.
    pub fn new(axis: Vector3<f64>, origin: Vector3<f64>) -> Self {
        Self { axis, origin }
    }
}

impl Axis1D for CartesianAxis1D {
    fn coordinate(&self, point: &Vector3<f64>) -> f64 {
        (point - self.origin).dot(&self.axis)
    }

    fn directional_derivative(&self, _point: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
        direction.dot(&self.axis)
    }

    fn has_constant_gradient(&self) -> bool {
        true
    }
}
