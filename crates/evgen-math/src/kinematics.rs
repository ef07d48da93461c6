//! Four-vectors, pure Lorentz boosts and spatial rotations.

use std::f64::consts::PI;
use std::ops::{Add, Sub};

use evgen_core::Momentum4;
use nalgebra::{Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// Energy-momentum four-vector with metric signature (+, -, -, -).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourVector {
    /// Energy component.
    pub e: f64,
    /// Three-momentum.
    pub p: Vector3<f64>,
}

impl FourVector {
    /// Creates a four-vector from its components.
    pub fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self {
            e,
            p: Vector3::new(px, py, pz),
        }
    }

    /// Creates a four-vector from energy and three-momentum.
    pub fn from_parts(e: f64, p: Vector3<f64>) -> Self {
        Self { e, p }
    }

    /// Converts from the record storage layout `[E, px, py, pz]`.
    pub fn from_array(v: Momentum4) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    /// Converts to the record storage layout `[E, px, py, pz]`.
    pub fn to_array(&self) -> Momentum4 {
        [self.e, self.p.x, self.p.y, self.p.z]
    }

    /// Minkowski product.
    pub fn dot(&self, other: &FourVector) -> f64 {
        self.e * other.e - self.p.dot(&other.p)
    }

    /// Invariant mass squared.
    pub fn mass_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Invariant mass, clamped at zero for slightly space-like round-off.
    pub fn mass(&self) -> f64 {
        self.mass_squared().max(0.0).sqrt()
    }

    /// Magnitude of the three-momentum.
    pub fn momentum(&self) -> f64 {
        self.p.norm()
    }

    /// Applies a spatial rotation to the three-momentum.
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        Self {
            e: self.e,
            p: rotation * self.p,
        }
    }
}

impl Add for FourVector {
    type Output = FourVector;

    fn add(self, rhs: FourVector) -> FourVector {
        FourVector::from_parts(self.e + rhs.e, self.p + rhs.p)
    }
}

impl Sub for FourVector {
    type Output = FourVector;

    fn sub(self, rhs: FourVector) -> FourVector {
        FourVector::from_parts(self.e - rhs.e, self.p - rhs.p)
    }
}

/// Pure Lorentz boost into a frame moving with velocity `beta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    beta: Vector3<f64>,
    gamma: f64,
}

impl Boost {
    /// Boost into a frame moving with velocity `beta` (|beta| < 1).
    pub fn new(beta: Vector3<f64>) -> Self {
        let b2 = beta.norm_squared();
        debug_assert!(b2 < 1.0, "boost velocity must be sub-luminal");
        let gamma = 1.0 / (1.0 - b2).sqrt();
        Self { beta, gamma }
    }

    /// Boost taking lab-frame vectors into the rest frame of `p`.
    pub fn rest_frame_of(p: &FourVector) -> Self {
        Self::new(p.p / p.e)
    }

    /// Boost taking vectors from the rest frame of `p` back to the lab.
    pub fn lab_frame_of(p: &FourVector) -> Self {
        Self::new(-p.p / p.e)
    }

    /// The opposite boost.
    pub fn inverse(&self) -> Self {
        Self {
            beta: -self.beta,
            gamma: self.gamma,
        }
    }

    /// Whether the boost is the identity.
    pub fn is_identity(&self) -> bool {
        self.beta.iter().all(|&b| b == 0.0)
    }

    /// Lorentz factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Transforms a four-vector.
    pub fn apply(&self, v: &FourVector) -> FourVector {
        let b2 = self.beta.norm_squared();
        if b2 == 0.0 {
            return *v;
        }
        let bp = self.beta.dot(&v.p);
        let e = self.gamma * (v.e - bp);
        let coefficient = (self.gamma - 1.0) * bp / b2 - self.gamma * v.e;
        FourVector::from_parts(e, v.p + self.beta * coefficient)
    }
}

/// Rotation taking the direction of `from` onto the direction of `to`.
///
/// Antiparallel inputs rotate by pi about an axis perpendicular to `from`.
/// A zero vector on either side yields the identity.
pub fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> Rotation3<f64> {
    if from.norm_squared() == 0.0 || to.norm_squared() == 0.0 {
        return Rotation3::identity();
    }
    Rotation3::rotation_between(from, to).unwrap_or_else(|| {
        let trial = if from.x.abs() < 0.9 * from.norm() {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let axis = Unit::new_normalize(from.cross(&trial));
        Rotation3::from_axis_angle(&axis, PI)
    })
}

/// Rotation by `phi` about `axis`. A zero axis yields the identity.
pub fn azimuthal_rotation(axis: &Vector3<f64>, phi: f64) -> Rotation3<f64> {
    match Unit::try_new(*axis, 0.0) {
        Some(axis) => Rotation3::from_axis_angle(&axis, phi),
        None => Rotation3::identity(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_frame_removes_momentum() {
        let p = FourVector::new(10.0, 3.0, -4.0, 5.0);
        let rest = Boost::rest_frame_of(&p).apply(&p);
        assert!(rest.p.norm() < 1e-12);
        assert!((rest.e - p.mass()).abs() < 1e-12);
    }

    #[test]
    fn antiparallel_rotation_flips_direction() {
        let from = Vector3::new(0.0, 0.0, 1.0);
        let to = Vector3::new(0.0, 0.0, -2.0);
        let rotated = rotation_between(&from, &to) * from;
        assert!((rotated - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }
}
