//! Scalar density profiles with closed-form calculus.

use std::fmt::Debug;

use evgen_core::{ErrorInfo, EvgenError};
use evgen_math::Polynomial;
use serde::{Deserialize, Serialize};

/// A density profile in one coordinate.
pub trait Distribution1D: Debug + Send + Sync {
    /// Value at `x`.
    fn evaluate(&self, x: f64) -> f64;
    /// First derivative at `x`.
    fn derivative(&self, x: f64) -> f64;
    /// An antiderivative at `x`. Only differences are meaningful.
    fn antiderivative(&self, x: f64) -> f64;

    /// `Some(value)` when the profile does not depend on its coordinate.
    fn constant_value(&self) -> Option<f64> {
        None
    }
}

/// Uniform density.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstantDistribution1D {
    /// Density everywhere.
    pub value: f64,
}

impl ConstantDistribution1D {
    /// Uniform density of `value`.
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Distribution1D for ConstantDistribution1D {
    fn evaluate(&self, _x: f64) -> f64 {
        self.value
    }

    fn derivative(&self, _x: f64) -> f64 {
        0.0
    }

    fn antiderivative(&self, x: f64) -> f64 {
        self.value * x
    }

    fn constant_value(&self) -> Option<f64> {
        Some(self.value)
    }
}

/// Polynomial density. Derivative and antiderivative are computed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Polynomial", into = "Polynomial")]
pub struct PolynomialDistribution1D {
    polynomial: Polynomial,
    derivative: Polynomial,
    antiderivative: Polynomial,
}

impl PolynomialDistribution1D {
    /// Density `c[0] + c[1] x + ...`.
    pub fn new(polynomial: Polynomial) -> Self {
        let derivative = polynomial.derivative();
        let antiderivative = polynomial.antiderivative(0.0);
        Self {
            polynomial,
            derivative,
            antiderivative,
        }
    }

    /// Shorthand for [`PolynomialDistribution1D::new`] from coefficients.
    pub fn from_coefficients(coefficients: Vec<f64>) -> Self {
        Self::new(Polynomial::new(coefficients))
    }

    /// The density polynomial.
    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }
}

impl From<Polynomial> for PolynomialDistribution1D {
    fn from(polynomial: Polynomial) -> Self {
        Self::new(polynomial)
    }
}

impl From<PolynomialDistribution1D> for Polynomial {
    fn from(distribution: PolynomialDistribution1D) -> Self {
        distribution.polynomial
    }
}

impl Distribution1D for PolynomialDistribution1D {
    fn evaluate(&self, x: f64) -> f64 {
        self.polynomial.evaluate(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        self.derivative.evaluate(x)
    }

    fn antiderivative(&self, x: f64) -> f64 {
        self.antiderivative.evaluate(x)
    }

    fn constant_value(&self) -> Option<f64> {
        match self.polynomial.coefficients() {
            [] => Some(0.0),
            [c] => Some(*c),
            _ => None,
        }
    }
}

/// `amplitude * exp(x / sigma)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExponentialShape")]
pub struct ExponentialDistribution1D {
    sigma: f64,
    amplitude: f64,
}

#[derive(Deserialize)]
struct ExponentialShape {
    sigma: f64,
    #[serde(default = "default_amplitude")]
    amplitude: f64,
}

fn default_amplitude() -> f64 {
    1.0
}

impl TryFrom<ExponentialShape> for ExponentialDistribution1D {
    type Error = EvgenError;

    fn try_from(shape: ExponentialShape) -> Result<Self, Self::Error> {
        Self::with_amplitude(shape.sigma, shape.amplitude)
    }
}

impl ExponentialDistribution1D {
    /// Unit-amplitude exponential with scale `sigma`.
    pub fn new(sigma: f64) -> Result<Self, EvgenError> {
        Self::with_amplitude(sigma, default_amplitude())
    }

    /// Exponential with an explicit amplitude.
    pub fn with_amplitude(sigma: f64, amplitude: f64) -> Result<Self, EvgenError> {
        if !sigma.is_finite() || sigma == 0.0 {
            return Err(EvgenError::Density(
                ErrorInfo::new("exponential-scale", "exponential scale must be finite and non-zero")
                    .with_context("sigma", sigma),
            ));
        }
        if !amplitude.is_finite() {
            return Err(EvgenError::density(
                "exponential-amplitude",
                "exponential amplitude must be finite",
            ));
        }
        Ok(Self { sigma, amplitude })
    }

    /// Length scale.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Value at zero.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

impl Distribution1D for ExponentialDistribution1D {
    fn evaluate(&self, x: f64) -> f64 {
        self.amplitude * (x / self.sigma).exp()
    }

    fn derivative(&self, x: f64) -> f64 {
        self.evaluate(x) / self.sigma
    }

    fn antiderivative(&self, x: f64) -> f64 {
        self.sigma * self.evaluate(x)
    }
}
