//! Dense polynomials in ascending-power form.

use serde::{Deserialize, Serialize};

/// `c[0] + c[1] x + c[2] x^2 + ...`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from ascending-power coefficients.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Ascending-power coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Horner evaluation. The empty polynomial is zero.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// First derivative.
    pub fn derivative(&self) -> Polynomial {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, c)| c * power as f64)
            .collect();
        Polynomial::new(coefficients)
    }

    /// Antiderivative with the given integration constant.
    pub fn antiderivative(&self, constant: f64) -> Polynomial {
        let mut coefficients = Vec::with_capacity(self.coefficients.len() + 1);
        coefficients.push(constant);
        coefficients.extend(
            self.coefficients
                .iter()
                .enumerate()
                .map(|(power, c)| c / (power + 1) as f64),
        );
        Polynomial::new(coefficients)
    }
}
