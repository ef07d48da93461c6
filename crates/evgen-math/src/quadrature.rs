//! Romberg integration with a hard iteration budget.

use evgen_core::config::MIN_ROMBERG_LEVELS;
use thiserror::Error;

/// Quadrature failures.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadratureError {
    /// An integration bound or integrand value was not finite.
    #[error("non-finite value encountered at x = {at}")]
    NonFinite {
        /// Abscissa that produced the value.
        at: f64,
    },
    /// The relative tolerance was not reached within the budget.
    #[error("romberg did not converge after {iterations} levels (estimate {estimate})")]
    NotConverged {
        /// Refinement levels performed.
        iterations: usize,
        /// Best estimate reached.
        estimate: f64,
    },
}


/// Integrates `f` over `[a, b]` by Richardson-extrapolated trapezoid refinement.
///
/// Each level doubles the number of trapezoid panels. The result is accepted
/// when successive diagonal estimates agree to `rel_tol`.
pub fn romberg<F>(f: F, a: f64, b: f64, rel_tol: f64, max_iterations: usize) -> Result<f64, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    if !a.is_finite() {
        return Err(QuadratureError::NonFinite { at: a });
    }
    if !b.is_finite() {
        return Err(QuadratureError::NonFinite { at: b });
    }
    if a == b {
        return Ok(0.0);
    }
    let eval = |x: f64| {
        let v = f(x);
        if v.is_finite() {
            Ok(v)
        } else {
            Err(QuadratureError::NonFinite { at: x })
        }
    };

    let h0 = b - a;
    let mut previous = vec![0.5 * h0 * (eval(a)? + eval(b)?)];
    let mut panels = 1usize;
    for level in 1..=max_iterations {
        let h = h0 / (2 * panels) as f64;
        let mut midpoints = 0.0;
        for k in 0..panels {
            midpoints += eval(a + (2 * k + 1) as f64 * h)?;
        }
        panels *= 2;

        let mut row = Vec::with_capacity(level + 1);
        row.push(0.5 * previous[0] + h * midpoints);
        let mut factor = 1.0;
        for j in 1..=level {
            factor *= 4.0;
            let refined = row[j - 1] + (row[j - 1] - previous[j - 1]) / (factor - 1.0);
            row.push(refined);
        }

        let estimate = row[level];
        let change = (estimate - previous[level - 1]).abs();
        if level >= MIN_ROMBERG_LEVELS && (change <= rel_tol * estimate.abs() || change == 0.0) {
            return Ok(estimate);
        }
        previous = row;
    }
    Err(QuadratureError::NotConverged {
        iterations: max_iterations,
        estimate: previous[previous.len() - 1],
    })
}
