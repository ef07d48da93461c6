//! Bracketed Newton-Raphson with a bisection safeguard.

use evgen_core::NumericsConfig;
use thiserror::Error;

/// Convergence controls for [`newton_raphson`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    /// Absolute tolerance on the root position.
    pub tolerance: f64,
    /// Maximum number of Newton or bisection steps.
    pub max_iterations: usize,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self::from(&NumericsConfig::default())
    }
}

impl From<&NumericsConfig> for RootOptions {
    fn from(numerics: &NumericsConfig) -> Self {
        Self {
            tolerance: numerics.root_tolerance,
            max_iterations: numerics.root_max_iterations,
        }
    }
}

/// Root-finding failures.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RootError {
    /// The function has the same sign at both ends of the interval.
    #[error("root not bracketed: f(lo) = {f_lo}, f(hi) = {f_hi}")]
    NotBracketed {
        /// Function value at the lower end.
        f_lo: f64,
        /// Function value at the upper end.
        f_hi: f64,
    },
    /// The iteration budget ran out.
    #[error("no convergence after {iterations} iterations (last estimate {estimate})")]
    MaxIterations {
        /// Iterations performed.
        iterations: usize,
        /// Last estimate of the root.
        estimate: f64,
    },
    /// The function returned a non-finite value.
    #[error("non-finite function value at x = {at}")]
    NonFinite {
        /// Abscissa where the value was produced.
        at: f64,
    },
}

/// Finds a root of `f` in `[lo, hi]` starting from `init`.
///
/// Newton steps use `df`; a step that would leave the current bracket or
/// that shrinks the bracket too slowly is replaced by bisection.
pub fn newton_raphson<F, D>(
    f: F,
    df: D,
    lo: f64,
    hi: f64,
    init: f64,
    opts: RootOptions,
) -> Result<f64, RootError>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let f_lo = f(lo);
    let f_hi = f(hi);
    if !f_lo.is_finite() {
        return Err(RootError::NonFinite { at: lo });
    }
    if !f_hi.is_finite() {
        return Err(RootError::NonFinite { at: hi });
    }
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if (f_lo > 0.0) == (f_hi > 0.0) {
        return Err(RootError::NotBracketed { f_lo, f_hi });
    }

    // xl always holds the negative side.
    let (mut xl, mut xh) = if f_lo < 0.0 { (lo, hi) } else { (hi, lo) };
    let (min, max) = (lo.min(hi), lo.max(hi));
    let mut root = if init.is_finite() {
        init.clamp(min, max)
    } else {
        0.5 * (lo + hi)
    };
    let mut dx_old = (hi - lo).abs();
    let mut dx = dx_old;
    let mut fx = f(root);
    let mut dfx = df(root);
    if !fx.is_finite() {
        return Err(RootError::NonFinite { at: root });
    }

    for _ in 0..opts.max_iterations {
        let leaves_bracket = ((root - xh) * dfx - fx) * ((root - xl) * dfx - fx) > 0.0;
        let too_slow = (2.0 * fx).abs() > (dx_old * dfx).abs();
        if !dfx.is_finite() || dfx == 0.0 || leaves_bracket || too_slow {
            dx_old = dx;
            dx = 0.5 * (xh - xl);
            root = xl + dx;
            if root == xl {
                return Ok(root);
            }
        } else {
            dx_old = dx;
            dx = fx / dfx;
            let previous = root;
            root -= dx;
            if root == previous {
                return Ok(root);
            }
        }
        if dx.abs() < opts.tolerance {
            return Ok(root);
        }
        fx = f(root);
        dfx = df(root);
        if !fx.is_finite() {
            return Err(RootError::NonFinite { at: root });
        }
        if fx < 0.0 {
            xl = root;
        } else {
            xh = root;
        }
    }
    Err(RootError::MaxIterations {
        iterations: opts.max_iterations,
        estimate: root,
    })
}
