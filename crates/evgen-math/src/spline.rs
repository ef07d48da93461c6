//! Tensor-product B-spline tables.
//!
//! A table over `ndim` axes holds, per axis, a non-decreasing knot vector and
//! a spline degree (`order`), plus row-major coefficients: the first axis
//! varies slowest. Axis `d` carries `knots[d].len() - order[d] - 1` basis
//! functions and the table is defined on
//! `[knots[d][order[d]], knots[d][n - order[d] - 1]]`.

use std::collections::BTreeMap;
use std::str::FromStr;

use evgen_core::{ErrorInfo, EvgenError};
use serde::{Deserialize, Serialize};

/// Multi-dimensional B-spline surface with optional string metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineTable {
    knots: Vec<Vec<f64>>,
    orders: Vec<usize>,
    coefficients: Vec<f64>,
    strides: Vec<usize>,
    #[serde(default)]
    aux: BTreeMap<String, String>,
}

impl SplineTable {
    /// Validates and assembles a table from raw arrays.
    pub fn new(
        knots: Vec<Vec<f64>>,
        orders: Vec<usize>,
        coefficients: Vec<f64>,
    ) -> Result<Self, EvgenError> {
        if knots.is_empty() || knots.len() != orders.len() {
            return Err(EvgenError::Table(
                ErrorInfo::new("spline-dimensions", "need one order per knot vector")
                    .with_context("knot_vectors", knots.len())
                    .with_context("orders", orders.len()),
            ));
        }
        let mut counts = Vec::with_capacity(knots.len());
        for (dim, (axis, &order)) in knots.iter().zip(&orders).enumerate() {
            if axis.len() < order + 2 {
                return Err(EvgenError::Table(
                    ErrorInfo::new("spline-knots", "too few knots for the spline order")
                        .with_context("dim", dim)
                        .with_context("knots", axis.len())
                        .with_context("order", order),
                ));
            }
            if axis.iter().any(|k| !k.is_finite()) || axis.windows(2).any(|w| w[1] < w[0]) {
                return Err(EvgenError::Table(
                    ErrorInfo::new("spline-knots", "knots must be finite and non-decreasing")
                        .with_context("dim", dim),
                ));
            }
            counts.push(axis.len() - order - 1);
        }
        let expected: usize = counts.iter().product();
        if coefficients.len() != expected {
            return Err(EvgenError::Table(
                ErrorInfo::new("spline-coefficients", "coefficient count does not match knots")
                    .with_context("expected", expected)
                    .with_context("found", coefficients.len()),
            ));
        }
        let mut strides = vec![1; counts.len()];
        for d in (0..counts.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * counts[d + 1];
        }
        Ok(Self {
            knots,
            orders,
            coefficients,
            strides,
            aux: BTreeMap::new(),
        })
    }

    /// Attaches metadata entries.
    pub fn with_aux(mut self, aux: BTreeMap<String, String>) -> Self {
        self.aux = aux;
        self
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.knots.len()
    }

    /// Lower edge of the support on axis `dim`.
    pub fn lower_extent(&self, dim: usize) -> f64 {
        self.knots[dim][self.orders[dim]]
    }

    /// Upper edge of the support on axis `dim`.
    pub fn upper_extent(&self, dim: usize) -> f64 {
        let axis = &self.knots[dim];
        axis[axis.len() - self.orders[dim] - 1]
    }

    /// Whether `x` lies inside the support of axis `dim`.
    pub fn contains(&self, dim: usize, x: f64) -> bool {
        x >= self.lower_extent(dim) && x <= self.upper_extent(dim)
    }

    /// Knot-interval index per axis, or `None` when any coordinate is
    /// outside the support or the wrong number of coordinates is given.
    pub fn search_centers(&self, coords: &[f64]) -> Option<Vec<usize>> {
        if coords.len() != self.ndim() {
            return None;
        }
        coords
            .iter()
            .enumerate()
            .map(|(dim, &x)| {
                if !self.contains(dim, x) {
                    return None;
                }
                let order = self.orders[dim];
                let axis = &self.knots[dim];
                let last = axis.len() - order - 2;
                let raw = axis.partition_point(|&k| k <= x).saturating_sub(1);
                Some(raw.clamp(order, last))
            })
            .collect()
    }

    /// Evaluates the spline at `coords`, or `None` outside the support.
    pub fn evaluate(&self, coords: &[f64]) -> Option<f64> {
        let centers = self.search_centers(coords)?;
        let bases: Vec<Vec<f64>> = centers
            .iter()
            .enumerate()
            .map(|(dim, &center)| basis(&self.knots[dim], self.orders[dim], center, coords[dim]))
            .collect();

        let ndim = self.ndim();
        let mut offsets = vec![0usize; ndim];
        let mut total = 0.0;
        loop {
            let mut weight = 1.0;
            let mut index = 0;
            for d in 0..ndim {
                weight *= bases[d][offsets[d]];
                index += (centers[d] - self.orders[d] + offsets[d]) * self.strides[d];
            }
            total += weight * self.coefficients[index];

            // odometer over the (order + 1)^ndim non-zero basis products
            let mut d = ndim;
            loop {
                if d == 0 {
                    return Some(total);
                }
                d -= 1;
                offsets[d] += 1;
                if offsets[d] <= self.orders[d] {
                    break;
                }
                offsets[d] = 0;
            }
        }
    }

    /// Raw metadata value.
    pub fn aux_value(&self, name: &str) -> Option<&str> {
        self.aux.get(name).map(String::as_str)
    }

    /// Parses a metadata value, `None` when absent or unparsable.
    pub fn read_key<T: FromStr>(&self, name: &str) -> Option<T> {
        self.aux_value(name)?.trim().parse().ok()
    }
}

/// Values of the `order + 1` basis functions that are non-zero on knot
/// interval `center`, lowest index first (Cox-de Boor recursion).
fn basis(knots: &[f64], order: usize, center: usize, x: f64) -> Vec<f64> {
    let mut values = vec![0.0; order + 1];
    let mut left = vec![0.0; order + 1];
    let mut right = vec![0.0; order + 1];
    values[0] = 1.0;
    for j in 1..=order {
        left[j] = x - knots[center + 1 - j];
        right[j] = knots[center + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom != 0.0 { values[r] / denom } else { 0.0 };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }
    values
}
