//! Bin lookup over sorted abscissas with automatic regular/log detection.

use evgen_core::{ErrorInfo, EvgenError, NumericsConfig};
use serde::{Deserialize, Serialize};

/// Requested coordinate transform for a grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisScale {
    /// Prefer a natural-log axis when the data is positive and more regular in log.
    #[default]
    Auto,
    /// Untransformed abscissas.
    Linear,
    /// Natural-log abscissas; requires strictly positive data.
    Log,
}

/// Result of locating a query inside the grid.
///
/// `value`, `lower_edge` and `width` are in axis coordinates, i.e. after the
/// log transform when the axis is logarithmic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinLocation {
    /// Index of the lower node of the bracketing bin, in `[0, len - 2]`.
    pub index: usize,
    /// Query position in axis coordinates.
    pub value: f64,
    /// Lower node of the bin in axis coordinates.
    pub lower_edge: f64,
    /// Bin width in axis coordinates.
    pub width: f64,
}

impl BinLocation {
    /// Fractional position of the query inside its bin; outside `[0, 1]`
    /// for out-of-range queries.
    pub fn fraction(&self) -> f64 {
        (self.value - self.lower_edge) / self.width
    }
}

/// Maps a coordinate to the bin of a sorted grid that contains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridIndexer {
    points: Vec<f64>,
    nodes: Vec<f64>,
    log: bool,
    step: Option<f64>,
}

impl GridIndexer {
    /// Builds an indexer with automatic scale selection and default tolerance.
    pub fn new(points: &[f64]) -> Result<Self, EvgenError> {
        Self::with_scale(points, AxisScale::Auto, &NumericsConfig::default())
    }

    /// Builds an indexer with an explicit scale request.
    pub fn with_scale(
        points: &[f64],
        scale: AxisScale,
        numerics: &NumericsConfig,
    ) -> Result<Self, EvgenError> {
        if let Some(bad) = points.iter().find(|v| !v.is_finite()) {
            return Err(EvgenError::Table(
                ErrorInfo::new("non-finite-abscissa", "grid abscissas must be finite")
                    .with_context("value", bad),
            ));
        }
        let mut sorted = points.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        if sorted.len() < 2 {
            return Err(EvgenError::Table(
                ErrorInfo::new("too-few-points", "grid needs at least two distinct abscissas")
                    .with_context("distinct", sorted.len()),
            ));
        }

        let positive = sorted[0] > 0.0;
        let tolerance = numerics.regularity_tolerance;
        let log_nodes: Option<Vec<f64>> =
            positive.then(|| sorted.iter().map(|v| v.ln()).collect());

        let (log, nodes) = match scale {
            AxisScale::Linear => (false, sorted.clone()),
            AxisScale::Log => match log_nodes {
                Some(nodes) => (true, nodes),
                None => {
                    return Err(EvgenError::Table(
                        ErrorInfo::new("log-non-positive", "log axis requires positive abscissas")
                            .with_context("min", sorted[0]),
                    ))
                }
            },
            AxisScale::Auto => match log_nodes {
                Some(nodes) => {
                    let log_spread = irregularity(&nodes);
                    let lin_spread = irregularity(&sorted);
                    if log_spread < tolerance || (lin_spread >= tolerance && log_spread < lin_spread)
                    {
                        (true, nodes)
                    } else {
                        (false, sorted.clone())
                    }
                }
                None => (false, sorted.clone()),
            },
        };

        let n = nodes.len();
        let step =
            (irregularity(&nodes) < tolerance).then(|| (nodes[n - 1] - nodes[0]) / (n - 1) as f64);
        Ok(Self {
            points: sorted,
            nodes,
            log,
            step,
        })
    }

    /// Locates `x` (in original coordinates).
    ///
    /// Queries outside the grid map to the boundary bin. On a log axis a
    /// non-positive query is clamped to the lowest node.
    pub fn locate(&self, x: f64) -> BinLocation {
        let value = if self.log {
            if x > 0.0 {
                x.ln()
            } else {
                self.nodes[0]
            }
        } else {
            x
        };
        let last = self.nodes.len() - 2;
        let index = match self.step {
            Some(step) => {
                let raw = ((value - self.nodes[0]) / step).floor();
                let mut index = if raw.is_nan() || raw < 0.0 {
                    0
                } else {
                    (raw as usize).min(last)
                };
                while index > 0 && value < self.nodes[index] {
                    index -= 1;
                }
                while index < last && value >= self.nodes[index + 1] {
                    index += 1;
                }
                index
            }
            None => self
                .nodes
                .partition_point(|&node| node <= value)
                .saturating_sub(1)
                .min(last),
        };
        BinLocation {
            index,
            value,
            lower_edge: self.nodes[index],
            width: self.nodes[index + 1] - self.nodes[index],
        }
    }

    /// Index of the node equal to `x`, if `x` is one of the grid abscissas.
    pub fn node_index(&self, x: f64) -> Option<usize> {
        self.points.binary_search_by(|p| p.total_cmp(&x)).ok()
    }

    /// Sorted, de-duplicated abscissas in original coordinates.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Smallest abscissa.
    pub fn min(&self) -> f64 {
        self.points[0]
    }

    /// Largest abscissa.
    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// `max - min` in original coordinates.
    pub fn range(&self) -> f64 {
        self.max() - self.min()
    }

    /// Whether lookups happen in natural-log coordinates.
    pub fn is_log(&self) -> bool {
        self.log
    }

    /// Whether the O(1) regular-step lookup is used.
    pub fn is_regular(&self) -> bool {
        self.step.is_some()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a grid has at least two nodes.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Largest relative deviation of a spacing from the mean spacing.
fn irregularity(nodes: &[f64]) -> f64 {
    let n = nodes.len();
    let mean = (nodes[n - 1] - nodes[0]) / (n - 1) as f64;
    nodes
        .windows(2)
        .map(|w| ((w[1] - w[0]) - mean).abs() / mean)
        .fold(0.0, f64::max)
}
