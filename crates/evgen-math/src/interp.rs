//! Linear and bilinear interpolation over tabulated data.
//!
//! When an axis is logarithmic the table stores `ln f` and results are
//! exponentiated, so log-spaced tables are interpolated as power laws.

use evgen_core::{ErrorInfo, EvgenError, NumericsConfig};
use serde::{Deserialize, Serialize};

use crate::indexer::{AxisScale, GridIndexer};

/// Raw one-dimensional table: `f[i]` is the value at `x[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData1D {
    /// Abscissas, in any order.
    pub x: Vec<f64>,
    /// Values.
    pub f: Vec<f64>,
}

/// Raw two-dimensional table: `f[i]` is the value at `(x[i], y[i])`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData2D {
    /// First coordinate of every entry.
    pub x: Vec<f64>,
    /// Second coordinate of every entry.
    pub y: Vec<f64>,
    /// Values.
    pub f: Vec<f64>,
}

fn length_mismatch(expected: usize, found: usize, field: &str) -> EvgenError {
    EvgenError::Table(
        ErrorInfo::new("length-mismatch", "table columns have different lengths")
            .with_context("field", field)
            .with_context("expected", expected)
            .with_context("found", found),
    )
}

fn store(value: f64, log: bool) -> f64 {
    if log {
        debug_assert!(value > 0.0, "log-scaled tables need positive values");
        value.ln()
    } else {
        value
    }
}

/// Piecewise-linear interpolator over a 1D table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolator1D {
    indexer: GridIndexer,
    values: Vec<f64>,
    log_values: bool,
}

impl Interpolator1D {
    /// Builds an interpolator with default numerics.
    pub fn new(table: &TableData1D) -> Result<Self, EvgenError> {
        Self::with_numerics(table, &NumericsConfig::default())
    }

    /// Builds an interpolator using the given regularity tolerance.
    pub fn with_numerics(
        table: &TableData1D,
        numerics: &NumericsConfig,
    ) -> Result<Self, EvgenError> {
        if table.x.len() != table.f.len() {
            return Err(length_mismatch(table.x.len(), table.f.len(), "f"));
        }
        let indexer = GridIndexer::with_scale(&table.x, AxisScale::Auto, numerics)?;
        let log_values = indexer.is_log();
        let mut values = vec![0.0; indexer.len()];
        for (&x, &f) in table.x.iter().zip(&table.f) {
            if let Some(i) = indexer.node_index(x) {
                values[i] = store(f, log_values);
            }
        }
        Ok(Self {
            indexer,
            values,
            log_values,
        })
    }

    /// Interpolated value at `x`; the boundary bin extrapolates outside the table.
    pub fn evaluate(&self, x: f64) -> f64 {
        let bin = self.indexer.locate(x);
        let t = bin.fraction();
        let i = bin.index;
        let v = self.values[i] + t * (self.values[i + 1] - self.values[i]);
        if self.log_values {
            v.exp()
        } else {
            v
        }
    }

    /// Smallest tabulated abscissa.
    pub fn min_x(&self) -> f64 {
        self.indexer.min()
    }

    /// Largest tabulated abscissa.
    pub fn max_x(&self) -> f64 {
        self.indexer.max()
    }

    /// Extent of the tabulated abscissas.
    pub fn range_x(&self) -> f64 {
        self.indexer.range()
    }

    /// Whether values are interpolated in log space.
    pub fn is_log(&self) -> bool {
        self.log_values
    }
}

/// Bilinear interpolator over a complete rectangular 2D table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolator2D {
    indexer_x: GridIndexer,
    indexer_y: GridIndexer,
    /// Row-major by x: `values[ix * ny + iy]`.
    values: Vec<f64>,
    log_values: bool,
}

impl Interpolator2D {
    /// Builds an interpolator with default numerics.
    pub fn new(table: &TableData2D) -> Result<Self, EvgenError> {
        Self::with_numerics(table, &NumericsConfig::default())
    }

    /// Builds an interpolator using the given regularity tolerance.
    pub fn with_numerics(
        table: &TableData2D,
        numerics: &NumericsConfig,
    ) -> Result<Self, EvgenError> {
        if table.x.len() != table.y.len() {
            return Err(length_mismatch(table.x.len(), table.y.len(), "y"));
        }
        if table.x.len() != table.f.len() {
            return Err(length_mismatch(table.x.len(), table.f.len(), "f"));
        }
        let indexer_x = GridIndexer::with_scale(&table.x, AxisScale::Auto, numerics)?;
        let indexer_y = GridIndexer::with_scale(&table.y, AxisScale::Auto, numerics)?;
        let log_values = indexer_x.is_log() || indexer_y.is_log();
        let ny = indexer_y.len();
        let mut slots: Vec<Option<f64>> = vec![None; indexer_x.len() * ny];
        for ((&x, &y), &f) in table.x.iter().zip(&table.y).zip(&table.f) {
            if let (Some(ix), Some(iy)) = (indexer_x.node_index(x), indexer_y.node_index(y)) {
                slots[ix * ny + iy] = Some(store(f, log_values));
            }
        }
        let missing = slots.iter().filter(|slot| slot.is_none()).count();
        if missing > 0 {
            return Err(EvgenError::Table(
                ErrorInfo::new("incomplete-grid", "2D table does not cover every grid node")
                    .with_context("missing", missing)
                    .with_context("nx", indexer_x.len())
                    .with_context("ny", ny),
            ));
        }
        let values = slots.into_iter().flatten().collect();
        Ok(Self {
            indexer_x,
            indexer_y,
            values,
            log_values,
        })
    }

    /// Interpolated value at `(x, y)`; boundary cells extrapolate outside the table.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let bx = self.indexer_x.locate(x);
        let by = self.indexer_y.locate(y);
        let ny = self.indexer_y.len();
        let (i, j) = (bx.index, by.index);
        let f00 = self.values[i * ny + j];
        let f01 = self.values[i * ny + j + 1];
        let f10 = self.values[(i + 1) * ny + j];
        let f11 = self.values[(i + 1) * ny + j + 1];
        let tx = bx.fraction();
        let ty = by.fraction();
        let low = f00 + ty * (f01 - f00);
        let high = f10 + ty * (f11 - f10);
        let v = low + tx * (high - low);
        if self.log_values {
            v.exp()
        } else {
            v
        }
    }

    /// Smallest tabulated first coordinate.
    pub fn min_x(&self) -> f64 {
        self.indexer_x.min()
    }

    /// Largest tabulated first coordinate.
    pub fn max_x(&self) -> f64 {
        self.indexer_x.max()
    }

    /// Extent of the first coordinate.
    pub fn range_x(&self) -> f64 {
        self.indexer_x.range()
    }

    /// Smallest tabulated second coordinate.
    pub fn min_y(&self) -> f64 {
        self.indexer_y.min()
    }

    /// Largest tabulated second coordinate.
    pub fn max_y(&self) -> f64 {
        self.indexer_y.max()
    }

    /// Extent of the second coordinate.
    pub fn range_y(&self) -> f64 {
        self.indexer_y.range()
    }

    /// Whether values are interpolated in log space.
    pub fn is_log(&self) -> bool {
        self.log_values
    }
}
