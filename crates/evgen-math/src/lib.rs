#![deny(missing_docs)]
#![doc = "Numerical building blocks for the evgen interaction core: relativistic kinematics, \
adaptive grid indexing, linear/bilinear interpolation with automatic log scaling, \
tensor-product B-spline tables, bounded root finding and Romberg quadrature."]

pub mod indexer;
pub mod interp;
pub mod kinematics;
pub mod polynomial;
pub mod quadrature;
pub mod roots;
pub mod spline;

pub use indexer::{AxisScale, BinLocation, GridIndexer};
pub use interp::{Interpolator1D, Interpolator2D, TableData1D, TableData2D};
pub use kinematics::{azimuthal_rotation, rotation_between, Boost, FourVector};
pub use polynomial::Polynomial;
pub use quadrature::{romberg, QuadratureError};
pub use roots::{newton_raphson, RootError, RootOptions};
pub use spline::SplineTable;
