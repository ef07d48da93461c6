#![deny(missing_docs)]
#![doc = "Density distributions for the evgen interaction core: a one-dimensional density \
profile along a radial or cartesian axis, evaluated at points, integrated along rays \
into column depths, and inverted to place interaction vertices."]

pub mod axis;
pub mod density;
pub mod distribution;

pub use axis::{Axis1D, CartesianAxis1D, RadialAxis1D};
pub use density::{DensityDistribution, DensityDistribution1D, NO_VALID_DISTANCE};
pub use distribution::{
    ConstantDistribution1D, Distribution1D, ExponentialDistribution1D, PolynomialDistribution1D,
};
