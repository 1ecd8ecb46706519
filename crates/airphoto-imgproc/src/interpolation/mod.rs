//! Pixel interpolation methods for image transformations.
//!
//! Kernels used when resampling images during geometric transformations.
//! `Bilinear` averages the four neighboring pixels, `Nearest` picks the
//! closest one.

mod bilinear;

pub(crate) mod grid;

mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};

pub(crate) use bilinear::bilinear_interpolation;
pub(crate) use nearest::nearest_neighbor_interpolation;
