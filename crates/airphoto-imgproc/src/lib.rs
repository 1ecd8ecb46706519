#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// four-point homography estimation module.
pub mod homography;

/// utilities for interpolation.
pub mod interpolation;

/// corner mask rasterization module.
pub mod mask;

/// canvas padding module.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;
