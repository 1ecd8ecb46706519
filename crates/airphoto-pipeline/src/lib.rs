#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// canvas standardization stage.
pub mod canvas;

/// image collection enumeration and extent scanning.
pub mod collection;

/// error types for the pipeline.
pub mod error;

/// batch execution over a collection.
pub mod executor;

/// fiducial mark metadata table.
pub mod fiducials;

/// corner mask generation stage.
pub mod mask;

/// fiducial reprojection stage.
pub mod reproject;

pub use crate::error::PipelineError;
