#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the io module.
pub mod error;

/// High-level functions to read any supported image format.
pub mod functional;

/// PNG image encoding and decoding.
pub mod png;

/// TIFF image encoding and decoding.
pub mod tiff;

pub use crate::error::IoError;
pub use crate::functional::GenericGrayImage;

pub(crate) mod conv_utils;
