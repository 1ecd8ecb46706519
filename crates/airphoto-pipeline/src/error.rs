use std::path::PathBuf;

use airphoto_imgproc::homography::HomographyError;

/// An error type for the pipeline stages.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The fiducial metadata file is unreadable or malformed.
    #[error("Failed to load fiducial metadata from {path:?}: {reason}")]
    MetadataLoad {
        /// The metadata file path.
        path: PathBuf,
        /// Why loading failed.
        reason: String,
    },

    /// No fiducial record matches the image identifier.
    #[error("No fiducial record found for image '{0}'")]
    RecordNotFound(String),

    /// More than one fiducial record matches the image identifier exactly.
    #[error("{1} fiducial records match image '{0}', expected exactly one")]
    AmbiguousRecord(String, usize),

    /// An image is larger than the computed collection extent.
    #[error(
        "Image '{id}' ({width}x{height}) exceeds the collection extent ({max_width}x{max_height})"
    )]
    OversizeSource {
        /// The image identifier.
        id: String,
        /// The image width in pixels.
        width: usize,
        /// The image height in pixels.
        height: usize,
        /// The collection maximum width.
        max_width: usize,
        /// The collection maximum height.
        max_height: usize,
    },

    /// The fiducial transform cannot be solved for an image.
    #[error("Failed to solve the fiducial transform for image '{id}'")]
    Transform {
        /// The image identifier.
        id: String,
        /// The underlying solver error.
        #[source]
        source: HomographyError,
    },

    /// The input directory holds no image of the configured format.
    #[error("No '{extension}' images found in {directory:?}")]
    EmptyCollection {
        /// The scanned directory.
        directory: PathBuf,
        /// The configured extension filter.
        extension: String,
    },

    /// The worker pool failed to build.
    #[error("Failed to build the worker pool: {0}")]
    ThreadPool(String),

    /// An image file could not be read or written.
    #[error(transparent)]
    Io(#[from] airphoto_io::IoError),

    /// An image buffer operation failed.
    #[error(transparent)]
    Image(#[from] airphoto_image::ImageError),
}
