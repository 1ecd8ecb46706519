/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open or manipulate the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] airphoto_image::ImageError),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),

    /// Error to decode the PNG image.
    #[error("Failed to decode the png image. {0}")]
    PngDecodeError(String),

    /// Error to decode or encode the TIFF image.
    #[error("Failed to process the tiff image. {0}")]
    TiffError(#[from] tiff::TiffError),

    /// The image has a layout the pipeline does not support.
    #[error("Unsupported image layout for {0}: expected 8 or 16 bit grayscale")]
    UnsupportedLayout(std::path::PathBuf),
}
