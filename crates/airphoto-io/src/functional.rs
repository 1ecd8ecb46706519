use std::path::Path;

use airphoto_image::{Image, ImageSize};

use crate::error::IoError;
use crate::{png, tiff};

/// A grayscale image that preserves the bit depth of its source file.
pub enum GenericGrayImage {
    /// 8-bit grayscale image
    Gray8(Image<u8, 1>),
    /// 16-bit grayscale image
    Gray16(Image<u16, 1>),
}

impl GenericGrayImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericGrayImage::Gray8(image) => image.size(),
            GenericGrayImage::Gray16(image) => image.size(),
        }
    }

    /// The bit depth of the pixel data.
    pub fn bit_depth(&self) -> u8 {
        match self {
            GenericGrayImage::Gray8(_) => 8,
            GenericGrayImage::Gray16(_) => 16,
        }
    }
}

/// Reads a grayscale image from the given file path, preserving bit depth.
///
/// The format is selected from the file extension; `png`, `tif` and `tiff`
/// are supported.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the decoded pixel data at its source bit depth.
pub fn read_image_gray(file_path: impl AsRef<Path>) -> Result<GenericGrayImage, IoError> {
    let file_path = file_path.as_ref();

    match image_format(file_path)? {
        ImageFormat::Png => png::read_image_png_gray(file_path),
        ImageFormat::Tiff => tiff::read_image_tiff_gray(file_path),
    }
}

/// Writes a grayscale image to the given file path, preserving bit depth.
///
/// # Arguments
///
/// * `file_path` - The destination path; the extension selects the format.
/// * `image` - The image to encode.
pub fn write_image_gray(
    file_path: impl AsRef<Path>,
    image: &GenericGrayImage,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    match (image_format(file_path)?, image) {
        (ImageFormat::Png, GenericGrayImage::Gray8(image)) => {
            png::write_image_png_gray8(file_path, image)
        }
        (ImageFormat::Png, GenericGrayImage::Gray16(image)) => {
            png::write_image_png_gray16(file_path, image)
        }
        (ImageFormat::Tiff, GenericGrayImage::Gray8(image)) => {
            tiff::write_image_tiff_gray8(file_path, image)
        }
        (ImageFormat::Tiff, GenericGrayImage::Gray16(image)) => {
            tiff::write_image_tiff_gray16(file_path, image)
        }
    }
}

/// Reads the dimensions of an image from its header without decoding pixels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_size(file_path: impl AsRef<Path>) -> Result<ImageSize, IoError> {
    let file_path = file_path.as_ref();

    match image_format(file_path)? {
        ImageFormat::Png => png::read_png_size(file_path),
        ImageFormat::Tiff => tiff::read_tiff_size(file_path),
    }
}

enum ImageFormat {
    Png,
    Tiff,
}

fn image_format(file_path: &Path) -> Result<ImageFormat, IoError> {
    let ext = file_path
        .extension()
        .ok_or_else(|| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

    if ext.eq_ignore_ascii_case("png") {
        Ok(ImageFormat::Png)
    } else if ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff") {
        Ok(ImageFormat::Tiff)
    } else {
        Err(IoError::InvalidFileExtension(file_path.to_path_buf()))
    }
}
