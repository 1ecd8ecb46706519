use std::{fs::File, path::Path};

use airphoto_image::{Image, ImageSize};
use tiff::{
    decoder::{Decoder, DecodingResult},
    encoder::{colortype, TiffEncoder},
};

use crate::{error::IoError, functional::GenericGrayImage};

/// Read a TIFF image and return it as a grayscale 8-bit image.
///
/// # Arguments
///
/// * `file_path` - The path to the TIFF image.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_tiff_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    match read_image_tiff_gray(file_path)? {
        GenericGrayImage::Gray8(image) => Ok(image),
        GenericGrayImage::Gray16(_) => Err(IoError::UnsupportedLayout(file_path.to_path_buf())),
    }
}

/// Read a TIFF image and return it as a grayscale 16-bit image.
///
/// # Arguments
///
/// * `file_path` - The path to the TIFF image.
///
/// # Returns
///
/// A grayscale image with a single channel (mono16).
pub fn read_image_tiff_mono16(file_path: impl AsRef<Path>) -> Result<Image<u16, 1>, IoError> {
    let file_path = file_path.as_ref();
    match read_image_tiff_gray(file_path)? {
        GenericGrayImage::Gray16(image) => Ok(image),
        GenericGrayImage::Gray8(_) => Err(IoError::UnsupportedLayout(file_path.to_path_buf())),
    }
}

/// Read a grayscale TIFF image preserving its bit depth.
///
/// # Arguments
///
/// * `file_path` - The path to the TIFF image.
///
/// # Returns
///
/// The decoded image, 8 or 16 bit depending on the source file.
pub fn read_image_tiff_gray(file_path: impl AsRef<Path>) -> Result<GenericGrayImage, IoError> {
    let file_path = file_path.as_ref();
    let mut decoder = open_tiff_decoder(file_path)?;

    if !matches!(decoder.colortype()?, tiff::ColorType::Gray(8 | 16)) {
        return Err(IoError::UnsupportedLayout(file_path.to_path_buf()));
    }

    let (width, height) = decoder.dimensions()?;
    let size = ImageSize {
        width: width as usize,
        height: height as usize,
    };

    match decoder.read_image()? {
        DecodingResult::U8(data) => Ok(GenericGrayImage::Gray8(Image::new(size, data)?)),
        DecodingResult::U16(data) => Ok(GenericGrayImage::Gray16(Image::new(size, data)?)),
        _ => Err(IoError::UnsupportedLayout(file_path.to_path_buf())),
    }
}

/// Read the dimensions of a TIFF image without decoding the pixel data.
pub fn read_tiff_size(file_path: impl AsRef<Path>) -> Result<ImageSize, IoError> {
    let mut decoder = open_tiff_decoder(file_path.as_ref())?;
    let (width, height) = decoder.dimensions()?;

    Ok(ImageSize {
        width: width as usize,
        height: height as usize,
    })
}

/// Writes the given TIFF _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the TIFF image.
/// - `image` - The image containing the pixel data.
pub fn write_image_tiff_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_image_tiff_impl::<colortype::Gray8, u8>(file_path, image.as_slice(), image.size())
}

/// Writes the given TIFF _(grayscale 16-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the TIFF image.
/// - `image` - The image containing the pixel data.
pub fn write_image_tiff_gray16(
    file_path: impl AsRef<Path>,
    image: &Image<u16, 1>,
) -> Result<(), IoError> {
    write_image_tiff_impl::<colortype::Gray16, u16>(file_path, image.as_slice(), image.size())
}

fn open_tiff_decoder(file_path: &Path) -> Result<Decoder<File>, IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path.extension().map_or(true, |ext| {
        !ext.eq_ignore_ascii_case("tiff") && !ext.eq_ignore_ascii_case("tif")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;
    Ok(Decoder::new(file)?)
}

fn write_image_tiff_impl<C, T>(
    file_path: impl AsRef<Path>,
    image_data: &[T],
    image_size: ImageSize,
) -> Result<(), IoError>
where
    C: tiff::encoder::colortype::ColorType<Inner = T>,
    [T]: tiff::encoder::TiffValue,
{
    let file = File::create(file_path)?;

    let mut encoder = TiffEncoder::new(file)?;
    encoder.write_image::<C>(
        image_size.width as u32,
        image_size.height as u32,
        image_data,
    )?;
    Ok(())
}
