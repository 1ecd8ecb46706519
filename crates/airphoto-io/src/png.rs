use std::{fs::File, path::Path};

use airphoto_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Decoder, Encoder};

use crate::{
    conv_utils::{convert_buf_u16_u8, convert_buf_u8_u16},
    error::IoError,
    functional::GenericGrayImage,
};

/// Read a PNG image with a single channel (mono8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();
    let (buf, size, info) = read_png_impl(file_path)?;

    if info != (ColorType::Grayscale, BitDepth::Eight) {
        return Err(IoError::UnsupportedLayout(file_path.to_path_buf()));
    }

    Ok(Image::new(size, buf)?)
}

/// Read a PNG image with a single channel (mono16).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono16).
pub fn read_image_png_mono16(file_path: impl AsRef<Path>) -> Result<Image<u16, 1>, IoError> {
    let file_path = file_path.as_ref();
    let (buf, size, info) = read_png_impl(file_path)?;

    if info != (ColorType::Grayscale, BitDepth::Sixteen) {
        return Err(IoError::UnsupportedLayout(file_path.to_path_buf()));
    }

    Ok(Image::new(size, convert_buf_u8_u16(buf))?)
}

/// Read a grayscale PNG image preserving its bit depth.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// The decoded image, 8 or 16 bit depending on the source file.
pub fn read_image_png_gray(file_path: impl AsRef<Path>) -> Result<GenericGrayImage, IoError> {
    let file_path = file_path.as_ref();
    let (buf, size, info) = read_png_impl(file_path)?;

    match info {
        (ColorType::Grayscale, BitDepth::Eight) => {
            Ok(GenericGrayImage::Gray8(Image::new(size, buf)?))
        }
        (ColorType::Grayscale, BitDepth::Sixteen) => Ok(GenericGrayImage::Gray16(Image::new(
            size,
            convert_buf_u8_u16(buf),
        )?)),
        _ => Err(IoError::UnsupportedLayout(file_path.to_path_buf())),
    }
}

/// Read the dimensions of a PNG image without decoding the pixel data.
pub fn read_png_size(file_path: impl AsRef<Path>) -> Result<ImageSize, IoError> {
    let file_path = file_path.as_ref();
    check_png_path(file_path)?;

    let file = File::open(file_path)?;
    let reader = Decoder::new(file)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let info = reader.info();
    Ok(ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    })
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the pixel data.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Grayscale,
    )
}

/// Writes the given PNG _(grayscale 16-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the pixel data.
pub fn write_image_png_gray16(
    file_path: impl AsRef<Path>,
    image: &Image<u16, 1>,
) -> Result<(), IoError> {
    let image_buf = convert_buf_u16_u8(image.as_slice());

    write_png_impl(
        file_path,
        &image_buf,
        image.size(),
        BitDepth::Sixteen,
        ColorType::Grayscale,
    )
}

fn check_png_path(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path
        .extension()
        .map_or(true, |ext| !ext.eq_ignore_ascii_case("png"))
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    Ok(())
}

// utility function to read the png file
fn read_png_impl(
    file_path: &Path,
) -> Result<(Vec<u8>, ImageSize, (ColorType, BitDepth)), IoError> {
    check_png_path(file_path)?;

    let file = File::open(file_path)?;
    let mut reader = Decoder::new(file)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    Ok((buf, size, (info.color_type, info.bit_depth)))
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(file, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}
