use super::{bilinear_interpolation, nearest_neighbor_interpolation};
use airphoto_image::{Image, ImageDtype};

/// Interpolation mode for resampling operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel value.
pub fn interpolate_pixel<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
    interpolation: InterpolationMode,
) -> f32 {
    match interpolation {
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v, c),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v, c),
    }
}
