use airphoto_image::{Image, ImageDtype};

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
///
/// # Returns
///
/// The nearest pixel value.
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let iu = (u.round() as usize).clamp(0, cols - 1);
    let iv = (v.round() as usize).clamp(0, rows - 1);

    image.as_slice()[(iv * cols + iu) * C + c].into()
}
