use airphoto_image::{Image, ImageDtype};

/// Kernel for bilinear interpolation
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
/// The interpolated pixel value.
pub(crate) fn bilinear_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);
    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let frac_u = u.fract();
    let frac_v = v.fract();
    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let data = image.as_slice();
    let p00: f32 = data[(iv0 * cols + iu0) * C + c].into();
    let p01: f32 = data[(iv0 * cols + iu1) * C + c].into();
    let p10: f32 = data[(iv1 * cols + iu0) * C + c].into();
    let p11: f32 = data[(iv1 * cols + iu1) * C + c].into();

    p00 * frac_uu * frac_vv
        + p01 * frac_u * frac_vv
        + p10 * frac_uu * frac_v
        + p11 * frac_u * frac_v
}
