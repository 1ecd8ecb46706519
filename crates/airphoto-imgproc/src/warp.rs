//! Perspective warping of images.

use crate::{
    interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode},
    parallel,
};

use airphoto_image::{Image, ImageDtype, ImageError};

#[rustfmt::skip]
fn determinant3x3(m: &[f32; 9]) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f32; 9]) -> [f32; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

fn inverse_perspective_matrix(m: &[f32; 9]) -> Result<[f32; 9], ImageError> {
    let det = determinant3x3(m);

    if det == 0.0 {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let adj = adjugate3x3(m);
    let inv_det = 1.0 / det;

    let mut inv_m = [0.0; 9];
    for i in 0..9 {
        inv_m[i] = adj[i] * inv_det;
    }

    Ok(inv_m)
}

fn transform_point(x: f32, y: f32, m: &[f32; 9]) -> (f32, f32) {
    let w = m[6] * x + m[7] * y + m[8];
    let u = (m[0] * x + m[1] * y + m[2]) / w;
    let v = (m[3] * x + m[4] * y + m[5]) / w;
    (u, v)
}

/// Applies a perspective transformation to an image.
///
/// Destination pixels that map outside the source bounds keep the value the
/// destination buffer was initialized with, which acts as the fill value.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 3x3 row-major perspective transformation matrix src -> dst.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use airphoto_image::{Image, ImageSize};
/// use airphoto_imgproc::interpolation::InterpolationMode;
/// use airphoto_imgproc::warp::warp_perspective;
///
/// let src = Image::<u8, 1>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5],
/// ).unwrap();
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
///
/// let mut dst = Image::<u8, 1>::from_size_val(
///     ImageSize {
///         width: 2,
///         height: 3,
///     },
///     0,
/// ).unwrap();
///
/// warp_perspective(&src, &mut dst, &m, InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// ```
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 9],
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    // inverse perspective matrix to map dst positions back into src
    let inv_m = inverse_perspective_matrix(m)?;

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        transform_point(x as f32, y as f32, &inv_m)
    });

    let (src_cols, src_rows) = (src.cols() as f32, src.rows() as f32);
    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        if x >= 0.0f32 && x < src_cols && y >= 0.0f32 && y < src_rows {
            dst_pixel.iter_mut().enumerate().for_each(|(k, pixel)| {
                *pixel = T::from_f32(interpolate_pixel(src, x, y, k, interpolation))
            });
        }
    });

    Ok(())
}
