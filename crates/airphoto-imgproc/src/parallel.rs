use rayon::prelude::*;

use airphoto_image::Image;

/// Apply a function to each pixel for grid sampling in parallel.
///
/// The destination image is split into rows and each row is resampled on the
/// global Rayon pool. `map_x` and `map_y` hold the per-pixel sampling
/// coordinates and must have `rows * cols` elements.
pub fn par_iter_rows_resample<T, const C: usize>(
    dst: &mut Image<T, C>,
    map_x: &[f32],
    map_y: &[f32],
    f: impl Fn(&f32, &f32, &mut [T]) + Send + Sync,
) where
    T: Clone + Send + Sync,
{
    let cols = dst.cols();
    let dst_slice = dst.as_slice_mut();

    dst_slice
        .par_chunks_exact_mut(C * cols)
        .zip(map_x.par_chunks_exact(cols))
        .zip(map_y.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}
