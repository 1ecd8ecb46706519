/// Create a meshgrid of x and y coordinates from a mapping function.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - Maps a (x, y) grid position to a sampling coordinate
///
/// # Returns
///
/// A tuple of two row-major buffers of length `rows * cols` containing the
/// x and y sampling coordinates.
pub(crate) fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> (f32, f32),
) -> (Vec<f32>, Vec<f32>) {
    let mut map_x = vec![0.0f32; rows * cols];
    let mut map_y = vec![0.0f32; rows * cols];

    for r in 0..rows {
        for c in 0..cols {
            let (x, y) = f(c, r);
            map_x[r * cols + c] = x;
            map_y[r * cols + c] = y;
        }
    }

    (map_x, map_y)
}
