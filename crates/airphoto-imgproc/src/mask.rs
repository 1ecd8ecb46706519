//! Corner mask rasterization.
//!
//! Produces the single advisory mask shared by a size-homogeneous photo
//! collection: 255 everywhere except four corner rectangles set to 0, which
//! blank the fiducial-mark regions for downstream reconstruction software.

use airphoto_image::{Image, ImageError, ImageSize};

/// Pixel value for unmasked regions.
pub const UNMASKED: u8 = 255;

/// Pixel value for masked regions.
pub const MASKED: u8 = 0;

fn fill_rect(image: &mut Image<u8, 1>, x0: usize, y0: usize, x1: usize, y1: usize, val: u8) {
    let cols = image.cols();
    let data = image.as_slice_mut();
    for y in y0..y1 {
        data[y * cols + x0..y * cols + x1].fill(val);
    }
}

/// Build a single-channel corner mask for the given canvas size.
///
/// Margins are rounded percentages of the canvas width and height. Margins
/// of 50% or more make opposite rectangles overlap, which is harmless since
/// they write the same value; margins are clamped to the canvas size.
///
/// # Arguments
///
/// * `size` - The canvas size, usually the collection extent.
/// * `margin_x_pct` - Corner width as a percentage of the canvas width.
/// * `margin_y_pct` - Corner height as a percentage of the canvas height.
///
/// # Example
///
/// ```
/// use airphoto_image::ImageSize;
/// use airphoto_imgproc::mask::corner_mask;
///
/// let mask = corner_mask(ImageSize { width: 100, height: 50 }, 10.0, 10.0).unwrap();
/// assert_eq!(mask.as_slice()[0], 0);
/// assert_eq!(mask.as_slice()[10], 255);
/// ```
pub fn corner_mask(
    size: ImageSize,
    margin_x_pct: f64,
    margin_y_pct: f64,
) -> Result<Image<u8, 1>, ImageError> {
    let margin_x = (((margin_x_pct / 100.0) * size.width as f64).round() as usize).min(size.width);
    let margin_y =
        (((margin_y_pct / 100.0) * size.height as f64).round() as usize).min(size.height);

    let mut mask = Image::from_size_val(size, UNMASKED)?;

    let (w, h) = (size.width, size.height);
    fill_rect(&mut mask, 0, 0, margin_x, margin_y, MASKED);
    fill_rect(&mut mask, w - margin_x, 0, w, margin_y, MASKED);
    fill_rect(&mut mask, w - margin_x, h - margin_y, w, h, MASKED);
    fill_rect(&mut mask, 0, h - margin_y, margin_x, h, MASKED);

    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(mask: &Image<u8, 1>, x: usize, y: usize) -> u8 {
        mask.as_slice()[y * mask.cols() + x]
    }

    #[test]
    fn twelve_percent_corners_on_1000px_canvas() -> Result<(), ImageError> {
        let mask = corner_mask(
            ImageSize {
                width: 1000,
                height: 1000,
            },
            12.0,
            12.0,
        )?;

        // corner rectangles are exactly 120x120
        assert_eq!(pixel(&mask, 0, 0), MASKED);
        assert_eq!(pixel(&mask, 119, 119), MASKED);
        assert_eq!(pixel(&mask, 120, 119), UNMASKED);
        assert_eq!(pixel(&mask, 119, 120), UNMASKED);

        assert_eq!(pixel(&mask, 999, 0), MASKED);
        assert_eq!(pixel(&mask, 880, 119), MASKED);
        assert_eq!(pixel(&mask, 879, 119), UNMASKED);

        assert_eq!(pixel(&mask, 999, 999), MASKED);
        assert_eq!(pixel(&mask, 0, 999), MASKED);
        assert_eq!(pixel(&mask, 500, 500), UNMASKED);

        let masked = mask.as_slice().iter().filter(|&&v| v == MASKED).count();
        assert_eq!(masked, 4 * 120 * 120);
        Ok(())
    }

    #[test]
    fn margins_are_rounded_not_truncated() -> Result<(), ImageError> {
        // 12% of 90 is 10.8, rounds to 11
        let mask = corner_mask(
            ImageSize {
                width: 90,
                height: 90,
            },
            12.0,
            12.0,
        )?;
        assert_eq!(pixel(&mask, 10, 0), MASKED);
        assert_eq!(pixel(&mask, 11, 0), UNMASKED);
        Ok(())
    }

    #[test]
    fn overlapping_margins_blank_the_whole_canvas() -> Result<(), ImageError> {
        let mask = corner_mask(
            ImageSize {
                width: 10,
                height: 10,
            },
            60.0,
            60.0,
        )?;
        assert!(mask.as_slice().iter().all(|&v| v == MASKED));
        Ok(())
    }

    #[test]
    fn rectangular_canvas_uses_separate_margins() -> Result<(), ImageError> {
        let mask = corner_mask(
            ImageSize {
                width: 200,
                height: 100,
            },
            10.0,
            20.0,
        )?;
        // 20x20 corners
        assert_eq!(pixel(&mask, 19, 19), MASKED);
        assert_eq!(pixel(&mask, 20, 19), UNMASKED);
        assert_eq!(pixel(&mask, 19, 20), UNMASKED);
        Ok(())
    }
}
