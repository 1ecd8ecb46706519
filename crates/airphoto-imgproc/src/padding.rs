//! Canvas padding towards a common collection size.

use airphoto_image::{Image, ImageError};

/// Creates a padded copy of the source image anchored at the top-left origin.
///
/// The source content is copied unscaled to offset (0, 0) of `dst` and the
/// added right and bottom borders are filled with `fill`. Coordinates
/// recorded against the original top-left origin stay valid afterwards.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image, at least as large as `src` in both
///   dimensions.
/// * `fill` - The pixel value used for the added border.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if `dst` is smaller than `src`
/// in either dimension. The source is never cropped.
///
/// # Example
///
/// ```
/// use airphoto_image::{Image, ImageSize};
/// use airphoto_imgproc::padding::pad_bottom_right;
///
/// let src = Image::<u8, 1>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![1, 2, 3, 4],
/// ).unwrap();
///
/// let mut dst = Image::<u8, 1>::from_size_val(
///     ImageSize { width: 3, height: 3 },
///     0,
/// ).unwrap();
///
/// pad_bottom_right(&src, &mut dst, 0).unwrap();
///
/// assert_eq!(dst.as_slice(), &[1, 2, 0, 3, 4, 0, 0, 0, 0]);
/// ```
pub fn pad_bottom_right<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    fill: T,
) -> Result<(), ImageError>
where
    T: Copy,
{
    if src.width() > dst.width() || src.height() > dst.height() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let old_stride = src.width() * C;
    let new_stride = dst.width() * C;

    let old_data = src.as_slice();
    let new_data = dst.as_slice_mut();

    new_data.fill(fill);

    for (src_row, dst_row) in old_data
        .chunks_exact(old_stride)
        .zip(new_data.chunks_exact_mut(new_stride))
    {
        dst_row[..old_stride].copy_from_slice(src_row);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use airphoto_image::ImageSize;

    #[test]
    fn pad_keeps_content_at_origin() -> Result<(), ImageError> {
        let src = Image::<u16, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![10, 20, 30, 40],
        )?;
        let mut dst = Image::<u16, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 3,
            },
            0,
        )?;

        pad_bottom_right(&src, &mut dst, 0)?;

        assert_eq!(dst.as_slice(), &[10, 20, 0, 0, 30, 40, 0, 0, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn pad_same_size_is_a_copy() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 3,
                height: 1,
            },
            vec![7, 8, 9],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        pad_bottom_right(&src, &mut dst, 0)?;

        assert_eq!(dst.as_slice(), src.as_slice());
        Ok(())
    }

    #[test]
    fn pad_never_crops() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 2,
            },
            1,
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 3,
            },
            0,
        )?;

        let res = pad_bottom_right(&src, &mut dst, 0);
        assert!(matches!(res, Err(ImageError::InvalidImageSize(4, 3, 5, 2))));
        Ok(())
    }
}
