//! Canvas standardization stage.
//!
//! Pads every image of a collection to the collection-wide maximum size.
//! Content stays flush at the top-left origin so fiducial coordinates
//! recorded against the original origin remain valid after padding.

use std::path::{Path, PathBuf};

use airphoto_image::{Image, ImageSize};
use airphoto_imgproc::padding::pad_bottom_right;
use airphoto_io::functional::{read_image_gray, write_image_gray, GenericGrayImage};

use crate::collection::{image_id, ImageCollection};
use crate::error::PipelineError;
use crate::executor::{self, BatchReport, FailurePolicy};

/// Filename suffix appended to standardized outputs.
pub const CANVAS_SUFFIX: &str = "_CanvasSized";

/// Configuration of the canvas standardization stage.
pub struct CanvasConfig {
    /// Directory holding the raw input collection.
    pub input_dir: PathBuf,
    /// Directory receiving the padded outputs.
    pub output_dir: PathBuf,
    /// File extension filter, e.g. `tif`.
    pub extension: String,
    /// Worker pool size.
    pub workers: usize,
    /// What to do when a single image fails.
    pub policy: FailurePolicy,
}

/// Pad one image to the target canvas and write it next to its siblings.
///
/// # Errors
///
/// [`PipelineError::OversizeSource`] when the image is larger than the
/// target in either dimension; the image is never cropped.
pub fn standardize_one(
    path: &Path,
    target: ImageSize,
    output_dir: &Path,
) -> Result<(), PipelineError> {
    let id = image_id(path);
    let src = read_image_gray(path)?;

    let size = src.size();
    if size.width > target.width || size.height > target.height {
        return Err(PipelineError::OversizeSource {
            id,
            width: size.width,
            height: size.height,
            max_width: target.width,
            max_height: target.height,
        });
    }

    let padded = match src {
        GenericGrayImage::Gray8(image) => {
            let mut dst = Image::<u8, 1>::from_size_val(target, 0)?;
            pad_bottom_right(&image, &mut dst, 0)?;
            GenericGrayImage::Gray8(dst)
        }
        GenericGrayImage::Gray16(image) => {
            let mut dst = Image::<u16, 1>::from_size_val(target, 0)?;
            pad_bottom_right(&image, &mut dst, 0)?;
            GenericGrayImage::Gray16(dst)
        }
    };

    let out_path = output_path(path, output_dir)?;
    write_image_gray(&out_path, &padded)?;
    log::debug!("standardized '{}' -> {:?}", id, out_path);
    Ok(())
}

/// Standardize the canvas size of a whole collection.
///
/// First pass scans every image header for the collection extent; second
/// pass pads each image to that extent on the worker pool.
pub fn standardize_collection(config: &CanvasConfig) -> Result<BatchReport, PipelineError> {
    let collection = ImageCollection::discover(&config.input_dir, &config.extension)?;
    let extent = collection.scan_extent()?;
    let target = extent.max_size();

    log::info!(
        "collection extent: {}x{} over {} images",
        target.width,
        target.height,
        collection.len()
    );

    std::fs::create_dir_all(&config.output_dir).map_err(airphoto_io::IoError::from)?;

    executor::for_each_image(collection.images(), config.workers, config.policy, |path| {
        standardize_one(path, target, &config.output_dir)
    })
}

fn output_path(input: &Path, output_dir: &Path) -> Result<PathBuf, PipelineError> {
    let ext = input
        .extension()
        .ok_or_else(|| airphoto_io::IoError::InvalidFileExtension(input.to_path_buf()))?;
    let name = format!(
        "{}{}.{}",
        image_id(input),
        CANVAS_SUFFIX,
        ext.to_string_lossy()
    );
    Ok(output_dir.join(name))
}
