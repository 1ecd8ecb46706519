//! Corner mask generation stage.
//!
//! Produces one mask per collection, shared by every image of a
//! size-homogeneous dataset. The extent scan double-checks that the
//! collection really is homogeneous; drift is logged as a warning since the
//! mask is advisory.

use std::path::PathBuf;

use airphoto_imgproc::mask::corner_mask;
use airphoto_io::png::write_image_png_gray8;

use crate::collection::ImageCollection;
use crate::error::PipelineError;

/// Configuration of the mask generation stage.
pub struct MaskConfig {
    /// Directory holding the standardized collection.
    pub input_dir: PathBuf,
    /// Directory receiving the mask.
    pub output_dir: PathBuf,
    /// File extension filter, e.g. `tif`.
    pub extension: String,
    /// Dataset name, used for the output filename.
    pub dataset_name: String,
    /// Corner width as a percentage of the canvas width.
    pub margin_x_pct: f64,
    /// Corner height as a percentage of the canvas height.
    pub margin_y_pct: f64,
}

/// Build the shared corner mask of a collection and write it as PNG.
///
/// # Returns
///
/// The path of the written mask, `<dataset_name>_mask.png`.
pub fn create_collection_mask(config: &MaskConfig) -> Result<PathBuf, PipelineError> {
    let collection = ImageCollection::discover(&config.input_dir, &config.extension)?;
    let extent = collection.scan_extent()?;

    if !extent.is_uniform() {
        log::warn!(
            "collection sizes vary: min {}x{}, max {}x{}; the mask fits the maximum only",
            extent.min_width,
            extent.min_height,
            extent.max_width,
            extent.max_height
        );
    }

    let mask = corner_mask(extent.max_size(), config.margin_x_pct, config.margin_y_pct)?;

    std::fs::create_dir_all(&config.output_dir).map_err(airphoto_io::IoError::from)?;
    let out_path = config
        .output_dir
        .join(format!("{}_mask.png", config.dataset_name));
    write_image_png_gray8(&out_path, &mask)?;

    log::info!(
        "wrote {}x{} mask to {:?}",
        mask.width(),
        mask.height(),
        out_path
    );
    Ok(out_path)
}
