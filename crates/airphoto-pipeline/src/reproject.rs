//! Fiducial reprojection stage.
//!
//! Per image: load at full bit depth, resolve the fiducial marks in the
//! metadata table, solve the homography onto the canonical target layout,
//! resample into the fixed output canvas and write the result. The stage is
//! deterministic: identical raster, fiducial coordinates and layout always
//! produce a bit-identical output.

use std::path::{Path, PathBuf};

use airphoto_image::{Image, ImageSize};
use airphoto_imgproc::homography::get_perspective_transform;
use airphoto_imgproc::interpolation::InterpolationMode;
use airphoto_imgproc::warp::warp_perspective;
use airphoto_io::functional::{read_image_gray, write_image_gray, GenericGrayImage};

use crate::collection::{image_id, ImageCollection};
use crate::error::PipelineError;
use crate::executor::{self, BatchReport, FailurePolicy};
use crate::fiducials::FiducialTable;

/// Filename suffix appended to reprojected outputs.
pub const REPROJECT_SUFFIX: &str = "_standardized";

/// The canonical fiducial layout every output image shares.
///
/// Constant across a run: it defines the common coordinate frame that
/// downstream reconstruction software aligns the collection in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetLayout {
    /// Target pixel coordinates of the four fiducial marks, same order as
    /// the metadata table rows.
    pub points: [[f64; 2]; 4],
    /// Output canvas size.
    pub size: ImageSize,
}

/// Configuration of the reprojection stage.
pub struct ReprojectConfig {
    /// Directory holding the canvas-sized input collection.
    pub input_dir: PathBuf,
    /// Directory receiving the reprojected outputs.
    pub output_dir: PathBuf,
    /// File extension filter, e.g. `tif`.
    pub extension: String,
    /// Path to the fiducial metadata CSV.
    pub fiducials_csv: PathBuf,
    /// The canonical target layout.
    pub layout: TargetLayout,
    /// Resampling kernel.
    pub interpolation: InterpolationMode,
    /// Worker pool size.
    pub workers: usize,
    /// What to do when a single image fails.
    pub policy: FailurePolicy,
}

/// Reproject one image onto the canonical fiducial layout.
pub fn reproject_one(
    path: &Path,
    table: &FiducialTable,
    layout: &TargetLayout,
    interpolation: InterpolationMode,
    output_dir: &Path,
) -> Result<(), PipelineError> {
    let id = image_id(path);

    let src = read_image_gray(path)?;
    let marks = table.lookup(&id)?;

    let homo = get_perspective_transform(&marks.points, &layout.points)
        .map_err(|source| PipelineError::Transform {
            id: id.clone(),
            source,
        })?;
    let m = homo.map(|v| v as f32);

    let warped = match src {
        GenericGrayImage::Gray8(image) => {
            let mut dst = Image::<u8, 1>::from_size_val(layout.size, 0)?;
            warp_perspective(&image, &mut dst, &m, interpolation)?;
            GenericGrayImage::Gray8(dst)
        }
        GenericGrayImage::Gray16(image) => {
            let mut dst = Image::<u16, 1>::from_size_val(layout.size, 0)?;
            warp_perspective(&image, &mut dst, &m, interpolation)?;
            GenericGrayImage::Gray16(dst)
        }
    };

    let out_path = output_path(path, output_dir)?;
    write_image_gray(&out_path, &warped)?;
    log::debug!("reprojected '{}' -> {:?}", id, out_path);
    Ok(())
}

/// Reproject a whole collection onto the canonical fiducial layout.
///
/// The metadata table is loaded once before dispatch; a load failure aborts
/// the run before any image is processed.
pub fn reproject_collection(config: &ReprojectConfig) -> Result<BatchReport, PipelineError> {
    let table = FiducialTable::from_csv(&config.fiducials_csv)?;
    let collection = ImageCollection::discover(&config.input_dir, &config.extension)?;

    std::fs::create_dir_all(&config.output_dir).map_err(airphoto_io::IoError::from)?;

    executor::for_each_image(collection.images(), config.workers, config.policy, |path| {
        reproject_one(
            path,
            &table,
            &config.layout,
            config.interpolation,
            &config.output_dir,
        )
    })
}

fn output_path(input: &Path, output_dir: &Path) -> Result<PathBuf, PipelineError> {
    let ext = input
        .extension()
        .ok_or_else(|| airphoto_io::IoError::InvalidFileExtension(input.to_path_buf()))?;
    let name = format!(
        "{}{}.{}",
        image_id(input),
        REPROJECT_SUFFIX,
        ext.to_string_lossy()
    );
    Ok(output_dir.join(name))
}
