use std::path::PathBuf;

use argh::FromArgs;

use airphoto_image::ImageSize;
use airphoto_imgproc::interpolation::InterpolationMode;
use airphoto_pipeline::canvas::{standardize_collection, CanvasConfig};
use airphoto_pipeline::executor::{default_worker_count, BatchReport, FailurePolicy};
use airphoto_pipeline::mask::{create_collection_mask, MaskConfig};
use airphoto_pipeline::reproject::{reproject_collection, ReprojectConfig, TargetLayout};

#[derive(FromArgs)]
/// Batch geometric normalization of scanned aerial photo collections
struct Args {
    #[argh(subcommand)]
    command: Command,

    /// number of worker threads (default: available cores minus one)
    #[argh(option, short = 'j')]
    jobs: Option<usize>,

    /// keep processing after a per-image failure instead of halting
    #[argh(switch)]
    keep_going: bool,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Canvas(CanvasArgs),
    Reproject(ReprojectArgs),
    Mask(MaskArgs),
}

#[derive(FromArgs)]
/// Pad every image of a collection to the collection-wide maximum size
#[argh(subcommand, name = "canvas")]
struct CanvasArgs {
    /// directory holding the input collection
    #[argh(option, short = 'i')]
    input_dir: PathBuf,

    /// directory receiving the padded outputs
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// file extension of the collection images (default: tif)
    #[argh(option, short = 'e', default = "String::from(\"tif\")")]
    extension: String,
}

#[derive(FromArgs)]
/// Reproject every image onto a canonical fiducial layout
#[argh(subcommand, name = "reproject")]
struct ReprojectArgs {
    /// directory holding the canvas-sized input collection
    #[argh(option, short = 'i')]
    input_dir: PathBuf,

    /// directory receiving the reprojected outputs
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// file extension of the collection images (default: tif)
    #[argh(option, short = 'e', default = "String::from(\"tif\")")]
    extension: String,

    /// path to the fiducial marks CSV
    #[argh(option, short = 'f')]
    fiducials: PathBuf,

    /// target fiducial coordinates as x1,y1,x2,y2,x3,y3,x4,y4
    #[argh(option, from_str_fn(parse_points))]
    target_points: [[f64; 2]; 4],

    /// output canvas width in pixels
    #[argh(option)]
    width: usize,

    /// output canvas height in pixels
    #[argh(option)]
    height: usize,

    /// resampling kernel, bilinear or nearest (default: bilinear)
    #[argh(option, default = "InterpolationMode::Bilinear", from_str_fn(parse_interpolation))]
    interpolation: InterpolationMode,
}

#[derive(FromArgs)]
/// Build the shared corner mask of a standardized collection
#[argh(subcommand, name = "mask")]
struct MaskArgs {
    /// directory holding the standardized collection
    #[argh(option, short = 'i')]
    input_dir: PathBuf,

    /// directory receiving the mask
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// file extension of the collection images (default: tif)
    #[argh(option, short = 'e', default = "String::from(\"tif\")")]
    extension: String,

    /// dataset name used in the mask filename
    #[argh(option, short = 'n')]
    dataset_name: String,

    /// corner width as a percentage of the canvas width (default: 12)
    #[argh(option, default = "12.0")]
    margin_x: f64,

    /// corner height as a percentage of the canvas height (default: 12)
    #[argh(option, default = "12.0")]
    margin_y: f64,
}

fn parse_points(value: &str) -> Result<[[f64; 2]; 4], String> {
    let coords = value
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| format!("invalid coordinate: {e}"))?;
    if coords.len() != 8 {
        return Err(format!("expected 8 coordinates, got {}", coords.len()));
    }
    Ok([
        [coords[0], coords[1]],
        [coords[2], coords[3]],
        [coords[4], coords[5]],
        [coords[6], coords[7]],
    ])
}

fn parse_interpolation(value: &str) -> Result<InterpolationMode, String> {
    match value {
        "bilinear" => Ok(InterpolationMode::Bilinear),
        "nearest" => Ok(InterpolationMode::Nearest),
        other => Err(format!("unknown interpolation '{other}'")),
    }
}

fn report_outcome(report: &BatchReport) {
    if report.is_complete() {
        log::info!("{} images completed", report.completed);
    } else {
        log::error!(
            "{} images completed, {} failed",
            report.completed,
            report.failures.len()
        );
        for failure in &report.failures {
            log::error!("  '{}': {}", failure.image_id, failure.error);
        }
        std::process::exit(1);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let workers = args.jobs.unwrap_or_else(default_worker_count);
    let policy = if args.keep_going {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Halt
    };

    match args.command {
        Command::Canvas(cmd) => {
            let report = standardize_collection(&CanvasConfig {
                input_dir: cmd.input_dir,
                output_dir: cmd.output_dir,
                extension: cmd.extension,
                workers,
                policy,
            })?;
            report_outcome(&report);
        }
        Command::Reproject(cmd) => {
            let report = reproject_collection(&ReprojectConfig {
                input_dir: cmd.input_dir,
                output_dir: cmd.output_dir,
                extension: cmd.extension,
                fiducials_csv: cmd.fiducials,
                layout: TargetLayout {
                    points: cmd.target_points,
                    size: ImageSize {
                        width: cmd.width,
                        height: cmd.height,
                    },
                },
                interpolation: cmd.interpolation,
                workers,
                policy,
            })?;
            report_outcome(&report);
        }
        Command::Mask(cmd) => {
            let out_path = create_collection_mask(&MaskConfig {
                input_dir: cmd.input_dir,
                output_dir: cmd.output_dir,
                extension: cmd.extension,
                dataset_name: cmd.dataset_name,
                margin_x_pct: cmd.margin_x,
                margin_y_pct: cmd.margin_y,
            })?;
            log::info!("mask written to {out_path:?}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eight_coordinates() {
        let points = parse_points("8,8, 56,8, 56,56, 8,56").unwrap();
        assert_eq!(points[0], [8.0, 8.0]);
        assert_eq!(points[2], [56.0, 56.0]);
    }

    #[test]
    fn rejects_wrong_coordinate_count() {
        assert!(parse_points("1,2,3").is_err());
        assert!(parse_points("1,2,3,4,5,6,7,eight").is_err());
    }

    #[test]
    fn parses_interpolation_modes() {
        assert_eq!(
            parse_interpolation("bilinear").unwrap(),
            InterpolationMode::Bilinear
        );
        assert_eq!(
            parse_interpolation("nearest").unwrap(),
            InterpolationMode::Nearest
        );
        assert!(parse_interpolation("bicubic").is_err());
    }
}
