use std::io::Write;
use std::path::{Path, PathBuf};

use airphoto_image::{Image, ImageSize};
use airphoto_imgproc::interpolation::InterpolationMode;
use airphoto_io::png::{read_image_png_mono16, write_image_png_gray16};
use airphoto_pipeline::collection::image_id;
use airphoto_pipeline::executor::FailurePolicy;
use airphoto_pipeline::fiducials::FiducialTable;
use airphoto_pipeline::reproject::{
    reproject_collection, reproject_one, ReprojectConfig, TargetLayout,
};
use airphoto_pipeline::PipelineError;

const HEADER: &str = "PHOTO_ID,Xp1,Yp1,Xp2,Yp2,Xp3,Yp3,Xp4,Yp4";

fn write_csv(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("fiducials.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    path
}

fn write_gradient_png16(dir: &Path, name: &str, width: usize, height: usize) {
    let data = (0..width * height).map(|i| (i * 97 % 65_521) as u16).collect();
    let image = Image::<u16, 1>::new(ImageSize { width, height }, data).unwrap();
    write_image_png_gray16(dir.join(name), &image).unwrap();
}

fn square_layout() -> TargetLayout {
    TargetLayout {
        points: [[8.0, 8.0], [56.0, 8.0], [56.0, 56.0], [8.0, 56.0]],
        size: ImageSize {
            width: 64,
            height: 64,
        },
    }
}

#[test]
fn reproject_collection_end_to_end() -> Result<(), PipelineError> {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_gradient_png16(input.path(), "photo_1.png", 64, 64);
    write_gradient_png16(input.path(), "photo_2.png", 64, 64);
    let csv = write_csv(
        input.path(),
        &[
            "photo_1,16,16,48,16,48,48,16,48",
            "photo_2,14,15,50,16,49,47,15,49",
        ],
    );

    let report = reproject_collection(&ReprojectConfig {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().to_path_buf(),
        extension: "png".into(),
        fiducials_csv: csv,
        layout: square_layout(),
        interpolation: InterpolationMode::Bilinear,
        workers: 2,
        policy: FailurePolicy::Halt,
    })?;
    assert_eq!(report.completed, 2);

    for name in ["photo_1_standardized.png", "photo_2_standardized.png"] {
        let warped = read_image_png_mono16(output.path().join(name))?;
        assert_eq!(warped.width(), 64);
        assert_eq!(warped.height(), 64);
    }
    Ok(())
}

#[test]
fn reproject_is_deterministic() -> Result<(), PipelineError> {
    let input = tempfile::tempdir().unwrap();

    write_gradient_png16(input.path(), "photo_1.png", 64, 64);
    let csv = write_csv(input.path(), &["photo_1,16,17,47,16,48,49,15,48"]);
    let table = FiducialTable::from_csv(&csv)?;
    let layout = square_layout();

    let image_path = input.path().join("photo_1.png");
    let first_dir = tempfile::tempdir().unwrap();
    reproject_one(
        &image_path,
        &table,
        &layout,
        InterpolationMode::Bilinear,
        first_dir.path(),
    )?;
    let first =
        std::fs::read(first_dir.path().join("photo_1_standardized.png")).unwrap();

    for _ in 0..2 {
        let again_dir = tempfile::tempdir().unwrap();
        reproject_one(
            &image_path,
            &table,
            &layout,
            InterpolationMode::Bilinear,
            again_dir.path(),
        )?;
        let again =
            std::fs::read(again_dir.path().join("photo_1_standardized.png")).unwrap();
        assert_eq!(first, again, "outputs must be byte-identical");
    }
    Ok(())
}

#[test]
fn missing_record_fails_that_image_only() -> Result<(), PipelineError> {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_gradient_png16(input.path(), "known.png", 64, 64);
    write_gradient_png16(input.path(), "unknown.png", 64, 64);
    let csv = write_csv(input.path(), &["known,16,16,48,16,48,48,16,48"]);

    let report = reproject_collection(&ReprojectConfig {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().to_path_buf(),
        extension: "png".into(),
        fiducials_csv: csv,
        layout: square_layout(),
        interpolation: InterpolationMode::Bilinear,
        workers: 1,
        policy: FailurePolicy::Skip,
    })?;

    assert_eq!(report.completed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].image_id, "unknown");
    assert!(matches!(
        report.failures[0].error,
        PipelineError::RecordNotFound(_)
    ));
    assert!(output.path().join("known_standardized.png").exists());
    assert!(!output.path().join("unknown_standardized.png").exists());
    Ok(())
}

#[test]
fn collinear_fiducials_fail_with_transform_error() -> Result<(), PipelineError> {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_gradient_png16(input.path(), "flat.png", 64, 64);
    let csv = write_csv(input.path(), &["flat,1,1,2,2,3,3,4,4"]);
    let table = FiducialTable::from_csv(&csv)?;

    let res = reproject_one(
        &input.path().join("flat.png"),
        &table,
        &square_layout(),
        InterpolationMode::Bilinear,
        output.path(),
    );

    match res {
        Err(PipelineError::Transform { id, .. }) => assert_eq!(id, "flat"),
        other => panic!("expected a transform error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn image_id_strips_extension() {
    assert_eq!(image_id(Path::new("/data/photo_042.tif")), "photo_042");
    assert_eq!(image_id(Path::new("photo.tar.png")), "photo.tar");
}
