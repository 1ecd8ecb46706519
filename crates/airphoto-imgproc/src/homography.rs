//! Exact four-point homography estimation.
//!
//! The solver maps four source points onto four destination points in
//! corresponding order. Point correspondences are caller-supplied; the
//! winding check rejects orderings that would silently produce a mirrored
//! or self-intersecting mapping.

use thiserror::Error;

/// Threshold below which the homography determinant is considered singular.
const DET_EPS: f64 = 1e-8;

/// Threshold below which a quadrilateral's signed area is considered zero.
const AREA_EPS: f64 = 1e-9;

/// Errors that can occur while estimating a homography.
#[derive(Error, Debug, PartialEq)]
pub enum HomographyError {
    /// The four points are collinear or otherwise produce a singular system.
    #[error("degenerate point configuration, homography determinant is {0:.3e}")]
    DegenerateTransform(f64),

    /// Source and destination quadrilaterals are wound in opposite directions.
    #[error("source and destination quadrilaterals have inconsistent winding")]
    WindingMismatch,
}

/// Twice the signed area of the quadrilateral, by the shoelace formula.
///
/// Positive for counter-clockwise winding in a y-down image frame.
fn signed_area(pts: &[[f64; 2]; 4]) -> f64 {
    let mut area = 0.0;
    for i in 0..4 {
        let [x0, y0] = pts[i];
        let [x1, y1] = pts[(i + 1) % 4];
        area += x0 * y1 - x1 * y0;
    }
    area
}

#[rustfmt::skip]
fn det_mat33(m: &[f64; 9]) -> f64 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

/// Apply a 3x3 homography to a 2d point.
pub fn transform_point(m: &[f64; 9], p: [f64; 2]) -> [f64; 2] {
    let w = m[6] * p[0] + m[7] * p[1] + m[8];
    [
        (m[0] * p[0] + m[1] * p[1] + m[2]) / w,
        (m[3] * p[0] + m[4] * p[1] + m[5]) / w,
    ]
}

/// Compute the homography matrix from four 2d point correspondences.
///
/// Point `i` in `src` maps exactly onto point `i` in `dst`. The returned
/// matrix is row-major with the scale normalized so that `m[8] == 1` when
/// the transform is affine-dominant.
///
/// # Arguments
///
/// * `src` - The source 2d points with shape (4, 2).
/// * `dst` - The destination 2d points with shape (4, 2).
///
/// # Errors
///
/// [`HomographyError::DegenerateTransform`] when either quadrilateral has
/// (near) zero area or the linear system is singular, and
/// [`HomographyError::WindingMismatch`] when the two quadrilaterals are
/// traversed in opposite directions.
pub fn get_perspective_transform(
    src: &[[f64; 2]; 4],
    dst: &[[f64; 2]; 4],
) -> Result<[f64; 9], HomographyError> {
    let src_area = signed_area(src);
    let dst_area = signed_area(dst);

    if src_area.abs() < AREA_EPS || dst_area.abs() < AREA_EPS {
        return Err(HomographyError::DegenerateTransform(0.0));
    }
    if src_area.signum() != dst_area.signum() {
        return Err(HomographyError::WindingMismatch);
    }

    // construct the 8x9 matrix A such that A * h = 0
    let mut mat_a = faer::Mat::<f64>::zeros(8, 9);
    for i in 0..4 {
        let (src_i, dst_i) = (src[i], dst[i]);
        mat_a.write(2 * i, 0, src_i[0]);
        mat_a.write(2 * i, 1, src_i[1]);
        mat_a.write(2 * i, 2, 1.0);
        mat_a.write(2 * i, 6, -dst_i[0] * src_i[0]);
        mat_a.write(2 * i, 7, -dst_i[0] * src_i[1]);
        mat_a.write(2 * i, 8, -dst_i[0]);

        mat_a.write(2 * i + 1, 3, src_i[0]);
        mat_a.write(2 * i + 1, 4, src_i[1]);
        mat_a.write(2 * i + 1, 5, 1.0);
        mat_a.write(2 * i + 1, 6, -dst_i[1] * src_i[0]);
        mat_a.write(2 * i + 1, 7, -dst_i[1] * src_i[1]);
        mat_a.write(2 * i + 1, 8, -dst_i[1]);
    }

    // the solution is the right singular vector of the smallest singular value
    let svd = mat_a.svd();
    let h = svd.v().col(8);

    let mut homo = [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]];

    // normalize the homography scale
    if homo[8].abs() > f64::EPSILON {
        let inv = 1.0 / homo[8];
        for v in homo.iter_mut() {
            *v *= inv;
        }
    } else {
        let norm = homo.iter().map(|v| v * v).sum::<f64>().sqrt();
        let inv = 1.0 / norm;
        for v in homo.iter_mut() {
            *v *= inv;
        }
    }

    let det = det_mat33(&homo);
    if det.abs() < DET_EPS {
        return Err(HomographyError::DegenerateTransform(det));
    }

    Ok(homo)
}
