//! Virtual camera model: intrinsics derived from the observation surface and
//! a fixed pre-characterized lens distortion.

use crate::constants::{DISTORTION_COEFFS, NORMALIZED_FOCAL_Y, PROJECTION_EPS};
use nalgebra::{Matrix3, Vector2, Vector3};

/// Camera intrinsics for the observation surface.
///
/// Derived once from the surface's pixel dimensions and recomputed only when
/// those change: `focal_length = height × NORMALIZED_FOCAL_Y`, principal
/// point at the surface center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    pub focal_length: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Derive intrinsics from observation surface pixel dimensions.
    pub fn from_dimensions(width: f64, height: f64) -> Self {
        Self {
            focal_length: height * NORMALIZED_FOCAL_Y,
            cx: width / 2.0,
            cy: height / 2.0,
        }
    }

    /// The 3×3 camera matrix. Always invertible since `focal_length > 0` by
    /// construction.
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focal_length, 0.0, self.cx,
            0.0, self.focal_length, self.cy,
            0.0, 0.0, 1.0,
        )
    }
}

/// Lens distortion coefficients `[k1, k2, p1, p2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionCoeffs {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
}

impl DistortionCoeffs {
    /// The fixed coefficients of the pre-characterized capture lens.
    pub fn calibrated() -> Self {
        let [k1, k2, p1, p2] = DISTORTION_COEFFS;
        Self { k1, k2, p1, p2 }
    }

    /// An ideal lens with no distortion.
    pub fn zero() -> Self {
        Self { k1: 0.0, k2: 0.0, p1: 0.0, p2: 0.0 }
    }
}

/// Project a camera-frame 3D point to pixel coordinates through the pinhole
/// model with radial and tangential distortion.
pub fn project_point(
    point: &Vector3<f64>,
    intrinsics: &CameraIntrinsics,
    distortion: &DistortionCoeffs,
) -> Vector2<f64> {
    // Small depth epsilon keeps the division well-defined near z = 0.
    let z = point.z + PROJECTION_EPS;
    let x = point.x / z;
    let y = point.y / z;

    let r2 = x * x + y * y;
    let radial = 1.0 + distortion.k1 * r2 + distortion.k2 * r2 * r2;
    let xd = x * radial + 2.0 * distortion.p1 * x * y + distortion.p2 * (r2 + 2.0 * x * x);
    let yd = y * radial + distortion.p1 * (r2 + 2.0 * y * y) + 2.0 * distortion.p2 * x * y;

    Vector2::new(
        intrinsics.focal_length * xd + intrinsics.cx,
        intrinsics.focal_length * yd + intrinsics.cy,
    )
}
