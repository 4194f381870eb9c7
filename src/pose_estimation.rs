//! Head pose estimation pipeline.
//!
//! Ties the landmark selector, the PnP backend and the Euler decomposition
//! together behind one caller-owned calculator. All per-frame failures
//! (no face, solve divergence, missing calibration) are absorbed here and
//! normalized to `None`; nothing per-frame ever escapes as an error.

use crate::camera_model::{CameraIntrinsics, DistortionCoeffs};
use crate::constants::REFERENCE_MODEL_POINTS;
use crate::landmark_selection::{select_face_points, DetectionResult};
use crate::orientation::decompose_degrees;
use crate::pnp_solver::{IterativePnp, PnpBackend};
use log::{debug, trace};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A plain 3-component vector used across pose, scene and configuration
/// types.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Estimated rigid head pose relative to the camera.
///
/// `position` is the solved translation in reference-model units; `rotation`
/// holds tuned pitch / yaw / roll in degrees, finite and roughly within
/// `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePose {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Per-session pose calculator.
///
/// Owns the camera intrinsics (absent until the observation surface reports
/// its dimensions), the fixed distortion model and the injected PnP backend.
/// Construct one per session and pass it explicitly; there is no process-wide
/// instance.
pub struct PoseCalculator {
    backend: Box<dyn PnpBackend>,
    distortion: DistortionCoeffs,
    model_points: Vec<Vector3<f64>>,
    canvas: Option<(f64, f64)>,
    intrinsics: Option<CameraIntrinsics>,
}

impl PoseCalculator {
    /// Create a calculator with an explicit solver backend.
    pub fn new(backend: Box<dyn PnpBackend>) -> Self {
        Self {
            backend,
            distortion: DistortionCoeffs::calibrated(),
            model_points: REFERENCE_MODEL_POINTS
                .iter()
                .map(|p| Vector3::new(p[0], p[1], p[2]))
                .collect(),
            canvas: None,
            intrinsics: None,
        }
    }

    /// Calculator with the default iterative backend.
    pub fn with_default_backend() -> Self {
        Self::new(Box::new(IterativePnp::default()))
    }

    /// Update the observation surface dimensions, recomputing intrinsics.
    /// Dimensions that do not change are a no-op.
    pub fn set_canvas_dimensions(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            debug!("Ignoring invalid canvas dimensions {width}x{height}");
            return;
        }
        if self.canvas == Some((width, height)) {
            return;
        }
        self.canvas = Some((width, height));
        self.intrinsics = Some(CameraIntrinsics::from_dimensions(width, height));
        debug!("Camera intrinsics recomputed for {width}x{height}");
    }

    /// Current intrinsics, if the surface dimensions are known.
    pub fn intrinsics(&self) -> Option<&CameraIntrinsics> {
        self.intrinsics.as_ref()
    }

    /// Compute the head pose for one detection result.
    ///
    /// Returns `None` when no face was detected, the solver failed to
    /// converge, or calibration is not yet available. Only the first
    /// detected face is used.
    pub fn calculate(&self, detection: &DetectionResult) -> Option<FacePose> {
        let Some(intrinsics) = self.intrinsics else {
            trace!("Pose requested before canvas dimensions are known");
            return None;
        };
        let (width, height) = self.canvas?;

        let landmarks = detection.faces.first()?;
        let image_points = select_face_points(landmarks, width, height);
        if image_points.is_empty() {
            trace!("No usable face landmarks this frame");
            return None;
        }

        let solution =
            self.backend
                .solve(&self.model_points, &image_points, &intrinsics, &self.distortion)?;

        let angles = decompose_degrees(&solution.rotation);
        let pose = FacePose {
            position: Vec3::new(
                solution.translation.x,
                solution.translation.y,
                solution.translation.z,
            ),
            rotation: Vec3::new(angles.pitch, angles.yaw, angles.roll),
        };
        trace!("Calculated face pose: {pose:?}");
        Some(pose)
    }
}
