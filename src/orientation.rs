//! Euler angle extraction from solved rotation matrices.
//!
//! Uses the standard XYZ decomposition with an explicit gimbal-lock branch,
//! followed by an empirical pitch recentering calibrated against the face
//! reference model.

use crate::constants::{EULER_SINGULARITY_EPS, PITCH_BIAS_RAD, PITCH_SCALE};
use nalgebra::Matrix3;

/// Pitch/yaw/roll triple. Radians from [`decompose`], degrees from
/// [`decompose_degrees`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Decompose a 3×3 rotation matrix into XYZ Euler angles in radians.
///
/// The matrix is treated as row-major `m[0..9]`; the singularity test is
/// `sy = sqrt(m00² + m10²) < 1e-6`. In the singular (gimbal-lock) case pitch
/// and roll are indistinguishable, so roll is reported as exactly zero.
///
/// Pure function: identical input always yields identical output.
pub fn decompose(rotation: &Matrix3<f64>) -> EulerAngles {
    let sy = (rotation[(0, 0)] * rotation[(0, 0)] + rotation[(1, 0)] * rotation[(1, 0)]).sqrt();

    if sy >= EULER_SINGULARITY_EPS {
        EulerAngles {
            pitch: rotation[(2, 1)].atan2(rotation[(2, 2)]),
            yaw: (-rotation[(2, 0)]).atan2(sy),
            roll: rotation[(1, 0)].atan2(rotation[(0, 0)]),
        }
    } else {
        EulerAngles {
            pitch: (-rotation[(1, 2)]).atan2(rotation[(1, 1)]),
            yaw: (-rotation[(2, 0)]).atan2(sy),
            roll: 0.0,
        }
    }
}

/// Recenter and rescale a raw pitch angle (radians).
///
/// The offset of 3 radians compensates a constant bias introduced by the
/// reference model geometry; keep the constant as-is, it was calibrated
/// against [`crate::constants::REFERENCE_MODEL_POINTS`].
pub fn tune_pitch(pitch: f64) -> f64 {
    let recentered = if pitch > 0.0 {
        pitch - PITCH_BIAS_RAD
    } else {
        pitch + PITCH_BIAS_RAD
    };
    recentered / PITCH_SCALE
}

/// Decompose a rotation matrix into tuned head orientation angles in degrees:
/// pitch is bias-corrected via [`tune_pitch`] before conversion.
pub fn decompose_degrees(rotation: &Matrix3<f64>) -> EulerAngles {
    let raw = decompose(rotation);
    EulerAngles {
        pitch: tune_pitch(raw.pitch).to_degrees(),
        yaw: raw.yaw.to_degrees(),
        roll: raw.roll.to_degrees(),
    }
}
