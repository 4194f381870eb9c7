//! Perspective-n-Point solving.
//!
//! Recovers the camera-relative rigid transform of the face reference model
//! from six 2D-3D point correspondences. The backend is an explicit trait so
//! the pose calculator never depends on ambient global state; the default
//! implementation is a Levenberg-Marquardt refinement over axis-angle
//! rotation plus translation, seeded from a closed-form coarse guess and
//! solved fresh on every call.

use crate::camera_model::{project_point, CameraIntrinsics, DistortionCoeffs};
use crate::constants::PNP_MAX_ITERATIONS;
use log::debug;
use nalgebra::{Matrix3, Rotation3, SMatrix, SVector, Vector2, Vector3, Vector6};

/// Number of point correspondences required by the face model
pub const NUM_CORRESPONDENCES: usize = 6;

const NUM_RESIDUALS: usize = 2 * NUM_CORRESPONDENCES;

/// A successful rigid-transform solve.
#[derive(Debug, Clone, Copy)]
pub struct PnpSolution {
    /// World-to-camera rotation
    pub rotation: Matrix3<f64>,
    /// World-to-camera translation
    pub translation: Vector3<f64>,
}

/// A PnP-capable numeric backend.
///
/// Implementations must be stateless between calls apart from fixed tuning
/// parameters; every invocation is an independent solve. A `None` return
/// means the solve did not converge and the frame's pose must be discarded.
pub trait PnpBackend: Send + Sync {
    fn solve(
        &self,
        object_points: &[Vector3<f64>],
        image_points: &[Vector2<f64>],
        intrinsics: &CameraIntrinsics,
        distortion: &DistortionCoeffs,
    ) -> Option<PnpSolution>;
}

/// Iterative reprojection-error minimizer.
pub struct IterativePnp {
    max_iterations: usize,
}

impl IterativePnp {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

impl Default for IterativePnp {
    fn default() -> Self {
        Self::new(PNP_MAX_ITERATIONS)
    }
}

impl PnpBackend for IterativePnp {
    fn solve(
        &self,
        object_points: &[Vector3<f64>],
        image_points: &[Vector2<f64>],
        intrinsics: &CameraIntrinsics,
        distortion: &DistortionCoeffs,
    ) -> Option<PnpSolution> {
        if object_points.len() != NUM_CORRESPONDENCES || image_points.len() != NUM_CORRESPONDENCES {
            debug!(
                "PnP solve refused: expected {} correspondences, got {}/{}",
                NUM_CORRESPONDENCES,
                object_points.len(),
                image_points.len()
            );
            return None;
        }

        let mut state = initial_guess(object_points, image_points, intrinsics)?;
        let mut cost = residuals(&state, object_points, image_points, intrinsics, distortion)
            .map(|r| r.norm_squared())?;
        let mut lambda = 1e-3;

        for _ in 0..self.max_iterations {
            if cost < 1e-16 {
                break;
            }

            let r = residuals(&state, object_points, image_points, intrinsics, distortion)?;
            let jac = numeric_jacobian(&state, object_points, image_points, intrinsics, distortion)?;

            let jtj = jac.transpose() * jac;
            let jtr = jac.transpose() * r;

            // Damped normal equations; raise lambda until the system is
            // positive definite and the step reduces the cost. A fully
            // stalled search means we are at a minimum already.
            let mut improved = false;
            while lambda < 1e12 {
                let mut damped = jtj;
                for i in 0..6 {
                    damped[(i, i)] += lambda * jtj[(i, i)].max(1e-12);
                }

                let Some(chol) = damped.cholesky() else {
                    lambda *= 10.0;
                    continue;
                };
                let delta: Vector6<f64> = chol.solve(&(-jtr));
                let candidate = state + delta;

                let Some(candidate_residuals) =
                    residuals(&candidate, object_points, image_points, intrinsics, distortion)
                else {
                    lambda *= 10.0;
                    continue;
                };
                let candidate_cost = candidate_residuals.norm_squared();

                if candidate_cost < cost {
                    state = candidate;
                    cost = candidate_cost;
                    lambda = (lambda / 10.0).max(1e-12);
                    improved = delta.norm() >= 1e-12;
                    break;
                }
                lambda *= 10.0;
            }

            if !improved {
                break;
            }
        }

        if !cost.is_finite() {
            debug!("PnP solve produced non-finite cost");
            return None;
        }

        let rotation = Rotation3::from_scaled_axis(state.fixed_rows::<3>(0).into_owned());
        Some(PnpSolution {
            rotation: rotation.matrix().clone_owned(),
            translation: state.fixed_rows::<3>(3).into_owned(),
        })
    }
}

/// Coarse alignment seed: identity rotation, depth from the ratio of model
/// spread to normalized image spread, translation from the centroids.
fn initial_guess(
    object_points: &[Vector3<f64>],
    image_points: &[Vector2<f64>],
    intrinsics: &CameraIntrinsics,
) -> Option<Vector6<f64>> {
    let n = object_points.len() as f64;

    let normalized: Vec<Vector2<f64>> = image_points
        .iter()
        .map(|p| {
            Vector2::new(
                (p.x - intrinsics.cx) / intrinsics.focal_length,
                (p.y - intrinsics.cy) / intrinsics.focal_length,
            )
        })
        .collect();

    let obj_centroid: Vector3<f64> = object_points.iter().sum::<Vector3<f64>>() / n;
    let img_centroid: Vector2<f64> = normalized.iter().sum::<Vector2<f64>>() / n;

    let obj_spread: f64 = object_points
        .iter()
        .map(|p| (p.xy() - obj_centroid.xy()).norm())
        .sum::<f64>()
        / n;
    let img_spread: f64 = normalized.iter().map(|p| (p - img_centroid).norm()).sum::<f64>() / n;

    if img_spread < 1e-9 || obj_spread < 1e-9 {
        debug!("PnP initial guess degenerate (collapsed point spread)");
        return None;
    }

    let depth = obj_spread / img_spread;
    let translation = Vector3::new(
        img_centroid.x * depth - obj_centroid.x,
        img_centroid.y * depth - obj_centroid.y,
        depth - obj_centroid.z,
    );

    let mut state = Vector6::zeros();
    state.fixed_rows_mut::<3>(3).copy_from(&translation);
    Some(state)
}

/// Reprojection residual vector for a state `[rx, ry, rz, tx, ty, tz]`.
/// `None` when any residual is non-finite (point behind the camera or a
/// diverged state).
fn residuals(
    state: &Vector6<f64>,
    object_points: &[Vector3<f64>],
    image_points: &[Vector2<f64>],
    intrinsics: &CameraIntrinsics,
    distortion: &DistortionCoeffs,
) -> Option<SVector<f64, NUM_RESIDUALS>> {
    let rotation = Rotation3::from_scaled_axis(state.fixed_rows::<3>(0).into_owned());
    let translation = state.fixed_rows::<3>(3).into_owned();

    let mut r = SVector::<f64, NUM_RESIDUALS>::zeros();
    for (i, (obj, img)) in object_points.iter().zip(image_points.iter()).enumerate() {
        let camera_point = rotation * obj + translation;
        let projected = project_point(&camera_point, intrinsics, distortion);
        r[2 * i] = projected.x - img.x;
        r[2 * i + 1] = projected.y - img.y;
    }

    r.iter().all(|v| v.is_finite()).then_some(r)
}

/// Central-difference Jacobian of the residual vector.
fn numeric_jacobian(
    state: &Vector6<f64>,
    object_points: &[Vector3<f64>],
    image_points: &[Vector2<f64>],
    intrinsics: &CameraIntrinsics,
    distortion: &DistortionCoeffs,
) -> Option<SMatrix<f64, NUM_RESIDUALS, 6>> {
    let mut jac = SMatrix::<f64, NUM_RESIDUALS, 6>::zeros();

    for j in 0..6 {
        let h = 1e-6 * state[j].abs().max(1.0);
        let mut forward = *state;
        let mut backward = *state;
        forward[j] += h;
        backward[j] -= h;

        let rf = residuals(&forward, object_points, image_points, intrinsics, distortion)?;
        let rb = residuals(&backward, object_points, image_points, intrinsics, distortion)?;
        jac.set_column(j, &((rf - rb) / (2.0 * h)));
    }

    Some(jac)
}
