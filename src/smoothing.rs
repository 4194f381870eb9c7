//! Exponential smoothing for orientation streams.

use crate::pose_estimation::Vec3;

/// Component-wise exponential smoother.
///
/// Each update nudges the held value toward the target by the fixed blend
/// weight `alpha` in `(0, 1]`: `value += (target - value) * alpha`. An alpha
/// of 1.0 disables smoothing entirely.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialSmoother {
    alpha: f64,
}

impl ExponentialSmoother {
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Advance `value` one step toward `target`.
    pub fn step(&self, value: &mut Vec3, target: &Vec3) {
        value.x += (target.x - value.x) * self.alpha;
        value.y += (target.y - value.y) * self.alpha;
        value.z += (target.z - value.z) * self.alpha;
    }
}
