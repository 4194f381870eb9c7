//! Damped orbit/zoom camera controls.
//!
//! Continuous camera-relative input smoothing advanced once per render
//! frame. The external input layer sets target values; each frame the
//! current values are damped toward them, with zoom distance and polar angle
//! kept inside their limits.

use crate::constants::{ORBIT_DAMPING, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE};

/// Orbit state around the scene anchor.
#[derive(Debug, Clone, Copy)]
pub struct OrbitControls {
    azimuth: f64,
    polar: f64,
    distance: f64,
    target_azimuth: f64,
    target_polar: f64,
    target_distance: f64,
    damping: f64,
}

impl OrbitControls {
    pub fn new(distance: f64) -> Self {
        let distance = distance.clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
        Self {
            azimuth: 0.0,
            polar: std::f64::consts::FRAC_PI_4,
            distance,
            target_azimuth: 0.0,
            target_polar: std::f64::consts::FRAC_PI_4,
            target_distance: distance,
            damping: ORBIT_DAMPING,
        }
    }

    /// Set the desired orbit angles and zoom distance from user input.
    pub fn set_target(&mut self, azimuth: f64, polar: f64, distance: f64) {
        self.target_azimuth = azimuth;
        // Vertical rotation is limited so the camera never goes below ground.
        self.target_polar = polar.clamp(0.0, std::f64::consts::FRAC_PI_2);
        self.target_distance = distance.clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    }

    /// Advance the damped values one frame.
    pub fn update(&mut self) {
        self.azimuth += (self.target_azimuth - self.azimuth) * self.damping;
        self.polar += (self.target_polar - self.polar) * self.damping;
        self.distance += (self.target_distance - self.distance) * self.damping;
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn polar(&self) -> f64 {
        self.polar
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damped_approach() {
        let mut controls = OrbitControls::new(5.0);
        controls.set_target(1.0, 0.5, 8.0);

        let mut prev = (controls.azimuth() - 1.0).abs();
        for _ in 0..100 {
            controls.update();
            let err = (controls.azimuth() - 1.0).abs();
            assert!(err < prev);
            prev = err;
        }
        assert!(prev < 0.02);
    }

    #[test]
    fn test_distance_clamped() {
        let mut controls = OrbitControls::new(5.0);
        controls.set_target(0.0, 0.0, 100.0);
        for _ in 0..500 {
            controls.update();
        }
        assert!(controls.distance() <= ORBIT_MAX_DISTANCE + 1e-9);

        controls.set_target(0.0, 0.0, 0.1);
        for _ in 0..500 {
            controls.update();
        }
        assert!(controls.distance() >= ORBIT_MIN_DISTANCE - 1e-9);
    }

    #[test]
    fn test_polar_limited_to_upper_hemisphere() {
        let mut controls = OrbitControls::new(5.0);
        controls.set_target(0.0, 3.0, 5.0);
        for _ in 0..500 {
            controls.update();
        }
        assert!(controls.polar() <= std::f64::consts::FRAC_PI_2 + 1e-9);
    }
}
