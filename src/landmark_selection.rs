//! Landmark subset selection.
//!
//! The external detector delivers a fixed-length array of normalized 3D
//! landmarks per detected face. Pose estimation only needs six canonical
//! points (nose tip, eye outer corners, mouth corners, chin); this module
//! extracts them and converts them to pixel coordinates for the current
//! observation surface.

use crate::constants::FACE_POINT_INDICES;
use nalgebra::Vector2;

/// A single normalized facial landmark as produced by the detector.
///
/// `x` and `y` are in `[0, 1]` image-relative coordinates, `z` is relative
/// depth. Landmarks are recreated every frame and read-only to this crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One detector result: zero or more faces, each a full landmark array.
/// Only the first face is used for pose estimation.
#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    pub faces: Vec<Vec<Landmark>>,
}

impl DetectionResult {
    /// Result carrying no faces
    pub fn empty() -> Self {
        Self { faces: Vec::new() }
    }
}

/// Extract the six canonical tracking points as 2D pixel coordinates.
///
/// Returns the points in canonical order, or an empty vector when the
/// landmark array is empty or shorter than the highest canonical index.
/// Callers must treat an empty result as "no face detected".
pub fn select_face_points(landmarks: &[Landmark], width: f64, height: f64) -> Vec<Vector2<f64>> {
    let required = FACE_POINT_INDICES.iter().copied().max().unwrap_or(0) + 1;
    if landmarks.len() < required {
        return Vec::new();
    }

    FACE_POINT_INDICES
        .iter()
        .map(|&idx| {
            let lm = &landmarks[idx];
            Vector2::new(lm.x * width, lm.y * height)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_FACE_LANDMARKS;

    fn full_mesh() -> Vec<Landmark> {
        (0..NUM_FACE_LANDMARKS)
            .map(|i| Landmark::new(i as f64 / 1000.0, i as f64 / 2000.0, 0.0))
            .collect()
    }

    #[test]
    fn test_selects_canonical_order() {
        let landmarks = full_mesh();
        let points = select_face_points(&landmarks, 640.0, 480.0);

        assert_eq!(points.len(), 6);
        for (point, &idx) in points.iter().zip(FACE_POINT_INDICES.iter()) {
            assert_eq!(point.x, landmarks[idx].x * 640.0);
            assert_eq!(point.y, landmarks[idx].y * 480.0);
        }
    }

    #[test]
    fn test_empty_landmarks() {
        assert!(select_face_points(&[], 640.0, 480.0).is_empty());
    }

    #[test]
    fn test_truncated_landmarks() {
        // Shorter than the highest canonical index (291)
        let landmarks: Vec<Landmark> = (0..100).map(|_| Landmark::new(0.5, 0.5, 0.0)).collect();
        assert!(select_face_points(&landmarks, 640.0, 480.0).is_empty());
    }

    #[test]
    fn test_pure_function() {
        let landmarks = full_mesh();
        let first = select_face_points(&landmarks, 640.0, 480.0);
        let second = select_face_points(&landmarks, 640.0, 480.0);
        assert_eq!(first, second);
    }
}
