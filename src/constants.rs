//! Constants used throughout the application

/// Number of landmarks in a refined face mesh detection result
pub const NUM_FACE_LANDMARKS: usize = 478;

/// Indices of the six canonical tracking points within the full landmark
/// array: nose tip, left eye outer corner, right eye outer corner,
/// left mouth corner, right mouth corner, chin.
pub const FACE_POINT_INDICES: [usize; 6] = [1, 33, 263, 61, 291, 199];

/// 3D reference positions of the six canonical points on an average face,
/// in face-centered millimeter-equivalent units, same order as
/// [`FACE_POINT_INDICES`].
pub const REFERENCE_MODEL_POINTS: [[f64; 3]; 6] = [
    [0.0, -1.126_865, 7.475_604],
    [-4.445_859, 2.663_991, 3.173_422],
    [4.445_859, 2.663_991, 3.173_422],
    [-2.456_206, -4.342_621, 4.283_884],
    [2.456_206, -4.342_621, 4.283_884],
    [0.0, -9.403_378, 4.264_492],
];

/// Focal length as a fraction of the observation surface height
pub const NORMALIZED_FOCAL_Y: f64 = 1.28;

/// Lens distortion coefficients `[k1, k2, p1, p2]` of the pre-characterized
/// camera model
pub const DISTORTION_COEFFS: [f64; 4] = [0.131_802_037_4, -0.155_000_761_2, -0.007_135_040_1, -0.009_674_770_8];

/// Threshold below which the Euler decomposition is treated as singular
pub const EULER_SINGULARITY_EPS: f64 = 1e-6;

/// Empirical pitch recentering offset in radians, calibrated against
/// [`REFERENCE_MODEL_POINTS`]
pub const PITCH_BIAS_RAD: f64 = 3.0;

/// Divisor applied to the recentered pitch
pub const PITCH_SCALE: f64 = 2.0;

/// Epsilon added to projection depth for numerical stability
pub const PROJECTION_EPS: f64 = 1e-9;

/// Iteration cap for the iterative PnP refinement
pub const PNP_MAX_ITERATIONS: usize = 50;

/// Default orientation smoothing weight, in (0, 1]
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.1;

/// Default requested capture resolution
pub const DEFAULT_CAPTURE_WIDTH: u32 = 640;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 480;

/// Default target framerate for the render loop
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Scene anchor height shared by the head and tool proxies
pub const SCENE_ANCHOR_Y: f64 = 1.5;

/// Default tool position relative to the scene anchor
pub const DEFAULT_TOOL_POSITION: [f64; 3] = [1.5, 0.0, 0.0];

/// Orbit control damping factor per frame
pub const ORBIT_DAMPING: f64 = 0.05;

/// Orbit zoom distance bounds
pub const ORBIT_MIN_DISTANCE: f64 = 3.0;
pub const ORBIT_MAX_DISTANCE: f64 = 10.0;
