//! Face pose synchronization library for driving a 3D proxy scene from a
//! live facial landmark stream.
//!
//! The estimation pipeline consists of:
//! 1. Selecting six canonical points from the per-frame landmark array
//! 2. A `PnP` (Perspective-n-Point) solve against a fixed 3D face model
//! 3. Euler decomposition with gimbal-lock handling and pitch recentering
//! 4. Exponential smoothing applied while synchronizing the persistent head
//!    and tool proxies read by the external renderer
//!
//! Camera acquisition, the landmark-detection model and low-level rendering
//! primitives are external collaborators behind the [`app::LandmarkSource`]
//! and [`render_loop::SceneRenderer`] traits.
//!
//! # Examples
//!
//! ```no_run
//! use face_pose_sync::landmark_selection::DetectionResult;
//! use face_pose_sync::pose_estimation::PoseCalculator;
//! use face_pose_sync::scene_sync::SceneSync;
//!
//! # fn main() {
//! let mut calculator = PoseCalculator::with_default_backend();
//! calculator.set_canvas_dimensions(640.0, 480.0);
//!
//! let mut scene = SceneSync::new(0.1);
//!
//! // Per detection result from the external face mesh:
//! let detection = DetectionResult::empty();
//! let pose = calculator.calculate(&detection);
//!
//! // Per render frame:
//! scene.apply(pose.as_ref());
//! let head = scene.head();
//! println!("head pitch: {:.2}°", head.rotation.x);
//! # }
//! ```

/// Landmark subset selection from the detector's full mesh
pub mod landmark_selection;

/// Camera intrinsics and the distorted pinhole projection model
pub mod camera_model;

/// Perspective-n-Point solver backends
pub mod pnp_solver;

/// Euler angle extraction with gimbal-lock handling
pub mod orientation;

/// The head pose estimation pipeline
pub mod pose_estimation;

/// Exponential smoothing for orientation streams
pub mod smoothing;

/// Persistent scene proxy synchronization
pub mod scene_sync;

/// Damped orbit/zoom camera controls
pub mod orbit_controls;

/// Continuous render scheduling with explicit lifecycle
pub mod render_loop;

/// Session wiring between source, pipeline and render loop
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
