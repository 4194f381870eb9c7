//! Headless face pose synchronization demo.
//!
//! Runs the full pipeline against a synthetic landmark source: the six
//! canonical reference points are forward-projected through the camera model
//! under a slowly oscillating head pose, fed back through the solver and
//! applied to the scene proxies. Useful for exercising the pipeline without
//! a camera or detector attached.

use anyhow::Result;
use clap::Parser;
use face_pose_sync::{
    app::{LandmarkSource, SourcePoll, TrackingApp},
    camera_model::{project_point, CameraIntrinsics, DistortionCoeffs},
    config::Config,
    constants::{NUM_FACE_LANDMARKS, FACE_POINT_INDICES, REFERENCE_MODEL_POINTS},
    landmark_selection::{DetectionResult, Landmark},
    orbit_controls::OrbitControls,
    render_loop::{FixedRateTicker, SceneRenderer},
    scene_sync::Transform,
};
use log::{debug, info};
use nalgebra::{Rotation3, Vector3};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Number of synthetic frames to run before stopping
    #[arg(short, long, default_value = "300")]
    frames: usize,

    /// Drop the detection on every Nth frame to simulate tracking loss
    #[arg(long, default_value = "0")]
    dropout: usize,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Synthetic detector: oscillates the head and projects the reference model
/// into normalized landmark coordinates.
struct SyntheticSource {
    width: f64,
    height: f64,
    frame: usize,
    total: usize,
    dropout: usize,
}

impl SyntheticSource {
    fn new(width: f64, height: f64, total: usize, dropout: usize) -> Self {
        Self {
            width,
            height,
            frame: 0,
            total,
            dropout,
        }
    }

    fn detection_for_frame(&self, frame: usize) -> DetectionResult {
        let t = frame as f64 / 60.0;
        let rotation = Rotation3::from_euler_angles(
            0.15 * (t * 0.7).sin(),
            0.30 * t.sin(),
            0.05 * (t * 1.3).cos(),
        );
        let translation = Vector3::new(2.0 * (t * 0.5).sin(), 0.0, 45.0);

        let intrinsics = CameraIntrinsics::from_dimensions(self.width, self.height);
        let distortion = DistortionCoeffs::calibrated();

        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); NUM_FACE_LANDMARKS];
        for (model_point, &idx) in REFERENCE_MODEL_POINTS.iter().zip(FACE_POINT_INDICES.iter()) {
            let world = Vector3::new(model_point[0], model_point[1], model_point[2]);
            let projected = project_point(&(rotation * world + translation), &intrinsics, &distortion);
            landmarks[idx] = Landmark::new(projected.x / self.width, projected.y / self.height, 0.0);
        }

        DetectionResult { faces: vec![landmarks] }
    }
}

impl LandmarkSource for SyntheticSource {
    fn start(&mut self) -> face_pose_sync::Result<()> {
        info!(
            "Synthetic landmark source started ({}x{}, {} frames)",
            self.width, self.height, self.total
        );
        Ok(())
    }

    fn poll(&mut self) -> face_pose_sync::Result<SourcePoll> {
        if self.frame >= self.total {
            return Ok(SourcePoll::Closed);
        }
        let frame = self.frame;
        self.frame += 1;

        if self.dropout > 0 && frame % self.dropout == self.dropout - 1 {
            return Ok(SourcePoll::Detection(DetectionResult::empty()));
        }
        Ok(SourcePoll::Detection(self.detection_for_frame(frame)))
    }

    fn stop(&mut self) {
        info!("Synthetic landmark source stopped");
    }
}

/// Renderer stand-in that reports proxy transforms through the log.
struct LogRenderer {
    frame: usize,
}

impl SceneRenderer for LogRenderer {
    fn render(&mut self, head: &Transform, tool: &Transform, orbit: &OrbitControls) -> face_pose_sync::Result<()> {
        self.frame += 1;
        if self.frame % 30 == 0 {
            info!(
                "frame {:5}: head rot ({:7.2}, {:7.2}, {:7.2})°  tool pos ({:5.2}, {:5.2}, {:5.2})  orbit dist {:.2}",
                self.frame,
                head.rotation.x,
                head.rotation.y,
                head.rotation.z,
                tool.position.x,
                tool.position.y,
                tool.position.z,
                orbit.distance()
            );
        } else {
            debug!("frame {}: head rot {:?}", self.frame, head.rotation);
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        info!("Renderer shut down after {} frames", self.frame);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Face Pose Synchronization - headless demo");

    let config = if let Some(path) = &args.config {
        info!("Loading configuration from: {path}");
        Config::from_file(path)?
    } else {
        Config::default()
    };
    config.validate()?;

    let source = SyntheticSource::new(
        f64::from(config.capture.width),
        f64::from(config.capture.height),
        args.frames,
        args.dropout,
    );
    let ticker = FixedRateTicker::new(config.display.target_fps);
    let renderer = LogRenderer { frame: 0 };

    let mut app = TrackingApp::new(&config, source, ticker, renderer)?;
    app.run()?;

    Ok(())
}
