//! Session wiring for the tracking application.
//!
//! Connects the external landmark source to the pose pipeline and the render
//! loop on one cooperative timeline: detection results are processed
//! synchronously as they are polled, the render loop reads the last
//! completed pose every frame, and teardown drops any result that arrives
//! after cancellation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::landmark_selection::DetectionResult;
use crate::pnp_solver::IterativePnp;
use crate::pose_estimation::{FacePose, PoseCalculator};
use crate::render_loop::{FrameTicker, RenderLoop, SceneRenderer};
use crate::scene_sync::{SceneSync, ToolCommand};
use log::{info, warn};

/// One poll of the external detector.
#[derive(Debug)]
pub enum SourcePoll {
    /// A detection completed since the last poll (possibly with no faces)
    Detection(DetectionResult),
    /// No new detection yet; the last pose stays in effect
    Pending,
    /// The upstream frame subscription ended
    Closed,
}

/// Boundary to the external capture + detection collaborators.
///
/// `start` failures are fatal to the session. `stop` must be idempotent and
/// end the upstream frame subscription.
pub trait LandmarkSource {
    fn start(&mut self) -> Result<()>;
    fn poll(&mut self) -> Result<SourcePoll>;
    fn stop(&mut self);
}

/// The assembled tracking session.
pub struct TrackingApp<S: LandmarkSource, T: FrameTicker, R: SceneRenderer> {
    source: S,
    calculator: PoseCalculator,
    scene: SceneSync,
    driver: RenderLoop<T, R>,
    latest_pose: Option<FacePose>,
}

impl<S: LandmarkSource, T: FrameTicker, R: SceneRenderer> TrackingApp<S, T, R> {
    /// Assemble a session from validated configuration and collaborators.
    pub fn new(config: &Config, source: S, ticker: T, renderer: R) -> Result<Self> {
        config.validate()?;
        info!("Initializing face pose synchronization session");

        let mut calculator =
            PoseCalculator::new(Box::new(IterativePnp::new(config.solver.max_iterations)));
        calculator.set_canvas_dimensions(f64::from(config.capture.width), f64::from(config.capture.height));

        Ok(Self {
            source,
            calculator,
            scene: SceneSync::new(config.smoothing.alpha),
            driver: RenderLoop::new(ticker, renderer),
            latest_pose: None,
        })
    }

    /// Forward a resize of the observation surface to the calculator.
    pub fn resize_observation(&mut self, width: f64, height: f64) {
        self.calculator.set_canvas_dimensions(width, height);
    }

    /// Update the user's tool placement for subsequent frames.
    pub fn set_tool_command(&mut self, command: ToolCommand) {
        self.scene.set_tool_command(command);
    }

    /// Handle usable to cancel the session from outside the loop.
    pub fn cancel_handle(&self) -> crate::render_loop::CancelHandle {
        self.driver.cancel_handle()
    }

    /// The computed pose of the most recent detection, for external
    /// observers. `None` when no face was found or the solve failed.
    pub fn latest_pose(&self) -> Option<&FacePose> {
        self.latest_pose.as_ref()
    }

    pub fn scene(&self) -> &SceneSync {
        &self.scene
    }

    /// Run the session until the source closes or the loop is cancelled.
    pub fn run(&mut self) -> Result<()> {
        self.source
            .start()
            .map_err(|e| Error::SourceError(format!("failed to start landmark source: {e}")))?;

        let cancel = self.driver.cancel_handle();
        let source = &mut self.source;
        let calculator = &self.calculator;
        let latest_pose = &mut self.latest_pose;
        let mut source_failure: Option<Error> = None;

        let run_result = self.driver.run(&mut self.scene, |_| {
            if cancel.is_cancelled() {
                // A detection completing after teardown must not touch the
                // proxies.
                return *latest_pose;
            }

            match source.poll() {
                Ok(SourcePoll::Detection(detection)) => {
                    // The whole pipeline runs synchronously inside the
                    // detection handling; last write wins.
                    *latest_pose = calculator.calculate(&detection);
                }
                Ok(SourcePoll::Pending) => {}
                Ok(SourcePoll::Closed) => {
                    info!("Landmark source closed, ending session");
                    cancel.cancel();
                }
                Err(e) => {
                    warn!("Landmark source failed: {e}");
                    source_failure = Some(e);
                    cancel.cancel();
                }
            }
            *latest_pose
        });

        self.source.stop();
        run_result?;

        match source_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_FACE_LANDMARKS;
    use crate::landmark_selection::Landmark;
    use crate::orbit_controls::OrbitControls;
    use crate::render_loop::FrameTicker;
    use crate::scene_sync::Transform;

    struct ScriptedSource {
        script: Vec<SourcePoll>,
        started: bool,
        stopped: bool,
    }

    impl LandmarkSource for ScriptedSource {
        fn start(&mut self) -> Result<()> {
            self.started = true;
            Ok(())
        }

        fn poll(&mut self) -> Result<SourcePoll> {
            if self.script.is_empty() {
                Ok(SourcePoll::Closed)
            } else {
                Ok(self.script.remove(0))
            }
        }

        fn stop(&mut self) {
            self.stopped = true;
        }
    }

    struct UnlimitedTicker;

    impl FrameTicker for UnlimitedTicker {
        fn wait_frame(&mut self) -> bool {
            true
        }
    }

    struct NullRenderer;

    impl SceneRenderer for NullRenderer {
        fn render(&mut self, _: &Transform, _: &Transform, _: &OrbitControls) -> Result<()> {
            Ok(())
        }

        fn shutdown(&mut self) {}
    }

    fn frontal_detection() -> DetectionResult {
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); NUM_FACE_LANDMARKS];
        landmarks[1] = Landmark::new(0.50, 0.52, 0.0);
        landmarks[33] = Landmark::new(0.42, 0.45, 0.0);
        landmarks[263] = Landmark::new(0.58, 0.45, 0.0);
        landmarks[61] = Landmark::new(0.45, 0.60, 0.0);
        landmarks[291] = Landmark::new(0.55, 0.60, 0.0);
        landmarks[199] = Landmark::new(0.50, 0.68, 0.0);
        DetectionResult { faces: vec![landmarks] }
    }

    #[test]
    fn test_session_runs_to_source_close() {
        let source = ScriptedSource {
            script: vec![
                SourcePoll::Detection(frontal_detection()),
                SourcePoll::Pending,
                SourcePoll::Detection(DetectionResult::empty()),
            ],
            started: false,
            stopped: false,
        };
        let mut app =
            TrackingApp::new(&Config::default(), source, UnlimitedTicker, NullRenderer).unwrap();
        app.run().unwrap();

        assert!(app.source.started);
        assert!(app.source.stopped);
        // The final detection carried no face.
        assert!(app.latest_pose().is_none());
        // But the earlier valid pose moved the head.
        assert!(app.scene().is_tracking());
    }

    #[test]
    fn test_tool_command_applied_without_face() {
        let source = ScriptedSource {
            script: vec![SourcePoll::Detection(DetectionResult::empty())],
            started: false,
            stopped: false,
        };
        let mut app =
            TrackingApp::new(&Config::default(), source, UnlimitedTicker, NullRenderer).unwrap();
        app.set_tool_command(ToolCommand {
            position: crate::pose_estimation::Vec3::new(-2.0, 0.0, 1.0),
            rotation: None,
        });
        app.run().unwrap();

        assert_eq!(app.scene().tool().position.x, -2.0);
        assert_eq!(app.scene().tool().position.z, 1.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.smoothing.alpha = 2.0;
        let source = ScriptedSource {
            script: Vec::new(),
            started: false,
            stopped: false,
        };
        assert!(TrackingApp::new(&config, source, UnlimitedTicker, NullRenderer).is_err());
    }
}
