//! Continuous render scheduling.
//!
//! The render loop is an explicit scheduler object rather than a closure
//! over mutable captures: it holds the frame ticker, the renderer, the orbit
//! controls and a cancellation token, and is started and stopped through
//! lifecycle methods. Each iteration advances the orbit damping, invokes the
//! scene synchronizer with the latest available pose (which may be unchanged
//! since the previous frame) and submits the scene for drawing.

use crate::error::Result;
use crate::orbit_controls::OrbitControls;
use crate::pose_estimation::FacePose;
use crate::scene_sync::{SceneSync, Transform};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of display refresh signals.
///
/// `wait_frame` suspends until the next refresh and returns `false` when the
/// display is gone, which ends the loop like a cancellation.
pub trait FrameTicker {
    fn wait_frame(&mut self) -> bool;
}

/// The external rendering collaborator.
///
/// Reads the persistent proxy transforms each frame; `shutdown` must release
/// renderer-owned resources and detach any listeners, and must tolerate
/// being called more than once.
pub trait SceneRenderer {
    fn render(&mut self, head: &Transform, tool: &Transform, orbit: &OrbitControls) -> Result<()>;
    fn shutdown(&mut self);
}

/// Cloneable handle used to request loop cancellation.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-frame scheduling loop driving the scene synchronizer and renderer.
pub struct RenderLoop<T: FrameTicker, R: SceneRenderer> {
    ticker: T,
    renderer: R,
    orbit: OrbitControls,
    cancelled: Arc<AtomicBool>,
    shut_down: bool,
}

impl<T: FrameTicker, R: SceneRenderer> RenderLoop<T, R> {
    pub fn new(ticker: T, renderer: R) -> Self {
        Self {
            ticker,
            renderer,
            orbit: OrbitControls::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
            shut_down: false,
        }
    }

    /// Handle that cancels the loop from outside the frame callback.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancelled))
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    /// Run until cancelled or the ticker ends.
    ///
    /// `frame` is invoked once per iteration and must return the latest
    /// available pose; returning the same pose across frames is normal when
    /// no new detection has arrived. Per-frame pipeline failures never reach
    /// this loop: they surface as `None` poses.
    pub fn run<F>(&mut self, scene: &mut SceneSync, mut frame: F) -> Result<()>
    where
        F: FnMut(&mut SceneSync) -> Option<FacePose>,
    {
        info!("Render loop started");
        while !self.cancelled.load(Ordering::SeqCst) {
            if !self.ticker.wait_frame() {
                debug!("Frame ticker ended");
                break;
            }

            self.orbit.update();
            let pose = frame(scene);
            scene.apply(pose.as_ref());
            self.renderer.render(scene.head(), scene.tool(), &self.orbit)?;
        }

        self.shutdown();
        Ok(())
    }

    /// Release renderer resources. Safe to call repeatedly; only the first
    /// call has an effect.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.cancelled.store(true, Ordering::SeqCst);
        self.renderer.shutdown();
        info!("Render loop shut down");
    }
}

impl<T: FrameTicker, R: SceneRenderer> Drop for RenderLoop<T, R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Fixed-rate ticker standing in for a display refresh signal in headless
/// runs.
pub struct FixedRateTicker {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl FixedRateTicker {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            next_deadline: None,
        }
    }
}

impl FrameTicker for FixedRateTicker {
    fn wait_frame(&mut self) -> bool {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        self.next_deadline = Some(deadline.max(now) + self.interval);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SMOOTHING_ALPHA;
    use crate::pose_estimation::Vec3;

    /// Ticker that fires a fixed number of frames.
    struct CountedTicker {
        remaining: usize,
    }

    impl FrameTicker for CountedTicker {
        fn wait_frame(&mut self) -> bool {
            if self.remaining == 0 {
                return false;
            }
            self.remaining -= 1;
            true
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: usize,
        shutdowns: usize,
    }

    impl SceneRenderer for &mut RecordingRenderer {
        fn render(&mut self, _: &Transform, _: &Transform, _: &OrbitControls) -> Result<()> {
            self.frames += 1;
            Ok(())
        }

        fn shutdown(&mut self) {
            self.shutdowns += 1;
        }
    }

    #[test]
    fn test_runs_until_ticker_ends() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = SceneSync::new(DEFAULT_SMOOTHING_ALPHA);
        {
            let mut driver = RenderLoop::new(CountedTicker { remaining: 5 }, &mut renderer);
            driver.run(&mut scene, |_| None).unwrap();
        }
        assert_eq!(renderer.frames, 5);
        assert_eq!(renderer.shutdowns, 1);
    }

    #[test]
    fn test_cancellation_stops_iterations() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = SceneSync::new(DEFAULT_SMOOTHING_ALPHA);
        {
            let mut driver = RenderLoop::new(CountedTicker { remaining: 100 }, &mut renderer);
            let handle = driver.cancel_handle();
            let mut frames = 0;
            driver
                .run(&mut scene, move |_| {
                    frames += 1;
                    if frames == 3 {
                        handle.cancel();
                    }
                    None
                })
                .unwrap();
        }
        // The cancelling frame still renders; no further iteration runs.
        assert_eq!(renderer.frames, 3);
        assert_eq!(renderer.shutdowns, 1);
    }

    #[test]
    fn test_shutdown_idempotent() {
        let mut renderer = RecordingRenderer::default();
        {
            let mut driver = RenderLoop::new(CountedTicker { remaining: 0 }, &mut renderer);
            driver.shutdown();
            driver.shutdown();
            // Drop fires afterwards as well.
        }
        assert_eq!(renderer.shutdowns, 1);
    }

    #[test]
    fn test_latest_pose_applied_every_frame() {
        let mut renderer = RecordingRenderer::default();
        let mut scene = SceneSync::new(0.5);
        let target = FacePose {
            position: Vec3::default(),
            rotation: Vec3::new(10.0, 0.0, 0.0),
        };
        {
            let mut driver = RenderLoop::new(CountedTicker { remaining: 20 }, &mut renderer);
            driver.run(&mut scene, |_| Some(target)).unwrap();
        }
        // Repeated application of the same pose keeps converging on it.
        assert!((scene.head().rotation.x - 10.0).abs() < 1e-4);
    }
}
