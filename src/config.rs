//! Configuration management for the face pose synchronization application

use crate::constants::{
    DEFAULT_CAPTURE_HEIGHT, DEFAULT_CAPTURE_WIDTH, DEFAULT_SMOOTHING_ALPHA, DEFAULT_TARGET_FPS,
    PNP_MAX_ITERATIONS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture negotiation
    pub capture: CaptureConfig,

    /// Pose smoothing
    pub smoothing: SmoothingConfig,

    /// PnP solver tuning
    pub solver: SolverConfig,

    /// Render loop settings
    pub display: DisplayConfig,
}

/// Requested camera capture resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
}

/// Orientation smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Blend weight toward each new pose, in (0, 1]. This is the single
    /// smoothing constant used everywhere; 1.0 disables smoothing.
    pub alpha: f64,
}

/// Iterative solver parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub max_iterations: usize,
}

/// Render loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Target framerate for the headless frame ticker
    pub target_fps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            smoothing: SmoothingConfig::default(),
            solver: SolverConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CAPTURE_WIDTH,
            height: DEFAULT_CAPTURE_HEIGHT,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: PNP_MAX_ITERATIONS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(Error::ConfigError(
                "Capture dimensions must be greater than 0".to_string(),
            ));
        }
        if !(self.smoothing.alpha > 0.0 && self.smoothing.alpha <= 1.0) {
            return Err(Error::ConfigError(
                "Smoothing alpha must be in (0, 1]".to_string(),
            ));
        }
        if self.solver.max_iterations == 0 {
            return Err(Error::ConfigError(
                "Solver iteration limit must be greater than 0".to_string(),
            ));
        }
        if self.display.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }
        Ok(())
    }
}
