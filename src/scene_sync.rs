//! Scene proxy synchronization.
//!
//! Owns the persistent head and tool transforms read by the external
//! renderer. Each invocation blends the head orientation toward the latest
//! solved pose and applies the user's tool command verbatim; a frame without
//! a pose leaves the head exactly where it was (no snap back to defaults).

use crate::constants::{DEFAULT_TOOL_POSITION, SCENE_ANCHOR_Y};
use crate::pose_estimation::{FacePose, Vec3};
use crate::smoothing::ExponentialSmoother;

/// Persistent position/rotation state of a drawn object.
///
/// Rotation components are degrees, matching the pose pipeline output.
/// Instances are mutated in place once per frame and never replaced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// The user's desired tool placement, updated asynchronously by the UI and
/// read once per frame. `rotation` is an explicit override; when absent the
/// tool mirrors the head orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolCommand {
    pub position: Vec3,
    pub rotation: Option<Vec3>,
}

impl Default for ToolCommand {
    fn default() -> Self {
        let [x, y, z] = DEFAULT_TOOL_POSITION;
        Self {
            position: Vec3::new(x, y, z),
            rotation: None,
        }
    }
}

/// Synchronizes the head and tool proxies against pose updates and user tool
/// commands.
pub struct SceneSync {
    head: Transform,
    tool: Transform,
    tool_command: ToolCommand,
    smoother: ExponentialSmoother,
    tracking: bool,
}

impl SceneSync {
    /// Create the proxies at their scene anchors.
    ///
    /// `alpha` is the single orientation smoothing weight in `(0, 1]`.
    pub fn new(alpha: f64) -> Self {
        let command = ToolCommand::default();
        let mut sync = Self {
            head: Transform {
                position: Vec3::new(0.0, SCENE_ANCHOR_Y, 0.0),
                rotation: Vec3::default(),
            },
            tool: Transform::default(),
            tool_command: command,
            smoother: ExponentialSmoother::new(alpha),
            tracking: false,
        };
        sync.apply_tool_command();
        sync
    }

    /// Replace the tool command used on subsequent frames.
    pub fn set_tool_command(&mut self, command: ToolCommand) {
        self.tool_command = command;
    }

    pub fn head(&self) -> &Transform {
        &self.head
    }

    pub fn tool(&self) -> &Transform {
        &self.tool
    }

    /// Whether at least one valid pose has been applied this session.
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Apply one frame of synchronization.
    ///
    /// With a pose: the head orientation is smoothed toward it (head position
    /// stays anchored) and the tool mirrors the head unless the command
    /// carries a rotation override. Without a pose the head holds its last
    /// orientation. The tool position always follows the latest command.
    pub fn apply(&mut self, pose: Option<&FacePose>) {
        if let Some(pose) = pose {
            self.smoother.step(&mut self.head.rotation, &pose.rotation);
            self.tracking = true;
        }
        self.apply_tool_command();
    }

    fn apply_tool_command(&mut self) {
        self.tool.position = Vec3::new(
            self.tool_command.position.x,
            // The tool shares the head's elevated anchor.
            self.tool_command.position.y + SCENE_ANCHOR_Y,
            self.tool_command.position.z,
        );
        self.tool.rotation = self.tool_command.rotation.unwrap_or(self.head.rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SMOOTHING_ALPHA;

    fn pose(rx: f64, ry: f64, rz: f64) -> FacePose {
        FacePose {
            position: Vec3::new(0.0, 0.0, 45.0),
            rotation: Vec3::new(rx, ry, rz),
        }
    }

    #[test]
    fn test_initial_anchors() {
        let sync = SceneSync::new(DEFAULT_SMOOTHING_ALPHA);
        assert_eq!(sync.head().position, Vec3::new(0.0, SCENE_ANCHOR_Y, 0.0));
        assert_eq!(sync.tool().position, Vec3::new(1.5, SCENE_ANCHOR_Y, 0.0));
        assert!(!sync.is_tracking());
    }

    #[test]
    fn test_null_pose_leaves_proxies_unchanged() {
        let mut sync = SceneSync::new(DEFAULT_SMOOTHING_ALPHA);
        sync.apply(Some(&pose(10.0, -5.0, 2.0)));
        let head_before = *sync.head();
        let tool_before = *sync.tool();

        sync.apply(None);
        assert_eq!(*sync.head(), head_before);
        assert_eq!(*sync.tool(), tool_before);
    }

    #[test]
    fn test_head_position_never_follows_pose() {
        let mut sync = SceneSync::new(DEFAULT_SMOOTHING_ALPHA);
        for _ in 0..10 {
            sync.apply(Some(&pose(10.0, 10.0, 10.0)));
        }
        assert_eq!(sync.head().position, Vec3::new(0.0, SCENE_ANCHOR_Y, 0.0));
    }

    #[test]
    fn test_smoothing_converges_toward_target() {
        let mut sync = SceneSync::new(0.2);
        let target = pose(20.0, -10.0, 5.0);

        sync.apply(Some(&target));
        let first_err = (sync.head().rotation.x - 20.0).abs();
        for _ in 0..49 {
            sync.apply(Some(&target));
        }
        let final_err = (sync.head().rotation.x - 20.0).abs();
        assert!(final_err < first_err);
        assert!(final_err < 1e-3);
    }

    #[test]
    fn test_tool_mirrors_head_rotation() {
        let mut sync = SceneSync::new(0.5);
        sync.apply(Some(&pose(8.0, 4.0, -2.0)));
        assert_eq!(sync.tool().rotation, sync.head().rotation);
    }

    #[test]
    fn test_rotation_override_wins_outright() {
        let mut sync = SceneSync::new(0.5);
        sync.set_tool_command(ToolCommand {
            position: Vec3::new(2.0, 0.5, -1.0),
            rotation: Some(Vec3::new(90.0, 0.0, 45.0)),
        });
        sync.apply(Some(&pose(8.0, 4.0, -2.0)));

        assert_eq!(sync.tool().rotation, Vec3::new(90.0, 0.0, 45.0));
        assert_ne!(sync.tool().rotation, sync.head().rotation);
    }

    #[test]
    fn test_tool_command_independent_of_pose() {
        let command = ToolCommand {
            position: Vec3::new(-1.0, 0.25, 2.0),
            rotation: Some(Vec3::new(10.0, 20.0, 30.0)),
        };

        let mut with_pose = SceneSync::new(0.5);
        with_pose.set_tool_command(command);
        with_pose.apply(Some(&pose(5.0, 5.0, 5.0)));

        let mut without_pose = SceneSync::new(0.5);
        without_pose.set_tool_command(command);
        without_pose.apply(None);

        assert_eq!(with_pose.tool().position, without_pose.tool().position);
        assert_eq!(with_pose.tool().rotation, without_pose.tool().rotation);
    }

    #[test]
    fn test_tracking_state_transitions() {
        let mut sync = SceneSync::new(0.5);
        sync.apply(None);
        assert!(!sync.is_tracking());
        sync.apply(Some(&pose(1.0, 1.0, 1.0)));
        assert!(sync.is_tracking());
        sync.apply(None);
        assert!(sync.is_tracking());
    }
}
