//! Simulator seam
//!
//! Physics lives outside this crate. The teleoperation loop talks to a
//! [`Simulator`], which advances one control step per [`Action`] and exposes
//! the current frame as a [`bddl::World`] for goal evaluation.

pub mod replay;
pub mod snapshot;

pub use replay::ReplaySimulator;
pub use snapshot::{Articulation, SnapshotObject, SnapshotWorld, WorldSnapshot};

use bddl::World;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("failed to read recording {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse recording {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("recording has no frames")]
    EmptyRecording,

    #[error("object '{object}' has unknown parent '{parent}'")]
    UnknownParent { object: String, parent: String },

    #[error("parent chain of '{0}' is cyclic")]
    CyclicParent(String),

    #[error("contact pair references unknown object '{0}'")]
    UnknownContact(String),

    #[error("recording was made with robot '{recorded}', not '{requested}'")]
    RobotMismatch { recorded: String, requested: String },

    #[error("simulator failure: {0}")]
    Backend(String),
}

/// One operator control command: end-effector deltas plus gripper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub delta_pos: [f64; 3],
    pub delta_rot: [f64; 3],
    /// -1.0 open, 1.0 closed.
    pub gripper: f64,
}

impl Action {
    pub const GRIPPER_OPEN: f64 = -1.0;
    pub const GRIPPER_CLOSED: f64 = 1.0;

    /// Hold still with the gripper open.
    pub fn idle() -> Self {
        Self {
            delta_pos: [0.0; 3],
            delta_rot: [0.0; 3],
            gripper: Self::GRIPPER_OPEN,
        }
    }

    pub fn translate(delta_pos: [f64; 3], gripper: f64) -> Self {
        Self {
            delta_pos,
            delta_rot: [0.0; 3],
            gripper,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::idle()
    }
}

/// A stepped simulation the harness can drive.
pub trait Simulator {
    /// Restore the initial state of a new episode.
    fn reset(&mut self) -> Result<(), SimError>;

    fn step(&mut self, action: &Action) -> Result<(), SimError>;

    /// The current frame.
    fn world(&self) -> &dyn World;

    /// True when the backend cannot produce further frames.
    fn is_exhausted(&self) -> bool {
        false
    }
}
