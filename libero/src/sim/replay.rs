// Replays recorded frames in order, ignoring the operator's actions

use super::snapshot::{SnapshotWorld, WorldSnapshot};
use super::{Action, SimError, Simulator};
use bddl::World;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordingFile {
    Frames(Vec<WorldSnapshot>),
    Wrapped {
        #[serde(default)]
        robot: Option<String>,
        frames: Vec<WorldSnapshot>,
    },
}

/// Plays one recorded episode; every `step` advances one frame until the last.
#[derive(Debug, Clone)]
pub struct ReplaySimulator {
    frames: Vec<SnapshotWorld>,
    cursor: usize,
    robot: Option<String>,
}

impl ReplaySimulator {
    pub fn new(frames: Vec<WorldSnapshot>) -> Result<Self, SimError> {
        if frames.is_empty() {
            return Err(SimError::EmptyRecording);
        }
        let frames = frames
            .into_iter()
            .map(WorldSnapshot::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            frames,
            cursor: 0,
            robot: None,
        })
    }

    /// Loads a JSON recording: either a list of frames or
    /// `{"robot": "Panda", "frames": [...]}` with `robot` optional.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RecordingFile = serde_json::from_str(&text).map_err(|source| SimError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let (robot, frames) = match file {
            RecordingFile::Frames(frames) => (None, frames),
            RecordingFile::Wrapped { robot, frames } => (robot, frames),
        };
        info!(path = %path.display(), frames = frames.len(), robot = ?robot, "loaded recording");
        let mut sim = Self::new(frames)?;
        sim.robot = robot;
        Ok(sim)
    }

    /// Binds the session robot. A recording that names a different robot
    /// cannot stand in for it.
    pub fn with_robot(mut self, robot: &str) -> Result<Self, SimError> {
        match &self.robot {
            Some(recorded) if !recorded.eq_ignore_ascii_case(robot) => Err(SimError::RobotMismatch {
                recorded: recorded.clone(),
                requested: robot.to_string(),
            }),
            _ => {
                self.robot = Some(robot.to_string());
                Ok(self)
            }
        }
    }

    pub fn robot(&self) -> Option<&str> {
        self.robot.as_deref()
    }

    pub fn frame_index(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Simulator for ReplaySimulator {
    fn reset(&mut self) -> Result<(), SimError> {
        self.cursor = 0;
        Ok(())
    }

    fn step(&mut self, action: &Action) -> Result<(), SimError> {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        }
        debug!(frame = self.cursor, ?action, "replay step");
        Ok(())
    }

    fn world(&self) -> &dyn World {
        &self.frames[self.cursor]
    }

    fn is_exhausted(&self) -> bool {
        self.cursor + 1 >= self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_recording(dir: &Path, json: &str) -> std::path::PathBuf {
        let path = dir.join("recording.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_robot_binds_to_unlabelled_recording() {
        let sim = ReplaySimulator::new(vec![WorldSnapshot::default()]).unwrap();
        assert_eq!(sim.robot(), None);
        let sim = sim.with_robot("Panda").unwrap();
        assert_eq!(sim.robot(), Some("Panda"));
    }

    #[test]
    fn test_recorded_robot_must_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_recording(dir.path(), r#"{"robot": "Panda", "frames": [{}]}"#);

        let sim = ReplaySimulator::load(&path).unwrap();
        assert_eq!(sim.robot(), Some("Panda"));
        assert!(sim.clone().with_robot("panda").is_ok());
        match sim.with_robot("UR5e") {
            Err(SimError::RobotMismatch { recorded, requested }) => {
                assert_eq!(recorded, "Panda");
                assert_eq!(requested, "UR5e");
            }
            other => panic!("unexpected {:?}", other.map(|s| s.robot().map(str::to_string))),
        }
    }
}
