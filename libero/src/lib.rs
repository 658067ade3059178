// LIBERO task authoring
// Scenes, task registration, BDDL generation and the teleoperation validation loop

pub mod cli;
pub mod config;
pub mod scene;
pub mod sim;
pub mod task;
pub mod teleop;

pub use config::{ConfigError, LiberoConfig};
pub use scene::{SceneError, SceneRegistry, SceneTemplate, SceneType};
pub use sim::{Action, ReplaySimulator, SimError, Simulator, WorldSnapshot};
pub use task::{TaskError, TaskInfo, TaskRegistry};
pub use teleop::{TeleopError, TeleopEvent, TeleopLimits, TeleopReport, TeleopSession};
