// Configuration sections of `libero.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LiberoConfig {
    pub generation: GenerationConfig,
    pub scenes: ScenesConfig,
    pub teleop: TeleopConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Default folder for `libero generate`
    pub output_dir: PathBuf,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("bddl_files"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenesConfig {
    /// Scene TOML files registered after the built-in scenes
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeleopConfig {
    pub max_successes: Option<usize>,
    pub max_steps_per_episode: Option<usize>,
    /// Passed through to the simulator backend
    pub robot: String,
    pub device: String,
    /// End-effector translation per console command, in metres
    pub step_size: f64,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            max_successes: None,
            max_steps_per_episode: None,
            robot: "Panda".to_string(),
            device: "console".to_string(),
            step_size: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
