//! CLI context - shared state for all commands

use crate::config::{resolve_config_path, ConfigError, LiberoConfig};
use crate::scene::{SceneError, SceneRegistry};
use crate::teleop::TeleopLimits;
use bddl::PredicateRegistry;
use std::path::PathBuf;

pub struct CliContext {
    pub config_path: PathBuf,
    pub config: LiberoConfig,
    pub output_format: super::OutputFormat,
    /// Suppress status messages
    pub quiet: bool,
    pub verbose: bool,
}

impl CliContext {
    pub const DEFAULT_CONFIG_PATHS: [&'static str; 3] =
        ["../config/libero.toml", "config/libero.toml", "libero.toml"];

    pub fn new(config_path: PathBuf) -> Result<Self, ConfigError> {
        let config = LiberoConfig::load(&config_path)?;
        Ok(Self::from_config(config_path, config))
    }

    /// First existing default path, otherwise built-in defaults.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        for path in Self::DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from) {
            if path.exists() {
                return Self::new(path);
            }
        }
        Ok(Self::from_config(PathBuf::from("libero.toml"), LiberoConfig::default()))
    }

    pub fn from_config(config_path: PathBuf, config: LiberoConfig) -> Self {
        Self {
            config_path,
            config,
            output_format: super::OutputFormat::Table,
            quiet: false,
            verbose: false,
        }
    }

    /// Built-in scenes plus every file listed under `[scenes]`.
    pub fn scene_registry(&self) -> Result<SceneRegistry, SceneError> {
        let mut scenes = SceneRegistry::with_builtins();
        for file in &self.config.scenes.files {
            let added = scenes.load_toml(self.resolve(file))?;
            self.debug(&format!("loaded {} scene(s) from {}", added.len(), file.display()));
        }
        Ok(scenes)
    }

    pub fn predicate_registry(&self) -> PredicateRegistry {
        PredicateRegistry::with_builtins()
    }

    pub fn teleop_limits(&self) -> TeleopLimits {
        TeleopLimits {
            max_successes: self.config.teleop.max_successes,
            max_steps_per_episode: self.config.teleop.max_steps_per_episode,
        }
    }

    /// Relative paths in the config are taken relative to the config file.
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        resolve_config_path(&self.config_path, path)
    }

    /// Print status message (respects quiet mode)
    pub fn status(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    /// Print verbose message (only in verbose mode)
    pub fn debug(&self, message: &str) {
        if self.verbose {
            eprintln!("[DEBUG] {}", message);
        }
    }
}
