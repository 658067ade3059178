//! Configuration for the authoring tool
//!
//! Read from `libero.toml`; every section and key is optional.

pub mod types;

pub use types::*;

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl LiberoConfig {
    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.check()?;
        Ok(config)
    }

    /// Hard errors only; soft problems come from [`LiberoConfig::warnings`].
    pub fn check(&self) -> Result<(), ConfigError> {
        if !(self.teleop.step_size.is_finite() && self.teleop.step_size > 0.0) {
            return Err(ConfigError::Invalid {
                key: "teleop.step_size",
                message: format!("must be a positive number, got {}", self.teleop.step_size),
            });
        }
        if self.teleop.max_steps_per_episode == Some(0) {
            return Err(ConfigError::Invalid {
                key: "teleop.max_steps_per_episode",
                message: "must be at least 1".to_string(),
            });
        }
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::Invalid {
                key: "logging.filter",
                message: e.to_string(),
            });
        }
        Ok(())
    }

    /// Soft problems for a config read from `config_path`. Relative paths are
    /// checked the way the commands use them, see [`resolve_config_path`].
    pub fn warnings(&self, config_path: &Path) -> Vec<String> {
        let mut warnings = Vec::new();
        if !resolve_config_path(config_path, &self.generation.output_dir).is_dir() {
            warnings.push(format!(
                "generation.output_dir {} does not exist; generation will fail until it is created",
                self.generation.output_dir.display()
            ));
        }
        for file in &self.scenes.files {
            if !resolve_config_path(config_path, file).exists() {
                warnings.push(format!("scene file {} not found", file.display()));
            }
        }
        if self.teleop.max_successes == Some(0) {
            warnings.push("teleop.max_successes = 0 ends sessions before the first step".to_string());
        }
        warnings
    }
}

/// Relative paths in a config file are taken relative to that file once it
/// exists, and relative to the working directory otherwise.
pub fn resolve_config_path(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) if config_path.exists() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

pub const CONFIG_TEMPLATE: &str = r#"# LIBERO authoring configuration
# Generated by: libero config init

[generation]
# Must exist before running `libero generate`
output_dir = "bddl_files"

[scenes]
# Extra scene definitions loaded next to the built-in scenes
files = []

[teleop]
robot = "Panda"
device = "console"
step_size = 0.05
# max_successes = 3
# max_steps_per_episode = 500

[logging]
filter = "info"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: LiberoConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, LiberoConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LiberoConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.teleop.robot, "Panda");
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[teleop]\nmax_successes = 2").unwrap();
        let config = LiberoConfig::load(file.path()).unwrap();
        assert_eq!(config.teleop.max_successes, Some(2));
        assert_eq!(config.teleop.step_size, 0.05);
        assert_eq!(config.generation.output_dir, PathBuf::from("bddl_files"));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[teleop]\nstep_size = -1.0").unwrap();
        assert!(matches!(
            LiberoConfig::load(file.path()),
            Err(ConfigError::Invalid { key: "teleop.step_size", .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[teleop]\nunknown = 1").unwrap();
        assert!(matches!(LiberoConfig::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_warnings_resolve_paths_against_the_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bddl_files")).unwrap();
        std::fs::write(dir.path().join("extra.toml"), "").unwrap();
        let config_path = dir.path().join("libero.toml");
        std::fs::write(&config_path, "[scenes]\nfiles = [\"extra.toml\"]\n").unwrap();

        let config = LiberoConfig::load(&config_path).unwrap();
        assert!(config.warnings(&config_path).is_empty(), "{:?}", config.warnings(&config_path));

        std::fs::remove_dir(dir.path().join("bddl_files")).unwrap();
        let warnings = config.warnings(&config_path);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("generation.output_dir bddl_files"));
    }
}
