//! Config command - configuration management

use crate::cli::{CliContext, OutputFormatter};
use crate::config::CONFIG_TEMPLATE;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show only one section (generation, scenes, teleop, logging)
        #[arg(short, long)]
        section: Option<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Write a starter configuration file
    Init {
        /// Destination path
        #[arg(long, default_value = "libero.toml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn execute(ctx: &CliContext, command: ConfigCommand) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    match command {
        ConfigCommand::Show { section } => show_config(ctx, section.as_deref(), &formatter),
        ConfigCommand::Validate => validate_config(ctx, &formatter),
        ConfigCommand::Init { output, force } => init_config(Path::new(&output), force, &formatter),
    }
}

fn show_config(ctx: &CliContext, section: Option<&str>, formatter: &OutputFormatter) -> anyhow::Result<()> {
    let config = &ctx.config;
    if formatter.is_json() {
        let value = match section {
            None => serde_json::to_value(config)?,
            Some("generation") => serde_json::to_value(&config.generation)?,
            Some("scenes") => serde_json::to_value(&config.scenes)?,
            Some("teleop") => serde_json::to_value(&config.teleop)?,
            Some("logging") => serde_json::to_value(&config.logging)?,
            Some(other) => anyhow::bail!("unknown section '{}'", other),
        };
        formatter.json(&value);
        return Ok(());
    }

    if let Some(other) = section.filter(|s| !["generation", "scenes", "teleop", "logging"].contains(s)) {
        anyhow::bail!("unknown section '{}'", other);
    }
    let wants = |name: &str| section.is_none() || section == Some(name);

    formatter.section("Configuration");
    formatter.kv("Config file", &ctx.config_path.display().to_string());

    if wants("generation") {
        formatter.section("Generation");
        formatter.kv("Output dir", &config.generation.output_dir.display().to_string());
    }
    if wants("scenes") {
        formatter.section("Scenes");
        if config.scenes.files.is_empty() {
            formatter.list_item("(built-in scenes only)");
        }
        for file in &config.scenes.files {
            formatter.list_item(&file.display().to_string());
        }
    }
    if wants("teleop") {
        let teleop = &config.teleop;
        let unbounded = || "unbounded".to_string();
        formatter.section("Teleop");
        formatter.kv("Robot", &teleop.robot);
        formatter.kv("Device", &teleop.device);
        formatter.kv("Step size", &teleop.step_size.to_string());
        formatter.kv(
            "Max successes",
            &teleop.max_successes.map_or_else(unbounded, |n| n.to_string()),
        );
        formatter.kv(
            "Max steps per episode",
            &teleop.max_steps_per_episode.map_or_else(unbounded, |n| n.to_string()),
        );
    }
    if wants("logging") {
        formatter.section("Logging");
        formatter.kv("Filter", &config.logging.filter);
    }
    Ok(())
}

fn validate_config(ctx: &CliContext, formatter: &OutputFormatter) -> anyhow::Result<()> {
    ctx.status(&format!("Validating configuration: {}", ctx.config_path.display()));
    ctx.config.check()?;
    let scenes = ctx.scene_registry()?;
    ctx.debug(&format!("{} scene(s) available", scenes.len()));

    let warnings = ctx.config.warnings(&ctx.config_path);
    if warnings.is_empty() {
        formatter.success("Configuration is valid");
    } else {
        formatter.success("Configuration is valid with warnings:");
        for warning in warnings {
            formatter.warning(&warning);
        }
    }
    Ok(())
}

fn init_config(path: &Path, force: bool, formatter: &OutputFormatter) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("file already exists: {}. Use --force to overwrite.", path.display());
    }
    std::fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    formatter.success(&format!("Created configuration file: {}", path.display()));
    Ok(())
}
