//! Scenes command - inspect the scene registry

use crate::cli::{CliContext, OutputFormatter};
use crate::scene::SceneTemplate;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum ScenesCommand {
    /// List registered scenes
    List {
        /// Additional scene definition files
        #[arg(long = "scene-file", value_name = "FILE")]
        scene_files: Vec<PathBuf>,
    },

    /// Show one scene: fixtures, objects, regions and initial states
    Show {
        name: String,

        #[arg(long = "scene-file", value_name = "FILE")]
        scene_files: Vec<PathBuf>,
    },
}

pub fn execute(ctx: &CliContext, command: ScenesCommand) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let (ScenesCommand::List { scene_files } | ScenesCommand::Show { scene_files, .. }) = &command;
    let mut scenes = ctx.scene_registry()?;
    for file in scene_files {
        scenes.load_toml(file)?;
    }

    match &command {
        ScenesCommand::List { .. } => {
            if formatter.is_json() {
                let entries: Vec<_> = scenes
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "name": s.name,
                            "scene_type": s.scene_type,
                            "objects": s.objects().len(),
                            "regions": s.regions.len(),
                        })
                    })
                    .collect();
                formatter.json(&entries);
                return Ok(());
            }
            let width = scenes.iter().map(|s| s.name.len()).max().unwrap_or(5).max(5);
            formatter.table_header(&[("SCENE", width), ("TYPE", 11), ("OBJECTS", 7), ("REGIONS", 7)]);
            for scene in scenes.iter() {
                let objects = scene.objects().len().to_string();
                let regions = scene.regions.len().to_string();
                formatter.table_row(&[
                    (scene.name.as_str(), width),
                    (scene.scene_type.as_str(), 11),
                    (objects.as_str(), 7),
                    (regions.as_str(), 7),
                ]);
            }
        }
        ScenesCommand::Show { name, .. } => {
            let scene = scenes.get(name)?;
            if formatter.is_json() {
                formatter.json(scene);
            } else {
                show_scene(scene, &formatter);
            }
        }
    }
    Ok(())
}

fn show_scene(scene: &SceneTemplate, formatter: &OutputFormatter) {
    formatter.section(&scene.name);
    formatter.kv("Type", scene.scene_type.as_str());
    formatter.kv("Problem", scene.scene_type.problem_name());

    formatter.section("Fixtures");
    for decl in scene.fixtures() {
        formatter.list_item(&format!("{} - {}", decl.name, decl.category));
    }
    formatter.section("Objects");
    for decl in scene.objects() {
        formatter.list_item(&format!("{} - {}", decl.name, decl.category));
    }
    formatter.section("Regions");
    for region in &scene.regions {
        formatter.list_item(&region.full_name());
    }
    formatter.section("Initial states");
    for call in &scene.init_states {
        formatter.list_item(&call.to_string());
    }
}
