//! Generate command - register tasks from a TOML list and write BDDL files

use crate::cli::{CliContext, OutputFormatter};
use crate::task::{TaskRegistry, TaskSpecFile};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// TOML file with `[[task]]` entries
    pub tasks: PathBuf,

    /// Destination folder (must exist); defaults to `generation.output_dir`
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Additional scene definition files
    #[arg(long = "scene-file", value_name = "FILE")]
    pub scene_files: Vec<PathBuf>,
}

pub fn execute(ctx: &CliContext, args: GenerateArgs) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let mut scenes = ctx.scene_registry()?;
    for file in &args.scene_files {
        let added = scenes.load_toml(file)?;
        ctx.debug(&format!("loaded scenes {:?} from {}", added, file.display()));
    }
    let predicates = ctx.predicate_registry();

    let task_file = TaskSpecFile::load(&args.tasks)?;
    let mut registry = TaskRegistry::new();
    let count = task_file
        .register_all(&mut registry, &scenes, &predicates)
        .with_context(|| format!("failed to register tasks from {}", args.tasks.display()))?;
    ctx.status(&format!("Registered {} task(s) from {}", count, args.tasks.display()));

    let folder = args
        .output_dir
        .unwrap_or_else(|| ctx.resolve(&ctx.config.generation.output_dir));
    let report = registry.generate_bddl_from_task_info(&scenes, &folder);

    if formatter.is_json() {
        formatter.json(&report);
    } else {
        for path in &report.written {
            formatter.success(&format!("wrote {}", path.display()));
        }
        for failure in &report.failures {
            formatter.error(&format!(
                "{} / {}: {}",
                failure.scene_name, failure.language, failure.error
            ));
        }
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} task(s) failed to generate",
            report.failures.len(),
            count
        );
    }
    Ok(())
}
