//! Validate command - evaluate a task goal against one recorded frame

use super::load_task_file;
use crate::cli::{CliContext, OutputFormatter};
use crate::sim::{Action, ReplaySimulator, Simulator};
use bddl::GoalEvaluator;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// BDDL task file
    pub task: PathBuf,

    /// Recording (JSON frames) to evaluate against
    #[arg(short, long)]
    pub recording: PathBuf,

    /// Frame to evaluate; defaults to the last one
    #[arg(long)]
    pub frame: Option<usize>,
}

pub fn execute(ctx: &CliContext, args: ValidateArgs) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let predicates = ctx.predicate_registry();
    let problem = load_task_file(ctx, &args.task, &predicates)?;

    let mut sim = ReplaySimulator::load(&args.recording)?;
    let last = sim.len() - 1;
    let frame = args.frame.unwrap_or(last);
    if frame > last {
        anyhow::bail!("frame {} out of range (recording has {} frames)", frame, sim.len());
    }
    sim.reset()?;
    for _ in 0..frame {
        sim.step(&Action::idle())?;
    }

    let report = GoalEvaluator::new(&predicates).report(&problem.goal, sim.world());

    if formatter.is_json() {
        formatter.json(&serde_json::json!({
            "task": args.task,
            "frame": frame,
            "report": report,
        }));
    } else {
        formatter.section(&problem.language);
        formatter.kv("Frame", &format!("{} of {}", frame, last));
        for atom in &report.atoms {
            let state = match (atom.value, &atom.error) {
                (_, Some(error)) => format!("error: {}", error),
                (Some(true), None) => "holds".to_string(),
                _ => "does not hold".to_string(),
            };
            formatter.list_item(&format!("{}  {}", atom.predicate, state));
        }
    }

    if let Some(error) = &report.error {
        anyhow::bail!("goal evaluation failed: {}", error);
    }
    if !report.satisfied {
        anyhow::bail!("goal not satisfied at frame {}", frame);
    }
    formatter.success("goal satisfied");
    Ok(())
}
