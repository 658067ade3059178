//! Teleop command - run the teleoperation validation loop on a task file

use super::load_task_file;
use crate::cli::{CliContext, OutputFormatter};
use crate::sim::ReplaySimulator;
use crate::teleop::{
    ConsoleInput, OperatorInput, ScriptedInput, TeleopEvent, TeleopReport, TeleopSession, CONSOLE_HELP,
};
use bddl::GoalEvaluator;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    /// Keyboard commands typed at a prompt
    Console,
    /// No operator: idle steps until the recording ends
    Replay,
}

#[derive(Debug, Args)]
pub struct TeleopArgs {
    /// BDDL task file
    pub task: PathBuf,

    /// Recorded frames standing in for the simulator
    #[arg(short, long)]
    pub recording: PathBuf,

    /// Robot model; must match the robot a labelled recording was made with.
    /// Defaults to `teleop.robot`
    #[arg(long)]
    pub robot: Option<String>,

    /// Operator device; defaults to `teleop.device`
    #[arg(long, value_enum)]
    pub device: Option<Device>,

    #[arg(long)]
    pub max_successes: Option<usize>,

    #[arg(long)]
    pub max_steps: Option<usize>,
}

pub fn execute(ctx: &CliContext, args: TeleopArgs) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let predicates = ctx.predicate_registry();
    let problem = load_task_file(ctx, &args.task, &predicates)?;

    let robot = args.robot.as_deref().unwrap_or(&ctx.config.teleop.robot);
    let device = match args.device {
        Some(device) => device,
        None => Device::from_str(&ctx.config.teleop.device, true)
            .map_err(|e| anyhow::anyhow!("invalid teleop.device in config: {}", e))?,
    };
    let mut limits = ctx.teleop_limits();
    if args.max_successes.is_some() {
        limits.max_successes = args.max_successes;
    }
    if args.max_steps.is_some() {
        limits.max_steps_per_episode = args.max_steps;
    }

    let sim = ReplaySimulator::load(&args.recording)?.with_robot(robot)?;
    info!(robot, ?device, task = %args.task.display(), "starting teleoperation");
    ctx.status(&format!("Task: {}", problem.language));

    let report = match device {
        Device::Console => {
            ctx.status(CONSOLE_HELP);
            let input = ConsoleInput::new(ctx.config.teleop.step_size)?;
            run_session(sim, input, &predicates, problem.goal, limits, &formatter)?
        }
        Device::Replay => {
            let input = ScriptedInput::idle_steps(sim.len() - 1);
            run_session(sim, input, &predicates, problem.goal, limits, &formatter)?
        }
    };

    if formatter.is_json() {
        formatter.json(&report);
    } else {
        formatter.section("Session");
        formatter.kv("Episodes", &report.episodes.to_string());
        formatter.kv("Steps", &report.total_steps.to_string());
        formatter.kv("Successes", &report.successes.to_string());
        formatter.kv("Failures", &report.failures.to_string());
        formatter.kv("Resets", &report.resets.to_string());
    }
    Ok(())
}

fn run_session<I: OperatorInput>(
    sim: ReplaySimulator,
    input: I,
    predicates: &bddl::PredicateRegistry,
    goal: bddl::GoalExpr,
    limits: crate::teleop::TeleopLimits,
    formatter: &OutputFormatter,
) -> anyhow::Result<TeleopReport> {
    let evaluator = GoalEvaluator::new(predicates);
    let mut session = TeleopSession::new(sim, input, evaluator, goal).with_limits(limits);
    let json = formatter.is_json();
    let report = session.run(|event| {
        if !json {
            print_event(event, formatter);
        }
    })?;
    Ok(report)
}

fn print_event(event: &TeleopEvent, formatter: &OutputFormatter) {
    match event {
        TeleopEvent::Step { .. } | TeleopEvent::Report(_) => {}
        TeleopEvent::Success { episode, steps, successes } => formatter.success(&format!(
            "episode {} completed in {} steps ({} {})",
            episode,
            steps,
            "successes:".bold(),
            successes
        )),
        TeleopEvent::EpisodeFailed { episode, steps, reason } => {
            formatter.warning(&format!("episode {} failed after {} steps: {:?}", episode, steps, reason))
        }
        TeleopEvent::Reset { episode } => formatter.kv("Episode", &episode.to_string()),
        TeleopEvent::Inspect(report) => {
            for atom in &report.atoms {
                let mark = match atom.value {
                    Some(true) => "holds",
                    Some(false) => "does not hold",
                    None => "error",
                };
                formatter.list_item(&format!("{}  {}", atom.predicate, mark));
            }
        }
    }
}
