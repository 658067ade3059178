//! Teleoperation validation loop
//!
//! Drives a [`Simulator`] under operator commands and evaluates the full goal
//! after every step. A satisfied goal counts as a success and restarts the
//! episode, so an author can demonstrate a task repeatedly in one session.
//! Everything runs on the calling thread; the only blocking point is
//! [`OperatorInput::next_command`].

pub mod input;

pub use input::{
    parse_console_command, ConsoleInput, OperatorCommand, OperatorInput, ScriptedInput, CONSOLE_HELP,
};

use crate::sim::{SimError, Simulator};
use bddl::{EvalError, GoalEvaluator, GoalExpr, GoalReport};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum TeleopError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("goal evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("operator input failed: {0}")]
    Input(String),
}

/// Optional caps; `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeleopLimits {
    pub max_successes: Option<usize>,
    pub max_steps_per_episode: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    StepLimit,
    SimulatorExhausted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeleopReport {
    pub episodes: usize,
    pub total_steps: usize,
    pub successes: usize,
    pub failures: usize,
    pub resets: usize,
}

#[derive(Debug, Clone)]
pub enum TeleopEvent {
    Step {
        episode: usize,
        step: usize,
        satisfied: bool,
    },
    Success {
        episode: usize,
        steps: usize,
        successes: usize,
    },
    EpisodeFailed {
        episode: usize,
        steps: usize,
        reason: FailureReason,
    },
    /// A new episode started.
    Reset { episode: usize },
    Inspect(GoalReport),
    Report(TeleopReport),
}

pub struct TeleopSession<'r, S, I> {
    simulator: S,
    input: I,
    evaluator: GoalEvaluator<'r>,
    goal: GoalExpr,
    limits: TeleopLimits,
}

impl<'r, S: Simulator, I: OperatorInput> TeleopSession<'r, S, I> {
    pub fn new(simulator: S, input: I, evaluator: GoalEvaluator<'r>, goal: GoalExpr) -> Self {
        Self {
            simulator,
            input,
            evaluator,
            goal,
            limits: TeleopLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: TeleopLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Runs until the operator quits or `max_successes` is reached.
    pub fn run(&mut self, mut observer: impl FnMut(&TeleopEvent)) -> Result<TeleopReport, TeleopError> {
        let mut report = TeleopReport::default();
        let mut episode_steps = 0;
        self.simulator.reset()?;
        report.episodes = 1;
        info!(goal = %self.goal, "teleoperation session started");

        loop {
            if self
                .limits
                .max_successes
                .is_some_and(|max| report.successes >= max)
            {
                break;
            }

            match self.input.next_command()? {
                OperatorCommand::Quit => break,
                OperatorCommand::Inspect => {
                    let goal_report = self.evaluator.report(&self.goal, self.simulator.world());
                    observer(&TeleopEvent::Inspect(goal_report));
                }
                OperatorCommand::Reset => {
                    report.resets += 1;
                    self.restart(&mut report, &mut episode_steps, &mut observer)?;
                }
                OperatorCommand::Act(action) => {
                    self.simulator.step(&action)?;
                    episode_steps += 1;
                    report.total_steps += 1;

                    let satisfied = self.evaluator.evaluate(&self.goal, self.simulator.world())?;
                    debug!(episode = report.episodes, step = episode_steps, satisfied, "teleop step");
                    observer(&TeleopEvent::Step {
                        episode: report.episodes,
                        step: episode_steps,
                        satisfied,
                    });

                    let failure = if satisfied {
                        None
                    } else if self
                        .limits
                        .max_steps_per_episode
                        .is_some_and(|max| episode_steps >= max)
                    {
                        Some(FailureReason::StepLimit)
                    } else if self.simulator.is_exhausted() {
                        Some(FailureReason::SimulatorExhausted)
                    } else {
                        continue;
                    };

                    match failure {
                        None => {
                            report.successes += 1;
                            info!(episode = report.episodes, steps = episode_steps, successes = report.successes, "task completed");
                            observer(&TeleopEvent::Success {
                                episode: report.episodes,
                                steps: episode_steps,
                                successes: report.successes,
                            });
                        }
                        Some(reason) => {
                            report.failures += 1;
                            warn!(episode = report.episodes, steps = episode_steps, ?reason, "episode failed");
                            observer(&TeleopEvent::EpisodeFailed {
                                episode: report.episodes,
                                steps: episode_steps,
                                reason,
                            });
                        }
                    }

                    if self
                        .limits
                        .max_successes
                        .is_some_and(|max| report.successes >= max)
                    {
                        break;
                    }
                    self.restart(&mut report, &mut episode_steps, &mut observer)?;
                }
            }
        }

        info!(
            episodes = report.episodes,
            successes = report.successes,
            failures = report.failures,
            "teleoperation session finished"
        );
        observer(&TeleopEvent::Report(report.clone()));
        Ok(report)
    }

    fn restart(
        &mut self,
        report: &mut TeleopReport,
        episode_steps: &mut usize,
        observer: &mut impl FnMut(&TeleopEvent),
    ) -> Result<(), TeleopError> {
        self.simulator.reset()?;
        report.episodes += 1;
        *episode_steps = 0;
        observer(&TeleopEvent::Reset {
            episode: report.episodes,
        });
        Ok(())
    }
}
