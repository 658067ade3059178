//! Operator input sources
//!
//! The loop blocks only here. [`ScriptedInput`] replays a fixed command list
//! (tests, batch checks); [`ConsoleInput`] reads words from a rustyline prompt.

use super::TeleopError;
use crate::sim::Action;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    Act(Action),
    /// Abandon the current episode and start over.
    Reset,
    /// Print the per-predicate state of the goal without stepping.
    Inspect,
    Quit,
}

pub trait OperatorInput {
    fn next_command(&mut self) -> Result<OperatorCommand, TeleopError>;
}

/// A fixed command queue, followed by `Quit` forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    commands: VecDeque<OperatorCommand>,
}

impl ScriptedInput {
    pub fn new(commands: impl IntoIterator<Item = OperatorCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    /// `count` idle steps.
    pub fn idle_steps(count: usize) -> Self {
        Self::new(std::iter::repeat(OperatorCommand::Act(Action::idle())).take(count))
    }

    pub fn push(&mut self, command: OperatorCommand) {
        self.commands.push_back(command);
    }

    pub fn remaining(&self) -> usize {
        self.commands.len()
    }
}

impl OperatorInput for ScriptedInput {
    fn next_command(&mut self) -> Result<OperatorCommand, TeleopError> {
        Ok(self.commands.pop_front().unwrap_or(OperatorCommand::Quit))
    }
}

pub const CONSOLE_HELP: &str = "\
commands:
  n | <enter>        step with no motion
  x+ x- y+ y- z+ z-  move the end effector one increment
  grip | release     close / open the gripper (and step)
  status             show which goal predicates hold
  reset              restart the episode
  quit               end the session";

/// Parses one console line. `Ok(None)` means the line only printed help.
pub fn parse_console_command(
    line: &str,
    step_size: f64,
    gripper: &mut f64,
) -> Result<Option<OperatorCommand>, String> {
    let word = line.trim().to_lowercase();
    let axis_step = |index: usize, sign: f64| {
        let mut delta = [0.0; 3];
        delta[index] = sign * step_size;
        delta
    };
    let delta = match word.as_str() {
        "" | "n" => [0.0; 3],
        "x+" => axis_step(0, 1.0),
        "x-" => axis_step(0, -1.0),
        "y+" => axis_step(1, 1.0),
        "y-" => axis_step(1, -1.0),
        "z+" => axis_step(2, 1.0),
        "z-" => axis_step(2, -1.0),
        "grip" => {
            *gripper = Action::GRIPPER_CLOSED;
            [0.0; 3]
        }
        "release" => {
            *gripper = Action::GRIPPER_OPEN;
            [0.0; 3]
        }
        "reset" => return Ok(Some(OperatorCommand::Reset)),
        "status" => return Ok(Some(OperatorCommand::Inspect)),
        "quit" | "exit" | "q" => return Ok(Some(OperatorCommand::Quit)),
        "help" | "?" => return Ok(None),
        other => return Err(format!("unknown command '{}' (type 'help')", other)),
    };
    Ok(Some(OperatorCommand::Act(Action::translate(delta, *gripper))))
}

/// Interactive prompt; Ctrl-C and Ctrl-D quit.
pub struct ConsoleInput {
    editor: DefaultEditor,
    step_size: f64,
    gripper: f64,
}

impl ConsoleInput {
    pub fn new(step_size: f64) -> Result<Self, TeleopError> {
        let editor = DefaultEditor::new().map_err(|e| TeleopError::Input(e.to_string()))?;
        Ok(Self {
            editor,
            step_size,
            gripper: Action::GRIPPER_OPEN,
        })
    }
}

impl OperatorInput for ConsoleInput {
    fn next_command(&mut self) -> Result<OperatorCommand, TeleopError> {
        loop {
            match self.editor.readline("teleop> ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.trim());
                    }
                    match parse_console_command(&line, self.step_size, &mut self.gripper) {
                        Ok(Some(command)) => return Ok(command),
                        Ok(None) => println!("{}", CONSOLE_HELP),
                        Err(message) => eprintln!("{}", message),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    return Ok(OperatorCommand::Quit)
                }
                Err(e) => return Err(TeleopError::Input(e.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_words_map_to_commands() {
        let mut gripper = Action::GRIPPER_OPEN;
        assert_eq!(
            parse_console_command("x+", 0.05, &mut gripper),
            Ok(Some(OperatorCommand::Act(Action::translate([0.05, 0.0, 0.0], -1.0))))
        );
        assert_eq!(
            parse_console_command(" grip ", 0.05, &mut gripper),
            Ok(Some(OperatorCommand::Act(Action::translate([0.0; 3], 1.0))))
        );
        // gripper stays closed on later moves
        assert_eq!(
            parse_console_command("z-", 0.05, &mut gripper),
            Ok(Some(OperatorCommand::Act(Action::translate([0.0, 0.0, -0.05], 1.0))))
        );
        assert_eq!(parse_console_command("status", 0.05, &mut gripper), Ok(Some(OperatorCommand::Inspect)));
        assert_eq!(parse_console_command("help", 0.05, &mut gripper), Ok(None));
        assert!(parse_console_command("jump", 0.05, &mut gripper).is_err());
    }

    #[test]
    fn test_scripted_input_ends_with_quit() {
        let mut input = ScriptedInput::idle_steps(1);
        assert!(matches!(input.next_command(), Ok(OperatorCommand::Act(_))));
        assert!(matches!(input.next_command(), Ok(OperatorCommand::Quit)));
        assert!(matches!(input.next_command(), Ok(OperatorCommand::Quit)));
    }
}
