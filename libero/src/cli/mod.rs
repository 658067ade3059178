//! LIBERO CLI module
//!
//! # Commands
//!
//! - `generate` - Register tasks from a TOML task list and write BDDL files
//! - `check` - Parse and validate a BDDL file
//! - `validate` - Evaluate a task goal against a recorded frame
//! - `teleop` - Run the teleoperation validation loop
//! - `scenes` - Inspect the scene registry
//! - `predicates` - List the predicate library
//! - `config` - Configuration (show, validate, init)

pub mod commands;
pub mod context;
pub mod input;
pub mod output;

pub use context::CliContext;
pub use input::{read_input_content, InputArgs, InputContent, InputError, InputSource};
pub use output::{OutputFormat, OutputFormatter};
