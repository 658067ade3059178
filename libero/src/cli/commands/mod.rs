//! CLI commands module

pub mod check;
pub mod config;
pub mod generate;
pub mod predicates;
pub mod scenes;
pub mod teleop;
pub mod validate;

use crate::cli::CliContext;
use anyhow::Context;
use bddl::{parse_with_enhanced_errors, validate_problem, PredicateRegistry, Problem};
use std::path::Path;

/// Reads, parses and validates one BDDL task file.
pub(crate) fn load_task_file(
    ctx: &CliContext,
    path: &Path,
    predicates: &PredicateRegistry,
) -> anyhow::Result<Problem> {
    ctx.debug(&format!("loading task file {}", path.display()));
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read task file {}", path.display()))?;
    let problem = parse_with_enhanced_errors(&source, Some(&path.display().to_string()))
        .map_err(anyhow::Error::msg)?;
    validate_problem(&problem, predicates)
        .with_context(|| format!("task file {} failed validation", path.display()))?;
    Ok(problem)
}
