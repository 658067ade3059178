//! Deterministic BDDL writer.
//!
//! The layout follows the LIBERO task files: two-space indentation, one block
//! per region, a blank line between sections. The same [`Problem`] always
//! produces the same bytes.

use crate::ast::{format_number, Problem, RegionDef};
use itertools::Itertools;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to write BDDL file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    pub fn path(&self) -> &Path {
        match self {
            EmitError::Write { path, .. } => path,
        }
    }
}

fn numbers(values: &[f64]) -> String {
    values.iter().map(|v| format_number(*v)).join(" ")
}

fn write_region(out: &mut String, region: &RegionDef) {
    let _ = writeln!(out, "      ({}", region.name);
    let _ = writeln!(out, "          (:target {})", region.target);
    if !region.ranges.is_empty() {
        out.push_str("          (:ranges (\n");
        for range in &region.ranges {
            let _ = writeln!(out, "              ({})", numbers(range));
        }
        out.push_str("            )\n          )\n");
    }
    if !region.yaw_rotation.is_empty() {
        out.push_str("          (:yaw_rotation (\n");
        for yaw in &region.yaw_rotation {
            let _ = writeln!(out, "              ({})", numbers(yaw));
        }
        out.push_str("            )\n          )\n");
    }
    if let Some(rgba) = &region.rgba {
        let _ = writeln!(out, "          (:rgba ({}))", numbers(rgba));
    }
    out.push_str("      )\n");
}

/// Serialize a problem to BDDL text.
pub fn to_bddl(problem: &Problem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "(define (problem {})", problem.name);
    let _ = writeln!(out, "  (:domain {})", problem.domain);
    let _ = writeln!(out, "  (:language {})", problem.language);

    out.push_str("    (:regions\n");
    for region in &problem.regions {
        write_region(&mut out, region);
    }
    out.push_str("    )\n\n");

    out.push_str("  (:fixtures\n");
    for decl in &problem.fixtures {
        let _ = writeln!(out, "    {} - {}", decl.name, decl.category);
    }
    out.push_str("  )\n\n");

    out.push_str("  (:objects\n");
    for decl in &problem.objects {
        let _ = writeln!(out, "    {} - {}", decl.name, decl.category);
    }
    out.push_str("  )\n\n");

    out.push_str("  (:obj_of_interest\n");
    for name in &problem.objects_of_interest {
        let _ = writeln!(out, "    {}", name);
    }
    out.push_str("  )\n\n");

    out.push_str("  (:init\n");
    for call in &problem.init {
        let _ = writeln!(out, "    {}", call);
    }
    out.push_str("  )\n\n");

    out.push_str("  (:goal\n");
    let _ = writeln!(out, "    {}", problem.goal);
    out.push_str("  )\n\n");

    out.push_str(")\n");
    out
}

/// Write `problem` to `path`. The parent directory must already exist.
pub fn write_problem(problem: &Problem, path: impl AsRef<Path>) -> Result<PathBuf, EmitError> {
    let path = path.as_ref().to_path_buf();
    let text = to_bddl(problem);
    debug!(path = %path.display(), bytes = text.len(), "writing BDDL");
    fs::write(&path, text).map_err(|source| EmitError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), problem = %problem.name, "wrote BDDL file");
    Ok(path)
}
