//! Predicates command - list the predicate library

use crate::cli::{CliContext, OutputFormatter};
use bddl::runtime::registry::Predicate;
use clap::Args;

#[derive(Debug, Args)]
pub struct PredicatesArgs {
    /// Show a single predicate
    pub name: Option<String>,
}

pub fn execute(ctx: &CliContext, args: PredicatesArgs) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let registry = ctx.predicate_registry();

    let mut rows = Vec::new();
    for name in registry.names() {
        if args.name.as_deref().is_some_and(|n| !n.eq_ignore_ascii_case(&name)) {
            continue;
        }
        let Some(predicate) = registry.get(&name) else {
            continue;
        };
        let description = match predicate {
            Predicate::Builtin(b) => b.description().to_string(),
            Predicate::Custom(_) => "custom predicate".to_string(),
        };
        rows.push((name, predicate.signature().to_string(), description));
    }

    if let (Some(name), true) = (&args.name, rows.is_empty()) {
        anyhow::bail!("unknown predicate '{}'", name);
    }

    if formatter.is_json() {
        let entries: Vec<_> = rows
            .iter()
            .map(|(name, signature, description)| {
                serde_json::json!({
                    "name": name,
                    "signature": signature,
                    "description": description,
                })
            })
            .collect();
        formatter.json(&entries);
        return Ok(());
    }

    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(4).max(4);
    let sig_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(9).max(9);
    formatter.table_header(&[("NAME", name_width), ("SIGNATURE", sig_width), ("DESCRIPTION", 11)]);
    for (name, signature, description) in &rows {
        formatter.table_row(&[
            (name.as_str(), name_width),
            (signature.as_str(), sig_width),
            (description.as_str(), 0),
        ]);
    }
    Ok(())
}
