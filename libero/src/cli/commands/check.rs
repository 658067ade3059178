//! Check command - parse and validate a BDDL document

use crate::cli::{read_input_content, CliContext, InputArgs, OutputFormatter};
use bddl::{parse_with_enhanced_errors, validate_problem, Problem};
use clap::Args;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only parse; skip predicate and reference validation
    #[arg(long)]
    pub syntax_only: bool,
}

pub fn execute(ctx: &CliContext, args: CheckArgs) -> anyhow::Result<()> {
    let formatter = OutputFormatter::new(ctx.output_format);
    let input = read_input_content(&args.input)?;
    ctx.status(&format!("Checking {}", input.source_name));

    let problem = parse_with_enhanced_errors(&input.content, Some(&input.source_name))
        .map_err(anyhow::Error::msg)?;

    if !args.syntax_only {
        let predicates = ctx.predicate_registry();
        if let Err(e) = validate_problem(&problem, &predicates) {
            if formatter.is_json() {
                formatter.json(&serde_json::json!({
                    "valid": false,
                    "source": input.source_name,
                    "issues": e.issues,
                }));
            } else {
                formatter.error(&format!("{} is invalid", input.source_name));
                for issue in &e.issues {
                    formatter.list_item(&issue.to_string());
                }
            }
            anyhow::bail!("{} validation issue(s)", e.issues.len());
        }
    }

    if formatter.is_json() {
        formatter.json(&problem);
    } else {
        print_summary(&problem, &formatter);
        formatter.success(&format!("{} is valid", input.source_name));
    }
    Ok(())
}

fn print_summary(problem: &Problem, formatter: &OutputFormatter) {
    formatter.section(&problem.name);
    formatter.kv("Domain", &problem.domain);
    formatter.kv("Language", &problem.language);
    formatter.kv("Fixtures", &problem.fixtures.len().to_string());
    formatter.kv("Objects", &problem.objects.len().to_string());
    formatter.kv("Regions", &problem.regions.len().to_string());
    formatter.kv("Objects of interest", &problem.objects_of_interest.join(", "));
    formatter.kv("Init states", &problem.init.len().to_string());
    formatter.section("Goal");
    for atom in problem.goal.atoms() {
        formatter.list_item(&atom.to_string());
    }
}
