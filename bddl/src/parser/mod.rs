use crate::ast::{GoalExpr, PredicateCall, Problem};
use crate::error_reporting::render_diagnostic;
use pest::Parser;

// Declare submodules
pub mod errors;
pub mod problem;
pub mod sexpr;

// Import items from submodules
pub use errors::ParseError;
pub use sexpr::SExpr;
use problem::{build_predicate_call, build_problem, build_top_goal};
use sexpr::build_sexpr;

// Define the parser struct using the grammar file
#[derive(pest_derive::Parser)]
#[grammar = "bddl.pest"] // Path relative to src/
pub struct BddlParser;

// --- Main Parsing Functions ---

/// Parse BDDL text into its raw s-expression forms.
pub fn parse_sexpr(input: &str) -> Result<Vec<SExpr>, ParseError> {
    let mut pairs = BddlParser::parse(Rule::file, input)?;
    let file = pairs.next().ok_or_else(|| ParseError::InvalidInput {
        message: "empty parse result".to_string(),
        span: None,
    })?;
    file.into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(build_sexpr)
        .collect()
}

/// Parse a complete BDDL problem file.
pub fn parse_problem(input: &str) -> Result<Problem, ParseError> {
    let forms = parse_sexpr(input)?;
    match forms.as_slice() {
        [define] => build_problem(define),
        [] => Err(ParseError::InvalidInput {
            message: "no (define ...) form found".to_string(),
            span: None,
        }),
        [_, extra, ..] => Err(ParseError::InvalidInput {
            message: "expected a single (define ...) form".to_string(),
            span: Some(extra.span()),
        }),
    }
}

/// Parse a single goal formula such as `(And (Open a) (In b c))`.
pub fn parse_goal(input: &str) -> Result<GoalExpr, ParseError> {
    let mut pairs = BddlParser::parse(Rule::single, input)?;
    let single = pairs.next().ok_or_else(|| ParseError::InvalidInput {
        message: "no goal formula found".to_string(),
        span: None,
    })?;
    let form = single
        .into_inner()
        .find(|p| p.as_rule() != Rule::EOI)
        .ok_or_else(|| ParseError::InvalidInput {
            message: "no goal formula found".to_string(),
            span: None,
        })
        .and_then(build_sexpr)?;
    build_top_goal(&form)
}

/// Parse one predicate invocation such as `(On plate_1 kitchen_table_plate_init_region)`.
pub fn parse_predicate_call(input: &str) -> Result<PredicateCall, ParseError> {
    let mut pairs = BddlParser::parse(Rule::single, input)?;
    let form = pairs
        .next()
        .and_then(|single| single.into_inner().find(|p| p.as_rule() != Rule::EOI))
        .ok_or_else(|| ParseError::InvalidInput {
            message: "no predicate invocation found".to_string(),
            span: None,
        })
        .and_then(build_sexpr)?;
    build_predicate_call(&form)
}

/// Parse a problem and render failures as a caret diagnostic naming `file_path`.
pub fn parse_with_enhanced_errors(source: &str, file_path: Option<&str>) -> Result<Problem, String> {
    parse_problem(source)
        .map_err(|e| render_diagnostic(source, file_path, e.span(), &e.message()))
}
