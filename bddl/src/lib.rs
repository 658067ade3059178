// BDDL Library
// Task description language for LIBERO: parsing, emission, predicates and goal evaluation

pub mod ast;
pub mod emitter;
pub mod error_reporting;
pub mod geometry;
#[cfg(feature = "pest")]
pub mod parser;
pub mod runtime;
pub mod validation;

pub use ast::{GoalExpr, ObjectDecl, PredicateCall, Problem, RegionDef, Term};
pub use emitter::{to_bddl, write_problem, EmitError};
#[cfg(feature = "pest")]
pub use parser::{
    parse_goal, parse_predicate_call, parse_problem, parse_with_enhanced_errors, ParseError,
};
pub use runtime::{
    ArgKind, BuiltinPredicate, EvalError, GoalEvaluator, GoalReport, ObjectState,
    PredicateRegistry, Signature, World,
};
pub use validation::{validate_problem, ValidationError, ValidationIssue};
