//! Load-time checks for a parsed or generated [`Problem`].
//!
//! Every predicate name used in `:init` and `:goal` must resolve in the
//! registry with the right arity and argument kinds, and every referenced
//! object or region must be declared. All issues are collected, not just the
//! first one.

use crate::ast::{PredicateCall, Problem, Term};
use crate::geometry::Axis;
use crate::runtime::{ArgKind, PredicateRegistry, Signature};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Init,
    Goal,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Init => write!(f, ":init"),
            Section::Goal => write!(f, ":goal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValidationIssue {
    UnknownPredicate {
        section: Section,
        predicate: String,
    },
    ArityMismatch {
        section: Section,
        predicate: String,
        expected: String,
        actual: usize,
    },
    WrongArgumentKind {
        section: Section,
        predicate: String,
        position: usize,
        expected: String,
        actual: String,
    },
    UndeclaredReference {
        section: Section,
        predicate: String,
        name: String,
    },
    UndeclaredObjectOfInterest {
        name: String,
    },
    DuplicateDeclaration {
        name: String,
    },
    InvalidRange {
        region: String,
        range: [f64; 4],
    },
    EmptyGoal,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownPredicate { section, predicate } => {
                write!(f, "{}: unknown predicate '{}'", section, predicate)
            }
            ValidationIssue::ArityMismatch {
                section,
                predicate,
                expected,
                actual,
            } => write!(
                f,
                "{}: '{}' expects {} argument(s), got {}",
                section, predicate, expected, actual
            ),
            ValidationIssue::WrongArgumentKind {
                section,
                predicate,
                position,
                expected,
                actual,
            } => write!(
                f,
                "{}: '{}' argument {} should be {}, got '{}'",
                section, predicate, position, expected, actual
            ),
            ValidationIssue::UndeclaredReference {
                section,
                predicate,
                name,
            } => write!(
                f,
                "{}: '{}' references undeclared object or region '{}'",
                section, predicate, name
            ),
            ValidationIssue::UndeclaredObjectOfInterest { name } => {
                write!(f, ":obj_of_interest: '{}' is not declared", name)
            }
            ValidationIssue::DuplicateDeclaration { name } => {
                write!(f, "'{}' is declared more than once", name)
            }
            ValidationIssue::InvalidRange { region, range } => write!(
                f,
                "region '{}' has an inverted range ({} {} {} {})",
                region, range[0], range[1], range[2], range[3]
            ),
            ValidationIssue::EmptyGoal => write!(f, ":goal has no predicates"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} validation issue(s): {}", .issues.len(), .issues.iter().join("; "))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

/// Check one predicate invocation, appending any issues found.
pub fn validate_call(
    call: &PredicateCall,
    section: Section,
    registry: &PredicateRegistry,
    is_declared: &dyn Fn(&str) -> bool,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(predicate) = registry.get(&call.name) else {
        issues.push(ValidationIssue::UnknownPredicate {
            section,
            predicate: call.name.clone(),
        });
        return;
    };

    let kinds = match predicate.signature() {
        Signature::Variadic => return,
        Signature::Fixed(kinds) => kinds,
    };
    if kinds.len() != call.args.len() {
        issues.push(ValidationIssue::ArityMismatch {
            section,
            predicate: call.name.clone(),
            expected: kinds.len().to_string(),
            actual: call.args.len(),
        });
        return;
    }

    for (position, (kind, term)) in kinds.iter().zip(call.args.iter()).enumerate() {
        let kind_ok = match (kind, term) {
            (ArgKind::Number, Term::Number(_)) => true,
            (ArgKind::Axis, Term::Symbol(s)) => s.parse::<Axis>().is_ok(),
            (ArgKind::Object, Term::Symbol(s)) => {
                if !is_declared(s) {
                    issues.push(ValidationIssue::UndeclaredReference {
                        section,
                        predicate: call.name.clone(),
                        name: s.clone(),
                    });
                }
                true
            }
            _ => false,
        };
        if !kind_ok {
            issues.push(ValidationIssue::WrongArgumentKind {
                section,
                predicate: call.name.clone(),
                position,
                expected: kind.to_string(),
                actual: term.to_string(),
            });
        }
    }
}

/// Validate a whole problem against `registry`.
pub fn validate_problem(problem: &Problem, registry: &PredicateRegistry) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for name in problem.declared_names() {
        if !seen.insert(name.clone()) {
            issues.push(ValidationIssue::DuplicateDeclaration { name });
        }
    }

    for region in &problem.regions {
        for range in &region.ranges {
            if range[0] > range[2] || range[1] > range[3] {
                issues.push(ValidationIssue::InvalidRange {
                    region: region.full_name(),
                    range: *range,
                });
            }
        }
    }

    for name in &problem.objects_of_interest {
        if !problem.is_declared(name) {
            issues.push(ValidationIssue::UndeclaredObjectOfInterest { name: name.clone() });
        }
    }

    let is_declared = |name: &str| problem.is_declared(name);
    for call in &problem.init {
        validate_call(call, Section::Init, registry, &is_declared, &mut issues);
    }

    let atoms = problem.goal.atoms();
    if atoms.is_empty() {
        issues.push(ValidationIssue::EmptyGoal);
    }
    for call in atoms {
        validate_call(call, Section::Goal, registry, &is_declared, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{GoalExpr, ObjectDecl, RegionDef};

    fn kitchen_problem(goal: GoalExpr) -> Problem {
        Problem {
            name: "LIBERO_Kitchen_Tabletop_Manipulation".to_string(),
            domain: "robosuite".to_string(),
            language: "open the top drawer of the cabinet".to_string(),
            regions: vec![RegionDef::site("top_region", "wooden_cabinet_1")],
            fixtures: vec![ObjectDecl::new("kitchen_table", "kitchen_table")],
            objects: vec![ObjectDecl::new("wooden_cabinet_1", "wooden_cabinet")],
            objects_of_interest: vec!["wooden_cabinet_1".to_string()],
            init: vec![],
            goal,
        }
    }

    #[test]
    fn test_well_formed_problem_passes() {
        let goal = GoalExpr::conjunction(vec![PredicateCall::with_symbols(
            "Open",
            &["wooden_cabinet_1_top_region"],
        )]);
        let registry = PredicateRegistry::with_builtins();
        assert!(validate_problem(&kitchen_problem(goal), &registry).is_ok());
    }

    #[test]
    fn test_collects_every_issue() {
        let goal = GoalExpr::conjunction(vec![
            PredicateCall::with_symbols("Opened", &["wooden_cabinet_1"]),
            PredicateCall::with_symbols("In", &["bowl_1"]),
            PredicateCall::with_symbols("Open", &["bowl_1"]),
            PredicateCall::new("InAir", vec![Term::symbol("wooden_cabinet_1"), Term::symbol("high")]),
        ]);
        let registry = PredicateRegistry::with_builtins();
        let err = validate_problem(&kitchen_problem(goal), &registry).unwrap_err();
        assert_eq!(err.issues.len(), 4, "{}", err);
        assert!(matches!(err.issues[0], ValidationIssue::UnknownPredicate { .. }));
        assert!(matches!(err.issues[1], ValidationIssue::ArityMismatch { .. }));
        assert!(matches!(err.issues[2], ValidationIssue::UndeclaredReference { .. }));
        assert!(matches!(err.issues[3], ValidationIssue::WrongArgumentKind { position: 1, .. }));
    }

    #[test]
    fn test_empty_goal_is_rejected() {
        let registry = PredicateRegistry::with_builtins();
        let err = validate_problem(&kitchen_problem(GoalExpr::And(vec![])), &registry).unwrap_err();
        assert_eq!(err.issues, vec![ValidationIssue::EmptyGoal]);
    }
}
