//! Typed syntax tree for BDDL problem files.
//!
//! A [`Problem`] mirrors one `(define (problem ...))` form. Names are kept
//! exactly as written; predicate lookup lower-cases them later.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single predicate argument: an identifier or a numeric literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    Number(f64),
    Symbol(String),
}

impl Term {
    pub fn symbol(name: &str) -> Self {
        Term::Symbol(name.to_string())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Term::Symbol(s) => Some(s),
            Term::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Term::Number(n) => Some(*n),
            Term::Symbol(_) => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Number(_) => "number",
            Term::Symbol(_) => "symbol",
        }
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::Symbol(value.to_string())
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::Symbol(value)
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Number(value)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Symbol(s) => write!(f, "{}", s),
            Term::Number(n) => write!(f, "{}", format_number(*n)),
        }
    }
}

/// Formats a number the way BDDL files spell them: always with a decimal point.
pub fn format_number(value: f64) -> String {
    let text = format!("{}", value);
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// One predicate invocation, e.g. `(In akita_black_bowl_1 wooden_cabinet_1_top_region)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateCall {
    pub name: String,
    pub args: Vec<Term>,
}

impl PredicateCall {
    pub fn new(name: &str, args: Vec<Term>) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }

    /// Shorthand for the common case where every argument is an identifier.
    pub fn with_symbols(name: &str, args: &[&str]) -> Self {
        Self::new(name, args.iter().map(|a| Term::symbol(a)).collect())
    }

    /// Registry key for this call.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for PredicateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "({})", self.name)
        } else {
            write!(f, "({} {})", self.name, self.args.iter().join(" "))
        }
    }
}

/// Goal formula. The top level of a problem goal is normally an `And`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GoalExpr {
    Atom(PredicateCall),
    And(Vec<GoalExpr>),
    Or(Vec<GoalExpr>),
    Not(Box<GoalExpr>),
}

impl GoalExpr {
    /// Builds the conjunction `(And call...)` used for registered tasks.
    pub fn conjunction(calls: impl IntoIterator<Item = PredicateCall>) -> Self {
        GoalExpr::And(calls.into_iter().map(GoalExpr::Atom).collect())
    }

    /// Visits every atom in source order.
    pub fn atoms(&self) -> Vec<&PredicateCall> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a PredicateCall>) {
        match self {
            GoalExpr::Atom(call) => out.push(call),
            GoalExpr::And(children) | GoalExpr::Or(children) => {
                for child in children {
                    child.collect_atoms(out);
                }
            }
            GoalExpr::Not(inner) => inner.collect_atoms(out),
        }
    }
}

impl fmt::Display for GoalExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalExpr::Atom(call) => write!(f, "{}", call),
            GoalExpr::And(children) => write!(f, "(And {})", children.iter().join(" ")),
            GoalExpr::Or(children) => write!(f, "(Or {})", children.iter().join(" ")),
            GoalExpr::Not(inner) => write!(f, "(Not {})", inner),
        }
    }
}

/// `name - category` entry under `:fixtures` or `:objects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDecl {
    pub name: String,
    pub category: String,
}

impl ObjectDecl {
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

/// Named spatial zone attached to a target fixture or object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDef {
    pub name: String,
    pub target: String,
    /// Each range is `(x_min y_min x_max y_max)` in the target's frame.
    pub ranges: Vec<[f64; 4]>,
    /// Each entry is `(yaw_min yaw_max)` in radians.
    pub yaw_rotation: Vec<[f64; 2]>,
    pub rgba: Option<[f64; 4]>,
}

impl RegionDef {
    /// A region that exists only as a named site on its target (no sampling ranges).
    pub fn site(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            ranges: Vec::new(),
            yaw_rotation: Vec::new(),
            rgba: None,
        }
    }

    /// Identifier used by predicates: `{target}_{name}`.
    pub fn full_name(&self) -> String {
        format!("{}_{}", self.target, self.name)
    }
}

/// A complete BDDL problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    pub domain: String,
    pub language: String,
    pub regions: Vec<RegionDef>,
    pub fixtures: Vec<ObjectDecl>,
    pub objects: Vec<ObjectDecl>,
    pub objects_of_interest: Vec<String>,
    pub init: Vec<PredicateCall>,
    pub goal: GoalExpr,
}

impl Problem {
    /// Every identifier a predicate may reference: fixtures, objects and region full names.
    pub fn declared_names(&self) -> Vec<String> {
        self.fixtures
            .iter()
            .chain(self.objects.iter())
            .map(|d| d.name.clone())
            .chain(self.regions.iter().map(RegionDef::full_name))
            .collect()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.fixtures.iter().any(|d| d.name == name)
            || self.objects.iter().any(|d| d.name == name)
            || self.regions.iter().any(|r| r.full_name() == name)
    }

    pub fn region(&self, full_name: &str) -> Option<&RegionDef> {
        self.regions.iter().find(|r| r.full_name() == full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_full_name_prefixes_target() {
        let region = RegionDef::site("top_region", "wooden_cabinet_1");
        assert_eq!(region.full_name(), "wooden_cabinet_1_top_region");
    }

    #[test]
    fn test_numbers_always_carry_a_decimal_point() {
        assert_eq!(format_number(0.0), "0.0");
        assert_eq!(format_number(-0.025), "-0.025");
        assert_eq!(format_number(3.0), "3.0");
    }

    #[test]
    fn test_goal_display_matches_bddl_spelling() {
        let goal = GoalExpr::conjunction(vec![
            PredicateCall::with_symbols("Open", &["wooden_cabinet_1_top_region"]),
            PredicateCall::new("InAir", vec![Term::symbol("plate_1"), Term::Number(0.5)]),
        ]);
        assert_eq!(
            goal.to_string(),
            "(And (Open wooden_cabinet_1_top_region) (InAir plate_1 0.5))"
        );
    }
}
