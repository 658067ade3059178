//! Goal evaluation against one simulation frame.

use crate::ast::{GoalExpr, PredicateCall, Term};
use crate::geometry::Axis;
use crate::runtime::error::{EvalError, EvalResult};
use crate::runtime::object_state::World;
use crate::runtime::predicates::{Arg, ArgKind, Signature};
use crate::runtime::registry::{Predicate, PredicateRegistry};
use serde::Serialize;
use tracing::debug;

/// Evaluates predicate invocations and goal formulas using an explicit registry.
#[derive(Debug, Clone, Copy)]
pub struct GoalEvaluator<'r> {
    registry: &'r PredicateRegistry,
}

/// Outcome of a single atom inside a [`GoalReport`].
#[derive(Debug, Clone, Serialize)]
pub struct AtomOutcome {
    pub predicate: String,
    pub value: Option<bool>,
    pub error: Option<String>,
}

/// Per-atom breakdown of one goal evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct GoalReport {
    pub satisfied: bool,
    pub atoms: Vec<AtomOutcome>,
    pub error: Option<String>,
}

impl GoalReport {
    pub fn failing(&self) -> impl Iterator<Item = &AtomOutcome> {
        self.atoms.iter().filter(|a| a.value != Some(true))
    }
}

impl<'r> GoalEvaluator<'r> {
    pub fn new(registry: &'r PredicateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r PredicateRegistry {
        self.registry
    }

    pub fn lookup(&self, name: &str) -> EvalResult<&'r Predicate> {
        self.registry.get(name).ok_or_else(|| EvalError::UnknownPredicate {
            name: name.to_string(),
        })
    }

    /// Resolve a call's terms against `world` following the predicate signature.
    pub fn resolve_args<'w>(
        &self,
        predicate: &Predicate,
        call: &PredicateCall,
        world: &'w dyn World,
    ) -> EvalResult<Vec<Arg<'w>>> {
        let signature = predicate.signature();
        if !signature.accepts_arity(call.args.len()) {
            return Err(EvalError::ArityMismatch {
                predicate: call.name.clone(),
                expected: signature.arity_label(),
                actual: call.args.len(),
            });
        }

        match signature {
            Signature::Fixed(kinds) => kinds
                .iter()
                .zip(call.args.iter())
                .enumerate()
                .map(|(position, (kind, term))| resolve_term(call, position, *kind, term, world))
                .collect(),
            Signature::Variadic => call
                .args
                .iter()
                .map(|term| match term {
                    Term::Number(n) => Ok(Arg::Number(*n)),
                    Term::Symbol(s) => world
                        .object_state(s)
                        .map(Arg::Object)
                        .or_else(|| s.parse::<Axis>().ok().map(Arg::Axis))
                        .ok_or_else(|| EvalError::UnknownObject {
                            predicate: call.name.clone(),
                            name: s.clone(),
                        }),
                })
                .collect(),
        }
    }

    /// Evaluate one predicate invocation.
    pub fn evaluate_call(&self, call: &PredicateCall, world: &dyn World) -> EvalResult<bool> {
        let predicate = self.lookup(&call.name)?;
        let args = self.resolve_args(predicate, call, world)?;
        let value = predicate.call(&args)?;
        debug!(predicate = %call, value, "evaluated predicate");
        Ok(value)
    }

    /// Evaluate a goal formula.
    pub fn evaluate(&self, goal: &GoalExpr, world: &dyn World) -> EvalResult<bool> {
        walk(goal, &mut |call| self.evaluate_call(call, world))
    }

    /// A list of goal states holds iff every invocation holds.
    pub fn is_satisfied(&self, goal_states: &[PredicateCall], world: &dyn World) -> EvalResult<bool> {
        let mut all = true;
        for call in goal_states {
            all &= self.evaluate_call(call, world)?;
        }
        Ok(all)
    }

    /// Evaluate a goal and record each atom's outcome.
    pub fn report(&self, goal: &GoalExpr, world: &dyn World) -> GoalReport {
        let mut atoms = Vec::new();
        let overall = walk(goal, &mut |call| {
            let outcome = self.evaluate_call(call, world);
            atoms.push(AtomOutcome {
                predicate: call.to_string(),
                value: outcome.as_ref().ok().copied(),
                error: outcome.as_ref().err().map(ToString::to_string),
            });
            outcome
        });
        GoalReport {
            satisfied: matches!(overall, Ok(true)),
            error: overall.err().map(|e| e.to_string()),
            atoms,
        }
    }
}

fn resolve_term<'w>(
    call: &PredicateCall,
    position: usize,
    kind: ArgKind,
    term: &Term,
    world: &'w dyn World,
) -> EvalResult<Arg<'w>> {
    let mismatch = || EvalError::TypeMismatch {
        predicate: call.name.clone(),
        position,
        expected: kind.to_string(),
        actual: term.to_string(),
    };
    match (kind, term) {
        (ArgKind::Number, Term::Number(n)) => Ok(Arg::Number(*n)),
        (ArgKind::Axis, Term::Symbol(s)) => s.parse::<Axis>().map(Arg::Axis).map_err(|_| mismatch()),
        (ArgKind::Object, Term::Symbol(s)) => world
            .object_state(s)
            .map(Arg::Object)
            .ok_or_else(|| EvalError::UnknownObject {
                predicate: call.name.clone(),
                name: s.clone(),
            }),
        _ => Err(mismatch()),
    }
}

/// Children of `And`/`Or` are all evaluated so errors and side effects surface in order.
fn walk(
    goal: &GoalExpr,
    atom: &mut dyn FnMut(&PredicateCall) -> EvalResult<bool>,
) -> EvalResult<bool> {
    match goal {
        GoalExpr::Atom(call) => atom(call),
        GoalExpr::And(children) => {
            let mut all = true;
            let mut first_error = None;
            for child in children {
                match walk(child, atom) {
                    Ok(value) => all &= value,
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }
            first_error.map_or(Ok(all), Err)
        }
        GoalExpr::Or(children) => {
            let mut any = false;
            let mut first_error = None;
            for child in children {
                match walk(child, atom) {
                    Ok(value) => any |= value,
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }
            first_error.map_or(Ok(any), Err)
        }
        GoalExpr::Not(inner) => walk(inner, atom).map(|v| !v),
    }
}
