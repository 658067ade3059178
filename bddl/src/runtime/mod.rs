//! BDDL Runtime
//!
//! Predicate library, registry and goal evaluation. The simulator is reached
//! only through the [`World`] and [`ObjectState`] traits.

pub mod error;
pub mod evaluator;
pub mod object_state;
pub mod predicates;
pub mod registry;

pub use error::{EvalError, EvalResult};
pub use evaluator::{AtomOutcome, GoalEvaluator, GoalReport};
pub use object_state::{GeomState, ObjectState, World, DEFAULT_ONTOP_XY_THRESHOLD};
pub use predicates::{Arg, ArgKind, BuiltinPredicate, Signature};
pub use registry::{CustomPredicate, Predicate, PredicateFn, PredicateRegistry};
