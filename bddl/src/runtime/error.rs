//! Error types for predicate lookup and evaluation.

/// Failures raised while resolving or evaluating a predicate invocation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unknown predicate '{name}'")]
    UnknownPredicate { name: String },

    #[error("predicate '{predicate}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        predicate: String,
        expected: String,
        actual: usize,
    },

    #[error("predicate '{predicate}' argument {position}: expected {expected}, got {actual}")]
    TypeMismatch {
        predicate: String,
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("predicate '{predicate}' references unknown object '{name}'")]
    UnknownObject { predicate: String, name: String },

    #[error("predicate '{predicate}': {message}")]
    InvalidArgument { predicate: String, message: String },
}

pub type EvalResult<T> = Result<T, EvalError>;
