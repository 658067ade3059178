//! Process-scoped predicate table.
//!
//! A [`PredicateRegistry`] is built once at start-up and passed explicitly to
//! the evaluator and validator. Keys are lower-case; lookups are
//! case-insensitive so `Open`, `open` and `OPEN` resolve alike.

use crate::runtime::error::EvalResult;
use crate::runtime::predicates::{Arg, BuiltinPredicate, Signature};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub type PredicateFn = Arc<dyn Fn(&[Arg<'_>]) -> EvalResult<bool> + Send + Sync>;

/// Author-supplied predicate registered at start-up.
#[derive(Clone)]
pub struct CustomPredicate {
    pub name: String,
    pub signature: Signature,
    pub func: PredicateFn,
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPredicate")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Predicate {
    Builtin(BuiltinPredicate),
    Custom(CustomPredicate),
}

impl Predicate {
    pub fn name(&self) -> &str {
        match self {
            Predicate::Builtin(b) => b.name(),
            Predicate::Custom(c) => &c.name,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Predicate::Builtin(b) => b.signature(),
            Predicate::Custom(c) => c.signature.clone(),
        }
    }

    pub fn call(&self, args: &[Arg<'_>]) -> EvalResult<bool> {
        match self {
            Predicate::Builtin(b) => b.evaluate(args),
            Predicate::Custom(c) => (c.func)(args),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Predicate::Builtin(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    entries: IndexMap<String, Predicate>,
}

impl PredicateRegistry {
    /// An empty registry; most callers want [`PredicateRegistry::with_builtins`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every [`BuiltinPredicate`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in BuiltinPredicate::ALL {
            registry
                .entries
                .insert(builtin.name().to_string(), Predicate::Builtin(builtin));
        }
        registry
    }

    /// Add or replace a custom predicate. Returns the entry it replaced, if any.
    pub fn register<F>(&mut self, name: &str, signature: Signature, func: F) -> Option<Predicate>
    where
        F: Fn(&[Arg<'_>]) -> EvalResult<bool> + Send + Sync + 'static,
    {
        let key = name.to_lowercase();
        debug!(predicate = %key, %signature, "registering custom predicate");
        self.entries.insert(
            key.clone(),
            Predicate::Custom(CustomPredicate {
                name: key,
                signature,
                func: Arc::new(func),
            }),
        )
    }

    /// Expose an existing predicate under another name, e.g. a spelling alias.
    pub fn alias(&mut self, alias: &str, existing: &str) -> bool {
        match self.get(existing).cloned() {
            Some(predicate) => {
                self.entries.insert(alias.to_lowercase(), predicate);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.entries.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn signature(&self, name: &str) -> Option<Signature> {
        self.get(name).map(Predicate::signature)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::predicates::ArgKind;

    #[test]
    fn test_builtins_are_registered_lowercase() {
        let registry = PredicateRegistry::with_builtins();
        assert_eq!(registry.len(), BuiltinPredicate::ALL.len());
        assert!(registry.contains("Open"));
        assert!(registry.contains("AXISALIGNEDWITHIN"));
        assert!(!registry.contains("stack"));
    }

    #[test]
    fn test_custom_predicate_overrides_builtin() {
        let mut registry = PredicateRegistry::with_builtins();
        let previous = registry.register("Open", Signature::objects(1), |_| Ok(false));
        assert!(previous.map(|p| p.is_builtin()).unwrap_or(false));
        let entry = registry.get("open").expect("open registered");
        assert!(!entry.is_builtin());
        assert_eq!(entry.signature(), Signature::Fixed(vec![ArgKind::Object]));
    }

    #[test]
    fn test_alias_reuses_existing_entry() {
        let mut registry = PredicateRegistry::with_builtins();
        assert!(registry.alias("oncenter", "oncentre"));
        assert!(!registry.alias("ghost", "missing"));
        assert_eq!(registry.get("OnCenter").map(Predicate::name), Some("oncentre"));
    }
}
