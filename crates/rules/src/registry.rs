//! Name → predicate table.
//!
//! Lifecycle is single-writer-then-many-readers: a [`RuleRegistry`] is built
//! mutably with [`RuleRegistry::register`], then frozen behind an [`Arc`] and
//! only read from. The process-wide default is installed at most once, before
//! any validation traffic, and is read-only afterwards.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use fieldguard_core::Value;

use crate::builtin;
use crate::error::{PredicateError, RegistryError};

/// A validation check.
///
/// `Ok(true)` means the value passes, `Ok(false)` is a validation failure
/// (reported at `path` with the rule's message), and `Err` is a hard error
/// that aborts the whole validation call.
pub trait Predicate: Send + Sync {
    fn check(&self, path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError>;
}

impl<F> Predicate for F
where
    F: Fn(&str, &Value, Option<&str>) -> Result<bool, PredicateError> + Send + Sync,
{
    fn check(&self, path: &str, value: &Value, arg: Option<&str>) -> Result<bool, PredicateError> {
        self(path, value, arg)
    }
}

static GLOBAL: OnceLock<Arc<RuleRegistry>> = OnceLock::new();

/// Registered predicates, keyed by rule name.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Predicate>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in rule.
    pub fn with_builtins() -> Self {
        let rules = builtin::BUILTINS
            .iter()
            .map(|&(name, predicate)| (name.to_string(), Arc::new(predicate) as Arc<dyn Predicate>))
            .collect();
        Self { rules }
    }

    /// Register a predicate. Returns error if name already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Predicate + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.rules.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        tracing::debug!(rule = %name, "registered validation rule");
        self.rules.insert(name, Arc::new(predicate));
        Ok(())
    }

    /// Look up a predicate by name.
    pub fn get(&self, name: &str) -> Option<&dyn Predicate> {
        self.rules.get(name).map(|p| p.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The process-wide registry. Initialised with the built-ins on first
    /// use unless [`install_global`](Self::install_global) ran earlier.
    pub fn global() -> Arc<RuleRegistry> {
        GLOBAL
            .get_or_init(|| Arc::new(RuleRegistry::with_builtins()))
            .clone()
    }

    /// Install `registry` as the process-wide registry. Must run before the
    /// first call to [`global`](Self::global); later installs fail.
    pub fn install_global(registry: RuleRegistry) -> Result<(), RegistryError> {
        GLOBAL
            .set(Arc::new(registry))
            .map_err(|_| RegistryError::AlreadyInstalled)
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
