//! Error types for the rule engine.
//!
//! Everything here is a *fatal* condition: it aborts the whole validation
//! call. Per-field failures are never errors; they are entries of
//! [`ErrorMap`](crate::ErrorMap).

use std::path::PathBuf;

use fieldguard_core::ValueKind;

/// A validation call could not run to completion.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// The rule set references a rule name that was never registered.
    #[error("unknown rule '{rule}' referenced at '{path}'")]
    UnknownRule { rule: String, path: String },

    /// `validate_tree` was handed a scalar root.
    #[error("root value must be a record, map or sequence, got {kind}")]
    InvalidRoot { kind: ValueKind },

    /// A map key that cannot be used as a path segment.
    #[error("map at '{path}' has a non-string key '{key}' ({key_type})")]
    NonStringKey {
        path: String,
        key: String,
        key_type: &'static str,
    },

    /// A predicate reported a hard error, e.g. a malformed argument.
    #[error("rule '{rule}' failed at '{path}': {source}")]
    Predicate {
        rule: String,
        path: String,
        #[source]
        source: PredicateError,
    },

    /// A message template could not be rendered.
    #[error("message template for rule '{rule}' failed: {reason}")]
    Message { rule: String, reason: String },
}

/// Hard error returned by a predicate. Distinct from a validation failure,
/// which a predicate signals by returning `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredicateError {
    #[error("rule requires an argument")]
    MissingArgument,

    #[error("invalid argument '{arg}': {reason}")]
    InvalidArgument { arg: String, reason: String },
}

impl PredicateError {
    pub fn invalid(arg: &str, reason: impl Into<String>) -> Self {
        PredicateError::InvalidArgument {
            arg: arg.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors from building or installing a [`RuleRegistry`](crate::RuleRegistry).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Rule with name '{0}' is already registered")]
    DuplicateName(String),

    #[error("The process-wide rule registry is already installed")]
    AlreadyInstalled,
}

/// Errors from parsing or loading rule sets and message catalogs.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    /// Filesystem I/O error.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A rule spec without a name, e.g. `":5"` or an empty list entry.
    #[error("malformed rule spec '{spec}' at '{path}'")]
    MalformedSpec { path: String, spec: String },

    /// A message template that does not parse.
    #[error("invalid message template for rule '{rule}': {reason}")]
    Template { rule: String, reason: String },
}
