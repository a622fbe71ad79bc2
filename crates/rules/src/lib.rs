//! Declarative, path-keyed validation of dynamic value trees.
//!
//! This crate provides:
//! - A name → predicate registry with built-in rules
//! - Dotted field paths with `parent.*` wildcard fallback
//! - Merging of rules declared on record fields into explicit rule sets
//! - Recursive traversal where a failing container blocks its children
//! - A sweep that reports `required` fields missing from the input
//! - minijinja message templates and YAML rule-set loading

mod builtin;
pub mod engine;
pub mod error;
pub mod loader;
pub mod merge;
pub mod messages;
pub mod path;
pub mod registry;
pub mod rule_set;
pub mod rule_spec;
mod sweep;

pub use engine::{ErrorMap, Validator};
pub use error::{PredicateError, RegistryError, RuleSetError, ValidateError};
pub use loader::{load_rule_set, LoadResult, LoadStatus, RuleSetLoader};
pub use messages::MessageCatalog;
pub use registry::{Predicate, RuleRegistry};
pub use rule_set::RuleSet;
pub use rule_spec::RuleSpec;
