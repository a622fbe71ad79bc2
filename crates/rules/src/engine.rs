//! Recursive validation of a value tree against a path-keyed rule set.
//!
//! A call to [`Validator::validate_tree`] runs three phases over a private
//! session:
//!
//! 1. **Merge**: declared record rules are folded into a copy of the
//!    caller's rule set (explicit entries win).
//! 2. **Traverse**: depth-first from the root. Every path is marked visited
//!    before its rules run. A container whose own rules fail is not
//!    descended into: its children are neither evaluated nor visited.
//! 3. **Sweep**: every rule-set path carrying `required` that was never
//!    visited gets a required error, covering fields absent from the input
//!    as well as fields cut off by a failing parent.
//!
//! Per-field failures accumulate in the [`ErrorMap`]. Unknown rules, scalar
//! roots, non-string map keys and predicate hard errors abort the call with
//! a [`ValidateError`].

use std::collections::HashSet;
use std::sync::Arc;

use fieldguard_core::{Config, ToValue, Value};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{RuleSetError, ValidateError};
use crate::merge::merge_declared_rules;
use crate::messages::{MessageCatalog, MessageContext};
use crate::path;
use crate::registry::RuleRegistry;
use crate::rule_set::RuleSet;
use crate::rule_spec::RuleSpec;
use crate::sweep::sweep_required;

// ── Error map ───────────────────────────────────────────────────────

/// Field path → error message, in the order failures were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    errors: IndexMap<String, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` at `path` unless the path already has an error.
    /// Returns whether it was recorded.
    pub(crate) fn record(&mut self, path: &str, message: String) -> bool {
        if self.errors.contains_key(path) {
            return false;
        }
        self.errors.insert(path.to_string(), message);
        true
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.errors.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.errors
    }
}

impl IntoIterator for ErrorMap {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// ── Validator ───────────────────────────────────────────────────────

/// Validates values against rule sets using a frozen registry and a
/// message catalog. Cheap to clone and safe to share between threads; all
/// per-call state lives in a private session.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    messages: MessageCatalog,
    separator: char,
}

impl Validator {
    pub fn new(registry: Arc<RuleRegistry>, messages: MessageCatalog) -> Self {
        Self {
            registry,
            messages,
            separator: fieldguard_core::config::DEFAULT_RULE_SEPARATOR,
        }
    }

    /// Separator between rules in record fields' declared rule lists.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Process-wide registry, default messages plus any override file and
    /// separator named by `config`.
    pub fn from_config(config: &Config) -> Result<Self, RuleSetError> {
        let mut messages = MessageCatalog::default();
        if let Some(path) = &config.messages_path {
            messages = messages.with_overrides_file(path)?;
        }
        let registry = RuleRegistry::global();
        for rule in messages.rules() {
            if !registry.contains(rule) {
                tracing::warn!(rule, "message template for a rule that is not registered");
            }
        }
        Ok(Self::new(registry, messages).with_separator(config.rule_separator))
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Check one value against an explicit rule list, in order. Returns the
    /// first failing rule's message, or `None` when every rule passes.
    pub fn validate_field(
        &self,
        path: &str,
        value: &Value,
        rules: &[RuleSpec],
    ) -> Result<Option<String>, ValidateError> {
        for spec in rules {
            let predicate = self
                .registry
                .get(spec.name())
                .ok_or_else(|| ValidateError::UnknownRule {
                    rule: spec.name().to_string(),
                    path: path.to_string(),
                })?;

            let passed = predicate
                .check(path, value, spec.arg())
                .map_err(|source| ValidateError::Predicate {
                    rule: spec.name().to_string(),
                    path: path.to_string(),
                    source,
                })?;

            if !passed {
                trace!(path, rule = %spec, "rule failed");
                return self.message(path, spec, Some(value)).map(Some);
            }
        }
        Ok(None)
    }

    /// Validate a whole tree. The root must be a record, map or sequence.
    /// `rules` is never modified; declared rules are merged into a copy.
    pub fn validate_tree(&self, root: &Value, rules: &RuleSet) -> Result<ErrorMap, ValidateError> {
        let kind = root.kind();
        if !kind.is_container() {
            return Err(ValidateError::InvalidRoot { kind });
        }

        let mut session = Session {
            validator: self,
            rules: rules.clone(),
            errors: ErrorMap::new(),
            visited: HashSet::new(),
        };

        let merged = merge_declared_rules(root, &mut session.rules, self.separator);
        session.validate_by_kind("", root)?;
        let swept = sweep_required(
            &session.rules,
            &session.visited,
            &mut session.errors,
            |field| self.message(field, &RuleSpec::parse(crate::rule_spec::REQUIRED), None),
        )?;

        debug!(
            merged,
            visited = session.visited.len(),
            errors = session.errors.len(),
            missing = swept,
            "validation finished"
        );
        Ok(session.errors)
    }

    /// Convert `data` with [`ToValue`] and validate it.
    pub fn validate<T: ToValue + ?Sized>(
        &self,
        data: &T,
        rules: &RuleSet,
    ) -> Result<ErrorMap, ValidateError> {
        self.validate_tree(&data.to_value(), rules)
    }

    fn message(
        &self,
        field: &str,
        spec: &RuleSpec,
        value: Option<&Value>,
    ) -> Result<String, ValidateError> {
        self.messages.render(&MessageContext {
            field,
            name: path::last_segment(field),
            rule: spec.name(),
            arg: spec.arg(),
            value,
        })
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleRegistry::global(), MessageCatalog::default())
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// State owned by one `validate_tree` call.
struct Session<'v> {
    validator: &'v Validator,
    rules: RuleSet,
    errors: ErrorMap,
    visited: HashSet<String>,
}

impl Session<'_> {
    fn validate_by_kind(&mut self, at: &str, value: &Value) -> Result<(), ValidateError> {
        self.visited.insert(at.to_string());

        let failure = self
            .validator
            .validate_field(at, value, self.rules.resolve(at))?;
        if let Some(message) = failure {
            if value.kind().is_container() {
                trace!(path = at, "container rule failed, children skipped");
            }
            self.errors.record(at, message);
            return Ok(());
        }

        match value {
            Value::Scalar(_) => {}
            Value::Record(record) => {
                for field in record.exported_fields() {
                    self.validate_by_kind(&path::join(at, &field.name), &field.value)?;
                }
            }
            Value::Map(entries) => {
                for (key, child) in entries {
                    let segment = key.as_str().ok_or_else(|| ValidateError::NonStringKey {
                        path: at.to_string(),
                        key: key.to_string(),
                        key_type: key.type_name(),
                    })?;
                    self.validate_by_kind(&path::join(at, segment), child)?;
                }
            }
            Value::Sequence(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.validate_by_kind(&path::join(at, &i.to_string()), child)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldguard_core::{MapKey, Record};

    fn validator() -> Validator {
        Validator::new(
            Arc::new(RuleRegistry::with_builtins()),
            MessageCatalog::default(),
        )
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = validator()
            .validate_tree(&Value::string("x"), &RuleSet::new())
            .unwrap_err();
        assert!(matches!(err, ValidateError::InvalidRoot { .. }));
    }

    #[test]
    fn unknown_rule_aborts() {
        let rules = RuleSet::new().rule("name", ["no_such_rule"]);
        let root = Value::map([("name", Value::string("ada"))]);
        let err = validator().validate_tree(&root, &rules).unwrap_err();
        assert!(
            matches!(err, ValidateError::UnknownRule { ref rule, ref path } if rule == "no_such_rule" && path == "name")
        );
    }

    #[test]
    fn unknown_rule_after_a_failure_is_not_reached() {
        let v = validator();
        let rules = [RuleSpec::parse("required"), RuleSpec::parse("no_such_rule")];
        let msg = v.validate_field("name", &Value::string(""), &rules).unwrap();
        assert_eq!(msg.as_deref(), Some("The name field is required"));
    }

    #[test]
    fn non_string_key_aborts() {
        let mut entries = fieldguard_core::ValueMap::new();
        entries.insert(MapKey::Int(1), Value::string("one"));
        let root = Value::map([("lookup", Value::Map(entries))]);
        let err = validator().validate_tree(&root, &RuleSet::new()).unwrap_err();
        assert!(
            matches!(err, ValidateError::NonStringKey { ref path, key_type: "int", .. } if path == "lookup")
        );
    }

    #[test]
    fn non_string_key_under_failed_parent_is_never_reached() {
        let mut entries = fieldguard_core::ValueMap::new();
        entries.insert(MapKey::Int(1), Value::string("one"));
        let root = Value::map([("lookup", Value::Map(entries))]);
        let rules = RuleSet::new().rule("lookup", ["max_len:0"]);
        let errors = validator().validate_tree(&root, &rules).unwrap();
        assert!(errors.contains("lookup"));
    }

    #[test]
    fn predicate_hard_error_aborts() {
        let rules = RuleSet::new().rule("age", ["min:eighteen"]);
        let root = Value::map([("age", Value::int(20))]);
        let err = validator().validate_tree(&root, &rules).unwrap_err();
        assert!(matches!(err, ValidateError::Predicate { ref rule, .. } if rule == "min"));
    }

    #[test]
    fn records_skip_hidden_fields() {
        let record = Record::new("Account")
            .field("login", Value::string("ada"))
            .hidden("token", Value::string(""));
        let rules = RuleSet::new().rule("token", ["required"]);
        let errors = validator().validate_tree(&Value::Record(record), &rules).unwrap();
        // Never traversed, so the sweep reports it missing.
        assert_eq!(errors.get("token"), Some("The token field is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn sequence_root_uses_index_paths() {
        let root = Value::sequence(vec![Value::string("a"), Value::int(2)]);
        let rules = RuleSet::new().rule("*", ["kind:string"]);
        let errors = validator().validate_tree(&root, &rules).unwrap();
        assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["1"]);
    }

    #[test]
    fn root_rules_apply_to_the_empty_path() {
        let root = Value::map(Vec::<(&str, Value)>::new());
        let rules = RuleSet::new().rule("", ["required"]);
        let errors = validator().validate_tree(&root, &rules).unwrap();
        assert!(errors.contains(""));
    }

    #[test]
    fn error_map_serializes_as_object() {
        let mut errors = ErrorMap::new();
        assert!(errors.record("a", "first".into()));
        assert!(!errors.record("a", "second".into()));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"a": "first"}));
    }

    #[test]
    fn typed_data_validates_through_to_value() {
        let mut data = std::collections::BTreeMap::new();
        data.insert("email".to_string(), "not-an-email".to_string());
        let rules = RuleSet::new().rule("email", ["email"]);
        let errors = validator().validate(&data, &rules).unwrap();
        assert!(errors.contains("email"));
    }
}
