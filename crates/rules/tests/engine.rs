//! End-to-end behaviour of `Validator::validate_tree`: ordering, parent
//! blocking, wildcard fallback, declared-rule precedence and the
//! required-field sweep.

use std::sync::Arc;

use fieldguard_core::{Record, Value};
use fieldguard_rules::{
    MessageCatalog, PredicateError, RuleRegistry, RuleSet, RuleSpec, ValidateError, Validator,
};

const REQUIRED_MSG: &str = "is required";
const KIND_MSG: &str = "must be of type";

fn validator() -> Validator {
    Validator::new(
        Arc::new(RuleRegistry::with_builtins()),
        MessageCatalog::default(),
    )
}

fn json(v: serde_json::Value) -> Value {
    Value::from(v)
}

// ── Ordering ────────────────────────────────────────────────

#[test]
fn first_failing_rule_wins() {
    let rules = RuleSet::new().rule("name", ["required", "kind:string"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"name": ""})), &rules)
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors.get("name").unwrap().contains(REQUIRED_MSG));
}

#[test]
fn later_rules_are_skipped_after_a_failure() {
    // `min:5` would fail too; only the earlier `kind` failure surfaces.
    let rules = RuleSet::new().rule("age", ["kind:string", "min:50"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"age": 30})), &rules)
        .unwrap();
    assert!(errors.get("age").unwrap().contains(KIND_MSG));
}

#[test]
fn sibling_fields_are_still_evaluated() {
    let rules = RuleSet::new()
        .rule("name", ["required", "kind:string"])
        .rule("age", ["kind:string"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"name": "", "age": 30})), &rules)
        .unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("name"), Some("The name field is required"));
    assert_eq!(errors.get("age"), Some("The age field must be of type string"));
}

// ── Nesting ─────────────────────────────────────────────────

#[test]
fn nested_paths_are_addressed_with_dots() {
    let rules = RuleSet::new().rule("user.id", ["kind:string"]);

    let errors = validator()
        .validate_tree(&json(serde_json::json!({"user": {"id": 5}})), &rules)
        .unwrap();
    assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["user.id"]);
    assert!(errors.get("user.id").unwrap().contains(KIND_MSG));

    let errors = validator()
        .validate_tree(&json(serde_json::json!({"user": {"id": "5"}})), &rules)
        .unwrap();
    assert!(errors.is_empty());
}

#[test]
fn failing_parent_blocks_children_and_sweep_reports_them() {
    let rules = RuleSet::new()
        .rule("settings", ["required"])
        .rule("settings.child", ["required"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"settings": {}})), &rules)
        .unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains("settings"));
    assert_eq!(
        errors.get("settings.child"),
        Some("The settings.child field is required")
    );
}

#[test]
fn failing_parent_hides_child_errors_without_required() {
    let rules = RuleSet::new()
        .rule("items", ["max_len:1"])
        .rule("items.*", ["kind:string"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"items": [1, 2]})), &rules)
        .unwrap();
    assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["items"]);
}

// ── Wildcards ───────────────────────────────────────────────

#[test]
fn wildcard_applies_to_unlisted_children() {
    let rules = RuleSet::new().rule("list.*", ["kind:string"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"list": ["a", 1]})), &rules)
        .unwrap();
    assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["list.1"]);
}

#[test]
fn exact_entry_shadows_wildcard() {
    let rules = RuleSet::new()
        .rule("list.*", ["kind:string"])
        .rule("list.1", ["kind:int"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"list": ["a", 1]})), &rules)
        .unwrap();
    assert!(errors.is_empty());
}

#[test]
fn wildcard_over_map_keys() {
    let rules = RuleSet::new().rule("scores.*", ["between:0,100"]);
    let errors = validator()
        .validate_tree(
            &json(serde_json::json!({"scores": {"math": 90, "art": 120}})),
            &rules,
        )
        .unwrap();
    assert_eq!(
        errors.get("scores.art"),
        Some("The scores.art field must be between 0 and 100")
    );
    assert!(!errors.contains("scores.math"));
}

// ── Required sweep ──────────────────────────────────────────

#[test]
fn required_field_absent_from_input() {
    let rules = RuleSet::new().rule("email", ["required"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({})), &rules)
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("email"), Some("The email field is required"));
}

#[test]
fn present_but_null_is_caught_during_traversal() {
    let rules = RuleSet::new().rule("email", ["required"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({"email": null})), &rules)
        .unwrap();
    assert_eq!(errors.get("email"), Some("The email field is required"));
}

#[test]
fn required_child_wildcard_is_reported_when_never_visited() {
    let rules = RuleSet::new()
        .rule("*", ["required"])
        .rule("tags.*", ["required"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({})), &rules)
        .unwrap();
    assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["tags.*"]);
    assert_eq!(errors.get("tags.*"), Some("The tags.* field is required"));
}

#[test]
fn missing_optional_fields_are_not_errors() {
    let rules = RuleSet::new().rule("nickname", ["min_len:3"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({})), &rules)
        .unwrap();
    assert!(errors.is_empty());
}

// ── Declared rules ──────────────────────────────────────────

fn signup(email: &str, age: i64) -> Value {
    Record::new("Signup")
        .tagged("email", Value::string(email), "required|email")
        .tagged("age", Value::int(age), "min:18")
        .into()
}

#[test]
fn declared_rules_are_applied() {
    let errors = validator()
        .validate_tree(&signup("not-an-email", 12), &RuleSet::new())
        .unwrap();
    assert_eq!(
        errors.get("email"),
        Some("The email field must be a valid email address")
    );
    assert_eq!(errors.get("age"), Some("The age field must be at least 18"));
}

#[test]
fn explicit_rules_override_declared_rules() {
    let rules = RuleSet::new().rule("age", ["min:10"]);
    let errors = validator()
        .validate_tree(&signup("ada@example.com", 12), &rules)
        .unwrap();
    assert!(errors.is_empty());
}

#[test]
fn declared_rules_inside_sequences() {
    let root = Value::map([(
        "signups",
        Value::sequence(vec![signup("ada@example.com", 30), signup("", 30)]),
    )]);
    let errors = validator().validate_tree(&root, &RuleSet::new()).unwrap();
    assert_eq!(errors.paths().collect::<Vec<_>>(), vec!["signups.1.email"]);
}

#[test]
fn declared_rules_do_not_leak_into_the_callers_rule_set() {
    let rules = RuleSet::new().rule("age", ["min:10"]);
    let before = rules.clone();
    validator()
        .validate_tree(&signup("ada@example.com", 12), &rules)
        .unwrap();
    assert_eq!(rules, before);
    assert!(!rules.contains("email"));
}

// ── Fatal conditions ────────────────────────────────────────

#[test]
fn custom_predicates_and_hard_errors() {
    let mut registry = RuleRegistry::with_builtins();
    registry
        .register(
            "multiple_of",
            |_: &str, v: &Value, arg: Option<&str>| -> Result<bool, PredicateError> {
                let raw = arg.ok_or(PredicateError::MissingArgument)?;
                let n: f64 = raw
                    .parse()
                    .map_err(|_| PredicateError::invalid(raw, "not a number"))?;
                Ok(v.as_f64().is_some_and(|x| x % n == 0.0))
            },
        )
        .unwrap();
    let validator = Validator::new(
        Arc::new(registry),
        MessageCatalog::default()
            .with_template("multiple_of", "{{ field }} must be a multiple of {{ arg }}")
            .unwrap(),
    );

    let root = json(serde_json::json!({"qty": 7}));
    let errors = validator
        .validate_tree(&root, &RuleSet::new().rule("qty", ["multiple_of:5"]))
        .unwrap();
    assert_eq!(errors.get("qty"), Some("qty must be a multiple of 5"));

    let err = validator
        .validate_tree(&root, &RuleSet::new().rule("qty", ["multiple_of"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ValidateError::Predicate {
            source: PredicateError::MissingArgument,
            ..
        }
    ));
}

#[test]
fn rules_on_absent_fields_are_not_evaluated() {
    // `required` is known; a bogus rule next to it on an absent field is
    // never evaluated, only the sweep sees the entry.
    let rules = RuleSet::new().rule("email", ["required", "bogus"]);
    let errors = validator()
        .validate_tree(&json(serde_json::json!({})), &rules)
        .unwrap();
    assert!(errors.contains("email"));
}

#[test]
fn validate_field_reports_first_failure() {
    let v = validator();
    let rules = vec![RuleSpec::parse("required"), RuleSpec::parse("min_len:3")];
    assert_eq!(v.validate_field("nick", &Value::string("ada"), &rules).unwrap(), None);
    assert_eq!(
        v.validate_field("nick", &Value::string("ad"), &rules).unwrap().as_deref(),
        Some("The nick field must have at least 3 elements")
    );
    assert!(v
        .validate_field("nick", &Value::string("ad"), &[RuleSpec::parse("nope")])
        .is_err());
}
