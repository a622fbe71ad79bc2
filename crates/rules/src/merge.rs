//! Declared-rule merging.
//!
//! Before traversal, the value tree is walked once to collect rule lists
//! declared on record fields. Each one is inserted under the field's path
//! unless the rule set already has an entry for that exact path: explicit
//! rules always win, declarations only fill gaps.

use fieldguard_core::{Record, Value};
use tracing::{debug, trace};

use crate::path;
use crate::rule_set::RuleSet;
use crate::rule_spec::split_rule_list;

/// Fold declared rules found anywhere under `root` into `rules`.
/// Returns the number of entries added.
pub fn merge_declared_rules(root: &Value, rules: &mut RuleSet, separator: char) -> usize {
    let mut merger = Merger {
        rules,
        separator,
        added: 0,
    };
    merger.walk("", root);
    merger.added
}

struct Merger<'a> {
    rules: &'a mut RuleSet,
    separator: char,
    added: usize,
}

impl Merger<'_> {
    fn walk(&mut self, at: &str, value: &Value) {
        match value {
            Value::Record(record) => self.walk_record(at, record),
            Value::Map(entries) => {
                for (key, child) in entries {
                    // Keys that cannot form a path carry no addressable
                    // declarations; traversal reports them if it gets there.
                    let Some(segment) = key.as_str() else {
                        trace!(path = at, key = %key, "merger skipping non-string key");
                        continue;
                    };
                    self.descend(&path::join(at, segment), child);
                }
            }
            Value::Sequence(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.descend(&path::join(at, &i.to_string()), child);
                }
            }
            Value::Scalar(_) => {}
        }
    }

    fn walk_record(&mut self, at: &str, record: &Record) {
        for field in record.exported_fields() {
            let field_path = path::join(at, &field.name);

            if let Some(declared) = field.declared_rules.as_deref() {
                let specs = split_rule_list(declared, self.separator);
                if !specs.is_empty() {
                    if self.rules.insert_if_absent(&field_path, specs) {
                        self.added += 1;
                    } else {
                        debug!(
                            path = %field_path,
                            record = record.type_name(),
                            "explicit rules take precedence over declared rules"
                        );
                    }
                }
            }

            self.descend(&field_path, &field.value);
        }
    }

    fn descend(&mut self, at: &str, child: &Value) {
        if child.kind().is_container() {
            self.walk(at, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_spec::RuleSpec;

    fn names(set: &RuleSet, path: &str) -> Vec<String> {
        set.get(path)
            .unwrap_or_default()
            .iter()
            .map(RuleSpec::to_string)
            .collect()
    }

    fn user(email: &str) -> Record {
        Record::new("User")
            .tagged("email", Value::string(email), "required|email")
            .field("nickname", Value::string("ada"))
    }

    #[test]
    fn declared_rules_fill_gaps() {
        let mut set = RuleSet::new();
        let added = merge_declared_rules(&Value::Record(user("a@b.io")), &mut set, '|');
        assert_eq!(added, 1);
        assert_eq!(names(&set, "email"), vec!["required", "email"]);
        assert!(!set.contains("nickname"));
    }

    #[test]
    fn explicit_entries_win() {
        let mut set = RuleSet::new().rule("email", ["kind:string"]);
        let added = merge_declared_rules(&Value::Record(user("a@b.io")), &mut set, '|');
        assert_eq!(added, 0);
        assert_eq!(names(&set, "email"), vec!["kind:string"]);
    }

    #[test]
    fn walks_maps_and_sequences_to_nested_records() {
        let root = Value::map([(
            "team",
            Value::map([(
                "members",
                Value::sequence(vec![Value::Record(user("x")), Value::Record(user("y"))]),
            )]),
        )]);
        let mut set = RuleSet::new();
        assert_eq!(merge_declared_rules(&root, &mut set, '|'), 2);
        assert!(set.contains("team.members.0.email"));
        assert!(set.contains("team.members.1.email"));
    }

    #[test]
    fn tagged_container_fields_are_still_walked() {
        let inner = Record::new("Address").tagged("city", Value::string(""), "required");
        let outer = Record::new("Customer").tagged("address", Value::Record(inner), "required");
        let mut set = RuleSet::new();
        merge_declared_rules(&Value::Record(outer), &mut set, '|');
        assert_eq!(names(&set, "address"), vec!["required"]);
        assert_eq!(names(&set, "address.city"), vec!["required"]);
    }

    #[test]
    fn hidden_fields_contribute_nothing() {
        let secret = Record::new("Secret").tagged("pin", Value::string(""), "required");
        let record = Record::new("Account").hidden("secret", Value::Record(secret));
        let mut set = RuleSet::new();
        assert_eq!(merge_declared_rules(&Value::Record(record), &mut set, '|'), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn honours_custom_separator() {
        let record = Record::new("User").tagged("age", Value::int(3), "required,min:18");
        let mut set = RuleSet::new();
        merge_declared_rules(&Value::Record(record), &mut set, ',');
        assert_eq!(names(&set, "age"), vec!["required", "min:18"]);
    }
}
