//! Path-keyed rule sets.
//!
//! A [`RuleSet`] maps field paths to ordered rule lists. In YAML or JSON each
//! entry is either a list of specs or a single pipe-joined string:
//!
//! ```yaml
//! name: [required, "kind:string"]
//! email: required|email
//! "tags.*": kind:string
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RuleSetError;
use crate::path;
use crate::rule_spec::{split_rule_list, RuleSpec};

/// Separator for pipe-joined entries in rule-set files.
pub const FILE_RULE_SEPARATOR: char = '|';

/// Ordered mapping from field path to rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, RawRules>", into = "IndexMap<String, Vec<RuleSpec>>")]
pub struct RuleSet {
    entries: IndexMap<String, Vec<RuleSpec>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert from spec strings: `.rule("name", ["required"])`.
    pub fn rule<I, S>(mut self, path: impl Into<String>, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(
            path,
            specs.into_iter().map(|s| RuleSpec::parse(s.as_ref())).collect(),
        );
        self
    }

    /// Insert or replace the rule list for `path`.
    pub fn insert(&mut self, path: impl Into<String>, rules: Vec<RuleSpec>) {
        self.entries.insert(path.into(), rules);
    }

    /// Insert only when `path` has no entry yet. Returns whether it inserted.
    pub fn insert_if_absent(&mut self, path: &str, rules: Vec<RuleSpec>) -> bool {
        if self.entries.contains_key(path) {
            return false;
        }
        self.entries.insert(path.to_string(), rules);
        true
    }

    pub fn get(&self, path: &str) -> Option<&[RuleSpec]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Rules that apply to `path`: the exact entry if present, otherwise the
    /// parent's wildcard entry, otherwise nothing.
    pub fn resolve(&self, path: &str) -> &[RuleSpec] {
        if let Some(rules) = self.get(path) {
            return rules;
        }
        path::wildcard_for(path)
            .and_then(|wildcard| self.get(&wildcard))
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleSpec])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a rule set from YAML (JSON is valid YAML).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RuleSetError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl<P: Into<String>> FromIterator<(P, Vec<RuleSpec>)> for RuleSet {
    fn from_iter<T: IntoIterator<Item = (P, Vec<RuleSpec>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(p, r)| (p.into(), r)).collect(),
        }
    }
}

// ── Serde representation ────────────────────────────────────────────

/// On-disk form of one entry's rules.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRules {
    List(Vec<String>),
    Joined(String),
}

impl TryFrom<IndexMap<String, RawRules>> for RuleSet {
    type Error = RuleSetError;

    fn try_from(raw: IndexMap<String, RawRules>) -> Result<Self, Self::Error> {
        let mut entries = IndexMap::with_capacity(raw.len());
        for (field_path, rules) in raw {
            let specs = match rules {
                RawRules::Joined(joined) => split_rule_list(&joined, FILE_RULE_SEPARATOR),
                RawRules::List(list) => {
                    let mut specs = Vec::with_capacity(list.len());
                    for item in &list {
                        let spec = RuleSpec::parse(item);
                        if spec.name().is_empty() {
                            return Err(RuleSetError::MalformedSpec {
                                path: field_path,
                                spec: item.clone(),
                            });
                        }
                        specs.push(spec);
                    }
                    specs
                }
            };
            if let Some(bad) = specs.iter().find(|s| s.name().is_empty()) {
                return Err(RuleSetError::MalformedSpec {
                    path: field_path,
                    spec: bad.to_string(),
                });
            }
            entries.insert(field_path, specs);
        }
        Ok(Self { entries })
    }
}

impl From<RuleSet> for IndexMap<String, Vec<RuleSpec>> {
    fn from(set: RuleSet) -> Self {
        set.entries
    }
}
