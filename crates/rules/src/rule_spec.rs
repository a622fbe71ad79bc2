//! Single-rule specs: `name` or `name:argument`.
//!
//! The name ends at the FIRST colon. Everything after it, further colons
//! included, is the argument and reaches the predicate untouched, so
//! `regex:^a:b$` has name `regex` and argument `^a:b$`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RuleSetError;

/// Name of the rule the required-field sweep looks for.
pub const REQUIRED: &str = "required";

/// A named check plus an optional opaque argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSpec {
    name: String,
    arg: Option<String>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, arg: Option<&str>) -> Self {
        Self {
            name: name.into(),
            arg: arg.map(str::to_string),
        }
    }

    /// Split a spec string on its first colon. Never fails; an empty name is
    /// only rejected by [`FromStr`] and the rule-set loaders.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((name, arg)) => Self {
                name: name.trim().to_string(),
                arg: Some(arg.to_string()),
            },
            None => Self {
                name: spec.trim().to_string(),
                arg: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.name == REQUIRED
    }
}

impl FromStr for RuleSpec {
    type Err = RuleSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = RuleSpec::parse(s);
        if spec.name.is_empty() {
            return Err(RuleSetError::MalformedSpec {
                path: String::new(),
                spec: s.to_string(),
            });
        }
        Ok(spec)
    }
}

impl From<&str> for RuleSpec {
    fn from(s: &str) -> Self {
        RuleSpec::parse(s)
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}:{}", self.name, arg),
            None => f.write_str(&self.name),
        }
    }
}

impl Serialize for RuleSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Split a separator-delimited rule list (`"required|min:3"`) into specs,
/// keeping declaration order. Blank entries are skipped.
pub fn split_rule_list(raw: &str, separator: char) -> Vec<RuleSpec> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RuleSpec::parse)
        .collect()
}
