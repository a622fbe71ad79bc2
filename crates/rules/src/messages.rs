//! Per-rule error message templates rendered with minijinja.
//!
//! Templates see `field` (the full path), `name` (its last segment), `rule`,
//! `arg` and `value`. The required-field sweep renders the `required`
//! template with `value` set to none, since the field never existed.
//!
//! Templates are arbitrary strings, so a fresh [`minijinja::Environment`] is
//! created per render call.

use std::collections::HashMap;
use std::path::Path;

use fieldguard_core::Value;
use serde::Serialize;

use crate::error::{RuleSetError, ValidateError};

/// Fallback used for rules without a template of their own.
pub const DEFAULT_TEMPLATE: &str = "The {{ field }} field is invalid";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("required", "The {{ field }} field is required"),
    ("kind", "The {{ field }} field must be of type {{ arg }}"),
    ("string", "The {{ field }} field must be a string"),
    ("numeric", "The {{ field }} field must be numeric"),
    ("bool", "The {{ field }} field must be a boolean"),
    ("min", "The {{ field }} field must be at least {{ arg }}"),
    ("max", "The {{ field }} field may not be greater than {{ arg }}"),
    ("len", "The {{ field }} field must have length {{ arg }}"),
    ("min_len", "The {{ field }} field must have at least {{ arg }} elements"),
    ("max_len", "The {{ field }} field may not have more than {{ arg }} elements"),
    ("between", "The {{ field }} field must be between {{ arg | replace(',', ' and ') }}"),
    ("in", "The selected {{ field }} is invalid"),
    ("not_in", "The selected {{ field }} is invalid"),
    ("alpha", "The {{ field }} field may only contain letters"),
    ("alpha_num", "The {{ field }} field may only contain letters and numbers"),
    ("email", "The {{ field }} field must be a valid email address"),
    ("url", "The {{ field }} field must be a valid URL"),
];

/// Data exposed to message templates.
#[derive(Debug, Serialize)]
pub struct MessageContext<'a> {
    pub field: &'a str,
    pub name: &'a str,
    pub rule: &'a str,
    pub arg: Option<&'a str>,
    pub value: Option<&'a Value>,
}

/// Rule name → message template.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalog with no rule-specific templates; every rule uses the fallback.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Set (or replace) the template for `rule` after checking its syntax.
    pub fn with_template(
        mut self,
        rule: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<Self, RuleSetError> {
        let rule = rule.into();
        let template = template.into();
        let env = minijinja::Environment::new();
        env.template_from_str(&template)
            .map_err(|e| RuleSetError::Template {
                rule: rule.clone(),
                reason: e.to_string(),
            })?;
        self.templates.insert(rule, template);
        Ok(self)
    }

    /// Apply overrides from a YAML mapping of `rule: template`.
    pub fn with_overrides_yaml(self, yaml: &str) -> Result<Self, RuleSetError> {
        let overrides: HashMap<String, String> = serde_yaml::from_str(yaml)?;
        let mut catalog = self;
        for (rule, template) in overrides {
            catalog = catalog.with_template(rule, template)?;
        }
        Ok(catalog)
    }

    /// Apply overrides from a YAML file.
    pub fn with_overrides_file(self, path: &Path) -> Result<Self, RuleSetError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| RuleSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.with_overrides_yaml(&yaml)
    }

    pub fn template(&self, rule: &str) -> &str {
        self.templates
            .get(rule)
            .map(String::as_str)
            .unwrap_or(DEFAULT_TEMPLATE)
    }

    /// Rules with a dedicated template, sorted.
    pub fn rules(&self) -> Vec<&str> {
        let mut rules: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        rules.sort_unstable();
        rules
    }

    /// Render the message for `ctx.rule`. A template that renders to blank
    /// text falls back to [`DEFAULT_TEMPLATE`] so failures always carry a
    /// non-empty message.
    pub fn render(&self, ctx: &MessageContext<'_>) -> Result<String, ValidateError> {
        let env = minijinja::Environment::new();
        let render = |template: &str| {
            env.render_str(template, ctx)
                .map_err(|e| ValidateError::Message {
                    rule: ctx.rule.to_string(),
                    reason: e.to_string(),
                })
        };
        let message = render(self.template(ctx.rule))?;
        if message.trim().is_empty() {
            return render(DEFAULT_TEMPLATE);
        }
        Ok(message)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES
                .iter()
                .map(|&(rule, template)| (rule.to_string(), template.to_string()))
                .collect(),
        }
    }
}
