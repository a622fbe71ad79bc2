use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

pub const DEFAULT_RULE_SEPARATOR: char = '|';

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Separator between rules in a field's declared rule list.
    pub rule_separator: char,
    /// Optional YAML file of message template overrides.
    pub messages_path: Option<PathBuf>,
    /// Default tracing filter for binaries when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `FIELDGUARD_PROFILE`. When set (e.g. `STRICT`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("FIELDGUARD_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();

        let separator = profiled_env_opt(p, "FIELDGUARD_RULE_SEPARATOR");
        let rule_separator = match separator.as_deref().map(parse_separator) {
            Some(Some(c)) => c,
            Some(None) => {
                tracing::warn!(
                    value = ?separator,
                    "FIELDGUARD_RULE_SEPARATOR must be a single character, using '|'"
                );
                DEFAULT_RULE_SEPARATOR
            }
            None => DEFAULT_RULE_SEPARATOR,
        };

        Self {
            profile: p.to_string(),
            rule_separator,
            messages_path: profiled_env_opt(p, "FIELDGUARD_MESSAGES").map(PathBuf::from),
            log_filter: profiled_env_or(p, "FIELDGUARD_LOG", "warn"),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() {
            "default"
        } else {
            &self.profile
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: String::new(),
            rule_separator: DEFAULT_RULE_SEPARATOR,
            messages_path: None,
            log_filter: "warn".to_string(),
        }
    }
}

fn parse_separator(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != ':' && c != '.' => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_must_be_one_char() {
        assert_eq!(parse_separator(","), Some(','));
        assert_eq!(parse_separator("||"), None);
        assert_eq!(parse_separator(""), None);
    }

    #[test]
    fn separator_cannot_collide_with_argument_or_path_syntax() {
        assert_eq!(parse_separator(":"), None);
        assert_eq!(parse_separator("."), None);
    }

    #[test]
    fn profiled_lookup_prefers_prefixed_key() {
        env::set_var("FGTEST_FIELDGUARD_LOG", "debug");
        env::set_var("FIELDGUARD_LOG", "info");
        let cfg = Config::for_profile("fgtest");
        assert_eq!(cfg.profile, "FGTEST");
        assert_eq!(cfg.log_filter, "debug");
        assert_eq!(cfg.profile_label(), "FGTEST");
        env::remove_var("FGTEST_FIELDGUARD_LOG");
        env::remove_var("FIELDGUARD_LOG");
    }

    #[test]
    fn default_profile_label() {
        assert_eq!(Config::default().profile_label(), "default");
        assert_eq!(Config::default().rule_separator, '|');
    }
}
