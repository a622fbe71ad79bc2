//! Required-field sweep: runs after traversal and reports every `required`
//! path the traversal never reached.

use std::collections::HashSet;

use tracing::trace;

use crate::engine::ErrorMap;
use crate::error::ValidateError;
use crate::path::WILDCARD;
use crate::rule_set::RuleSet;

/// Record a required error for each unvisited path whose rule list contains
/// `required`. The global wildcard `*` names no concrete field and is
/// skipped; a `parent.*` entry is reported under its own key like any other
/// path. `render` produces the message for a path. Returns the number of
/// errors added.
pub(crate) fn sweep_required<F>(
    rules: &RuleSet,
    visited: &HashSet<String>,
    errors: &mut ErrorMap,
    mut render: F,
) -> Result<usize, ValidateError>
where
    F: FnMut(&str) -> Result<String, ValidateError>,
{
    let mut added = 0;
    for (field_path, specs) in rules.iter() {
        if field_path == WILDCARD || visited.contains(field_path) {
            continue;
        }
        if !specs.iter().any(|s| s.is_required()) {
            continue;
        }
        trace!(path = field_path, "required field never visited");
        if errors.record(field_path, render(field_path)?) {
            added += 1;
        }
    }
    Ok(added)
}
