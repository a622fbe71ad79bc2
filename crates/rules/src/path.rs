//! Dotted field paths.
//!
//! A path is a dot-joined list of segments: record field names, map keys,
//! or zero-based sequence indices. The empty path is the root. A final `*`
//! segment is a wildcard matching any child of the parent path.

/// Wildcard segment.
pub const WILDCARD: &str = "*";

/// Append `segment` to `parent`. The root has no leading dot.
pub fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        let mut path = String::with_capacity(parent.len() + 1 + segment.len());
        path.push_str(parent);
        path.push('.');
        path.push_str(segment);
        path
    }
}

/// Strip the last segment. Top-level paths have the root (`""`) as parent;
/// the root itself has none.
pub fn parent_of(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(path.rsplit_once('.').map_or("", |(parent, _)| parent))
}

/// The wildcard key that covers `path`: `parent.*`, or `*` for top-level
/// fields. `None` for the root.
pub fn wildcard_for(path: &str) -> Option<String> {
    parent_of(path).map(|parent| join(parent, WILDCARD))
}

/// The last segment of a path, used as the field label in messages.
pub fn last_segment(path: &str) -> &str {
    path.rsplit_once('.').map_or(path, |(_, last)| last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_root_and_nested() {
        assert_eq!(join("", "user"), "user");
        assert_eq!(join("user", "id"), "user.id");
        assert_eq!(join("list", "0"), "list.0");
    }

    #[test]
    fn parent_of_strips_last_segment() {
        assert_eq!(parent_of("user.address.city"), Some("user.address"));
        assert_eq!(parent_of("user"), Some(""));
        assert_eq!(parent_of(""), None);
    }

    #[test]
    fn wildcard_keys() {
        assert_eq!(wildcard_for("list.1").as_deref(), Some("list.*"));
        assert_eq!(wildcard_for("a.b.c").as_deref(), Some("a.b.*"));
        assert_eq!(wildcard_for("name").as_deref(), Some("*"));
        assert_eq!(wildcard_for(""), None);
    }

    #[test]
    fn last_segment_of_paths() {
        assert_eq!(last_segment("user.email"), "email");
        assert_eq!(last_segment("email"), "email");
        assert_eq!(last_segment("tags.3"), "3");
    }
}
