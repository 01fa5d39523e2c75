//! Dotted-path addressing into a configuration tree

use serde_json::Value;

/// Separator between path segments (`"options.new1"`)
pub const PATH_SEPARATOR: char = '.';

/// Split a dotted path into its segments
///
/// Returns `None` for an empty path or one containing an empty segment
/// (`"options..new1"`, `".options"`), since those can never address a node.
pub fn segments(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    let parts: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts)
}

/// Walk `root` along `path`, descending only through maps
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in segments(path)? {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}
