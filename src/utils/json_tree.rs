//! Path-addressed manipulation of nested JSON objects.
//!
//! The shared metadata documents (project metadata, team-provider info) are
//! trees of JSON objects addressed by key paths such as
//! `["dev", "nonCFNdata", "function", "myLayer"]`. These helpers read, create,
//! and remove entries at such paths. [`unset_and_prune`] additionally collapses
//! ancestors that become empty so no `{}` scaffolding is left behind.

use serde_json::{Map, Value};

/// Returns the value at `path`, if every segment resolves to an object member.
pub fn get_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.as_object()?.get(*key))
}

/// Sets `value` at `path`, creating intermediate objects as needed.
///
/// A non-object value sitting where an intermediate container is needed is
/// replaced by an empty object. An empty `path` replaces the root.
pub fn set_at(root: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for key in parents {
        let map = as_object_mut(node);
        node = map.entry((*key).to_string()).or_insert_with(|| Value::Object(Map::new()));
    }
    as_object_mut(node).insert((*last).to_string(), value);
}

/// Removes the entry at `path`, then removes each ancestor that became empty.
///
/// The first `keep_depth` segments of `path` are never pruned, even when they
/// end up empty. Returns `true` when an entry was removed.
pub fn unset_and_prune(root: &mut Value, path: &[&str], keep_depth: usize) -> bool {
    remove_recursive(root, path, 0, keep_depth)
}

fn remove_recursive(node: &mut Value, path: &[&str], depth: usize, keep_depth: usize) -> bool {
    let Some((key, rest)) = path.split_first() else {
        return false;
    };
    let Some(map) = node.as_object_mut() else {
        return false;
    };

    if rest.is_empty() {
        return map.remove(*key).is_some();
    }

    let Some(child) = map.get_mut(*key) else {
        return false;
    };
    let removed = remove_recursive(child, rest, depth + 1, keep_depth);
    if removed && depth >= keep_depth && is_empty_object(child) {
        map.remove(*key);
    }
    removed
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}

fn as_object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        tracing::warn!("Replacing non-object value {} with an empty object", value);
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}
