//! Shared helpers for the renderer: child flattening, prop projection and
//! truthiness.

use serde_json::{Map, Value};
use vsnap_vnode::Node;

/// Props never copied into snapshot output
pub const RESERVED_PROPS: &[&str] = &["key", "children", "className"];

/// Flatten a children value into one ordered sequence.
///
/// Lists are descended to any depth, in order. Empty entries are dropped;
/// every other node is a leaf and is not descended into.
pub fn collect_children(children: &Node) -> Vec<&Node> {
    let mut accumulator = Vec::new();
    collect_children_into(&mut accumulator, children);
    accumulator
}

pub fn collect_children_into<'a>(accumulator: &mut Vec<&'a Node>, children: &'a Node) {
    match children {
        Node::List(items) => {
            for item in items {
                collect_children_into(accumulator, item);
            }
        }
        Node::Empty => {}
        leaf => accumulator.push(leaf),
    }
}

/// Copy of `object` without the keys in `paths`
pub fn omit(object: &Map<String, Value>, paths: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, _)| !paths.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Truthiness of a prop value: null, false, zero and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
