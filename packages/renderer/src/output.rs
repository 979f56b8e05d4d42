use crate::utils::{is_truthy, omit, RESERVED_PROPS};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use vsnap_vnode::{Props, Text};

/// Marker identifying a value as a test snapshot node
pub const SNAPSHOT_MARKER: &str = "react.test.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotMarker;

impl Serialize for SnapshotMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(SNAPSHOT_MARKER)
    }
}

/// Snapshot element node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputNode {
    #[serde(rename = "$$typeof")]
    pub kind: SnapshotMarker,

    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Rendered>>,
}

impl OutputNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            kind: SnapshotMarker,
            node_type: node_type.into(),
            props: None,
            key: None,
            children: None,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.as_ref().and_then(|props| props.get(name))
    }

    pub fn children(&self) -> &[Rendered] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Result of rendering a node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    /// Nothing rendered, serialized as `null`
    Empty,
    Text(Text),
    Element(OutputNode),
    /// Sibling results of a fragment rendered at the root
    Fragment(Vec<Rendered>),
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        matches!(self, Rendered::Empty)
    }

    pub fn as_element(&self) -> Option<&OutputNode> {
        match self {
            Rendered::Element(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Rendered::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_fragment(&self) -> Option<&[Rendered]> {
        match self {
            Rendered::Fragment(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Appends a rendered result to a sibling list, splicing fragments and
/// dropping empty results.
pub(crate) fn splice(siblings: &mut Vec<Rendered>, rendered: Rendered) {
    match rendered {
        Rendered::Empty => {}
        Rendered::Fragment(items) => {
            for item in items {
                splice(siblings, item);
            }
        }
        other => siblings.push(other),
    }
}

/// Appends a rendered child of an element. Falsy text is dropped as well.
pub(crate) fn splice_child(children: &mut Vec<Rendered>, rendered: Rendered) {
    match rendered {
        Rendered::Text(text) if text.is_falsy() => {}
        Rendered::Fragment(items) => {
            for item in items {
                splice_child(children, item);
            }
        }
        other => splice(children, other),
    }
}

/// Assemble a snapshot node from an element's props and its rendered children.
///
/// Reserved props are dropped; a truthy `className` becomes `class` unless a
/// truthy `class` is already set.
pub fn build_output_node(
    node_type: &str,
    props: &Props,
    key: Option<&str>,
    children: Vec<Rendered>,
) -> OutputNode {
    let mut output_props = omit(props.attrs(), RESERVED_PROPS);

    if let Some(class_name) = props.get("className").filter(|value| is_truthy(value)) {
        if !props.get("class").is_some_and(is_truthy) {
            output_props.insert("class".to_string(), class_name.clone());
        }
    }

    let mut node = OutputNode::new(node_type);
    node.key = key
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| props.get("key").and_then(key_from_value));
    if !output_props.is_empty() {
        node.props = Some(output_props);
    }
    if !children.is_empty() {
        node.children = Some(children);
    }
    node
}

fn key_from_value(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
