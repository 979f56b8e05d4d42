use crate::component::ComponentRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Virtual node
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    /// Nothing to render (null, undefined or a boolean)
    #[default]
    Empty,

    /// Text leaf (string or number)
    Text(Text),

    /// Bare sequence of nodes, rendered as an implicit fragment
    List(Vec<Node>),

    /// Host element
    Element {
        tag: String,
        props: Props,
        key: Option<String>,
    },

    /// Component reference with the props it is invoked with
    Component {
        component: ComponentRef,
        props: Props,
        key: Option<String>,
    },
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element {
            tag: tag.into(),
            props: Props::new(),
            key: None,
        }
    }

    pub fn component(component: &ComponentRef) -> Self {
        Node::Component {
            component: component.clone(),
            props: Props::new(),
            key: None,
        }
    }

    /// Explicit fragment: contributes its children and nothing else.
    pub fn fragment<I, N>(children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::component(&ComponentRef::fragment()).with_children(children)
    }

    pub fn text(content: impl Into<Text>) -> Self {
        Node::Text(content.into())
    }

    pub fn list<I, N>(nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::List(nodes.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    pub fn props(&self) -> Option<&Props> {
        match self {
            Node::Element { props, .. } | Node::Component { props, .. } => Some(props),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Node::Element { key, .. } | Node::Component { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    fn props_mut(&mut self) -> Option<&mut Props> {
        match self {
            Node::Element { props, .. } | Node::Component { props, .. } => Some(props),
            _ => None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Some(props) = self.props_mut() {
            props.set(name, value);
        }
        self
    }

    pub fn with_class_name(self, class_name: impl Into<String>) -> Self {
        self.with_attr("className", class_name.into())
    }

    pub fn with_key(mut self, new_key: impl Into<String>) -> Self {
        if let Node::Element { ref mut key, .. } | Node::Component { ref mut key, .. } = self {
            *key = Some(new_key.into());
        }
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        if let Some(props) = self.props_mut() {
            props.push_child(child.into());
        }
        self
    }

    pub fn with_children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        if let Some(props) = self.props_mut() {
            for child in children {
                props.push_child(child.into());
            }
        }
        self
    }

    /// Replaces `props.children` wholesale, keeping whatever shape is given.
    pub fn with_children_node(mut self, children: Node) -> Self {
        if let Some(props) = self.props_mut() {
            props.set_children(children);
        }
        self
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.into())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value.into())
    }
}

impl From<Text> for Node {
    fn from(value: Text) -> Self {
        Node::Text(value)
    }
}

impl From<bool> for Node {
    fn from(_: bool) -> Self {
        Node::Empty
    }
}

impl From<()> for Node {
    fn from(_: ()) -> Self {
        Node::Empty
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Empty, Into::into)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Node::list(value)
    }
}

macro_rules! node_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::Text(value.into())
                }
            }
        )*
    };
}

node_from_number!(i32, i64, u32, u64, usize, f64);

/// Text leaf content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Number(Number),
    String(String),
}

impl Text {
    /// Empty strings and zero count as falsy and are dropped from element children.
    pub fn is_falsy(&self) -> bool {
        match self {
            Text::String(s) => s.is_empty(),
            Text::Number(n) => n.as_f64().map_or(false, |v| v == 0.0),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Text::String(s) => Some(s),
            Text::Number(_) => None,
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::String(s) => f.write_str(s),
            Text::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::String(value.to_string())
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::String(value)
    }
}

impl From<f64> for Text {
    fn from(value: f64) -> Self {
        // NaN and infinities have no JSON number form
        Number::from_f64(value)
            .map(Text::Number)
            .unwrap_or_else(|| Text::String(value.to_string()))
    }
}

macro_rules! text_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Text {
                fn from(value: $ty) -> Self {
                    Text::Number(Number::from(value))
                }
            }
        )*
    };
}

text_from_integer!(i32, i64, u32, u64, usize);

/// Props handed to an element or component.
///
/// Attribute values are kept in a sorted map so snapshots are stable.
/// Children live beside the attributes as a node of any shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    attrs: Map<String, Value>,
    children: Box<Node>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attrs(attrs: Map<String, Value>) -> Self {
        Self {
            attrs,
            children: Box::new(Node::Empty),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    pub fn attrs(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn children(&self) -> &Node {
        &self.children
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn set_children(&mut self, children: Node) {
        self.children = Box::new(children);
    }

    /// Appends a child, turning a single child into a list as needed.
    pub fn push_child(&mut self, child: Node) {
        self.children = Box::new(match *std::mem::take(&mut self.children) {
            Node::List(mut items) => {
                items.push(child);
                Node::List(items)
            }
            Node::Empty => Node::List(vec![child]),
            existing => Node::List(vec![existing, child]),
        });
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }
}
