//! # vsnap virtual nodes
//!
//! The input side of snapshot rendering: virtual nodes, props, component
//! references and the ambient context map threaded through a render.
//!
//! ```rust,ignore
//! use vsnap_vnode::{ComponentRef, Node};
//!
//! let greeting = ComponentRef::function(|props, _ctx| {
//!     Ok(Node::element("h1").with_child(props.get_str("name").unwrap_or("nobody")))
//! });
//!
//! let tree = Node::element("main")
//!     .with_class_name("page")
//!     .with_child(Node::component(&greeting).with_attr("name", "World"));
//! ```

pub mod component;
pub mod context;
pub mod node;

pub use component::{
    ComponentDef, ComponentError, ComponentInstance, ComponentKind, ComponentRef, ComponentResult,
    ClassComponent, FunctionComponent, MountState, State, Updater,
};
pub use context::{create_context, ContextHandle, ContextMap, ResolvedContext};
pub use node::{Node, Props, Text};

/// Re-exported so callers can build prop values without naming serde_json.
pub use serde_json::{json, Map, Value};
