//! # Snapshot renderer
//!
//! Renders a virtual node tree once and produces a snapshot of it.
//!
//! ## Evaluation
//!
//! Rendering is a synchronous depth-first walk. Each node is classified:
//!
//! - `Empty` renders to nothing
//! - `Text` is returned verbatim
//! - `List` and fragment components splice their rendered children into the
//!   parent; they never produce a node of their own
//! - `Element` flattens its children, renders each one and is assembled into
//!   an [`OutputNode`](crate::output::OutputNode)
//! - `Component` is expanded (constructed and rendered exactly once) and its
//!   output is rendered in turn
//!
//! ## Context
//!
//! The ambient [`ContextMap`] is passed down as a parameter. A component
//! contributing child context gets a merged copy for its own subtree; the map
//! its siblings see is unchanged.
//!
//! ## Shallow rendering
//!
//! With `shallow` set, components below the root are not expanded. They are
//! emitted as a placeholder element named after the component, carrying its
//! props and its flattened `children`. Fragments are always expanded.
//!
//! When an expanded component renders another component directly,
//! `shallow_high_order` lets that one expand too (once), so thin wrappers do
//! not hide the component they wrap.
//!
//! ## Errors
//!
//! Errors raised by component code abort the render and reach the caller
//! unchanged. There are no partial results.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vsnap_renderer::{render, shallow_render};
//! use vsnap_vnode::Node;
//!
//! let snapshot = render(&Node::element("div").with_child("hi"), None, None)?;
//! println!("{}", snapshot.to_json_pretty()?);
//! ```

use crate::error::{RenderError, RenderResult};
use crate::naming::{component_name, describe, NameRegistry};
use crate::options::RenderOptions;
use crate::output::{build_output_node, splice, splice_child, Rendered};
use crate::utils::collect_children;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};
use vsnap_vnode::{
    ClassComponent, ComponentKind, ComponentRef, ContextMap, MountState, Node, Props,
    ResolvedContext, Updater,
};

/// Hook invoked before each component is expanded
pub type RenderHook = Box<dyn Fn(&ComponentRef) + Send + Sync>;

/// Render a node with the given context and options.
///
/// Without options, components are fully expanded. The process-wide name
/// registry is used for anonymous components.
pub fn render(
    node: &Node,
    context: Option<&ContextMap>,
    options: Option<&RenderOptions>,
) -> RenderResult<Rendered> {
    let renderer = Renderer::new(options.cloned().unwrap_or_default());
    match context {
        Some(context) => renderer.render(node, context),
        None => renderer.render(node, &ContextMap::new()),
    }
}

/// Render with `shallow: true` and every other option at its default.
pub fn shallow_render(node: &Node, context: Option<&ContextMap>) -> RenderResult<Rendered> {
    render(node, context, Some(&RenderOptions::shallow()))
}

/// Where a node sits relative to the root, for the shallow rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Root,
    Inner,
    /// Rendered directly by an expanded component; expands like the root, once
    HighOrder,
}

/// Renderer
pub struct Renderer {
    options: RenderOptions,
    registry: Arc<NameRegistry>,
    before_render: Option<RenderHook>,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self::with_registry(options, NameRegistry::global())
    }

    /// Renderer naming anonymous components from its own registry
    pub fn with_registry(options: RenderOptions, registry: Arc<NameRegistry>) -> Self {
        Self {
            options,
            registry,
            before_render: None,
        }
    }

    pub fn before_render(mut self, hook: impl Fn(&ComponentRef) + Send + Sync + 'static) -> Self {
        self.before_render = Some(Box::new(hook));
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<NameRegistry> {
        &self.registry
    }

    /// Render a tree to a snapshot
    #[instrument(skip_all, fields(shallow = self.options.shallow))]
    pub fn render(&self, node: &Node, context: &ContextMap) -> RenderResult<Rendered> {
        debug!("Starting render");
        let mut session = RenderSession {
            renderer: self,
            stack: Vec::new(),
        };
        let rendered = session.render_node(node, context, Position::Root)?;
        debug!(empty = rendered.is_empty(), "Render complete");
        Ok(rendered)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("before_render", &self.before_render.is_some())
            .finish()
    }
}

/// State of one top-level render call
struct RenderSession<'r> {
    renderer: &'r Renderer,
    /// Components currently being expanded, outermost first
    stack: Vec<ComponentRef>,
}

impl RenderSession<'_> {
    fn render_node(
        &mut self,
        node: &Node,
        context: &ContextMap,
        position: Position,
    ) -> RenderResult<Rendered> {
        match node {
            Node::Empty => Ok(Rendered::Empty),
            Node::Text(text) => Ok(Rendered::Text(text.clone())),
            Node::List(_) => self.render_fragment(node, context),
            Node::Element { tag, props, key } => {
                self.render_element(tag, props, key.as_deref(), context)
            }
            Node::Component {
                component,
                props,
                key,
            } => self.render_component(component, props, key.as_deref(), context, position),
        }
    }

    fn render_fragment(&mut self, children: &Node, context: &ContextMap) -> RenderResult<Rendered> {
        let mut items = Vec::new();
        for child in collect_children(children) {
            let rendered = self.render_node(child, context, Position::Inner)?;
            splice(&mut items, rendered);
        }
        Ok(Rendered::Fragment(items))
    }

    fn render_element(
        &mut self,
        tag: &str,
        props: &Props,
        key: Option<&str>,
        context: &ContextMap,
    ) -> RenderResult<Rendered> {
        trace!(tag, "Rendering element");
        let mut children = Vec::new();
        for child in collect_children(props.children()) {
            let rendered = self.render_node(child, context, Position::Inner)?;
            splice_child(&mut children, rendered);
        }
        Ok(Rendered::Element(build_output_node(tag, props, key, children)))
    }

    fn render_component(
        &mut self,
        component: &ComponentRef,
        props: &Props,
        key: Option<&str>,
        context: &ContextMap,
        position: Position,
    ) -> RenderResult<Rendered> {
        if component.is_fragment() {
            return self.render_fragment(props.children(), context);
        }

        let renderer = self.renderer;
        let options = &renderer.options;
        if options.shallow && (position == Position::Inner || !options.render_root_component) {
            let name = component_name(component, &renderer.registry);
            debug!(component = %name, "Rendering shallow placeholder");
            return self.render_element(&name, props, key, context);
        }

        self.enter(component)?;
        if let Some(hook) = &renderer.before_render {
            hook(component);
        }

        let resolved = resolve_context(component, context);
        let (rendered, child_context) = invoke(component, props, &resolved)?;

        let subtree_context = match child_context {
            Some(fragment) => context.merged(fragment),
            None => context.clone(),
        };

        let next = if matches!(rendered, Node::Component { .. })
            && options.shallow_high_order
            && position != Position::HighOrder
        {
            Position::HighOrder
        } else {
            Position::Inner
        };

        let result = self.render_node(&rendered, &subtree_context, next);
        self.stack.pop();
        result
    }

    fn enter(&mut self, component: &ComponentRef) -> RenderResult<()> {
        let limit = self.renderer.options.max_depth;
        if self.stack.len() >= limit {
            let stack: Vec<String> = self.stack.iter().map(describe).collect();
            warn!(limit, component = %describe(component), "Render depth limit exceeded");
            return Err(RenderError::DepthExceeded { limit, stack });
        }
        trace!(component = %describe(component), depth = self.stack.len(), "Expanding component");
        self.stack.push(component.clone());
        Ok(())
    }
}

/// Context argument for a component: the subscribed slot's value, or the
/// whole ambient map when it has no subscription.
fn resolve_context(component: &ComponentRef, context: &ContextMap) -> ResolvedContext {
    match component.context_type() {
        Some(handle) => ResolvedContext::Subscribed(handle.resolve(context)),
        None => ResolvedContext::Ambient(context.clone()),
    }
}

/// Run a component's render contract once.
fn invoke(
    component: &ComponentRef,
    props: &Props,
    context: &ResolvedContext,
) -> RenderResult<(Node, Option<Map<String, Value>>)> {
    match component.kind() {
        ComponentKind::Function(function) => {
            let this = Updater::default();
            Ok((function.call(&this, props, context)?, None))
        }
        ComponentKind::Class(class) => invoke_class(class.as_ref(), props, context),
        ComponentKind::Fragment => Ok((props.children().clone(), None)),
    }
}

/// Construct a class component, settle its state and render it once.
fn invoke_class(
    class: &dyn ClassComponent,
    props: &Props,
    context: &ResolvedContext,
) -> RenderResult<(Node, Option<Map<String, Value>>)> {
    let mut instance = class.construct(props, context)?;
    let mut state = instance.initial_state().unwrap_or_default();

    if let Some(derived) = class.get_derived_state_from_props(props, &state) {
        trace!(keys = derived.len(), "Merging derived state");
        state.extend(derived);
    } else {
        instance.component_will_mount(&mut MountState::new(&mut state))?;
    }

    let rendered = instance.render(props, &state, context)?;
    let child_context = instance.get_child_context(props, &state);
    Ok((rendered, child_context))
}
