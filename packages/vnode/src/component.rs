//! Component references and the two component contracts.
//!
//! A [`ComponentRef`] is a shared handle to one component definition. The
//! renderer tells function and class components apart by [`ComponentKind`],
//! decided once when the reference is built.
//!
//! Components render exactly once. Function components receive an
//! [`Updater`] whose mutators are no-ops; class components may assign state
//! in `component_will_mount` through [`MountState`], and nothing after that.

use crate::context::{ContextHandle, ResolvedContext};
use crate::node::{Node, Props};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// Errors raised by component code. They reach the caller of `render` unchanged.
pub type ComponentError = anyhow::Error;

pub type ComponentResult<T = Node> = Result<T, ComponentError>;

/// Component state, a shallow key/value map.
pub type State = Map<String, Value>;

/// Stateless component: `(props, context) -> node`.
pub trait FunctionComponent: Send + Sync + 'static {
    fn call(&self, this: &Updater, props: &Props, context: &ResolvedContext) -> ComponentResult;
}

impl<F> FunctionComponent for F
where
    F: Fn(&Props, &ResolvedContext) -> ComponentResult + Send + Sync + 'static,
{
    fn call(&self, _this: &Updater, props: &Props, context: &ResolvedContext) -> ComponentResult {
        self(props, context)
    }
}

/// Class-like component: a factory for instances plus the static lifecycle hook.
pub trait ClassComponent: Send + Sync + 'static {
    fn construct(
        &self,
        props: &Props,
        context: &ResolvedContext,
    ) -> ComponentResult<Box<dyn ComponentInstance>>;

    /// `None` means the hook is not implemented. Returning `Some` also skips
    /// `component_will_mount`.
    fn get_derived_state_from_props(&self, _props: &Props, _state: &State) -> Option<State> {
        None
    }
}

/// A constructed class component.
pub trait ComponentInstance {
    /// State assigned by the constructor. Unset state starts empty.
    fn initial_state(&self) -> Option<State> {
        None
    }

    fn component_will_mount(&mut self, _mount: &mut MountState<'_>) -> ComponentResult<()> {
        Ok(())
    }

    fn render(&self, props: &Props, state: &State, context: &ResolvedContext) -> ComponentResult;

    /// Context entries made visible to this component's subtree only.
    fn get_child_context(&self, _props: &Props, _state: &State) -> Option<Map<String, Value>> {
        None
    }
}

/// Receiver handed to function components. State changes are discarded
/// because a tree is never rendered a second time.
#[derive(Debug, Default)]
pub struct Updater {
    _private: (),
}

impl Updater {
    pub fn set_state(&self, partial: State) {
        trace!(keys = partial.len(), "Discarding state update");
    }

    pub fn force_update(&self) {
        trace!("Discarding forced update");
    }
}

/// State access during `component_will_mount`. Everything assigned here is
/// what `render` sees.
#[derive(Debug)]
pub struct MountState<'a> {
    state: &'a mut State,
}

impl<'a> MountState<'a> {
    pub fn new(state: &'a mut State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        self.state
    }

    pub fn replace(&mut self, state: State) {
        *self.state = state;
    }

    /// Shallow-merges `partial` over the current state.
    pub fn set_state(&mut self, partial: State) {
        self.state.extend(partial);
    }
}

pub enum ComponentKind {
    Function(Box<dyn FunctionComponent>),
    Class(Box<dyn ClassComponent>),
    /// Marker for fragments: renders its children and nothing else.
    Fragment,
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Function(_) => f.write_str("Function"),
            ComponentKind::Class(_) => f.write_str("Class"),
            ComponentKind::Fragment => f.write_str("Fragment"),
        }
    }
}

/// Component definition under construction.
#[derive(Debug)]
pub struct ComponentDef {
    kind: ComponentKind,
    type_name: &'static str,
    display_name: Option<String>,
    context_type: Option<ContextHandle>,
}

impl ComponentDef {
    /// Wraps a closure or fn item.
    pub fn function<F>(component: F) -> Self
    where
        F: Fn(&Props, &ResolvedContext) -> ComponentResult + Send + Sync + 'static,
    {
        Self::function_component(component)
    }

    /// Wraps a type implementing [`FunctionComponent`] directly, for
    /// components that need the [`Updater`] receiver.
    pub fn function_component<F: FunctionComponent>(component: F) -> Self {
        Self {
            kind: ComponentKind::Function(Box::new(component)),
            type_name: std::any::type_name::<F>(),
            display_name: None,
            context_type: None,
        }
    }

    pub fn class<C: ClassComponent>(component: C) -> Self {
        Self {
            kind: ComponentKind::Class(Box::new(component)),
            type_name: std::any::type_name::<C>(),
            display_name: None,
            context_type: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Subscribes the component to one context slot. It then receives the
    /// slot's value instead of the whole ambient map.
    pub fn with_context_type(mut self, handle: &ContextHandle) -> Self {
        self.context_type = Some(handle.clone());
        self
    }

    pub fn build(self) -> ComponentRef {
        ComponentRef {
            def: Arc::new(self),
        }
    }
}

/// Shared handle to a component definition. Equality is identity.
#[derive(Clone)]
pub struct ComponentRef {
    def: Arc<ComponentDef>,
}

impl ComponentRef {
    pub fn function<F>(component: F) -> Self
    where
        F: Fn(&Props, &ResolvedContext) -> ComponentResult + Send + Sync + 'static,
    {
        ComponentDef::function(component).build()
    }

    pub fn class<C: ClassComponent>(component: C) -> Self {
        ComponentDef::class(component).build()
    }

    /// The process-wide fragment marker.
    pub fn fragment() -> Self {
        static FRAGMENT: OnceLock<ComponentRef> = OnceLock::new();
        FRAGMENT
            .get_or_init(|| {
                ComponentDef {
                    kind: ComponentKind::Fragment,
                    type_name: "Fragment",
                    display_name: Some("Fragment".to_string()),
                    context_type: None,
                }
                .build()
            })
            .clone()
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.def.kind
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.def.kind, ComponentKind::Fragment)
    }

    /// Rust type path of the wrapped implementation.
    pub fn type_name(&self) -> &'static str {
        self.def.type_name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.def.display_name.as_deref()
    }

    pub fn context_type(&self) -> Option<&ContextHandle> {
        self.def.context_type.as_ref()
    }

    pub fn ptr_eq(&self, other: &ComponentRef) -> bool {
        Arc::ptr_eq(&self.def, &other.def)
    }

    /// Address of the shared definition, stable for as long as any handle lives.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.def) as usize
    }
}

impl PartialEq for ComponentRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ComponentRef {}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("kind", &self.def.kind)
            .field("type_name", &self.def.type_name)
            .field("display_name", &self.def.display_name)
            .finish()
    }
}

impl From<ComponentDef> for ComponentRef {
    fn from(def: ComponentDef) -> Self {
        def.build()
    }
}
