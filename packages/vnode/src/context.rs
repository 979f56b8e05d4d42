//! Ambient context threaded through a render.
//!
//! A [`ContextMap`] is immutable. Components that contribute context get a
//! merged copy for their own subtree, so siblings never observe each other's
//! contributions.

use crate::component::{
    ClassComponent, ComponentDef, ComponentInstance, ComponentRef, ComponentResult, State,
};
use crate::node::{Node, Props};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mapping from context slot id to the value contributed for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMap {
    entries: Arc<Map<String, Value>>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Returns a new map with `fragment` laid over this one. `self` is untouched.
    pub fn merged(&self, fragment: Map<String, Value>) -> Self {
        if fragment.is_empty() {
            return self.clone();
        }
        let mut entries = Map::clone(&self.entries);
        entries.extend(fragment);
        Self::from_map(entries)
    }

    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fragment = Map::new();
        fragment.insert(key.into(), value.into());
        self.merged(fragment)
    }
}

impl FromIterator<(String, Value)> for ContextMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

/// What a component receives as its context argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedContext {
    /// The full ambient map, for components without a subscription.
    Ambient(ContextMap),
    /// The value of the subscribed slot.
    Subscribed(Value),
}

impl ResolvedContext {
    /// Looks up a key in the ambient map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            ResolvedContext::Ambient(map) => map.get(key),
            ResolvedContext::Subscribed(_) => None,
        }
    }

    /// Value of the subscribed slot.
    pub fn value(&self) -> Option<&Value> {
        match self {
            ResolvedContext::Subscribed(value) => Some(value),
            ResolvedContext::Ambient(_) => None,
        }
    }

    pub fn ambient(&self) -> Option<&ContextMap> {
        match self {
            ResolvedContext::Ambient(map) => Some(map),
            ResolvedContext::Subscribed(_) => None,
        }
    }
}

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A named context slot with a default value.
#[derive(Clone)]
pub struct ContextHandle {
    slot: Arc<ContextSlot>,
}

struct ContextSlot {
    id: String,
    default: Value,
    provider: ComponentRef,
}

/// Creates a new context slot. Every call yields a distinct slot id.
pub fn create_context(default: impl Into<Value>) -> ContextHandle {
    let id = format!("__cC{}", NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed));
    let provider = ComponentDef::class(Provider { slot: id.clone() })
        .with_display_name("Provider")
        .build();
    ContextHandle {
        slot: Arc::new(ContextSlot {
            id,
            default: default.into(),
            provider,
        }),
    }
}

impl ContextHandle {
    pub fn id(&self) -> &str {
        &self.slot.id
    }

    pub fn default_value(&self) -> &Value {
        &self.slot.default
    }

    /// The provider component for this slot.
    pub fn provider_component(&self) -> &ComponentRef {
        &self.slot.provider
    }

    /// Provider node making `value` visible to every subscriber below it.
    pub fn provider<I, N>(&self, value: impl Into<Value>, children: I) -> Node
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        Node::component(&self.slot.provider)
            .with_attr("value", value)
            .with_children(children)
    }

    /// Nearest provided value, or the declared default when no ancestor provides one.
    pub fn resolve(&self, context: &ContextMap) -> Value {
        context
            .get(&self.slot.id)
            .cloned()
            .unwrap_or_else(|| self.slot.default.clone())
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("id", &self.slot.id)
            .field("default", &self.slot.default)
            .finish()
    }
}

impl PartialEq for ContextHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

struct Provider {
    slot: String,
}

impl ClassComponent for Provider {
    fn construct(
        &self,
        props: &Props,
        _context: &ResolvedContext,
    ) -> ComponentResult<Box<dyn ComponentInstance>> {
        Ok(Box::new(ProviderInstance {
            slot: self.slot.clone(),
            value: props.get("value").cloned().unwrap_or(Value::Null),
        }))
    }
}

struct ProviderInstance {
    slot: String,
    value: Value,
}

impl ComponentInstance for ProviderInstance {
    fn render(&self, props: &Props, _state: &State, _context: &ResolvedContext) -> ComponentResult {
        Ok(props.children().clone())
    }

    fn get_child_context(&self, _props: &Props, _state: &State) -> Option<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert(self.slot.clone(), self.value.clone());
        Some(fragment)
    }
}
