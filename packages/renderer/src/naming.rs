//! Component identity naming
//!
//! Resolves the name a shallow placeholder is emitted under. The chain is:
//! explicit display name, then the implementing type's own name, then a
//! registry-assigned `UnnamedComponent<index>` for anonymous components
//! (closures and fn pointers).
//!
//! Registry indices are assigned in first-seen order and never reused. The
//! registry keeps a handle to every component it has named, so an identity
//! cannot be freed and handed to a different component later.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::debug;
use vsnap_vnode::ComponentRef;

pub const UNNAMED_PREFIX: &str = "UnnamedComponent";

#[derive(Debug, Default)]
pub struct NameRegistry {
    state: Mutex<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    components: Vec<ComponentRef>,
    index_by_identity: HashMap<usize, usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry. Never reset.
    pub fn global() -> Arc<NameRegistry> {
        static GLOBAL: OnceLock<Arc<NameRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(NameRegistry::new())).clone()
    }

    /// Index of `component`, registering it on first sight.
    pub fn index_of(&self, component: &ComponentRef) -> usize {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let identity = component.identity();
        if let Some(index) = state.index_by_identity.get(&identity) {
            return *index;
        }

        let index = state.components.len();
        state.components.push(component.clone());
        state.index_by_identity.insert(identity, index);
        debug!(index, type_name = component.type_name(), "Registered unnamed component");
        index
    }

    pub fn fallback_name(&self, component: &ComponentRef) -> String {
        format!("{}{}", UNNAMED_PREFIX, self.index_of(component))
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .components
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve the display name of a component, registering it if anonymous.
pub fn component_name(component: &ComponentRef, registry: &NameRegistry) -> String {
    if let Some(name) = display_name(component) {
        return name.to_string();
    }
    match type_name_label(component.type_name()) {
        Some(name) => name.to_string(),
        None => registry.fallback_name(component),
    }
}

/// Name for logs and error messages. Never touches the registry.
pub fn describe(component: &ComponentRef) -> String {
    display_name(component)
        .or_else(|| type_name_label(component.type_name()))
        .unwrap_or("<anonymous>")
        .to_string()
}

/// Explicit display name; an empty one counts as unset.
fn display_name(component: &ComponentRef) -> Option<&str> {
    component.display_name().filter(|name| !name.is_empty())
}

/// Last path segment of a type name, or `None` for anonymous callables.
///
/// `app::widgets::Card<app::Theme>` gives `Card`; closures and fn pointers
/// give `None`.
pub fn type_name_label(type_name: &str) -> Option<&str> {
    if type_name.contains("{{closure}}") || type_name.starts_with("fn(") {
        return None;
    }
    let path = type_name.split('<').next().unwrap_or(type_name);
    path.rsplit("::")
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
