pub mod error;
pub mod naming;
pub mod options;
pub mod output;
pub mod renderer;
pub mod utils;

#[cfg(test)]
mod tests_components;



pub use error::{RenderError, RenderResult};
pub use naming::{component_name, NameRegistry};
pub use options::RenderOptions;
pub use output::{OutputNode, Rendered, SnapshotMarker, SNAPSHOT_MARKER};
pub use renderer::{render, shallow_render, RenderHook, Renderer};
pub use utils::{collect_children, omit};

// Re-export the input model so callers need a single dependency
pub use vsnap_vnode as vnode;
