use crate::error::RenderResult;
use serde::{Deserialize, Serialize};

/// Nesting limit for expanded components
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for a render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Render nested components as placeholder elements named after the component
    pub shallow: bool,

    /// Expand the top-level component even in shallow mode
    pub render_root_component: bool,

    /// In shallow mode, expand a component rendered directly by an expanded
    /// component one extra level before placeholders apply
    pub shallow_high_order: bool,

    /// Maximum number of nested expanded components
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            shallow: false,
            render_root_component: true,
            shallow_high_order: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    /// Defaults with shallow rendering enabled
    pub fn shallow() -> Self {
        Self {
            shallow: true,
            ..Default::default()
        }
    }

    /// Load options from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
