use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Error raised by component code, passed through as-is.
    #[error(transparent)]
    Component(#[from] anyhow::Error),

    #[error("Render depth limit of {limit} exceeded\nComponent stack: {}", stack.join(" → "))]
    DepthExceeded { limit: usize, stack: Vec<String> },

    #[error("Invalid render options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

impl RenderError {
    /// The component error, if this is one.
    pub fn as_component_error(&self) -> Option<&anyhow::Error> {
        match self {
            RenderError::Component(err) => Some(err),
            _ => None,
        }
    }
}
