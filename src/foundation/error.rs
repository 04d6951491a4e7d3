/// Result alias used throughout the pipeline.
pub type DocshotResult<T> = Result<T, DocshotError>;

/// Errors that abort a pipeline run.
///
/// Every variant is fatal: callers propagate it with `?` and the binary exits non-zero.
/// Expected absences (optional per-unit files, non-matching directory names) never surface here.
#[derive(thiserror::Error, Debug)]
pub enum DocshotError {
    /// Invalid configuration or input values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required external tool is missing or could not be spawned.
    #[error("tool error: {0}")]
    Tool(String),

    /// An archive could not be decompressed.
    #[error("extract error: {0}")]
    Extract(String),

    /// A remote asset could not be retrieved or stored.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The renderer or a post-render hook failed.
    #[error("render error: {0}")]
    Render(String),

    /// Anything else, usually I/O with attached context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DocshotError {
    /// Build a [`DocshotError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DocshotError::Tool`].
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    /// Build a [`DocshotError::Extract`].
    pub fn extract(msg: impl Into<String>) -> Self {
        Self::Extract(msg.into())
    }

    /// Build a [`DocshotError::Fetch`].
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`DocshotError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
