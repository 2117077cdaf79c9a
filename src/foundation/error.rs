/// Convenience result type used across livepics.
pub type LiveResult<T> = Result<T, LiveError>;

/// Top-level error taxonomy used by the editor core.
///
/// Missing pictures and empty histories are not errors: lookups return `None`
/// and undo/redo report whether anything happened.
#[derive(thiserror::Error, Debug)]
pub enum LiveError {
    /// Invalid caller-provided data (sizes, rates, script steps).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing a picture.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while exporting frames to an animation sink.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing scripts.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem failures.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LiveError {
    /// Build a [`LiveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LiveError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LiveError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`LiveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
