/// Result alias used across the crate.
pub type LaminaResult<T> = Result<T, LaminaError>;

/// Error taxonomy for the compositing engine.
///
/// Lifecycle and cache errors are always reported to the immediate caller. Degenerate render
/// states (zero-area surfaces, empty effect slots) never produce an error; they are skipped.
#[derive(thiserror::Error, Debug)]
pub enum LaminaError {
    /// An operation was issued in a lifecycle or transport state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Malformed options passed to a constructor or setter.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An underlying drawing or audio resource failed.
    #[error("resource error: {0}")]
    Resource(String),

    /// An effect or content drawer failed during a render pass.
    #[error("render error: {0}")]
    Render(String),

    /// Option parsing failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Host-provided error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaminaError {
    /// Build an [`LaminaError::InvalidState`].
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build an [`LaminaError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build an [`LaminaError::Resource`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build an [`LaminaError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`LaminaError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for [`LaminaError::InvalidState`].
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// Return `true` for [`LaminaError::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<serde_json::Error> for LaminaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
