/// Convenience result type used across Geoquiz.
pub type GeoquizResult<T> = Result<T, GeoquizError>;

/// Top-level error taxonomy used by the quiz core APIs.
///
/// Per-entity geometry failures are deliberately *not* errors: they surface as
/// `None` from the resolver and callers exclude the entity. Invalid session
/// transition requests are silent no-ops, never errors.
#[derive(thiserror::Error, Debug)]
pub enum GeoquizError {
    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while decoding the vector map asset.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GeoquizError {
    /// Build a [`GeoquizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GeoquizError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`GeoquizError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
