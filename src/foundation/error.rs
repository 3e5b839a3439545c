/// Result alias used across the crate.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Error type for configuration, asset and render failures.
#[derive(thiserror::Error, Debug)]
pub enum ScrubError {
    /// Invalid caller input (configuration, geometry, CLI arguments).
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame asset could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Canvas or output surface failure.
    #[error("render error: {0}")]
    Render(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrubError {
    /// Build a [`ScrubError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrubError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ScrubError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrubError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
