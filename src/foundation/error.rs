/// Convenience result type used across kinema.
pub type KinemaResult<T> = Result<T, KinemaError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum KinemaError {
    /// Invalid user-provided scene, script or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building animation trees (for example an empty composite).
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while rasterizing a scene.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing frames to a sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KinemaError {
    /// Build a [`KinemaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KinemaError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`KinemaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KinemaError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`KinemaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
