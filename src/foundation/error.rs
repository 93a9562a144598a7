/// Convenience result type used across routeglow.
pub type RouteglowResult<T> = Result<T, RouteglowError>;

/// Top-level error taxonomy used by library APIs.
///
/// Projection failure is deliberately absent: an out-of-domain coordinate yields `None`
/// from [`crate::Projection::project`] and the dependent element is simply not drawn.
#[derive(thiserror::Error, Debug)]
pub enum RouteglowError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// World geometry could not be decoded.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// SVG generation or rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RouteglowError {
    /// Build a [`RouteglowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RouteglowError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`RouteglowError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RouteglowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RouteglowError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
