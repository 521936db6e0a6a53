/// Convenience result type used across makeover.
pub type MakeoverResult<T> = Result<T, MakeoverError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Most of these never escape a render pass: layers and orchestrators log them and
/// degrade to "draw nothing" so a single bad frame cannot break a frame loop.
#[derive(thiserror::Error, Debug)]
pub enum MakeoverError {
    /// Invalid caller-provided data (colors, patterns, dimensions, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Landmark set missing, too short, or containing non-finite points.
    #[error("landmark error: {0}")]
    Landmarks(String),

    /// Sprite or image asset could not be loaded or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Failures raised while compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MakeoverError {
    /// Build a [`MakeoverError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MakeoverError::Landmarks`] value.
    pub fn landmarks(msg: impl Into<String>) -> Self {
        Self::Landmarks(msg.into())
    }

    /// Build a [`MakeoverError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`MakeoverError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
