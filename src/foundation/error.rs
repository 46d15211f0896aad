/// Convenience result type used across photostrip.
pub type PhotostripResult<T> = Result<T, PhotostripError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Asset decode failures inside a composite render never surface through this type; they are
/// logged and the affected layer is omitted. Errors returned from a render are precondition
/// violations on the caller's side.
#[derive(thiserror::Error, Debug)]
pub enum PhotostripError {
    /// Invalid caller-provided data (options, scale, coordinates).
    #[error("validation error: {0}")]
    Validation(String),

    /// An image or font could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A layout template is missing or geometrically invalid.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors when serializing or deserializing catalogs and options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotostripError {
    /// Build a [`PhotostripError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PhotostripError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PhotostripError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`PhotostripError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PhotostripError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
