/// Convenience result type used across gifavatar.
pub type GifavatarResult<T> = Result<T, GifavatarError>;

/// Error taxonomy for a render job.
///
/// Every variant fails the whole job; nothing is retried or partially persisted here.
#[derive(thiserror::Error, Debug)]
pub enum GifavatarError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source image bytes could not be decoded.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// A drawing surface could not be acquired.
    #[error("render context error: {0}")]
    RenderContext(String),

    /// Unknown motion style name (strict parsing only; sampling falls back instead).
    #[error("unsupported style: {0}")]
    UnsupportedStyle(String),

    /// The live surface went away or the capture was cancelled mid-sequence.
    #[error("capture aborted: {0}")]
    CaptureAborted(String),

    /// The animated-image encoder rejected a frame or failed to finalize.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing job data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifavatarError {
    /// Build a [`GifavatarError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifavatarError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`GifavatarError::RenderContext`] value.
    pub fn render_context(msg: impl Into<String>) -> Self {
        Self::RenderContext(msg.into())
    }

    /// Build a [`GifavatarError::UnsupportedStyle`] value.
    pub fn unsupported_style(msg: impl Into<String>) -> Self {
        Self::UnsupportedStyle(msg.into())
    }

    /// Build a [`GifavatarError::CaptureAborted`] value.
    pub fn capture_aborted(msg: impl Into<String>) -> Self {
        Self::CaptureAborted(msg.into())
    }

    /// Build a [`GifavatarError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GifavatarError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
