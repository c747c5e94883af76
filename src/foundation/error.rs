/// Convenience result type used across layerbake.
pub type BakeResult<T> = Result<T, BakeError>;

/// Top-level error taxonomy used by every library API.
///
/// All variants are fatal for an export run. The two recoveries that exist (video frame-count probe
/// and per-index video decode) are handled inside [`crate::MediaSource`] and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum BakeError {
    /// The declared type / file extension combination is not recognised.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An asset could not be opened or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Missing, mistyped or out-of-range layout fields.
    #[error("malformed layout: {0}")]
    MalformedLayout(String),

    /// The union bounding box of all layers has zero or negative area.
    #[error("degenerate canvas: {0}")]
    DegenerateCanvas(String),

    /// Failure while writing output.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error category, for matching without inspecting messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BakeErrorKind {
    /// See [`BakeError::UnsupportedFormat`].
    UnsupportedFormat,
    /// See [`BakeError::Decode`].
    Decode,
    /// See [`BakeError::MalformedLayout`].
    MalformedLayout,
    /// See [`BakeError::DegenerateCanvas`].
    DegenerateCanvas,
    /// See [`BakeError::Io`].
    Io,
    /// See [`BakeError::Other`].
    Other,
}

impl BakeError {
    /// Build a [`BakeError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`BakeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BakeError::MalformedLayout`] value.
    pub fn malformed_layout(msg: impl Into<String>) -> Self {
        Self::MalformedLayout(msg.into())
    }

    /// Build a [`BakeError::DegenerateCanvas`] value.
    pub fn degenerate_canvas(msg: impl Into<String>) -> Self {
        Self::DegenerateCanvas(msg.into())
    }

    /// Build a [`BakeError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Return the category of this error.
    pub fn kind(&self) -> BakeErrorKind {
        match self {
            Self::UnsupportedFormat(_) => BakeErrorKind::UnsupportedFormat,
            Self::Decode(_) => BakeErrorKind::Decode,
            Self::MalformedLayout(_) => BakeErrorKind::MalformedLayout,
            Self::DegenerateCanvas(_) => BakeErrorKind::DegenerateCanvas,
            Self::Io(_) => BakeErrorKind::Io,
            Self::Other(_) => BakeErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
