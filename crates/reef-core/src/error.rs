//! Error types for the enhancement core.

/// Errors raised when an image buffer or enhancement parameter is invalid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnhanceError {
    #[error("expected 3 color channels (RGB), got {channels}")]
    InvalidImageShape { channels: usize },
    #[error("image has no pixels")]
    EmptyImage,
    #[error("buffer holds {actual} values, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
    #[error("strength must be a finite positive number, got {0}")]
    InvalidStrength(f32),
    #[error("threshold must be a number, got {0}")]
    InvalidThreshold(f32),
    #[error("image dimensions overflow: {0}")]
    DimensionsOverflow(String),
    #[error("no strength configured for depth {0} m")]
    UnknownDepth(u32),
}
