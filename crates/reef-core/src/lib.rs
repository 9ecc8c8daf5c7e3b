//! Reef Core — domain layer for underwater red correction.
//!
//! This crate contains the image buffer type, the red-channel enhancement
//! transform and the depth → strength presets. No I/O or framework
//! dependencies beyond converting to and from `image` buffers.

pub mod error;
pub mod grading;
pub mod image;

// Re-exports for convenience.
pub use error::EnhanceError;
pub use grading::depth::{DEFAULT_DEPTH, DepthTable};
pub use grading::red_channel::{
    APP_THRESHOLD, EnhanceParams, EnhanceStats, enhance, enhance_pixel, enhance_red_channel,
    enhance_with_stats,
};
pub use crate::image::RgbBuffer;
