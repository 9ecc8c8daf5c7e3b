//! IPC message contracts between the server and the browser UI.
//!
//! These enums define the complete set of messages exchanged over the
//! WebSocket bridge, serialized as `{"type": ..., "data": ...}`.

use serde::{Deserialize, Serialize};

use reef_core::EnhanceStats;

/// Messages from the server to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerToUi {
    /// Initial state sync when the UI connects.
    Initialize {
        /// Selectable depths with their strengths.
        depths: Vec<DepthOption>,
        /// Currently selected depth in meters.
        depth: u32,
        /// Red threshold in use.
        threshold: f32,
    },

    /// Informational message for the user.
    Notice {
        message: String,
    },

    /// A fresh enhancement result.
    Enhanced {
        /// Where the current image came from.
        source: String,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Depth used for this pass.
        depth: u32,
        /// Strength derived from `depth`.
        strength: f32,
        /// Pixel counters for the pass.
        stats: EnhanceStats,
        /// Base64 PNG of the corrected image.
        enhanced_png: String,
        /// Base64 PNG of the original image.
        original_png: String,
    },

    /// A request could not be served.
    Error {
        /// Error description.
        message: String,
    },
}

/// Messages from the UI to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToServer {
    /// Request a snapshot of the session after connecting.
    RequestState,

    /// Replace the current image with an uploaded file.
    UploadImage {
        /// Original file name, for display.
        name: String,
        /// File contents, base64 encoded.
        data_base64: String,
    },

    /// Drop any upload and go back to the sample image.
    UseSample,

    /// Select a different depth preset.
    SetDepth {
        meters: u32,
    },
}

/// One entry of the depth selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthOption {
    pub meters: u32,
    pub strength: f32,
}
