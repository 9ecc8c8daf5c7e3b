//! Per-connection request handling.
//!
//! A [`Session`] holds everything one UI needs: the current photo, the
//! selected depth and the threshold. Each state change re-runs the
//! enhancer once and answers with both images. Sessions share nothing
//! mutable; the sample image is shared read-only.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reef_core::{DEFAULT_DEPTH, DepthTable, EnhanceParams, RgbBuffer, enhance_with_stats};

use crate::display;
use crate::fetch::ResolvedImage;
use crate::image_loader::{ImageSource, UploadSource};
use crate::ipc::{DepthOption, ServerToUi, UiToServer};

/// Shown whenever the session falls back to the sample photo.
pub const SAMPLE_NOTICE: &str = "No image uploaded. Using a sample image.";

/// Where the session's current photo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    Sample,
    Upload,
}

pub struct Session {
    sample: Arc<ResolvedImage>,
    image: RgbBuffer,
    source: String,
    origin: ImageOrigin,
    depth: u32,
    threshold: f32,
    table: DepthTable,
}

impl Session {
    /// New session showing the sample with the default depth table.
    pub fn new(sample: Arc<ResolvedImage>, threshold: f32) -> Self {
        Self::with_table(sample, threshold, DepthTable::default())
    }

    /// New session with a custom depth table.
    ///
    /// Starts at [`DEFAULT_DEPTH`] when the table has it, otherwise at the
    /// shallowest entry.
    pub fn with_table(sample: Arc<ResolvedImage>, threshold: f32, table: DepthTable) -> Self {
        let depth = if table.contains(DEFAULT_DEPTH) {
            DEFAULT_DEPTH
        } else {
            table.depths().next().unwrap_or(DEFAULT_DEPTH)
        };
        Self {
            image: sample.image.clone(),
            source: sample.source.clone(),
            origin: ImageOrigin::Sample,
            sample,
            depth,
            threshold,
            table,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }

    /// Handle one UI message and return the replies in order.
    pub fn handle(&mut self, msg: UiToServer) -> Vec<ServerToUi> {
        match msg {
            UiToServer::RequestState => {
                let mut replies = vec![ServerToUi::Initialize {
                    depths: self
                        .table
                        .iter()
                        .map(|(meters, strength)| DepthOption { meters, strength })
                        .collect(),
                    depth: self.depth,
                    threshold: self.threshold,
                }];
                if self.origin == ImageOrigin::Sample {
                    replies.push(notice(SAMPLE_NOTICE));
                }
                replies.push(self.render());
                replies
            }
            UiToServer::UploadImage { name, data_base64 } => {
                let bytes = match STANDARD.decode(data_base64.as_bytes()) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!("Upload '{name}' is not valid base64: {e}");
                        return vec![error(format!("Upload '{name}' is not valid base64: {e}"))];
                    }
                };
                let upload = UploadSource::new(name, bytes);
                match upload.acquire() {
                    Ok(img) => {
                        tracing::info!(
                            "Image loaded: {} ({}x{})",
                            upload.describe(),
                            img.width(),
                            img.height()
                        );
                        self.image = img;
                        self.source = upload.describe();
                        self.origin = ImageOrigin::Upload;
                        vec![self.render()]
                    }
                    Err(e) => {
                        tracing::error!("Failed to load {}: {e}", upload.describe());
                        vec![error(format!("Failed to load image: {e}"))]
                    }
                }
            }
            UiToServer::UseSample => {
                self.image = self.sample.image.clone();
                self.source = self.sample.source.clone();
                self.origin = ImageOrigin::Sample;
                vec![notice(SAMPLE_NOTICE), self.render()]
            }
            UiToServer::SetDepth { meters } => {
                if !self.table.contains(meters) {
                    return vec![error(format!("Unsupported depth: {meters} m"))];
                }
                self.depth = meters;
                vec![self.render()]
            }
        }
    }

    /// Enhance the current image and package both versions.
    fn render(&self) -> ServerToUi {
        match self.try_render() {
            Ok(msg) => msg,
            Err(message) => {
                tracing::error!("{message}");
                error(message)
            }
        }
    }

    fn try_render(&self) -> Result<ServerToUi, String> {
        let strength = self.table.strength_for(self.depth).map_err(|e| e.to_string())?;
        let params = EnhanceParams::new(strength, self.threshold);
        let (enhanced, stats) = enhance_with_stats(&self.image, &params)
            .map_err(|e| format!("Enhancement failed: {e}"))?;

        tracing::info!(
            "Enhanced {} at {} m (strength {strength}): {:.1}% of pixels boosted",
            self.source,
            self.depth,
            stats.coverage() * 100.0
        );

        let encode = |img: &RgbBuffer| {
            display::encode_png_base64(img).map_err(|e| format!("Failed to encode image: {e}"))
        };
        Ok(ServerToUi::Enhanced {
            source: self.source.clone(),
            width: enhanced.width(),
            height: enhanced.height(),
            depth: self.depth,
            strength,
            stats,
            enhanced_png: encode(&enhanced)?,
            original_png: encode(&self.image)?,
        })
    }
}

fn notice(message: &str) -> ServerToUi {
    ServerToUi::Notice {
        message: message.to_string(),
    }
}

fn error(message: String) -> ServerToUi {
    ServerToUi::Error { message }
}
