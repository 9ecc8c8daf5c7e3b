//! Image acquisition for the demo application.
//!
//! Everything the enhancer sees arrives through an [`ImageSource`]: an
//! uploaded file, a file on disk, or the bundled sample scene. Decoding
//! goes through the `image` crate (PNG, JPEG) and always ends as 8-bit RGB.

use std::path::{Path, PathBuf};

use reef_core::{EnhanceError, RgbBuffer};

use crate::sample;

/// Decode an in-memory image (format sniffed from the bytes).
pub fn decode_image(bytes: &[u8]) -> Result<RgbBuffer, ImageLoadError> {
    let img = image::load_from_memory(bytes).map_err(ImageLoadError::Decode)?;
    Ok(RgbBuffer::from_dynamic(&img)?)
}

/// Load an image from disk and convert to an RGB buffer.
pub fn load_image(path: &Path) -> Result<RgbBuffer, ImageLoadError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Something that can hand the enhancer an RGB image.
pub trait ImageSource {
    /// Short label for logs and the UI.
    fn describe(&self) -> String;

    /// Produce the image.
    fn acquire(&self) -> Result<RgbBuffer, ImageLoadError>;
}

/// Bytes received from a user upload.
pub struct UploadSource {
    name: String,
    bytes: Vec<u8>,
}

impl UploadSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl ImageSource for UploadSource {
    fn describe(&self) -> String {
        format!("upload '{}'", self.name)
    }

    fn acquire(&self) -> Result<RgbBuffer, ImageLoadError> {
        decode_image(&self.bytes)
    }
}

/// A file on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn acquire(&self) -> Result<RgbBuffer, ImageLoadError> {
        load_image(&self.path)
    }
}

/// The bundled sample scene. Never fails.
#[derive(Default)]
pub struct DefaultAssetSource;

impl ImageSource for DefaultAssetSource {
    fn describe(&self) -> String {
        "bundled sample".to_string()
    }

    fn acquire(&self) -> Result<RgbBuffer, ImageLoadError> {
        Ok(sample::bundled_sample())
    }
}

/// Errors that can occur during image loading.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unusable image: {0}")]
    Shape(#[from] EnhanceError),
}
