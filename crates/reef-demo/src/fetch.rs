//! Remote sample fetch with a bundled fallback.
//!
//! The sample photo is a convenience, never a requirement: any network,
//! HTTP or decode failure degrades to the bundled scene.

use std::time::Duration;

use reef_core::RgbBuffer;

use crate::config::AppConfig;
use crate::image_loader::{self, DefaultAssetSource, ImageLoadError, ImageSource};
use crate::sample;

/// An image ready for the enhancer, plus where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub image: RgbBuffer,
    pub source: String,
}

/// Errors from fetching the remote sample.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Image(#[from] ImageLoadError),
}

/// Download and decode an image, giving up after `timeout`.
pub async fn fetch_sample(url: &str, timeout: Duration) -> Result<RgbBuffer, FetchError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let bytes = response.bytes().await?;
    Ok(image_loader::decode_image(&bytes)?)
}

/// The sample image to show when nothing was uploaded.
///
/// Tries the configured URL first, then falls back to the bundled scene.
pub async fn resolve_sample(config: &AppConfig) -> ResolvedImage {
    if let Some(url) = config.sample_url.as_deref() {
        match fetch_sample(url, config.fetch_timeout).await {
            Ok(image) => {
                tracing::info!(
                    "Fetched sample image from {url} ({}x{})",
                    image.width(),
                    image.height()
                );
                return ResolvedImage {
                    image,
                    source: url.to_string(),
                };
            }
            Err(e) => tracing::warn!("Sample fetch from {url} failed, using bundled sample: {e}"),
        }
    }
    bundled()
}

fn bundled() -> ResolvedImage {
    ResolvedImage {
        image: sample::bundled_sample(),
        source: DefaultAssetSource.describe(),
    }
}
