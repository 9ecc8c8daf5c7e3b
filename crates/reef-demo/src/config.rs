//! Application configuration for the demo.

use std::time::Duration;

use reef_core::APP_THRESHOLD;

/// Default WebSocket port for the IPC bridge.
const DEFAULT_WS_PORT: u16 = 9400;
/// Sample photo shown when the user has not uploaded anything.
pub const DEFAULT_SAMPLE_URL: &str =
    "https://i.kym-cdn.com/entries/icons/facebook/000/022/747/Do_Something_meme_banner_imag.jpg";
/// Default timeout for fetching the sample photo.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the Reef tools.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// WebSocket port for the UI bridge.
    pub ws_port: u16,
    /// Remote sample image. `None` skips the fetch and uses the bundled scene.
    pub sample_url: Option<String>,
    /// Upper bound on the sample fetch.
    pub fetch_timeout: Duration,
    /// Normalized red threshold handed to the enhancer.
    pub threshold: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ws_port: env_parse("REEF_WS_PORT").unwrap_or(DEFAULT_WS_PORT),
            sample_url: match std::env::var("REEF_SAMPLE_URL") {
                Ok(url) if url.trim().is_empty() => None,
                Ok(url) => Some(url),
                Err(_) => Some(DEFAULT_SAMPLE_URL.to_string()),
            },
            fetch_timeout: Duration::from_secs(
                env_parse("REEF_FETCH_TIMEOUT_SECS").unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
            ),
            threshold: env_parse("REEF_THRESHOLD").unwrap_or(APP_THRESHOLD),
        }
    }
}

impl AppConfig {
    /// Configuration that never touches the network.
    pub fn offline() -> Self {
        Self {
            sample_url: None,
            ..Self::default()
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
