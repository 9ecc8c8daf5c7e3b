//! Reef — underwater red correction tool.
//!
//! Restores red tones lost to underwater absorption. Runs either as a
//! one-shot CLI over image files or as a WebSocket server that a browser
//! UI drives with uploads and depth selections.

mod config;
mod display;
mod fetch;
mod image_loader;
mod ipc;
mod sample;
mod session;
mod ws_bridge;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reef_core::{DEFAULT_DEPTH, DepthTable, EnhanceParams, RgbBuffer, enhance_with_stats};

use crate::config::AppConfig;
use crate::image_loader::{FileSource, ImageSource};

/// Columns between the two halves of a comparison image.
const COMPARE_GAP: u32 = 8;

#[derive(Parser)]
#[command(name = "reef")]
#[command(about = "Enhance red tones in underwater photos")]
#[command(version)]
struct Cli {
    /// Never fetch the remote sample; use the bundled one
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct a single photo
    Enhance {
        /// Photo to correct (JPEG or PNG). Uses the sample image when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Approximate depth in meters
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,

        /// Normalized red threshold (default: REEF_THRESHOLD or 0.15)
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Where to write the corrected image
        #[arg(short, long)]
        output: PathBuf,

        /// Also write a corrected | original comparison image
        #[arg(short, long)]
        compare: Option<PathBuf>,
    },

    /// Serve the WebSocket UI bridge
    Serve {
        /// Port to listen on (default: REEF_WS_PORT or 9400)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List depth presets
    Depths,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=reef=debug,reef_core=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = if cli.offline {
        AppConfig::offline()
    } else {
        AppConfig::default()
    };

    match cli.command {
        Commands::Enhance {
            input,
            depth,
            threshold,
            output,
            compare,
        } => run_enhance(&config, input, depth, threshold, output, compare),
        Commands::Serve { port } => run_serve(&config, port),
        Commands::Depths => {
            for (meters, strength) in DepthTable::default().iter() {
                println!("{meters:>3} m  strength {strength}");
            }
            Ok(())
        }
    }
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

fn run_enhance(
    config: &AppConfig,
    input: Option<PathBuf>,
    depth: u32,
    threshold: Option<f32>,
    output: PathBuf,
    compare: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let strength = DepthTable::default().strength_for(depth)?;
    let params = EnhanceParams::new(strength, threshold.unwrap_or(config.threshold));
    params.validate()?;

    let (original, source) = match input.map(FileSource::new) {
        Some(file) => match file.acquire() {
            Ok(img) => (img, file.describe()),
            Err(e) => {
                tracing::error!(
                    "Failed to load {}: {e}. Using a sample image.",
                    file.describe()
                );
                sample_image(config)?
            }
        },
        None => {
            tracing::info!("No image given. Using a sample image.");
            sample_image(config)?
        }
    };

    let (enhanced, stats) = enhance_with_stats(&original, &params)?;
    tracing::info!(
        "Enhanced {source} ({}x{}) at {depth} m: {} of {} pixels boosted, {} clipped",
        original.width(),
        original.height(),
        stats.qualified_pixels,
        stats.total_pixels,
        stats.clipped_pixels
    );

    enhanced.to_image_buffer().save(&output)?;
    tracing::info!("Wrote {}", output.display());

    if let Some(path) = compare {
        display::side_by_side(&enhanced, &original, COMPARE_GAP)?
            .to_image_buffer()
            .save(&path)?;
        tracing::info!("Wrote comparison {}", path.display());
    }
    Ok(())
}

/// Remote sample when reachable, bundled scene otherwise.
fn sample_image(config: &AppConfig) -> std::io::Result<(RgbBuffer, String)> {
    let resolved = runtime()?.block_on(fetch::resolve_sample(config));
    Ok((resolved.image, resolved.source))
}

fn run_serve(config: &AppConfig, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let port = port.unwrap_or(config.ws_port);
    runtime()?.block_on(async {
        let listener = ws_bridge::bind(port).await?;
        let sample = Arc::new(fetch::resolve_sample(config).await);
        ws_bridge::serve(listener, sample, config.threshold).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use reef_core::EnhanceError;

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            threshold: 0.15,
            ..AppConfig::offline()
        }
    }

    fn write_photo(path: &Path) {
        let photo = RgbBuffer::new(2, 1, vec![[100, 40, 30], [0, 0, 255]]).unwrap();
        photo.to_image_buffer().save(path).unwrap();
    }

    #[test]
    fn test_enhance_writes_output_and_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dive.png");
        let output = dir.path().join("out.png");
        let compare = dir.path().join("compare.png");
        write_photo(&input);

        run_enhance(
            &config(),
            Some(input),
            10,
            None,
            output.clone(),
            Some(compare.clone()),
        )
        .unwrap();

        // 100/255 × 1.6 × 255 truncates to 160
        let out = image_loader::load_image(&output).unwrap();
        assert_eq!(out.pixels(), &[[160, 40, 30], [0, 0, 255]]);

        let side = image_loader::load_image(&compare).unwrap();
        assert_eq!(side.shape(), (1, 2 + COMPARE_GAP as usize + 2, 3));
        assert_eq!(side.pixel(0, 0), [160, 40, 30]);
        assert_eq!(side.pixel(2, 0), [0, 0, 0]);
        assert_eq!(side.pixel(2 + COMPARE_GAP, 0), [100, 40, 30]);
        assert_eq!(side.pixel(3 + COMPARE_GAP, 0), [0, 0, 255]);
    }

    #[test]
    fn test_threshold_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dive.png");
        let output = dir.path().join("out.png");
        write_photo(&input);

        // 100/255 ≈ 0.39 does not exceed 0.5
        run_enhance(&config(), Some(input), 15, Some(0.5), output.clone(), None).unwrap();
        let out = image_loader::load_image(&output).unwrap();
        assert_eq!(out.pixels(), &[[100, 40, 30], [0, 0, 255]]);
    }

    #[test]
    fn test_unknown_depth_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");

        let err = run_enhance(&config(), None, 7, None, output.clone(), None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EnhanceError>(),
            Some(&EnhanceError::UnknownDepth(7))
        );
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_uses_sample() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");

        run_enhance(&config(), None, 5, None, output.clone(), None).unwrap();
        let out = image_loader::load_image(&output).unwrap();
        let expected = reef_core::enhance(&sample::bundled_sample(), 1.3, 0.15).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_undecodable_input_falls_back_to_sample() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.jpg");
        let output = dir.path().join("out.png");
        std::fs::write(&input, b"not a jpeg").unwrap();

        run_enhance(&config(), Some(input), 5, None, output.clone(), None).unwrap();
        let out = image_loader::load_image(&output).unwrap();
        assert_eq!(
            (out.width(), out.height()),
            (sample::SAMPLE_WIDTH, sample::SAMPLE_HEIGHT)
        );
    }
}
