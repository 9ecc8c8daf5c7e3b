//! Red-channel enhancement for underwater photographs.
//!
//! Water absorbs long wavelengths first, so reds fade with depth. This
//! filter boosts the red channel of pixels that are already red-dominant,
//! leaving everything else untouched.
//!
//! ```text
//! r, g, b  = px / 255
//! qualifies = r > threshold && r > g && r > b
//! r'       = qualifies ? r × strength : r
//! out      = trunc(clamp([r', g, b], 0, 1) × 255)
//! ```
//!
//! All arithmetic is single-precision. Unchanged channels survive the
//! normalize/rescale round trip bit-exactly at 8-bit precision.

use serde::{Deserialize, Serialize};

use crate::error::EnhanceError;
use crate::image::RgbBuffer;

/// Default multiplier applied to qualifying red values.
pub const DEFAULT_STRENGTH: f32 = 1.5;

/// Default normalized red activation threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.2;

/// Threshold used by the interactive tools.
pub const APP_THRESHOLD: f32 = 0.15;

/// Parameters for one enhancement pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhanceParams {
    /// Multiplier for the red channel of qualifying pixels.
    pub strength: f32,
    /// Normalized red value a pixel must exceed to qualify.
    /// Values at or above 1.0 disable the filter.
    pub threshold: f32,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            strength: DEFAULT_STRENGTH,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl EnhanceParams {
    pub fn new(strength: f32, threshold: f32) -> Self {
        Self {
            strength,
            threshold,
        }
    }

    /// Reject parameters that would make the output meaningless.
    pub fn validate(&self) -> Result<(), EnhanceError> {
        if !self.strength.is_finite() || self.strength <= 0.0 {
            return Err(EnhanceError::InvalidStrength(self.strength));
        }
        if self.threshold.is_nan() {
            return Err(EnhanceError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Per-pass counters, mostly for logging and UI feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceStats {
    /// Pixels in the image.
    pub total_pixels: usize,
    /// Pixels that passed the red-dominance mask.
    pub qualified_pixels: usize,
    /// Qualified pixels whose amplified red saturated at 255.
    pub clipped_pixels: usize,
}

impl EnhanceStats {
    /// Fraction of the image that was amplified, in [0, 1].
    pub fn coverage(&self) -> f32 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.qualified_pixels as f32 / self.total_pixels as f32
    }
}

/// Enhance red tones in `image`, returning a new buffer of the same shape.
pub fn enhance_red_channel(
    image: &RgbBuffer,
    params: &EnhanceParams,
) -> Result<RgbBuffer, EnhanceError> {
    enhance_with_stats(image, params).map(|(out, _)| out)
}

/// Positional form: `enhance(image, strength, threshold)`.
pub fn enhance(
    image: &RgbBuffer,
    strength: f32,
    threshold: f32,
) -> Result<RgbBuffer, EnhanceError> {
    enhance_red_channel(image, &EnhanceParams::new(strength, threshold))
}

/// Like [`enhance_red_channel`], also reporting how many pixels changed.
pub fn enhance_with_stats(
    image: &RgbBuffer,
    params: &EnhanceParams,
) -> Result<(RgbBuffer, EnhanceStats), EnhanceError> {
    params.validate()?;

    let mut stats = EnhanceStats {
        total_pixels: image.len(),
        ..Default::default()
    };

    let pixels: Vec<[u8; 3]> = image
        .pixels()
        .iter()
        .map(|&px| {
            let (out, outcome) = enhance_pixel_inner(px, params.strength, params.threshold);
            match outcome {
                Outcome::Untouched => {}
                Outcome::Amplified => stats.qualified_pixels += 1,
                Outcome::Clipped => {
                    stats.qualified_pixels += 1;
                    stats.clipped_pixels += 1;
                }
            }
            out
        })
        .collect();

    tracing::debug!(
        width = image.width(),
        height = image.height(),
        strength = params.strength,
        threshold = params.threshold,
        qualified = stats.qualified_pixels,
        clipped = stats.clipped_pixels,
        "red channel enhanced"
    );

    Ok((image.with_pixels(pixels), stats))
}

/// Apply the enhancement rule to a single RGB pixel.
pub fn enhance_pixel(px: [u8; 3], strength: f32, threshold: f32) -> [u8; 3] {
    enhance_pixel_inner(px, strength, threshold).0
}

enum Outcome {
    Untouched,
    Amplified,
    Clipped,
}

fn enhance_pixel_inner(px: [u8; 3], strength: f32, threshold: f32) -> ([u8; 3], Outcome) {
    let mut rgb = [
        px[0] as f32 / 255.0,
        px[1] as f32 / 255.0,
        px[2] as f32 / 255.0,
    ];

    let mut outcome = Outcome::Untouched;
    if rgb[0] > threshold && rgb[0] > rgb[1] && rgb[0] > rgb[2] {
        rgb[0] *= strength;
        outcome = if rgb[0] > 1.0 {
            Outcome::Clipped
        } else {
            Outcome::Amplified
        };
    }

    // `as u8` truncates toward zero.
    let out = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
    (out, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(px: [u8; 3]) -> RgbBuffer {
        RgbBuffer::new(1, 1, vec![px]).unwrap()
    }

    #[test]
    fn test_reference_pixel_clips_to_255() {
        // 200/255 ≈ 0.784 → ×1.5 ≈ 1.176 → clipped to 1.0
        assert_eq!(enhance_pixel([200, 50, 50], 1.5, 0.15), [255, 50, 50]);
    }

    #[test]
    fn test_moderate_boost_truncates() {
        // 100/255 × 1.3 × 255 = 129.99998 in f32, truncated rather than rounded
        assert_eq!(enhance_pixel([100, 40, 30], 1.3, 0.15), [129, 40, 30]);
    }

    #[test]
    fn test_below_threshold_untouched() {
        // 30/255 ≈ 0.118 < 0.15
        assert_eq!(enhance_pixel([30, 10, 10], 1.9, 0.15), [30, 10, 10]);
    }

    #[test]
    fn test_ties_do_not_qualify() {
        assert_eq!(enhance_pixel([120, 120, 10], 1.9, 0.15), [120, 120, 10]);
        assert_eq!(enhance_pixel([120, 10, 120], 1.9, 0.15), [120, 10, 120]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 51/255 is exactly 0.2 in f32 arithmetic on both sides
        let t = 51.0_f32 / 255.0;
        assert_eq!(enhance_pixel([51, 0, 0], 2.0, t), [51, 0, 0]);
    }

    #[test]
    fn test_dampening_strength() {
        assert_eq!(enhance_pixel([200, 50, 50], 0.5, 0.15), [100, 50, 50]);
    }

    #[test]
    fn test_negative_threshold_still_requires_dominance() {
        assert_eq!(enhance_pixel([0, 0, 0], 1.9, -1.0), [0, 0, 0]);
        assert_eq!(enhance_pixel([10, 0, 0], 2.0, -1.0)[0], 20);
    }

    #[test]
    fn test_validate_rejects_bad_strength() {
        for s in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = EnhanceParams::new(s, 0.15).validate().unwrap_err();
            assert!(matches!(err, EnhanceError::InvalidStrength(_)));
        }
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let err = EnhanceParams::new(1.5, f32::NAN).validate().unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidThreshold(_)));
    }

    #[test]
    fn test_validate_accepts_degenerate_threshold() {
        assert!(EnhanceParams::new(1.5, 1.0).validate().is_ok());
        assert!(EnhanceParams::new(1.5, 7.0).validate().is_ok());
    }

    #[test]
    fn test_enhance_rejects_invalid_params() {
        let img = single([200, 50, 50]);
        assert!(enhance(&img, 0.0, 0.15).is_err());
    }

    #[test]
    fn test_stats_count_qualified_and_clipped() {
        let img = RgbBuffer::new(
            2,
            2,
            vec![[200, 50, 50], [100, 40, 30], [0, 0, 255], [30, 10, 10]],
        )
        .unwrap();
        let (out, stats) = enhance_with_stats(&img, &EnhanceParams::new(1.5, 0.15)).unwrap();
        assert_eq!(stats.total_pixels, 4);
        assert_eq!(stats.qualified_pixels, 2);
        assert_eq!(stats.clipped_pixels, 1);
        assert!((stats.coverage() - 0.5).abs() < 1e-6);
        assert_eq!(out.pixel(0, 0), [255, 50, 50]);
        assert_eq!(out.pixel(0, 1), [0, 0, 255]);
        assert_eq!(out.pixel(1, 1), [30, 10, 10]);
    }

    #[test]
    fn test_default_params_match_reference_function() {
        let p = EnhanceParams::default();
        assert_eq!(p.strength, 1.5);
        assert_eq!(p.threshold, 0.2);
    }

    #[test]
    fn test_params_serde_shape() {
        let json = serde_json::to_string(&EnhanceParams::new(1.6, 0.15)).unwrap();
        assert_eq!(json, r#"{"strength":1.6,"threshold":0.15}"#);
    }
}
