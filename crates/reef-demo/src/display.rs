//! Output encoding for the comparison views.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reef_core::{EnhanceError, RgbBuffer};

/// Encode a buffer as PNG bytes.
pub fn encode_png(img: &RgbBuffer) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    img.to_image_buffer()
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Encode a buffer as base64 PNG for JSON transport.
pub fn encode_png_base64(img: &RgbBuffer) -> Result<String, image::ImageError> {
    Ok(STANDARD.encode(encode_png(img)?))
}

/// Compose the corrected image (left) and the original (right) into one frame.
///
/// `gap` black columns separate the halves. Images of different height are
/// top-aligned over a black background.
pub fn side_by_side(
    enhanced: &RgbBuffer,
    original: &RgbBuffer,
    gap: u32,
) -> Result<RgbBuffer, EnhanceError> {
    let width = composite_width(enhanced.width(), gap, original.width())?;
    let height = enhanced.height().max(original.height());
    let right_start = enhanced.width() + gap;

    Ok(RgbBuffer::from_fn(width, height, |x, y| {
        if x < enhanced.width() {
            if y < enhanced.height() {
                return enhanced.pixel(x, y);
            }
        } else if x >= right_start && y < original.height() {
            return original.pixel(x - right_start, y);
        }
        [0, 0, 0]
    }))
}

fn composite_width(left: u32, gap: u32, right: u32) -> Result<u32, EnhanceError> {
    left.checked_add(gap)
        .and_then(|w| w.checked_add(right))
        .ok_or_else(|| {
            EnhanceError::DimensionsOverflow(format!("{left} + {gap} + {right} columns"))
        })
}
