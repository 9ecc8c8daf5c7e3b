//! Image representation for the red-channel enhancer.

use serde::{Deserialize, Serialize};

use crate::error::EnhanceError;

/// Number of color channels every buffer carries (R, G, B).
pub const CHANNELS: usize = 3;

/// An 8-bit RGB image buffer of shape (height, width, 3).
///
/// Pixels are stored row-major. A buffer is never empty: constructors
/// (deserialization included) reject zero-sized images and mismatched
/// pixel counts, and the fields cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRgbBuffer")]
pub struct RgbBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

/// Unvalidated wire form of [`RgbBuffer`].
#[derive(Deserialize)]
struct RawRgbBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl TryFrom<RawRgbBuffer> for RgbBuffer {
    type Error = EnhanceError;

    fn try_from(raw: RawRgbBuffer) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height, raw.pixels)
    }
}

/// Row-major offset of pixel (`x`, `y`), computed in `usize`.
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

impl RgbBuffer {
    /// Build a buffer from per-pixel RGB triples.
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Result<Self, EnhanceError> {
        if width == 0 || height == 0 {
            return Err(EnhanceError::EmptyImage);
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(EnhanceError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from interleaved channel data.
    ///
    /// `channels` is the channel count the caller claims the data has.
    /// Anything other than 3 fails with [`EnhanceError::InvalidImageShape`]
    /// instead of being reinterpreted.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, EnhanceError> {
        if channels != CHANNELS {
            return Err(EnhanceError::InvalidImageShape { channels });
        }
        if width == 0 || height == 0 {
            return Err(EnhanceError::EmptyImage);
        }
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(EnhanceError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(CHANNELS)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(width, height, pixels)
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// Zero dimensions are clamped to 1 so the result is never empty.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert any decoded image to 8-bit RGB.
    ///
    /// Alpha is dropped, grayscale is expanded and deeper bit depths are
    /// narrowed by the `image` crate's conversion rules.
    pub fn from_dynamic(img: &image::DynamicImage) -> Result<Self, EnhanceError> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Self::new(width, height, pixels)
    }

    /// Copy into an `image` crate buffer for encoding.
    pub fn to_image_buffer(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(self.pixel(x, y))
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Array shape as `(height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always `false`; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[pixel_offset(self.width, x, y)]
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Interleaved RGB bytes without copying.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub(crate) fn with_pixels(&self, pixels: Vec<[u8; 3]>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_rgba() {
        let err = RgbBuffer::from_raw(1, 1, 4, vec![1, 2, 3, 255]).unwrap_err();
        assert_eq!(err, EnhanceError::InvalidImageShape { channels: 4 });
    }

    #[test]
    fn test_from_raw_rejects_grayscale() {
        let err = RgbBuffer::from_raw(2, 1, 1, vec![10, 20]).unwrap_err();
        assert_eq!(err, EnhanceError::InvalidImageShape { channels: 1 });
    }

    #[test]
    fn test_from_raw_rejects_empty() {
        let err = RgbBuffer::from_raw(0, 4, 3, vec![]).unwrap_err();
        assert_eq!(err, EnhanceError::EmptyImage);
    }

    #[test]
    fn test_from_raw_rejects_short_buffer() {
        let err = RgbBuffer::from_raw(2, 2, 3, vec![0; 9]).unwrap_err();
        assert_eq!(
            err,
            EnhanceError::BufferSizeMismatch {
                expected: 12,
                actual: 9
            }
        );
    }

    #[test]
    fn test_from_raw_layout_is_row_major() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let buf = RgbBuffer::from_raw(2, 2, 3, data.clone()).unwrap();
        assert_eq!(buf.shape(), (2, 2, 3));
        assert_eq!(buf.pixel(1, 0), [4, 5, 6]);
        assert_eq!(buf.pixel(0, 1), [7, 8, 9]);
        assert_eq!(buf.as_bytes(), data.as_slice());
    }

    #[test]
    fn test_accessors_match_shape() {
        let buf = RgbBuffer::new(3, 2, vec![[0, 0, 0]; 6]).unwrap();
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.shape(), (2, 3, 3));
    }

    #[test]
    fn test_pixel_offset_does_not_wrap_in_u32() {
        // 70000 × 70000 pixels is past u32::MAX.
        let offset = pixel_offset(70_000, 69_999, 69_999);
        assert_eq!(offset, 70_000 * 70_000 - 1);
    }

    #[test]
    fn test_deserialize_validates_pixel_count() {
        let json = r#"{"width":4,"height":4,"pixels":[[200,50,50]]}"#;
        let err = serde_json::from_str::<RgbBuffer>(json).unwrap_err();
        assert!(err.to_string().contains("expected 16"), "{err}");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let json = r#"{"width":0,"height":1,"pixels":[]}"#;
        assert!(serde_json::from_str::<RgbBuffer>(json).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let buf = RgbBuffer::new(2, 1, vec![[200, 50, 50], [0, 0, 255]]).unwrap();
        let json = serde_json::to_string(&buf).unwrap();
        assert_eq!(json, r#"{"width":2,"height":1,"pixels":[[200,50,50],[0,0,255]]}"#);
        assert_eq!(serde_json::from_str::<RgbBuffer>(&json).unwrap(), buf);
    }

    #[test]
    fn test_from_fn_clamps_zero_size() {
        let buf = RgbBuffer::from_fn(0, 3, |x, y| [x as u8, y as u8, 0]);
        assert_eq!(buf.shape(), (3, 1, 3));
        assert_eq!(buf.pixel(0, 2), [0, 2, 0]);
    }

    #[test]
    fn test_from_dynamic_drops_alpha() {
        let rgba = image::RgbaImage::from_pixel(3, 2, image::Rgba([200, 50, 40, 7]));
        let buf = RgbBuffer::from_dynamic(&image::DynamicImage::ImageRgba8(rgba)).unwrap();
        assert_eq!(buf.shape(), (2, 3, 3));
        assert!(buf.pixels().iter().all(|p| *p == [200, 50, 40]));
    }

    #[test]
    fn test_to_image_buffer_preserves_pixels() {
        let buf = RgbBuffer::new(2, 1, vec![[1, 2, 3], [250, 251, 252]]).unwrap();
        let img = buf.to_image_buffer();
        assert_eq!(img.get_pixel(1, 0).0, [250, 251, 252]);
        assert_eq!(img.into_raw(), buf.as_bytes());
    }
}
