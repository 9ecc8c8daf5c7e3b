//! Bundled sample scene used when no photo is available.
//!
//! Procedurally drawn so the binary carries no asset files: a blue-green
//! water column darkening with depth, a sandy floor, and a faded coral
//! head that is just red-dominant enough for the filter to pick up.

use reef_core::RgbBuffer;

/// Width of the bundled sample.
pub const SAMPLE_WIDTH: u32 = 320;
/// Height of the bundled sample.
pub const SAMPLE_HEIGHT: u32 = 240;

/// The bundled sample at its native size.
pub fn bundled_sample() -> RgbBuffer {
    underwater_scene(SAMPLE_WIDTH, SAMPLE_HEIGHT)
}

/// Draw the sample scene at an arbitrary size (both dimensions clamped to ≥ 1).
pub fn underwater_scene(width: u32, height: u32) -> RgbBuffer {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;

    // Coral head: ellipse sitting on the floor, left of center.
    let (cx, cy) = (0.38 * w, 0.78 * h);
    let (rx, ry) = (0.22 * w, 0.18 * h);

    RgbBuffer::from_fn(width, height, |x, y| {
        let u = x as f32 / w;
        let v = y as f32 / h;

        let dx = (x as f32 - cx) / rx;
        let dy = (y as f32 - cy) / ry;
        let d = dx * dx + dy * dy;

        let px = if d <= 1.0 {
            // Brighter toward the middle of the coral, mottled horizontally.
            let shade = 1.0 - 0.35 * d;
            let mottle = 0.9 + 0.1 * (u * 40.0).sin();
            [150.0 * shade * mottle, 85.0 * shade, 80.0 * shade]
        } else if v > 0.85 {
            let t = (v - 0.85) / 0.15;
            [70.0 + 30.0 * t, 110.0 + 20.0 * t, 105.0]
        } else {
            // Water: cyan near the surface, deep blue below.
            [25.0 * (1.0 - v), 150.0 - 70.0 * v + 10.0 * u, 200.0 - 60.0 * v]
        };
        px.map(|c: f32| c.clamp(0.0, 255.0) as u8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_core::{APP_THRESHOLD, EnhanceParams, enhance_with_stats};

    #[test]
    fn test_sample_dimensions() {
        let img = bundled_sample();
        assert_eq!(img.shape(), (SAMPLE_HEIGHT as usize, SAMPLE_WIDTH as usize, 3));
    }

    #[test]
    fn test_scene_is_deterministic() {
        assert_eq!(underwater_scene(64, 48), underwater_scene(64, 48));
    }

    #[test]
    fn test_zero_size_clamped() {
        let img = underwater_scene(0, 0);
        assert_eq!(img.shape(), (1, 1, 3));
    }

    #[test]
    fn test_coral_is_picked_up_but_water_is_not() {
        let img = bundled_sample();
        let (_, stats) =
            enhance_with_stats(&img, &EnhanceParams::new(1.3, APP_THRESHOLD)).unwrap();
        assert!(stats.qualified_pixels > 0);
        assert!(stats.coverage() < 0.5);

        // Top-left is open water.
        let water = img.pixel(0, 0);
        assert!(water[2] > water[0]);
    }
}
