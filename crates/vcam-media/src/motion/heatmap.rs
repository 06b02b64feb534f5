//! Heatmap helpers for presentation layers.
//!
//! The core does not draw; these helpers turn motion samples into data a
//! display can composite directly.

use vcam_models::MotionSample;

use crate::frame::Frame;

/// Alpha of heatmap pixels.
pub const HEATMAP_ALPHA: u8 = 150;

/// Color for one sample: full red, green proportional to clamped strength.
#[inline]
pub fn heat_color(sample: &MotionSample) -> [u8; 4] {
    [255, sample.intensity(), 0, HEATMAP_ALPHA]
}

/// Transparent overlay with every sample pixel colored by [`heat_color`].
/// Samples outside `width x height` are ignored.
pub fn render_overlay(width: u32, height: u32, samples: &[MotionSample]) -> Frame {
    let mut overlay = Frame::filled(width, height, [0, 0, 0, 0]);
    for sample in samples {
        if sample.x < width && sample.y < height {
            overlay.put_pixel(sample.x, sample.y, heat_color(sample));
        }
    }
    overlay
}

/// Target rectangle on a display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Linearly map a sample from source-frame coordinates into `target`.
pub fn project(sample: &MotionSample, source: (u32, u32), target: DisplayRect) -> (f64, f64) {
    let (src_w, src_h) = source;
    let sx = if src_w == 0 {
        target.x
    } else {
        target.x + sample.x as f64 / src_w as f64 * target.width
    };
    let sy = if src_h == 0 {
        target.y
    } else {
        target.y + sample.y as f64 / src_h as f64 * target.height
    };
    (sx, sy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_colors_samples_only() {
        let samples = [MotionSample::new(1, 0, 80), MotionSample::new(0, 1, 600)];
        let overlay = render_overlay(2, 2, &samples);
        assert_eq!(overlay.pixel(1, 0), [255, 80, 0, 150]);
        assert_eq!(overlay.pixel(0, 1), [255, 255, 0, 150]);
        assert_eq!(overlay.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(overlay.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_overlay_skips_out_of_bounds() {
        let overlay = render_overlay(2, 2, &[MotionSample::new(5, 5, 100)]);
        assert!(overlay.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_project_into_display_box() {
        let rect = DisplayRect {
            x: 700.0,
            y: 320.0,
            width: 240.0,
            height: 180.0,
        };
        let (sx, sy) = project(&MotionSample::new(160, 120, 60), (320, 240), rect);
        assert_eq!((sx, sy), (820.0, 410.0));
    }
}
