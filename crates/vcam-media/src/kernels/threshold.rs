//! Binary threshold kernels. A pixel is "on" only when its measure is
//! strictly greater than `t`, so raising `t` can only switch pixels off.

use vcam_models::Channel;

use super::OPAQUE;
use crate::frame::Frame;

/// Pure `channel` color where that channel exceeds `t`, black elsewhere.
pub fn threshold_channel(frame: &Frame, channel: Channel, t: u8) -> Frame {
    let offset = channel.offset();
    frame.map_pixels(move |px| {
        let mut out = [0, 0, 0, OPAQUE];
        if px[offset] > t {
            out[offset] = 255;
        }
        out
    })
}

/// White where the mean of `(255-R, 255-G, 255-B)` exceeds `t`.
pub fn subtractive_threshold(frame: &Frame, t: u8) -> Frame {
    let t = t as f64;
    frame.map_pixels(move |[r, g, b, _]| {
        let intensity = ((255 - r) as f64 + (255 - g) as f64 + (255 - b) as f64) / 3.0;
        let v = if intensity > t { 255 } else { 0 };
        [v, v, v, OPAQUE]
    })
}

/// White where `max(R, G, B)` exceeds `t`.
pub fn hsv_threshold(frame: &Frame, t: u8) -> Frame {
    frame.map_pixels(move |[r, g, b, _]| {
        let v = if r.max(g).max(b) > t { 255 } else { 0 };
        [v, v, v, OPAQUE]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Frame {
        Frame::from_fn(16, 16, |x, y| {
            [
                (x * 16 + y) as u8,
                (255 - x * 16) as u8,
                (y * 16) as u8,
                255,
            ]
        })
    }

    fn lit(frame: &Frame) -> Vec<bool> {
        frame
            .as_raw()
            .chunks_exact(4)
            .map(|px| px[..3].iter().any(|&c| c != 0))
            .collect()
    }

    #[test]
    fn test_channel_threshold_outputs_pure_color() {
        let frame = Frame::filled(1, 1, [200, 100, 50, 255]);
        assert_eq!(threshold_channel(&frame, Channel::Red, 128).pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(threshold_channel(&frame, Channel::Green, 128).pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(threshold_channel(&frame, Channel::Blue, 49).pixel(0, 0), [0, 0, 255, 255]);
        // Strictly greater: equal values stay off.
        assert_eq!(threshold_channel(&frame, Channel::Blue, 50).pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_thresholds_are_monotonic() {
        let frame = gradient();
        let kernels: [&dyn Fn(u8) -> Frame; 5] = [
            &|t| threshold_channel(&frame, Channel::Red, t),
            &|t| threshold_channel(&frame, Channel::Green, t),
            &|t| threshold_channel(&frame, Channel::Blue, t),
            &|t| subtractive_threshold(&frame, t),
            &|t| hsv_threshold(&frame, t),
        ];

        for kernel in kernels {
            let mut previous = lit(&kernel(0));
            for t in (8..=255).step_by(8) {
                let current = lit(&kernel(t as u8));
                for (before, after) in previous.iter().zip(&current) {
                    assert!(!after || *before, "pixel turned on when raising t to {t}");
                }
                previous = current;
            }
        }
    }

    #[test]
    fn test_subtractive_threshold_uses_mean_intensity() {
        // CMY = (255, 155, 55), mean 155.
        let frame = Frame::filled(1, 1, [0, 100, 200, 255]);
        assert_eq!(subtractive_threshold(&frame, 154).pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(subtractive_threshold(&frame, 155).pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_hsv_threshold_uses_channel_max() {
        let frame = Frame::filled(1, 1, [10, 180, 40, 0]);
        assert_eq!(hsv_threshold(&frame, 179).pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(hsv_threshold(&frame, 180).pixel(0, 0), [0, 0, 0, 255]);
    }
}
