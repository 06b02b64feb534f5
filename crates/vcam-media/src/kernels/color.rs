//! Color transforms: luminance, channel isolation, subtractive and HSV.

use vcam_models::Channel;

use super::{clamp_byte, OPAQUE};
use crate::frame::{Frame, Pixel};

/// Brightness boost applied on top of the channel average.
pub const GRAY_BOOST: f64 = 1.2;

/// `min(255, round((R+G+B)/3 * 1.2))`.
#[inline]
pub fn gray_level(r: u8, g: u8, b: u8) -> u8 {
    let avg = (r as f64 + g as f64 + b as f64) / 3.0;
    clamp_byte(avg * GRAY_BOOST)
}

/// Boosted channel average written to R, G and B.
pub fn grayscale(frame: &Frame) -> Frame {
    frame.map_pixels(|[r, g, b, _]| {
        let v = gray_level(r, g, b);
        [v, v, v, OPAQUE]
    })
}

/// Keep `channel`, zero the other two.
pub fn isolate_channel(frame: &Frame, channel: Channel) -> Frame {
    let offset = channel.offset();
    frame.map_pixels(move |px| {
        let mut out = [0, 0, 0, OPAQUE];
        out[offset] = px[offset];
        out
    })
}

/// `(255-R, 255-G, 255-B)` stored as RGB. Applying it twice restores the
/// input color channels.
pub fn subtractive(frame: &Frame) -> Frame {
    frame.map_pixels(|[r, g, b, _]| [255 - r, 255 - g, 255 - b, OPAQUE])
}

/// Unquantized HSV components of one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees, `[0, 360]`.
    pub hue_degrees: f64,
    /// Saturation, `[0, 1]`.
    pub saturation: f64,
    /// Value, the raw channel maximum.
    pub value: u8,
}

/// HSV components using the sector table below.
///
/// Sectors are tested in a fixed order over the normalized complements
/// `R' = (max-R)/delta` (likewise `G'`, `B'`):
///
/// 1. R max, G min: `5 + B'`
/// 2. R max, G not min: `1 - G'`
/// 3. G max, B min: `R' + 1`
/// 4. G max, B not min: `3 - B'`
/// 5. R max: `3 + G'` (never reached, shadowed by 1 and 2)
/// 6. otherwise: `5 - R'`
///
/// Blue-dominant pixels therefore all land in case 6, which only matches the
/// textbook hue when green is the minimum. The order is kept as-is so
/// published frames stay comparable with earlier captures.
pub fn hsv_components(r: u8, g: u8, b: u8) -> Hsv {
    let maxv = r.max(g).max(b);
    let minv = r.min(g).min(b);
    let delta = (maxv - minv) as f64;
    let max_f = maxv as f64;

    let saturation = if maxv == 0 { 0.0 } else { delta / max_f };

    let mut hue = 0.0;
    if delta != 0.0 {
        let rc = (max_f - r as f64) / delta;
        let gc = (max_f - g as f64) / delta;
        let bc = (max_f - b as f64) / delta;

        hue = if r == maxv && g == minv {
            5.0 + bc
        } else if r == maxv && g != minv {
            1.0 - gc
        } else if g == maxv && b == minv {
            rc + 1.0
        } else if g == maxv && b != minv {
            3.0 - bc
        } else if r == maxv {
            3.0 + gc
        } else {
            5.0 - rc
        };
    }

    hue *= 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }

    Hsv {
        hue_degrees: hue,
        saturation,
        value: maxv,
    }
}

/// HSV packed into an RGBA pixel: hue scaled to `0..=255`, saturation scaled
/// to `0..=255`, raw value.
#[inline]
pub fn hsv_pixel(r: u8, g: u8, b: u8) -> Pixel {
    let hsv = hsv_components(r, g, b);
    [
        clamp_byte(hsv.hue_degrees / 360.0 * 255.0),
        clamp_byte(hsv.saturation * 255.0),
        hsv.value,
        OPAQUE,
    ]
}

/// Hue/saturation/value visualization.
pub fn hsv(frame: &Frame) -> Frame {
    frame.map_pixels(|[r, g, b, _]| hsv_pixel(r, g, b))
}
