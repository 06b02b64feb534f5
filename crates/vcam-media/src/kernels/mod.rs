//! Stateless per-pixel kernel library.
//!
//! Every kernel maps one [`Frame`](crate::frame::Frame) to a new frame of the
//! same dimensions, writes alpha 255, and never fails. Values are clamped into
//! `0..=255` before storage.
//!
//! | Kernel | Output |
//! |--------|--------|
//! | [`grayscale`] | boosted channel average on R, G and B |
//! | [`isolate_channel`] | one channel kept, the other two zeroed |
//! | [`threshold_channel`] | pure channel color above `t`, black otherwise |
//! | [`subtractive`] | `(255-R, 255-G, 255-B)` |
//! | [`hsv`] | hue, saturation, value packed into R, G, B |
//! | [`subtractive_threshold`] | white where mean CMY intensity exceeds `t` |
//! | [`hsv_threshold`] | white where `max(R,G,B)` exceeds `t` |

pub mod color;
pub mod threshold;

pub use color::{
    gray_level, grayscale, hsv, hsv_components, hsv_pixel, isolate_channel, subtractive, Hsv,
};
pub use threshold::{hsv_threshold, subtractive_threshold, threshold_channel};

/// Fully opaque alpha written by every kernel.
pub const OPAQUE: u8 = 255;

/// Round and clamp a float into a storable byte. NaN maps to 0.
#[inline]
pub fn clamp_byte(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}
