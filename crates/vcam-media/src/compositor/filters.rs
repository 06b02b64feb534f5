//! Neighborhood filters for the face region.
//!
//! Both filters average only in-bounds pixels: windows and blocks touching an
//! edge shrink instead of wrapping or padding. Averages round to nearest.
//! Only color channels are averaged; output alpha is always opaque.

use crate::frame::{Frame, Pixel, CHANNELS};
use crate::kernels::OPAQUE;

/// Per-channel running sums over a frame, `(w+1) x (h+1)` entries.
struct SummedArea {
    stride: usize,
    sums: Vec<[u64; CHANNELS]>,
}

impl SummedArea {
    fn new(frame: &Frame) -> Self {
        let (w, h) = (frame.width() as usize, frame.height() as usize);
        let stride = w + 1;
        let mut sums = vec![[0u64; CHANNELS]; stride * (h + 1)];
        let raw = frame.as_raw();

        for y in 0..h {
            let mut row = [0u64; CHANNELS];
            for x in 0..w {
                let px = &raw[(y * w + x) * CHANNELS..][..CHANNELS];
                let above = sums[y * stride + x + 1];
                let cell = &mut sums[(y + 1) * stride + x + 1];
                for c in 0..CHANNELS {
                    row[c] += px[c] as u64;
                    cell[c] = above[c] + row[c];
                }
            }
        }

        Self { stride, sums }
    }

    /// Rounded mean over `[x0, x1) x [y0, y1)`. The window must be non-empty.
    fn mean(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> Pixel {
        let count = ((x1 - x0) * (y1 - y0)) as u64;
        let at = |x: usize, y: usize| self.sums[y * self.stride + x];
        let (a, b, c, d) = (at(x1, y1), at(x0, y1), at(x1, y0), at(x0, y0));

        let mut out = [0, 0, 0, OPAQUE];
        for i in 0..3 {
            let total = a[i] + d[i] - b[i] - c[i];
            out[i] = ((total + count / 2) / count) as u8;
        }
        out
    }
}

/// Box blur: each pixel becomes the mean of the `(2r+1)^2` window around it,
/// clipped to the frame.
pub fn box_blur(frame: &Frame, radius: u32) -> Frame {
    if radius == 0 || frame.pixel_count() == 0 {
        return opaque(frame);
    }
    let table = SummedArea::new(frame);
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let r = radius as usize;

    Frame::from_fn(frame.width(), frame.height(), |x, y| {
        let (x, y) = (x as usize, y as usize);
        table.mean(
            x.saturating_sub(r),
            y.saturating_sub(r),
            (x + r + 1).min(w),
            (y + r + 1).min(h),
        )
    })
}

/// Pixelate: tile the frame into `block x block` squares from the top-left
/// corner and fill each with the mean of its in-bounds pixels.
pub fn pixelate(frame: &Frame, block: u32) -> Frame {
    if block <= 1 || frame.pixel_count() == 0 {
        return opaque(frame);
    }
    let table = SummedArea::new(frame);
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let b = block as usize;

    Frame::from_fn(frame.width(), frame.height(), |x, y| {
        let x0 = x as usize / b * b;
        let y0 = y as usize / b * b;
        table.mean(x0, y0, (x0 + b).min(w), (y0 + b).min(h))
    })
}

fn opaque(frame: &Frame) -> Frame {
    frame.map_pixels(|[r, g, b, _]| [r, g, b, OPAQUE])
}
