//! RGBA8 frame container.
//!
//! `Frame` wraps an `image::RgbaImage` so every buffer handed around the core
//! is fully populated with `width * height * 4` bytes. Derived frames are
//! produced whole by [`Frame::map_pixels`]; callers never observe a partially
//! written kernel output.

use image::{imageops, imageops::FilterType, ImageBuffer, Rgba, RgbaImage};
use rayon::prelude::*;

use crate::error::{MediaError, MediaResult};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// An RGBA pixel as four bytes.
pub type Pixel = [u8; CHANNELS];

/// Integer pixel rectangle inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// One RGBA8 image at a fixed resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbaImage,
}

impl Frame {
    /// Opaque black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 255])
    }

    /// Frame with every pixel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, Rgba(pixel)),
        }
    }

    /// Build a frame from a raw RGBA buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> MediaResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        let actual = data.len();
        if actual != expected {
            return Err(MediaError::InvalidFrame { expected, actual });
        }
        ImageBuffer::from_raw(width, height, data)
            .map(|image| Self { image })
            .ok_or(MediaError::InvalidFrame { expected, actual })
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Pixel,
    {
        Self {
            image: ImageBuffer::from_fn(width, height, |x, y| Rgba(f(x, y))),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like `image::GenericImageView`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.image.get_pixel(x, y).0
    }

    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        self.image.put_pixel(x, y, Rgba(pixel));
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Apply a per-pixel transform in parallel, producing a new frame of the
    /// same dimensions.
    pub fn map_pixels<F>(&self, f: F) -> Frame
    where
        F: Fn(Pixel) -> Pixel + Sync + Send,
    {
        let mut image = self.image.clone();
        let buf: &mut [u8] = &mut image;
        buf.par_chunks_exact_mut(CHANNELS).for_each(|px| {
            let out = f([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        });
        Frame { image }
    }

    /// Copy `other` into this frame's buffer without reallocating.
    ///
    /// Returns `false` (leaving `self` untouched) when dimensions differ.
    pub fn copy_from(&mut self, other: &Frame) -> bool {
        if self.dimensions() != other.dimensions() {
            return false;
        }
        let buf: &mut [u8] = &mut self.image;
        buf.copy_from_slice(other.as_raw());
        true
    }

    /// Resample to `width x height` with a triangle filter. Same-size
    /// requests return a copy.
    pub fn resampled(&self, width: u32, height: u32) -> Frame {
        if self.dimensions() == (width, height) {
            return self.clone();
        }
        Frame {
            image: imageops::resize(&self.image, width, height, FilterType::Triangle),
        }
    }

    /// Copy out a sub-image. The region must lie within the frame.
    pub fn crop(&self, region: Region) -> Frame {
        Frame {
            image: imageops::crop_imm(&self.image, region.x, region.y, region.width, region.height)
                .to_image(),
        }
    }

    /// Paste `src` with its top-left corner at `(x, y)`, dropping whatever
    /// falls outside this frame.
    pub fn blit(&mut self, src: &Frame, x: u32, y: u32) {
        let max_w = self.width().saturating_sub(x).min(src.width());
        let max_h = self.height().saturating_sub(y).min(src.height());
        for sy in 0..max_h {
            for sx in 0..max_w {
                self.put_pixel(x + sx, y + sy, src.pixel(sx, sy));
            }
        }
    }
}

impl From<RgbaImage> for Frame {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}
