//! The eleven derived display frames published every tick.

use rayon::prelude::*;
use vcam_models::{Channel, Thresholds};

use crate::frame::Frame;
use crate::kernels;

/// Gallery tile identifiers, in publishing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GalleryTile {
    Grayscale,
    Isolated(Channel),
    Threshold(Channel),
    Subtractive,
    Hsv,
    SubtractiveThreshold,
    HsvThreshold,
}

impl GalleryTile {
    pub const ALL: [GalleryTile; 11] = [
        GalleryTile::Grayscale,
        GalleryTile::Isolated(Channel::Red),
        GalleryTile::Isolated(Channel::Green),
        GalleryTile::Isolated(Channel::Blue),
        GalleryTile::Threshold(Channel::Red),
        GalleryTile::Threshold(Channel::Green),
        GalleryTile::Threshold(Channel::Blue),
        GalleryTile::Subtractive,
        GalleryTile::Hsv,
        GalleryTile::SubtractiveThreshold,
        GalleryTile::HsvThreshold,
    ];

    /// Stable file-friendly name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Isolated(Channel::Red) => "red",
            Self::Isolated(Channel::Green) => "green",
            Self::Isolated(Channel::Blue) => "blue",
            Self::Threshold(Channel::Red) => "red_threshold",
            Self::Threshold(Channel::Green) => "green_threshold",
            Self::Threshold(Channel::Blue) => "blue_threshold",
            Self::Subtractive => "cmy",
            Self::Hsv => "hsv",
            Self::SubtractiveThreshold => "cmy_threshold",
            Self::HsvThreshold => "hsv_threshold",
        }
    }

    /// Run this tile's kernel.
    pub fn render(&self, frame: &Frame, thresholds: &Thresholds) -> Frame {
        match *self {
            Self::Grayscale => kernels::grayscale(frame),
            Self::Isolated(channel) => kernels::isolate_channel(frame, channel),
            Self::Threshold(channel) => {
                kernels::threshold_channel(frame, channel, thresholds.channel(channel))
            }
            Self::Subtractive => kernels::subtractive(frame),
            Self::Hsv => kernels::hsv(frame),
            Self::SubtractiveThreshold => kernels::subtractive_threshold(frame, thresholds.cmy),
            Self::HsvThreshold => kernels::hsv_threshold(frame, thresholds.hsv),
        }
    }
}

/// One tick's gallery, indexed like [`GalleryTile::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct KernelGallery {
    frames: Vec<Frame>,
}

impl KernelGallery {
    /// Render every tile from the same input. Tiles are independent and run
    /// on the rayon pool.
    pub fn render(frame: &Frame, thresholds: &Thresholds) -> Self {
        let frames = GalleryTile::ALL[..]
            .par_iter()
            .map(|tile| tile.render(frame, thresholds))
            .collect();
        Self { frames }
    }

    pub fn get(&self, tile: GalleryTile) -> Option<&Frame> {
        GalleryTile::ALL
            .iter()
            .position(|t| *t == tile)
            .and_then(|i| self.frames.get(i))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `(tile, frame)` pairs in publishing order.
    pub fn iter(&self) -> impl Iterator<Item = (GalleryTile, &Frame)> {
        GalleryTile::ALL.into_iter().zip(self.frames.iter())
    }

    /// `(name, frame)` pairs in publishing order.
    pub fn iter_named(&self) -> impl Iterator<Item = (&'static str, &Frame)> {
        self.iter().map(|(tile, frame)| (tile.name(), frame))
    }
}
