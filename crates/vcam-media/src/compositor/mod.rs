//! Face-region filter compositor.
//!
//! Works on the frozen snapshot only: the retained face box is clamped to the
//! snapshot, the covered sub-image is filtered, and the result is returned
//! with its offset so callers can paste it back.

pub mod filters;

pub use filters::{box_blur, pixelate};

use tracing::debug;
use vcam_models::{FaceBox, FaceFilterMode, PipelineConfig};

use crate::frame::{Frame, Region};
use crate::kernels;
use crate::snapshot::FrozenSnapshot;

/// Default blur radius in pixels.
pub const DEFAULT_BLUR_RADIUS: u32 = 4;

/// Default pixelate block edge in pixels.
pub const DEFAULT_PIXELATE_BLOCK: u32 = 5;

/// Fixed filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositorConfig {
    pub blur_radius: u32,
    pub pixelate_block: u32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            pixelate_block: DEFAULT_PIXELATE_BLOCK,
        }
    }
}

impl From<&PipelineConfig> for CompositorConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            blur_radius: config.blur_radius,
            pixelate_block: config.pixelate_block,
        }
    }
}

/// Filtered face sub-image and where it belongs in the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRegion {
    pub region: Region,
    pub mode: FaceFilterMode,
    pub image: Frame,
}

impl FilteredRegion {
    /// Paste the filtered pixels back at the region offset.
    pub fn composite_onto(&self, target: &mut Frame) {
        target.blit(&self.image, self.region.x, self.region.y);
    }
}

/// Clamp a face box to `width x height` pixels: left and top are floored,
/// right and bottom are ceiled. Returns `None` when nothing overlaps.
pub fn clamp_to_frame(face: &FaceBox, width: u32, height: u32) -> Option<Region> {
    let clamp = |v: f64, max: u32| -> u32 {
        if v.is_nan() {
            0
        } else {
            v.clamp(0.0, max as f64) as u32
        }
    };

    let left = clamp(face.x.floor(), width);
    let top = clamp(face.y.floor(), height);
    let right = clamp(face.right().ceil(), width);
    let bottom = clamp(face.bottom().ceil(), height);

    let region = Region::new(
        left,
        top,
        right.saturating_sub(left),
        bottom.saturating_sub(top),
    );
    (!region.is_empty()).then_some(region)
}

/// Applies the selected filter mode to the frozen face region.
#[derive(Debug, Clone, Default)]
pub struct FaceRegionCompositor {
    config: CompositorConfig,
}

impl FaceRegionCompositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Filter the snapshot's face region. `None` when the snapshot has no
    /// face box or the box misses the frame entirely.
    pub fn apply(&self, snapshot: &FrozenSnapshot, mode: FaceFilterMode) -> Option<FilteredRegion> {
        let face = snapshot.face_box?;
        let frame = &snapshot.frame;
        let Some(region) = clamp_to_frame(&face, frame.width(), frame.height()) else {
            debug!(?face, "Frozen face box lies outside the snapshot");
            return None;
        };

        let sub = frame.crop(region);
        let image = self.filter(&sub, mode);
        debug!(mode = %mode, width = region.width, height = region.height, "Filtered face region");

        Some(FilteredRegion {
            region,
            mode,
            image,
        })
    }

    /// Run one filter mode over a sub-image.
    pub fn filter(&self, sub: &Frame, mode: FaceFilterMode) -> Frame {
        match mode {
            FaceFilterMode::None => sub.clone(),
            FaceFilterMode::Grayscale => kernels::grayscale(sub),
            FaceFilterMode::Blur => box_blur(sub, self.config.blur_radius),
            FaceFilterMode::Hsv => kernels::hsv(sub),
            FaceFilterMode::Pixelate => pixelate(sub, self.config.pixelate_block),
        }
    }
}
