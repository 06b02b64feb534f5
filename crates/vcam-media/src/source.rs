//! Frame acquisition.
//!
//! A source yields at most one frame per tick. `None` means nothing was
//! available and the tick is skipped.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::frame::Frame;

/// File extensions read by [`ImageSequenceSource`].
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Frame acquisition capability.
pub trait FrameSource: Send {
    /// Next frame, or `None` when nothing is available this tick.
    fn pull(&mut self) -> Option<Frame>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// In-memory queue of frames pushed by a host.
///
/// A queued `None` models a tick where the camera had nothing ready.
#[derive(Debug, Default)]
pub struct QueuedSource {
    frames: VecDeque<Option<Frame>>,
}

impl QueuedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(Some(frame));
    }

    /// Queue an empty acquisition.
    pub fn push_gap(&mut self) {
        self.frames.push_back(None);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FromIterator<Frame> for QueuedSource {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().map(Some).collect(),
        }
    }
}

impl FrameSource for QueuedSource {
    fn pull(&mut self) -> Option<Frame> {
        self.frames.pop_front().flatten()
    }

    fn name(&self) -> &'static str {
        "queue"
    }
}

/// Reads a directory of still images as a frame sequence.
///
/// Files are taken in lexical order, converted to RGBA and resized to the
/// capture size. Files that fail to decode are skipped.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    capture_size: (u32, u32),
    looping: bool,
    decoded: u64,
    failed: u64,
}

impl ImageSequenceSource {
    /// Scan `dir` for image files.
    pub fn open(
        dir: impl AsRef<Path>,
        capture_size: (u32, u32),
        looping: bool,
    ) -> MediaResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(MediaError::FileNotFound(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && has_image_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(MediaError::source_unavailable(format!(
                "no image files in {}",
                dir.display()
            )));
        }

        info!(
            dir = %dir.display(),
            frames = paths.len(),
            width = capture_size.0,
            height = capture_size.1,
            looping,
            "Opened image sequence"
        );

        Ok(Self {
            paths,
            next: 0,
            capture_size,
            looping,
            decoded: 0,
            failed: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True once a non-looping sequence has handed out every file.
    pub fn is_exhausted(&self) -> bool {
        !self.looping && self.next >= self.paths.len()
    }

    /// `(decoded, failed)` counts so far.
    pub fn stats(&self) -> (u64, u64) {
        (self.decoded, self.failed)
    }

    fn load(&self, path: &Path) -> MediaResult<Frame> {
        let (w, h) = self.capture_size;
        let rgba = image::open(path)?.to_rgba8();
        if rgba.dimensions() == (w, h) {
            return Ok(Frame::from(rgba));
        }
        Ok(Frame::from(image::imageops::resize(
            &rgba,
            w,
            h,
            FilterType::Triangle,
        )))
    }
}

impl FrameSource for ImageSequenceSource {
    /// Next decodable file. A run of bad files is skipped within a single
    /// pull, bounded by one pass over the sequence.
    fn pull(&mut self) -> Option<Frame> {
        for _ in 0..self.paths.len() {
            if self.next >= self.paths.len() {
                if !self.looping {
                    return None;
                }
                debug!("Image sequence wrapped");
                self.next = 0;
            }

            let path = &self.paths[self.next];
            self.next += 1;

            match self.load(path) {
                Ok(frame) => {
                    self.decoded += 1;
                    return Some(frame);
                }
                Err(e) => {
                    self.failed += 1;
                    warn!(path = %path.display(), error = %e, "Skipping undecodable frame");
                }
            }
        }
        None
    }

    fn name(&self) -> &'static str {
        "image_sequence"
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, px: [u8; 4]) {
        RgbaImage::from_pixel(w, h, Rgba(px))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_queued_source_gaps() {
        let mut source: QueuedSource = [Frame::new(2, 2)].into_iter().collect();
        source.push_gap();
        source.push(Frame::new(3, 3));

        assert_eq!(source.pull().map(|f| f.dimensions()), Some((2, 2)));
        assert!(source.pull().is_none());
        assert_eq!(source.pull().map(|f| f.dimensions()), Some((3, 3)));
        assert!(source.pull().is_none());
    }

    #[test]
    fn test_sequence_reads_in_lexical_order_and_resizes() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "b.png", 8, 6, [0, 200, 0, 255]);
        write_png(dir.path(), "a.png", 16, 12, [200, 0, 0, 255]);
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = ImageSequenceSource::open(dir.path(), (4, 3), false).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.pull().unwrap();
        assert_eq!(first.dimensions(), (4, 3));
        assert_eq!(first.pixel(1, 1), [200, 0, 0, 255]);
        assert_eq!(source.pull().unwrap().pixel(0, 0), [0, 200, 0, 255]);
        assert!(source.pull().is_none());
        assert!(source.is_exhausted());
    }

    #[test]
    fn test_sequence_skips_corrupt_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.png"), b"not a png").unwrap();
        write_png(dir.path(), "b.png", 4, 3, [1, 2, 3, 255]);

        let mut source = ImageSequenceSource::open(dir.path(), (4, 3), false).unwrap();
        assert_eq!(source.pull().unwrap().pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(source.stats(), (1, 1));
    }

    #[test]
    fn test_sequence_loops() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "only.png", 4, 3, [9, 9, 9, 255]);

        let mut source = ImageSequenceSource::open(dir.path(), (4, 3), true).unwrap();
        for _ in 0..3 {
            assert!(source.pull().is_some());
        }
        assert!(!source.is_exhausted());
    }

    #[test]
    fn test_open_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ImageSequenceSource::open(dir.path(), (4, 3), false),
            Err(MediaError::SourceUnavailable(_))
        ));
        assert!(matches!(
            ImageSequenceSource::open(dir.path().join("missing"), (4, 3), false),
            Err(MediaError::FileNotFound(_))
        ));
    }
}
