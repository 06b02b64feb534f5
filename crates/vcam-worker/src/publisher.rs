//! Writes published outputs to disk.
//!
//! Layout under the output directory:
//!
//! - `ticks.jsonl`: one [`TickSummary`](vcam_models::TickSummary) per processed tick
//! - `frames/tick_NNNNNN/`: PNGs for every `publish_every`-th tick
//! - `metrics.prom`: Prometheus exposition written on shutdown

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use vcam_media::motion::heatmap;
use vcam_media::{clamp_to_frame, Frame, Region, VisionPipeline};

use crate::error::{WorkerError, WorkerResult};

pub const SUMMARY_FILE: &str = "ticks.jsonl";
pub const METRICS_FILE: &str = "metrics.prom";

/// Draw a one-pixel rectangle outline, clipped to the frame.
pub fn draw_outline(frame: &mut Frame, region: Region, color: [u8; 4]) {
    if region.is_empty() || region.x >= frame.width() || region.y >= frame.height() {
        return;
    }
    let right = (region.x + region.width - 1).min(frame.width().saturating_sub(1));
    let bottom = (region.y + region.height - 1).min(frame.height().saturating_sub(1));
    for x in region.x..=right {
        frame.put_pixel(x, region.y, color);
        frame.put_pixel(x, bottom, color);
    }
    for y in region.y..=bottom {
        frame.put_pixel(region.x, y, color);
        frame.put_pixel(right, y, color);
    }
}

/// Output directory writer.
pub struct OutputPublisher {
    dir: PathBuf,
    publish_every: u64,
    summaries: BufWriter<File>,
    frame_sets: u64,
}

impl OutputPublisher {
    pub fn new(dir: impl Into<PathBuf>, publish_every: u64) -> WorkerResult<Self> {
        let dir = dir.into();
        if publish_every == 0 {
            return Err(WorkerError::config_error("publish_every must be at least 1"));
        }
        std::fs::create_dir_all(dir.join("frames"))?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(SUMMARY_FILE))?;

        Ok(Self {
            dir,
            publish_every,
            summaries: BufWriter::new(file),
            frame_sets: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of frame directories written.
    pub fn frame_sets(&self) -> u64 {
        self.frame_sets
    }

    /// Publish the pipeline's latest outputs. Returns the frame directory
    /// when this tick's images were written.
    pub fn publish(&mut self, pipeline: &VisionPipeline) -> WorkerResult<Option<PathBuf>> {
        let Some(outputs) = pipeline.outputs() else {
            return Ok(None);
        };

        serde_json::to_writer(&mut self.summaries, &outputs.summary)?;
        self.summaries.write_all(b"\n")?;

        let tick = outputs.summary.tick;
        if tick % self.publish_every != 0 {
            return Ok(None);
        }

        let frame_dir = self.dir.join("frames").join(format!("tick_{tick:06}"));
        std::fs::create_dir_all(&frame_dir)?;

        for (name, frame) in outputs.gallery.iter_named() {
            save(frame, &frame_dir.join(format!("{name}.png")))?;
        }

        if let Some((width, height)) = outputs.gallery.iter().next().map(|(_, f)| f.dimensions()) {
            let overlay = heatmap::render_overlay(width, height, pipeline.motion_samples());
            save(&overlay, &frame_dir.join("motion_heatmap.png"))?;
        }

        if let Some(snapshot) = pipeline.snapshot() {
            let mut annotated = snapshot.frame.clone();
            if let Some(filtered) = &outputs.filtered {
                filtered.composite_onto(&mut annotated);
                save(&filtered.image, &frame_dir.join("face_region.png"))?;
            }
            if let Some(face) = &outputs.face {
                if let Some(region) =
                    clamp_to_frame(&face.face_box, annotated.width(), annotated.height())
                {
                    draw_outline(&mut annotated, region, face.style.color());
                }
            }
            save(&annotated, &frame_dir.join("snapshot.png"))?;
        }

        self.frame_sets += 1;
        debug!(tick, dir = %frame_dir.display(), "Published frame set");
        Ok(Some(frame_dir))
    }

    /// Write the metrics exposition text.
    pub fn write_metrics(&self, rendered: &str) -> WorkerResult<PathBuf> {
        let path = self.dir.join(METRICS_FILE);
        std::fs::write(&path, rendered)?;
        Ok(path)
    }

    pub fn flush(&mut self) -> WorkerResult<()> {
        self.summaries.flush()?;
        Ok(())
    }
}

fn save(frame: &Frame, path: &Path) -> WorkerResult<()> {
    frame.as_image().save(path)?;
    Ok(())
}
