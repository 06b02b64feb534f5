//! Tick-driven processing pipeline.
//!
//! Each tick acquires one frame and then, in order:
//!
//! 1. drains queued commands (freeze toggles, filter selection)
//! 2. samples the snapshot mode once
//! 3. renders the kernel gallery
//! 4. runs the motion detector exactly once
//! 5. runs either the face locator (Live) or the compositor (Frozen)
//!
//! A tick with no frame is skipped: queued commands wait and the previously
//! published outputs stay as they are.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, debug_span, info};
use vcam_models::{
    Command, FaceBox, FaceFilterMode, FaceSummary, GallerySource, MotionSample, PipelineConfig,
    SnapshotMode, Thresholds, TickSummary,
};

use crate::compositor::{CompositorConfig, FaceRegionCompositor, FilteredRegion};
use crate::error::{MediaError, MediaResult};
use crate::face::{FaceAnnotation, FaceDetectionCapability, FaceLocator};
use crate::frame::Frame;
use crate::gallery::KernelGallery;
use crate::metrics as vcam_metrics;
use crate::motion::{MotionDetector, MotionReport};
use crate::snapshot::{FrozenSnapshot, SnapshotState, Transition};
use crate::source::FrameSource;

/// Everything published by the last processed tick.
///
/// Motion samples live in the detector's buffer, see
/// [`VisionPipeline::motion_samples`].
#[derive(Debug, Clone)]
pub struct PublishedOutputs {
    pub gallery: KernelGallery,
    pub motion: MotionReport,
    pub face: Option<FaceAnnotation>,
    pub filtered: Option<FilteredRegion>,
    pub summary: TickSummary,
}

/// Result of one [`VisionPipeline::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No frame was available; nothing changed.
    Skipped,
    Processed(TickSummary),
}

impl TickOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, TickOutcome::Skipped)
    }

    pub fn summary(&self) -> Option<&TickSummary> {
        match self {
            TickOutcome::Processed(summary) => Some(summary),
            TickOutcome::Skipped => None,
        }
    }
}

/// Per-tick state handed from stage to stage.
#[derive(Debug)]
pub struct TickContext {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    /// Snapshot mode sampled after commands were applied.
    pub mode: SnapshotMode,
    pub filter_mode: FaceFilterMode,
    /// Frame acquired this tick, at capture resolution.
    pub frame: Frame,
    /// Frame at detector working resolution, built on first use.
    working: Option<Frame>,
}

impl TickContext {
    fn new(index: u64, frame: Frame) -> Self {
        Self {
            index,
            timestamp: Utc::now(),
            mode: SnapshotMode::Live,
            filter_mode: FaceFilterMode::None,
            frame,
            working: None,
        }
    }

    /// Working-resolution copy of this tick's frame.
    fn working(&mut self, locator: &FaceLocator) -> &Frame {
        let frame = &self.frame;
        self.working.get_or_insert_with(|| locator.to_working(frame))
    }
}

/// The per-tick processing core.
pub struct VisionPipeline {
    config: PipelineConfig,
    source: Box<dyn FrameSource>,
    locator: FaceLocator,
    motion: MotionDetector,
    snapshot: SnapshotState,
    compositor: FaceRegionCompositor,
    filter_mode: FaceFilterMode,
    pending: VecDeque<Command>,
    /// Face located on the last live tick.
    live_face: Option<FaceBox>,
    outputs: Option<PublishedOutputs>,
    ticks: u64,
    skipped: u64,
}

impl VisionPipeline {
    /// Build a pipeline. The detector's working size must match the
    /// configured working size, since snapshots are stored at that size.
    pub fn new(
        config: PipelineConfig,
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetectionCapability>,
    ) -> MediaResult<Self> {
        let config = config.validated()?;
        if detector.working_size() != config.working_size() {
            return Err(MediaError::InvalidConfig(format!(
                "detector '{}' works at {:?}, pipeline configured for {:?}",
                detector.name(),
                detector.working_size(),
                config.working_size()
            )));
        }

        info!(
            source = source.name(),
            detector = detector.name(),
            capture = ?config.capture_size(),
            working = ?config.working_size(),
            gallery_source = %config.gallery_source,
            "Vision pipeline ready"
        );

        Ok(Self {
            locator: FaceLocator::new(detector, config.min_face_score),
            motion: MotionDetector::new(config.motion_threshold),
            compositor: FaceRegionCompositor::new(CompositorConfig::from(&config)),
            config,
            source,
            snapshot: SnapshotState::new(),
            filter_mode: FaceFilterMode::default(),
            pending: VecDeque::new(),
            live_face: None,
            outputs: None,
            ticks: 0,
            skipped: 0,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Queue a command for the next tick boundary.
    pub fn submit(&mut self, command: Command) {
        debug!(?command, queued = self.pending.len() + 1, "Command queued");
        self.pending.push_back(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    pub fn mode(&self) -> SnapshotMode {
        self.snapshot.mode()
    }

    pub fn filter_mode(&self) -> FaceFilterMode {
        self.filter_mode
    }

    pub fn snapshot(&self) -> Option<&FrozenSnapshot> {
        self.snapshot.frozen()
    }

    /// Outputs of the last processed tick, `None` before the first one.
    pub fn outputs(&self) -> Option<&PublishedOutputs> {
        self.outputs.as_ref()
    }

    /// Motion samples of the last processed tick.
    pub fn motion_samples(&self) -> &[MotionSample] {
        self.motion.samples()
    }

    /// `(processed, skipped)` tick counts.
    pub fn tick_counts(&self) -> (u64, u64) {
        (self.ticks, self.skipped)
    }

    /// Run one tick with the current slider values.
    pub fn tick(&mut self, thresholds: &Thresholds) -> TickOutcome {
        let Some(frame) = self.source.pull() else {
            self.skipped += 1;
            vcam_metrics::record_tick_skipped(self.source.name());
            debug!(
                pending = self.pending.len(),
                "No frame available, skipping tick"
            );
            return TickOutcome::Skipped;
        };

        TickOutcome::Processed(self.process_frame(frame, thresholds))
    }

    /// Process a frame the host acquired itself, as one tick.
    pub fn process_frame(&mut self, frame: Frame, thresholds: &Thresholds) -> TickSummary {
        let ctx = TickContext::new(self.ticks, frame);
        self.ticks += 1;
        self.run_stages(ctx, thresholds)
    }

    fn run_stages(&mut self, mut ctx: TickContext, thresholds: &Thresholds) -> TickSummary {
        let span = debug_span!("tick", tick = ctx.index);
        let _enter = span.enter();
        let started = Instant::now();

        self.apply_pending(&mut ctx);
        ctx.mode = self.snapshot.mode();
        ctx.filter_mode = self.filter_mode;

        let gallery_input = match (self.config.gallery_source, self.snapshot.frozen()) {
            (GallerySource::SnapshotWhenFrozen, Some(frozen)) => &frozen.frame,
            _ => &ctx.frame,
        };
        let gallery = KernelGallery::render(gallery_input, thresholds);

        let motion = self.motion.detect(&ctx.frame);
        let motion_alert = motion.is_alert(self.config.motion_alert_level);
        vcam_metrics::record_motion(motion.level, motion.sample_count, motion_alert);

        let (face, filtered) = match ctx.mode {
            SnapshotMode::Live => {
                let working = ctx.working(&self.locator);
                self.live_face = self.locator.locate(working);
                (self.live_face.map(FaceAnnotation::live), None)
            }
            SnapshotMode::Frozen => match self.snapshot.frozen() {
                Some(frozen) => (
                    frozen.face_box.map(FaceAnnotation::frozen),
                    self.compositor.apply(frozen, ctx.filter_mode),
                ),
                None => (None, None),
            },
        };

        let summary = TickSummary {
            tick: ctx.index,
            timestamp: ctx.timestamp,
            mode: ctx.mode,
            filter_mode: ctx.filter_mode,
            motion_level: motion.level,
            motion_samples: motion.sample_count,
            motion_alert,
            motion_warmed_up: motion.warmed_up,
            face: face.map(|a| FaceSummary {
                face_box: a.face_box,
                source: ctx.mode,
            }),
            filtered_region: filtered.is_some(),
        };

        let elapsed = started.elapsed();
        vcam_metrics::record_tick(elapsed.as_secs_f64());
        debug!(
            mode = %ctx.mode,
            motion_level = motion.level,
            face = face.is_some(),
            filtered = filtered.is_some(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Tick processed"
        );

        self.outputs = Some(PublishedOutputs {
            gallery,
            motion,
            face,
            filtered,
            summary: summary.clone(),
        });
        summary
    }

    /// Apply every queued command in submission order.
    fn apply_pending(&mut self, ctx: &mut TickContext) {
        while let Some(command) = self.pending.pop_front() {
            match command {
                Command::ToggleFreeze => {
                    let transition = if self.snapshot.is_frozen() {
                        self.live_face = None;
                        self.snapshot.unfreeze()
                    } else {
                        let frame = ctx.working(&self.locator).clone();
                        self.snapshot.freeze(frame, self.live_face)
                    };
                    vcam_metrics::record_command("toggle_freeze");
                    vcam_metrics::record_snapshot_transition(transition.as_str());
                    if let Transition::Froze { has_face: false } = transition {
                        debug!("Frozen without a face; compositor will idle");
                    }
                }
                Command::SelectFilter(mode) => {
                    if mode != self.filter_mode {
                        info!(from = %self.filter_mode, to = %mode, "Face filter changed");
                    }
                    self.filter_mode = mode;
                    vcam_metrics::record_command("select_filter");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::capability::MockFaceDetectionCapability;
    use crate::face::NullDetector;
    use crate::source::QueuedSource;
    use vcam_models::RawDetection;

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            capture_width: 8,
            capture_height: 6,
            working_width: 4,
            working_height: 3,
            ..PipelineConfig::default()
        }
    }

    fn frames(n: usize) -> QueuedSource {
        (0..n)
            .map(|i| Frame::filled(8, 6, [(i * 100) as u8, 10, 10, 255]))
            .collect()
    }

    #[test]
    fn test_rejects_mismatched_detector() {
        let result = VisionPipeline::new(
            small_config(),
            Box::new(frames(1)),
            Box::new(NullDetector::default()),
        );
        assert!(matches!(result, Err(MediaError::InvalidConfig(_))));
    }

    #[test]
    fn test_first_tick_is_motion_warm_up() {
        let mut pipeline = VisionPipeline::new(
            small_config(),
            Box::new(frames(2)),
            Box::new(NullDetector::new(4, 3)),
        )
        .unwrap();

        let first = pipeline.tick(&Thresholds::default());
        assert!(!first.summary().unwrap().motion_warmed_up);
        let second = pipeline.tick(&Thresholds::default());
        let summary = second.summary().unwrap();
        assert!(summary.motion_warmed_up);
        assert_eq!(summary.motion_level, 1.0);
        assert_eq!(pipeline.motion_samples().len(), 48);
        assert_eq!(pipeline.outputs().unwrap().gallery.len(), 11);
    }

    #[test]
    fn test_frozen_ticks_skip_detection() {
        let mut mock = MockFaceDetectionCapability::new();
        mock.expect_working_size().return_const((4u32, 3u32));
        mock.expect_name().return_const("mock");
        mock.expect_detect()
            .times(1)
            .returning(|_| Ok(vec![RawDetection::new(0.0, 0.0, 2.0, 2.0, 5.0)]));

        let mut pipeline =
            VisionPipeline::new(small_config(), Box::new(frames(3)), Box::new(mock)).unwrap();

        pipeline.tick(&Thresholds::default());
        pipeline.submit(Command::ToggleFreeze);
        let frozen = pipeline.tick(&Thresholds::default());
        pipeline.tick(&Thresholds::default());

        let summary = frozen.summary().unwrap();
        assert_eq!(summary.mode, SnapshotMode::Frozen);
        assert_eq!(
            summary.face.unwrap().face_box,
            FaceBox::new(0.0, 0.0, 2.0, 2.0, 5.0)
        );
        assert_eq!(pipeline.snapshot().unwrap().frame.dimensions(), (4, 3));
    }
}
