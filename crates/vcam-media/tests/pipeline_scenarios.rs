//! End-to-end tick scenarios for the vision pipeline.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vcam_media::gallery::GalleryTile;
use vcam_media::{
    AnnotationStyle, FaceDetectionCapability, Frame, MediaResult, QueuedSource, Region,
    TickOutcome, VisionPipeline,
};
use vcam_models::{
    Command, FaceBox, FaceFilterMode, GallerySource, PipelineConfig, RawDetection, SnapshotMode,
    Thresholds,
};

const CAPTURE: (u32, u32) = (32, 24);
const WORKING: (u32, u32) = (16, 12);

/// Detector that replays one scripted result per call and counts calls.
struct ScriptedDetector {
    script: VecDeque<Vec<RawDetection>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedDetector {
    fn new(script: Vec<Vec<RawDetection>>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                script: script.into(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl FaceDetectionCapability for ScriptedDetector {
    fn working_size(&self) -> (u32, u32) {
        WORKING
    }

    fn detect(&mut self, image: &Frame) -> MediaResult<Vec<RawDetection>> {
        assert_eq!(image.dimensions(), WORKING);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.script.pop_front().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn config() -> PipelineConfig {
    PipelineConfig {
        capture_width: CAPTURE.0,
        capture_height: CAPTURE.1,
        working_width: WORKING.0,
        working_height: WORKING.1,
        ..PipelineConfig::default()
    }
}

fn gray(level: u8) -> Frame {
    Frame::filled(CAPTURE.0, CAPTURE.1, [level, level, level, 255])
}

fn detection(x: f64, y: f64, w: f64, h: f64, score: f64) -> RawDetection {
    RawDetection::new(x, y, w, h, score)
}

fn processed(outcome: TickOutcome) -> vcam_models::TickSummary {
    match outcome {
        TickOutcome::Processed(summary) => summary,
        TickOutcome::Skipped => panic!("expected a processed tick"),
    }
}

#[test]
fn freeze_then_unfreeze_keeps_an_independent_copy() {
    let first = detection(2.0, 2.0, 8.0, 8.0, 6.0);
    let second = detection(5.0, 1.0, 6.0, 6.0, 4.5);
    let (detector, calls) = ScriptedDetector::new(vec![vec![first], vec![second]]);
    let source: QueuedSource = (0..5).map(|_| gray(90)).collect();
    let mut pipeline = VisionPipeline::new(config(), Box::new(source), Box::new(detector)).unwrap();
    let thresholds = Thresholds::default();

    // Live tick finds the first box.
    let live = processed(pipeline.tick(&thresholds));
    assert_eq!(live.mode, SnapshotMode::Live);
    assert_eq!(live.face.unwrap().face_box, FaceBox::from(first));

    // Freeze: the snapshot holds that box by value.
    pipeline.submit(Command::ToggleFreeze);
    let frozen = processed(pipeline.tick(&thresholds));
    assert_eq!(frozen.mode, SnapshotMode::Frozen);
    assert_eq!(pipeline.snapshot().unwrap().face_box, Some(FaceBox::from(first)));
    assert_eq!(pipeline.snapshot().unwrap().frame.dimensions(), WORKING);
    let annotation = pipeline.outputs().unwrap().face.unwrap();
    assert_eq!(annotation.style, AnnotationStyle::Frozen);

    // Frozen ticks never call the detector.
    processed(pipeline.tick(&thresholds));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Unfreeze: snapshot gone, next live tick detects afresh.
    pipeline.submit(Command::ToggleFreeze);
    let resumed = processed(pipeline.tick(&thresholds));
    assert_eq!(resumed.mode, SnapshotMode::Live);
    assert!(pipeline.snapshot().is_none());
    assert_eq!(resumed.face.unwrap().face_box, FaceBox::from(second));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // Script exhausted: no face, and nothing lingers from before.
    let empty = processed(pipeline.tick(&thresholds));
    assert!(empty.face.is_none());
}

#[test]
fn skipped_tick_preserves_outputs_and_queue() {
    let (detector, _) = ScriptedDetector::new(vec![]);
    let mut source = QueuedSource::new();
    source.push(gray(10));
    source.push_gap();
    source.push(gray(10));
    let mut pipeline = VisionPipeline::new(config(), Box::new(source), Box::new(detector)).unwrap();
    let thresholds = Thresholds::default();

    let first = processed(pipeline.tick(&thresholds));
    pipeline.submit(Command::ToggleFreeze);

    assert_eq!(pipeline.tick(&thresholds), TickOutcome::Skipped);
    assert_eq!(pipeline.mode(), SnapshotMode::Live);
    assert_eq!(pipeline.pending_commands(), 1);
    assert_eq!(pipeline.outputs().unwrap().summary, first);

    let next = processed(pipeline.tick(&thresholds));
    assert_eq!(next.mode, SnapshotMode::Frozen);
    assert_eq!(next.tick, 1);
    assert_eq!(pipeline.tick_counts(), (2, 1));
}

#[test]
fn commands_apply_at_the_next_tick_boundary() {
    let (detector, _) = ScriptedDetector::new(vec![]);
    let source: QueuedSource = (0..2).map(|_| gray(10)).collect();
    let mut pipeline = VisionPipeline::new(config(), Box::new(source), Box::new(detector)).unwrap();

    pipeline.submit(Command::SelectFilter(FaceFilterMode::Blur));
    pipeline.submit(Command::SelectFilter(FaceFilterMode::Pixelate));
    pipeline.submit(Command::ToggleFreeze);
    assert_eq!(pipeline.filter_mode(), FaceFilterMode::None);
    assert_eq!(pipeline.mode(), SnapshotMode::Live);

    let summary = processed(pipeline.tick(&Thresholds::default()));
    assert_eq!(summary.filter_mode, FaceFilterMode::Pixelate);
    assert_eq!(summary.mode, SnapshotMode::Frozen);
    // Frozen with no face: nothing to filter.
    assert!(summary.face.is_none());
    assert!(!summary.filtered_region);
}

#[test]
fn motion_runs_once_per_tick_in_every_mode() {
    let (detector, _) = ScriptedDetector::new(vec![]);
    let source: QueuedSource = (0..6)
        .map(|i| if i % 2 == 0 { gray(0) } else { gray(200) })
        .collect();
    let mut pipeline = VisionPipeline::new(config(), Box::new(source), Box::new(detector)).unwrap();
    let thresholds = Thresholds::default();

    let warm_up = processed(pipeline.tick(&thresholds));
    assert!(!warm_up.motion_warmed_up);
    assert_eq!(warm_up.motion_level, 0.0);

    for i in 1..6 {
        if i == 3 {
            pipeline.submit(Command::ToggleFreeze);
        }
        let summary = processed(pipeline.tick(&thresholds));
        assert_eq!(summary.motion_level, 1.0, "tick {i}");
        assert!(summary.motion_alert);
        assert_eq!(pipeline.motion_samples().len(), 32 * 24);
        assert!(pipeline.motion_samples().iter().all(|s| s.strength == 600));
    }
}

#[test]
fn frozen_face_region_is_filtered_and_clamped() {
    // Box overhangs the right edge of the 16x12 working frame.
    let face = detection(10.0, 4.0, 10.0, 6.0, 7.0);
    let (detector, _) = ScriptedDetector::new(vec![vec![face]]);
    let source: QueuedSource = (0..3).map(|_| gray(120)).collect();
    let mut pipeline = VisionPipeline::new(config(), Box::new(source), Box::new(detector)).unwrap();
    let thresholds = Thresholds::default();

    processed(pipeline.tick(&thresholds));
    pipeline.submit(Command::ToggleFreeze);
    pipeline.submit(Command::SelectFilter(FaceFilterMode::Grayscale));
    let summary = processed(pipeline.tick(&thresholds));
    assert!(summary.filtered_region);

    let filtered = pipeline.outputs().unwrap().filtered.clone().unwrap();
    assert_eq!(filtered.region, Region::new(10, 4, 6, 6));
    assert_eq!(filtered.mode, FaceFilterMode::Grayscale);
    // 120 boosted by 1.2.
    assert_eq!(filtered.image.pixel(0, 0), [144, 144, 144, 255]);

    pipeline.submit(Command::SelectFilter(FaceFilterMode::None));
    processed(pipeline.tick(&thresholds));
    let passthrough = pipeline.outputs().unwrap().filtered.clone().unwrap();
    assert_eq!(passthrough.image.pixel(0, 0), [120, 120, 120, 255]);
}

#[test]
fn gallery_can_follow_the_snapshot() {
    let (detector, _) = ScriptedDetector::new(vec![]);
    let source: QueuedSource = (0..2).map(|_| gray(60)).collect();
    let config = PipelineConfig {
        gallery_source: GallerySource::SnapshotWhenFrozen,
        ..config()
    };
    let mut pipeline = VisionPipeline::new(config, Box::new(source), Box::new(detector)).unwrap();
    let thresholds = Thresholds::default();

    processed(pipeline.tick(&thresholds));
    let live_tile = pipeline.outputs().unwrap().gallery.get(GalleryTile::Grayscale).unwrap();
    assert_eq!(live_tile.dimensions(), CAPTURE);

    pipeline.submit(Command::ToggleFreeze);
    processed(pipeline.tick(&thresholds));
    let frozen_tile = pipeline.outputs().unwrap().gallery.get(GalleryTile::Grayscale).unwrap();
    assert_eq!(frozen_tile.dimensions(), WORKING);
}
