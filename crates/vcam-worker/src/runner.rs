//! Tick loop driving the pipeline.

use std::future::Future;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use vcam_media::{
    FaceDetectionCapability, FrameSource, ImageSequenceSource, NullDetector, TickOutcome,
    VisionPipeline,
};
use vcam_models::{Command, ModelError, Thresholds, TickSummary};

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::logging::TickLogger;
use crate::publisher::OutputPublisher;
use crate::replay::ReplayDetector;

/// Slider addressed by a `threshold <name> <value>` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Red,
    Green,
    Blue,
    Cmy,
    Hsv,
}

impl Slider {
    fn apply(&self, thresholds: &mut Thresholds, value: u8) {
        match self {
            Slider::Red => thresholds.red = value,
            Slider::Green => thresholds.green = value,
            Slider::Blue => thresholds.blue = value,
            Slider::Cmy => thresholds.cmy = value,
            Slider::Hsv => thresholds.hsv = value,
        }
    }
}

/// One line of operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLine {
    Command(Command),
    Threshold { slider: Slider, value: u8 },
}

/// Parse an input line. Blank lines yield `Ok(None)`.
pub fn parse_control_line(line: &str) -> Result<Option<ControlLine>, ModelError> {
    if line.trim().is_empty() && line != " " {
        return Ok(None);
    }

    let lowered = line.trim().to_lowercase();
    let mut parts = lowered.split_whitespace();
    if let (Some("threshold" | "t"), Some(name), Some(value), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    {
        let slider = match name {
            "red" | "r" => Slider::Red,
            "green" | "g" => Slider::Green,
            "blue" | "b" => Slider::Blue,
            "cmy" => Slider::Cmy,
            "hsv" => Slider::Hsv,
            _ => return Err(ModelError::UnknownCommand(line.to_string())),
        };
        let value = value
            .parse()
            .map_err(|_| ModelError::UnknownCommand(line.to_string()))?;
        return Ok(Some(ControlLine::Threshold { slider, value }));
    }

    line.parse::<Command>().map(|c| Some(ControlLine::Command(c)))
}

/// Totals reported when a run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub processed: u64,
    pub skipped: u64,
    pub frame_sets: u64,
    pub commands: u64,
}

/// Owns the pipeline, publisher and operator state for one session.
pub struct Runner {
    config: WorkerConfig,
    pipeline: VisionPipeline,
    publisher: OutputPublisher,
    logger: TickLogger,
    thresholds: Thresholds,
    last_summary: Option<TickSummary>,
    idle_streak: u64,
    commands: u64,
}

impl Runner {
    /// Build from configuration: image-sequence input and either replayed
    /// detections or a detector that finds nothing.
    pub fn new(config: WorkerConfig) -> WorkerResult<Self> {
        config.validate()?;

        let source = ImageSequenceSource::open(
            &config.input_dir,
            config.pipeline.capture_size(),
            config.loop_input,
        )?;

        let (w, h) = config.pipeline.working_size();
        let detector: Box<dyn FaceDetectionCapability> = match &config.replay_file {
            Some(path) => Box::new(ReplayDetector::load(path, (w, h))?),
            None => {
                warn!("No VCAM_REPLAY_FILE set, running without face detections");
                Box::new(NullDetector::new(w, h))
            }
        };

        Self::with_parts(config, Box::new(source), detector)
    }

    /// Build from explicit capabilities.
    pub fn with_parts(
        config: WorkerConfig,
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetectionCapability>,
    ) -> WorkerResult<Self> {
        config.validate()?;
        let logger = TickLogger::new(source.name());
        let pipeline = VisionPipeline::new(config.pipeline.clone(), source, detector)?;
        let publisher = OutputPublisher::new(&config.output_dir, config.publish_every)?;

        Ok(Self {
            thresholds: config.thresholds,
            config,
            pipeline,
            publisher,
            logger,
            last_summary: None,
            idle_streak: 0,
            commands: 0,
        })
    }

    pub fn pipeline(&self) -> &VisionPipeline {
        &self.pipeline
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn logger(&self) -> &TickLogger {
        &self.logger
    }

    /// Apply one line of operator input. Returns whether it was understood.
    pub fn handle_line(&mut self, line: &str) -> bool {
        match parse_control_line(line) {
            Ok(Some(ControlLine::Command(command))) => {
                self.commands += 1;
                self.pipeline.submit(command);
                true
            }
            Ok(Some(ControlLine::Threshold { slider, value })) => {
                slider.apply(&mut self.thresholds, value);
                info!(?slider, value, "Threshold updated");
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.logger.log_warning(&format!("ignoring input: {e}"));
                false
            }
        }
    }

    /// Run one tick and publish its outputs.
    pub fn step(&mut self) -> WorkerResult<TickOutcome> {
        let (processed, _) = self.pipeline.tick_counts();
        let span = self.logger.create_span(processed);
        let _enter = span.enter();

        let outcome = self.pipeline.tick(&self.thresholds);
        match &outcome {
            TickOutcome::Skipped => self.idle_streak += 1,
            TickOutcome::Processed(summary) => {
                self.idle_streak = 0;
                self.logger.log_tick(summary, self.last_summary.as_ref());
                self.publisher.publish(&self.pipeline)?;
                self.last_summary = Some(summary.clone());
            }
        }
        Ok(outcome)
    }

    /// Whether a configured stop condition has been reached.
    pub fn should_stop(&self) -> bool {
        let (processed, _) = self.pipeline.tick_counts();
        let max_reached = self.config.max_ticks > 0 && processed >= self.config.max_ticks;
        let idle =
            self.config.idle_tick_limit > 0 && self.idle_streak >= self.config.idle_tick_limit;
        if idle {
            debug!(idle_ticks = self.idle_streak, "Input idle");
        }
        max_reached || idle
    }

    /// Tick on the configured interval while reading operator lines from
    /// `input`, until a stop condition or `shutdown` resolves.
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> WorkerResult<RunStats>
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        self.logger.log_start(&format!(
            "ticking every {:?}, publishing every {} ticks",
            self.config.tick_interval, self.config.publish_every
        ));

        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut lines = input.lines();
        let mut input_open = true;
        tokio::pin!(shutdown);

        loop {
            // Operator input is drained before the next tick fires.
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
                line = lines.next_line(), if input_open => match line {
                    Ok(Some(line)) => {
                        self.handle_line(&line);
                    }
                    Ok(None) => {
                        debug!("Command input closed");
                        input_open = false;
                    }
                    Err(e) => {
                        self.logger.log_warning(&format!("command input failed: {e}"));
                        input_open = false;
                    }
                },
                _ = interval.tick() => {
                    self.step()?;
                    if self.should_stop() {
                        break;
                    }
                }
            }
        }

        Ok(self.stats())
    }

    pub fn stats(&self) -> RunStats {
        let (processed, skipped) = self.pipeline.tick_counts();
        RunStats {
            processed,
            skipped,
            frame_sets: self.publisher.frame_sets(),
            commands: self.commands,
        }
    }

    /// Flush outputs and write the metrics exposition.
    pub fn finish(&mut self, metrics: Option<&PrometheusHandle>) -> WorkerResult<RunStats> {
        self.publisher.flush()?;
        if let Some(handle) = metrics {
            let path = self.publisher.write_metrics(&handle.render())?;
            debug!(path = %path.display(), "Wrote metrics");
        }

        let stats = self.stats();
        self.logger.log_completion(&format!(
            "{} processed, {} skipped, {} frame sets",
            stats.processed, stats.skipped, stats.frame_sets
        ));
        Ok(stats)
    }
}
