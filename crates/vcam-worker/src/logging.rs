//! Structured session logging.
//!
//! Every worker run gets a session id so log lines from one run can be
//! correlated, and every tick gets a span carrying that id.

use tracing::{info, warn, Span};
use uuid::Uuid;
use vcam_models::TickSummary;

/// Tick logger for structured logging with consistent fields.
#[derive(Debug, Clone)]
pub struct TickLogger {
    session_id: String,
    source: String,
}

impl TickLogger {
    /// Create a logger with a fresh session id.
    pub fn new(source: &str) -> Self {
        Self::with_session(&Uuid::new_v4().to_string(), source)
    }

    /// Create a logger for an existing session id.
    pub fn with_session(session_id: &str, source: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            source: source.to_string(),
        }
    }

    /// Log the start of a session.
    pub fn log_start(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            source = %self.source,
            "Session started: {}", message
        );
    }

    /// Log a processed tick at debug level, plus state changes worth seeing
    /// at info.
    pub fn log_tick(&self, summary: &TickSummary, previous: Option<&TickSummary>) {
        tracing::debug!(
            session_id = %self.session_id,
            tick = summary.tick,
            mode = %summary.mode,
            motion_level = summary.motion_level,
            face = summary.face.is_some(),
            "Tick"
        );

        let motion_started = summary.motion_alert && !previous.map_or(false, |p| p.motion_alert);
        if motion_started {
            info!(
                session_id = %self.session_id,
                tick = summary.tick,
                motion_level = summary.motion_level,
                "Motion detected"
            );
        }
    }

    /// Log a warning during the session.
    pub fn log_warning(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            source = %self.source,
            "Session warning: {}", message
        );
    }

    /// Log the end of a session.
    pub fn log_completion(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            source = %self.source,
            "Session completed: {}", message
        );
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Create a tracing span for one tick.
    pub fn create_span(&self, tick: u64) -> Span {
        tracing::info_span!(
            "tick",
            session_id = %self.session_id,
            tick
        )
    }
}
