//! The capture loop: raw events in, session-segmented text out.
//!
//! Events are handled strictly one at a time. Each key press updates the
//! shift state, is decoded with the updated state, and, when it maps to
//! text, is appended to the log. A new session header is written first when
//! the segmenter asks for one.

use crate::collector::{EventClass, EventError, EventSource, KeyState, RawKeyEvent};
use crate::context::ContextProber;
use crate::core::keymap::{decode, DecodedKey};
use crate::core::modifiers::{ModifierError, ModifierTracker};
use crate::core::session::{Clock, SessionContext, SessionSegmenter, SESSION_SEPARATOR};
use crate::sink::{LogSink, SinkError};
use crate::stats::{CaptureStats, SharedStats};
use std::io::Write;
use std::sync::Arc;

/// What handling one event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Key text appended to the current session.
    Continued(&'static str),
    /// A new session header was written, followed by the key text.
    NewSession(SessionContext, &'static str),
    /// Press with no text mapping.
    Unrecognized,
    /// Release, autorepeat, or a non-key event.
    Ignored,
}

/// Owns all per-process capture state.
pub struct Pipeline<S, W: Write, P, C> {
    source: S,
    sink: LogSink<W>,
    prober: P,
    clock: C,
    modifiers: ModifierTracker,
    segmenter: SessionSegmenter,
    stats: SharedStats,
}

impl<S, W, P, C> Pipeline<S, W, P, C>
where
    S: EventSource,
    W: Write,
    P: ContextProber,
    C: Clock,
{
    pub fn new(source: S, sink: LogSink<W>, prober: P, clock: C) -> Self {
        Self {
            source,
            sink,
            prober,
            clock,
            modifiers: ModifierTracker::new(),
            segmenter: SessionSegmenter::default(),
            stats: Arc::new(CaptureStats::new()),
        }
    }

    /// Report into an existing counter set instead of a private one.
    pub fn with_stats(mut self, stats: SharedStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &SharedStats {
        &self.stats
    }

    pub fn shift_depth(&self) -> u8 {
        self.modifiers.depth()
    }

    pub fn sink(&self) -> &LogSink<W> {
        &self.sink
    }

    pub fn into_sink(self) -> LogSink<W> {
        self.sink
    }

    /// Process events until the source ends or something fatal happens.
    pub fn run(&mut self) -> Result<(), PipelineError> {
        tracing::info!("Capture loop started");
        while let Some(event) = self.source.next_event()? {
            self.stats.record_event_read();
            self.handle_event(event)?;
        }
        tracing::info!("Input stream ended");
        Ok(())
    }

    /// Process a single raw event.
    pub fn handle_event(&mut self, event: RawKeyEvent) -> Result<Outcome, PipelineError> {
        if event.class != EventClass::Key {
            return Ok(Outcome::Ignored);
        }

        match event.state {
            KeyState::Press => {
                let depth = self.modifiers.on_key_event(event.code, event.state)?;
                match decode(event.code, depth) {
                    DecodedKey::Recognized(text) => self.emit(text),
                    DecodedKey::Unrecognized => {
                        tracing::trace!(code = event.code, "Unrecognized key");
                        self.stats.record_unrecognized_key();
                        Ok(Outcome::Unrecognized)
                    }
                }
            }
            KeyState::Release => {
                self.modifiers.on_key_event(event.code, event.state)?;
                Ok(Outcome::Ignored)
            }
            KeyState::Repeat | KeyState::Unknown(_) => Ok(Outcome::Ignored),
        }
    }

    fn emit(&mut self, text: &'static str) -> Result<Outcome, PipelineError> {
        let now = self.clock.now();

        let outcome = if self.segmenter.should_start_new_session(now) {
            self.sink.append(SESSION_SEPARATOR)?;

            let window = self.prober.probe();
            let failures = window.failure_count();
            if failures > 0 {
                tracing::debug!(?window, "Window context incomplete");
                self.stats.record_context_failures(failures as u64);
            }

            let context = SessionContext {
                started_at: now,
                window,
            };
            self.sink.append(&context.header())?;
            self.sink.append(text)?;

            tracing::debug!(started_at = %context.started_at, "Session started");
            self.stats.record_session_started();
            Outcome::NewSession(context, text)
        } else {
            self.sink.append(text)?;
            Outcome::Continued(text)
        };

        self.segmenter.record_write(now);
        self.stats.record_key_logged();
        Ok(outcome)
    }
}

/// Fatal pipeline failures.
#[derive(Debug)]
pub enum PipelineError {
    /// The input device could not be read.
    Source(EventError),
    /// The key log could not be written.
    Sink(SinkError),
    /// Shift state no longer matches the hardware.
    ModifierDesync(ModifierError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Source(e) => write!(f, "Input error: {e}"),
            PipelineError::Sink(e) => write!(f, "Output error: {e}"),
            PipelineError::ModifierDesync(e) => write!(f, "Event stream out of sync: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Source(e) => Some(e),
            PipelineError::Sink(e) => Some(e),
            PipelineError::ModifierDesync(e) => Some(e),
        }
    }
}

impl From<EventError> for PipelineError {
    fn from(e: EventError) -> Self {
        PipelineError::Source(e)
    }
}

impl From<SinkError> for PipelineError {
    fn from(e: SinkError) -> Self {
        PipelineError::Sink(e)
    }
}

impl From<ModifierError> for PipelineError {
    fn from(e: ModifierError) -> Self {
        PipelineError::ModifierDesync(e)
    }
}
