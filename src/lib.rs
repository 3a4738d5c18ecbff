//! keysession - session-segmented keystroke journal for Linux.
//!
//! Reads raw key events from an evdev device, decodes them to text and
//! appends them to a log. Keys separated by an idle gap of five seconds or
//! more start a new session, headed by a timestamp and the foreground
//! window.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐
//! │ Collector │──▶│ Modifiers │──▶│  Keymap   │──▶│ Segmenter │──▶ log
//! │  (evdev)  │   │  (shift)  │   │ (decode)  │   │ (5s gap)  │
//! └───────────┘   └───────────┘   └───────────┘   └─────┬─────┘
//!                                                       │
//!                                                 ┌─────▼─────┐
//!                                                 │  Context  │
//!                                                 │  (window) │
//!                                                 └───────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use keysession::{collector::DeviceReader, context, core::{Pipeline, SystemClock}, sink::LogSink};
//! use std::path::Path;
//!
//! let source = DeviceReader::open(Path::new("/dev/input/event3")).unwrap();
//! let sink = LogSink::open_append(Path::new("keys.log")).unwrap();
//! let mut pipeline = Pipeline::new(source, sink, context::default_prober(), SystemClock);
//! pipeline.run().unwrap();
//! ```

pub mod collector;
pub mod config;
pub mod context;
pub mod core;
pub mod sink;
pub mod stats;

// Re-export key types at crate root for convenience
pub use collector::{DeviceReader, EventSource, RawKeyEvent};
pub use config::{Config, ConfigError};
pub use context::{ContextFailure, ContextProber, WindowContext};
pub use self::core::{decode, DecodedKey, Pipeline, PipelineError, SessionSegmenter};
pub use sink::{LogSink, SinkError};
pub use stats::{CaptureStats, SharedStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
