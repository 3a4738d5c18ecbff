//! Core capture logic.
//!
//! This module contains:
//! - Key code to text decoding
//! - Shift state tracking
//! - Idle-gap session segmentation
//! - The event loop tying them to the log sink

pub mod keymap;
pub mod modifiers;
pub mod pipeline;
pub mod session;

// Re-export commonly used types
pub use keymap::{decode, is_shift, DecodedKey};
pub use modifiers::{ModifierError, ModifierTracker, MAX_SHIFT_DEPTH};
pub use pipeline::{Outcome, Pipeline, PipelineError};
pub use session::{
    Clock, SessionContext, SessionSegmenter, SystemClock, SESSION_IDLE_THRESHOLD_SECS,
    TIMESTAMP_FORMAT,
};
