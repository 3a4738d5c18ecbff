//! Raw keyboard event records as delivered by the kernel input subsystem.
//!
//! A record is a fixed-width `struct input_event`: a `timeval`, then the
//! event type (`u16`), code (`u16`) and value (`i32`), all native endian.
//! Records are validated field by field rather than overlaid on the buffer.

use crate::collector::codes::EV_KEY;
use std::mem::size_of;

/// Width of the `timeval` prefix: two C `long`s.
const TIMEVAL_LEN: usize = 2 * size_of::<std::ffi::c_long>();

/// Size in bytes of one kernel `input_event` record on this target.
pub const EVENT_RECORD_LEN: usize = TIMEVAL_LEN + 2 + 2 + 4;

/// Broad class of an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// Key or button state change (`EV_KEY`).
    Key,
    /// Anything else (sync, misc, LED, ...). Carries the raw type.
    Other(u16),
}

impl EventClass {
    pub fn from_raw(event_type: u16) -> Self {
        if event_type == EV_KEY {
            EventClass::Key
        } else {
            EventClass::Other(event_type)
        }
    }
}

/// What happened to the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Release,
    Press,
    /// Kernel autorepeat while the key is held.
    Repeat,
    Unknown(i32),
}

impl KeyState {
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => KeyState::Release,
            1 => KeyState::Press,
            2 => KeyState::Repeat,
            other => KeyState::Unknown(other),
        }
    }
}

/// One hardware event, reduced to the fields the pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub class: EventClass,
    pub code: u16,
    pub state: KeyState,
}

impl RawKeyEvent {
    /// Build a key event directly, mostly useful for tests and replay.
    pub fn key(code: u16, state: KeyState) -> Self {
        Self {
            class: EventClass::Key,
            code,
            state,
        }
    }

    pub fn press(code: u16) -> Self {
        Self::key(code, KeyState::Press)
    }

    pub fn release(code: u16) -> Self {
        Self::key(code, KeyState::Release)
    }

    /// Decode a single record.
    ///
    /// `bytes` must be exactly [`EVENT_RECORD_LEN`] long; anything else is a
    /// short or malformed read.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EventError> {
        if bytes.len() != EVENT_RECORD_LEN {
            return Err(EventError::ShortRead {
                expected: EVENT_RECORD_LEN,
                actual: bytes.len(),
            });
        }

        let fields = &bytes[TIMEVAL_LEN..];
        let event_type = u16::from_ne_bytes([fields[0], fields[1]]);
        let code = u16::from_ne_bytes([fields[2], fields[3]]);
        let value = i32::from_ne_bytes([fields[4], fields[5], fields[6], fields[7]]);

        Ok(Self {
            class: EventClass::from_raw(event_type),
            code,
            state: KeyState::from_raw(value),
        })
    }

    /// Encode into the kernel record layout with a zeroed timestamp.
    pub fn to_bytes(&self) -> [u8; EVENT_RECORD_LEN] {
        let mut out = [0u8; EVENT_RECORD_LEN];
        let event_type = match self.class {
            EventClass::Key => EV_KEY,
            EventClass::Other(t) => t,
        };
        let value = match self.state {
            KeyState::Release => 0,
            KeyState::Press => 1,
            KeyState::Repeat => 2,
            KeyState::Unknown(v) => v,
        };
        out[TIMEVAL_LEN..TIMEVAL_LEN + 2].copy_from_slice(&event_type.to_ne_bytes());
        out[TIMEVAL_LEN + 2..TIMEVAL_LEN + 4].copy_from_slice(&self.code.to_ne_bytes());
        out[TIMEVAL_LEN + 4..].copy_from_slice(&value.to_ne_bytes());
        out
    }
}

/// Errors reading from the raw event stream. All of them are fatal.
#[derive(Debug)]
pub enum EventError {
    /// The stream ended partway through a record.
    ShortRead { expected: usize, actual: usize },
    Io(std::io::Error),
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventError::ShortRead { expected, actual } => write!(
                f,
                "Truncated input event: expected {expected} bytes, got {actual}"
            ),
            EventError::Io(e) => write!(f, "Input device read failed: {e}"),
        }
    }
}

impl std::error::Error for EventError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EventError::Io(e) => Some(e),
            EventError::ShortRead { .. } => None,
        }
    }
}

impl From<std::io::Error> for EventError {
    fn from(e: std::io::Error) -> Self {
        EventError::Io(e)
    }
}
