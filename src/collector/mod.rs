//! Raw keyboard event collection.
//!
//! This module turns the byte stream of a Linux evdev node into validated
//! [`RawKeyEvent`]s and finds keyboard devices to read from.

pub mod codes;
pub mod device;
pub mod types;

// Re-export commonly used types
pub use device::{detect_keyboards, DeviceReader, EventSource, KeyboardDevice};
pub use types::{EventClass, EventError, KeyState, RawKeyEvent, EVENT_RECORD_LEN};
