//! Reading raw events from an input device node.

use crate::collector::types::{EventError, RawKeyEvent, EVENT_RECORD_LEN};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Anything that yields raw key events one at a time.
///
/// `Ok(None)` means the stream ended cleanly.
pub trait EventSource {
    fn next_event(&mut self) -> Result<Option<RawKeyEvent>, EventError>;
}

/// Blocking reader over a stream of kernel `input_event` records.
pub struct DeviceReader<R> {
    inner: R,
    buf: [u8; EVENT_RECORD_LEN],
}

impl DeviceReader<File> {
    /// Open an evdev node (e.g. `/dev/input/event3`) for reading.
    pub fn open(path: &Path) -> Result<Self, EventError> {
        let file = File::open(path)?;
        tracing::info!(device = %path.display(), "Opened input device");
        Ok(Self::new(file))
    }
}

impl<R: Read> DeviceReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: [0u8; EVENT_RECORD_LEN],
        }
    }
}

impl<R: Read> EventSource for DeviceReader<R> {
    fn next_event(&mut self) -> Result<Option<RawKeyEvent>, EventError> {
        let mut filled = 0;
        while filled < EVENT_RECORD_LEN {
            match self.inner.read(&mut self.buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => {
                    return Err(EventError::ShortRead {
                        expected: EVENT_RECORD_LEN,
                        actual: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(EventError::Io(e)),
            }
        }
        RawKeyEvent::from_bytes(&self.buf).map(Some)
    }
}

/// Keyboard devices advertise `EV_SYN | EV_KEY | EV_MSC | EV_LED | EV_REP`.
const KEYBOARD_EV_MASK: &str = "120013";

const PROC_INPUT_DEVICES: &str = "/proc/bus/input/devices";

/// A keyboard found in `/proc/bus/input/devices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardDevice {
    pub name: String,
    pub path: PathBuf,
}

/// List keyboards the kernel knows about.
pub fn detect_keyboards() -> std::io::Result<Vec<KeyboardDevice>> {
    let content = std::fs::read_to_string(PROC_INPUT_DEVICES)?;
    Ok(parse_input_devices(&content))
}

/// Parse the block-structured `/proc/bus/input/devices` listing.
pub fn parse_input_devices(content: &str) -> Vec<KeyboardDevice> {
    let mut keyboards = Vec::new();

    for block in content.split("\n\n") {
        let mut name = None;
        let mut handler = None;
        let mut is_keyboard = false;

        for line in block.lines() {
            if let Some(rest) = line.strip_prefix("N: Name=") {
                name = Some(rest.trim_matches('"').to_string());
            } else if let Some(rest) = line.strip_prefix("H: Handlers=") {
                handler = rest
                    .split_whitespace()
                    .find(|h| h.starts_with("event"))
                    .map(str::to_string);
            } else if let Some(rest) = line.strip_prefix("B: EV=") {
                is_keyboard = rest.trim() == KEYBOARD_EV_MASK;
            }
        }

        if let (true, Some(handler)) = (is_keyboard, handler) {
            keyboards.push(KeyboardDevice {
                name: name.unwrap_or_default(),
                path: Path::new("/dev/input").join(handler),
            });
        }
    }

    keyboards
}
