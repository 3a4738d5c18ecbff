//! Append-only, unbuffered keystroke log.
//!
//! Every fragment is written and flushed before the next event is read, so
//! killing the process loses at most the key being written.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Wraps any writer and flushes after every fragment.
pub struct LogSink<W: Write> {
    inner: W,
    bytes_written: u64,
}

impl LogSink<File> {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open_append(path: &Path) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(SinkError::Open)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(SinkError::Open)?;
        tracing::info!(path = %path.display(), "Opened key log");
        Ok(Self::new(file))
    }
}

impl<W: Write> LogSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Write one fragment and make it visible immediately.
    pub fn append(&mut self, fragment: &str) -> Result<(), SinkError> {
        self.inner
            .write_all(fragment.as_bytes())
            .and_then(|_| self.inner.flush())
            .map_err(SinkError::Write)?;
        self.bytes_written += fragment.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Log sink failures. Both are fatal to the pipeline.
#[derive(Debug)]
pub enum SinkError {
    Open(std::io::Error),
    Write(std::io::Error),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::Open(e) => write!(f, "Could not open key log: {e}"),
            SinkError::Write(e) => write!(f, "Key log write failed: {e}"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Open(e) | SinkError::Write(e) => Some(e),
        }
    }
}
