//! Session boundaries based on idle gaps between logged keys.
//!
//! A session is a run of logged keys with no gap of
//! [`SESSION_IDLE_THRESHOLD_SECS`] or more between them. Each session opens
//! with a header naming the time and the foreground window.

use crate::context::WindowContext;
use chrono::{DateTime, Duration, Local};

/// Idle gap that ends a session.
pub const SESSION_IDLE_THRESHOLD_SECS: i64 = 5;

/// Header timestamp layout (local time).
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

/// Written before every session header.
pub const SESSION_SEPARATOR: &str = "\r\n\n";

/// Wall clock used for session decisions and header timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Context captured when a session opens. Fixed for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub started_at: DateTime<Local>,
    pub window: WindowContext,
}

impl SessionContext {
    /// `[<timestamp>] [<application> - <title>] `, without the separator.
    pub fn header(&self) -> String {
        format!(
            "[{}] [{} - {}] ",
            self.started_at.format(TIMESTAMP_FORMAT),
            self.window.application,
            self.window.window_title
        )
    }
}

/// Tracks when a key was last written and decides where sessions break.
#[derive(Debug, Clone)]
pub struct SessionSegmenter {
    threshold: Duration,
    last_write: Option<DateTime<Local>>,
}

impl Default for SessionSegmenter {
    fn default() -> Self {
        Self::new(SESSION_IDLE_THRESHOLD_SECS)
    }
}

impl SessionSegmenter {
    pub fn new(threshold_secs: i64) -> Self {
        Self {
            threshold: Duration::seconds(threshold_secs),
            last_write: None,
        }
    }

    pub fn last_write(&self) -> Option<DateTime<Local>> {
        self.last_write
    }

    /// True for the first key ever written, or after an idle gap of at
    /// least the threshold. A clock that stepped backwards continues the
    /// current session.
    pub fn should_start_new_session(&self, now: DateTime<Local>) -> bool {
        match self.last_write {
            None => true,
            Some(last) => now - last >= self.threshold,
        }
    }

    /// Record that a recognized key was written at `now`.
    pub fn record_write(&mut self, now: DateTime<Local>) {
        self.last_write = Some(now);
    }
}
