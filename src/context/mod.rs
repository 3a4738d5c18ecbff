//! Foreground window context for session headers.
//!
//! A [`ContextProber`] reports the focused window's title and the name of
//! the application that owns it. Probing is best effort: every failure is a
//! typed [`ContextFailure`] that renders as fixed placeholder text, so a
//! missing display never stops key logging.

pub mod process;
pub mod unavailable;

#[cfg(all(feature = "x11", target_os = "linux"))]
pub mod x11_window;

use std::fmt;

pub use unavailable::UnavailableProber;

#[cfg(all(feature = "x11", target_os = "linux"))]
pub use x11_window::X11Prober;

/// Why part of the context could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFailure {
    NoDisplay,
    NoActiveWindow,
    UnknownWindow,
    UntitledWindow,
    UnknownApplication,
}

impl ContextFailure {
    /// Placeholder written to the log in place of the missing value.
    pub fn sentinel(&self) -> &'static str {
        match self {
            ContextFailure::NoDisplay => "no display available",
            ContextFailure::NoActiveWindow => "no active window",
            ContextFailure::UnknownWindow => "unknown window",
            ContextFailure::UntitledWindow => "untitled window",
            ContextFailure::UnknownApplication => "unknown application",
        }
    }
}

/// A single probed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probed {
    Known(String),
    Unavailable(ContextFailure),
}

impl Probed {
    pub fn is_known(&self) -> bool {
        matches!(self, Probed::Known(_))
    }
}

impl fmt::Display for Probed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probed::Known(value) => f.write_str(value),
            Probed::Unavailable(reason) => f.write_str(reason.sentinel()),
        }
    }
}

/// What was in the foreground when a session started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowContext {
    pub window_title: Probed,
    pub application: Probed,
}

impl WindowContext {
    pub fn known(window_title: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            window_title: Probed::Known(window_title.into()),
            application: Probed::Known(application.into()),
        }
    }

    /// Both fields unavailable for the same reason.
    pub fn unavailable(reason: ContextFailure) -> Self {
        Self {
            window_title: Probed::Unavailable(reason),
            application: Probed::Unavailable(reason),
        }
    }

    /// Number of fields that fell back to a placeholder.
    pub fn failure_count(&self) -> usize {
        [&self.window_title, &self.application]
            .iter()
            .filter(|p| !p.is_known())
            .count()
    }
}

/// Source of foreground window context.
///
/// Called synchronously when a new session opens. Implementations must not
/// fail; problems are reported through [`Probed::Unavailable`].
pub trait ContextProber {
    fn probe(&mut self) -> WindowContext;
}

impl<P: ContextProber + ?Sized> ContextProber for Box<P> {
    fn probe(&mut self) -> WindowContext {
        (**self).probe()
    }
}

/// The best prober this build supports.
pub fn default_prober() -> Box<dyn ContextProber> {
    #[cfg(all(feature = "x11", target_os = "linux"))]
    {
        Box::new(X11Prober::new())
    }
    #[cfg(not(all(feature = "x11", target_os = "linux")))]
    {
        tracing::warn!("Built without X11 support; session headers will carry placeholders");
        Box::new(UnavailableProber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_render_in_place_of_values() {
        let ctx = WindowContext::unavailable(ContextFailure::NoDisplay);
        assert_eq!(ctx.window_title.to_string(), "no display available");
        assert_eq!(ctx.application.to_string(), "no display available");
        assert_eq!(ctx.failure_count(), 2);
    }

    #[test]
    fn test_known_context() {
        let ctx = WindowContext::known("notes.txt - Editor", "gedit");
        assert_eq!(ctx.window_title.to_string(), "notes.txt - Editor");
        assert_eq!(ctx.application.to_string(), "gedit");
        assert_eq!(ctx.failure_count(), 0);
    }

    #[test]
    fn test_partial_context() {
        let ctx = WindowContext {
            window_title: Probed::Known("Terminal".to_string()),
            application: Probed::Unavailable(ContextFailure::UnknownApplication),
        };
        assert_eq!(ctx.application.to_string(), "unknown application");
        assert_eq!(ctx.failure_count(), 1);
    }
}
