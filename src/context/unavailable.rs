//! Prober for builds or environments without a windowing session.

use super::{ContextFailure, ContextProber, WindowContext};

/// Always reports that no display is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableProber;

impl ContextProber for UnavailableProber {
    fn probe(&mut self) -> WindowContext {
        WindowContext::unavailable(ContextFailure::NoDisplay)
    }
}
