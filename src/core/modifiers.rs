//! Shift key tracking.

use crate::collector::types::KeyState;
use crate::core::keymap::is_shift;

/// A keyboard exposes at most two shift keys.
pub const MAX_SHIFT_DEPTH: u8 = 2;

/// Counts the shift keys currently held down.
#[derive(Debug, Default, Clone)]
pub struct ModifierTracker {
    depth: u8,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Apply a key event and return the depth afterwards.
    ///
    /// A press past [`MAX_SHIFT_DEPTH`] or a release at zero means the event
    /// stream lost sync with the hardware. The depth is left untouched and the
    /// breach is reported instead of clamped.
    pub fn on_key_event(&mut self, code: u16, state: KeyState) -> Result<u8, ModifierError> {
        if !is_shift(code) {
            return Ok(self.depth);
        }

        match state {
            KeyState::Press => {
                if self.depth >= MAX_SHIFT_DEPTH {
                    return Err(ModifierError::TooManyPressed { code });
                }
                self.depth += 1;
            }
            KeyState::Release => {
                if self.depth == 0 {
                    return Err(ModifierError::ReleaseWithoutPress { code });
                }
                self.depth -= 1;
            }
            KeyState::Repeat | KeyState::Unknown(_) => {}
        }

        Ok(self.depth)
    }
}

/// Shift depth left its valid range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierError {
    TooManyPressed { code: u16 },
    ReleaseWithoutPress { code: u16 },
}

impl std::fmt::Display for ModifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModifierError::TooManyPressed { code } => write!(
                f,
                "Shift press (code {code}) while {MAX_SHIFT_DEPTH} shift keys are already held"
            ),
            ModifierError::ReleaseWithoutPress { code } => {
                write!(f, "Shift release (code {code}) with no shift key held")
            }
        }
    }
}

impl std::error::Error for ModifierError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::codes::{KEY_A, KEY_LEFTSHIFT, KEY_RIGHTSHIFT};

    #[test]
    fn test_press_and_release() {
        let mut tracker = ModifierTracker::new();
        assert_eq!(tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Press), Ok(1));
        assert_eq!(tracker.on_key_event(KEY_RIGHTSHIFT, KeyState::Press), Ok(2));
        assert_eq!(tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Release), Ok(1));
        assert_eq!(tracker.on_key_event(KEY_RIGHTSHIFT, KeyState::Release), Ok(0));
    }

    #[test]
    fn test_other_keys_leave_depth_alone() {
        let mut tracker = ModifierTracker::new();
        tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Press).unwrap();
        assert_eq!(tracker.on_key_event(KEY_A, KeyState::Press), Ok(1));
        assert_eq!(tracker.on_key_event(KEY_A, KeyState::Release), Ok(1));
    }

    #[test]
    fn test_autorepeat_ignored() {
        let mut tracker = ModifierTracker::new();
        tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Press).unwrap();
        for _ in 0..10 {
            assert_eq!(tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Repeat), Ok(1));
        }
    }

    #[test]
    fn test_extra_release_detected() {
        let mut tracker = ModifierTracker::new();
        assert_eq!(
            tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Release),
            Err(ModifierError::ReleaseWithoutPress {
                code: KEY_LEFTSHIFT
            })
        );
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn test_third_press_detected() {
        let mut tracker = ModifierTracker::new();
        tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Press).unwrap();
        tracker.on_key_event(KEY_RIGHTSHIFT, KeyState::Press).unwrap();
        assert!(tracker.on_key_event(KEY_LEFTSHIFT, KeyState::Press).is_err());
        assert_eq!(tracker.depth(), MAX_SHIFT_DEPTH);
    }
}
