//! Key code to text translation (US layout).
//!
//! Two tables are consulted: the plain table, and the shifted table used
//! while any shift key is held. The shifted table only lists keys whose text
//! changes under shift and falls back to the plain table for the rest, so
//! `[LEFT]` reads the same with or without shift.

use crate::collector::codes::*;

/// Result of looking up a key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedKey {
    Recognized(&'static str),
    Unrecognized,
}

impl DecodedKey {
    pub fn text(&self) -> Option<&'static str> {
        match self {
            DecodedKey::Recognized(text) => Some(text),
            DecodedKey::Unrecognized => None,
        }
    }
}

/// Shift-class keys. These modify other keys and never produce text.
pub fn is_shift(code: u16) -> bool {
    matches!(code, KEY_LEFTSHIFT | KEY_RIGHTSHIFT)
}

/// Translate a key code given the number of shift keys currently held.
///
/// Total over every `u16`; codes with no mapping are `Unrecognized`.
pub fn decode(code: u16, shift_depth: u8) -> DecodedKey {
    let text = if shift_depth > 0 {
        shifted_text(code).or_else(|| plain_text(code))
    } else {
        plain_text(code)
    };

    match text {
        Some(text) => DecodedKey::Recognized(text),
        None => DecodedKey::Unrecognized,
    }
}

fn plain_text(code: u16) -> Option<&'static str> {
    let text = match code {
        KEY_ESC => "[ESC]",
        KEY_1 => "1",
        KEY_2 => "2",
        KEY_3 => "3",
        KEY_4 => "4",
        KEY_5 => "5",
        KEY_6 => "6",
        KEY_7 => "7",
        KEY_8 => "8",
        KEY_9 => "9",
        KEY_0 => "0",
        KEY_MINUS => "-",
        KEY_EQUAL => "=",
        KEY_BACKSPACE => "[BACKSPACE]",
        KEY_TAB => "[TAB]",
        KEY_Q => "q",
        KEY_W => "w",
        KEY_E => "e",
        KEY_R => "r",
        KEY_T => "t",
        KEY_Y => "y",
        KEY_U => "u",
        KEY_I => "i",
        KEY_O => "o",
        KEY_P => "p",
        KEY_LEFTBRACE => "[",
        KEY_RIGHTBRACE => "]",
        KEY_ENTER => "\n",
        KEY_LEFTCTRL => "[LCTRL]",
        KEY_A => "a",
        KEY_S => "s",
        KEY_D => "d",
        KEY_F => "f",
        KEY_G => "g",
        KEY_H => "h",
        KEY_J => "j",
        KEY_K => "k",
        KEY_L => "l",
        KEY_SEMICOLON => ";",
        KEY_APOSTROPHE => "'",
        KEY_GRAVE => "`",
        KEY_BACKSLASH => "\\",
        KEY_Z => "z",
        KEY_X => "x",
        KEY_C => "c",
        KEY_V => "v",
        KEY_B => "b",
        KEY_N => "n",
        KEY_M => "m",
        KEY_COMMA => ",",
        KEY_DOT => ".",
        KEY_SLASH => "/",
        KEY_KPASTERISK => "*",
        KEY_LEFTALT => "[LALT]",
        KEY_SPACE => " ",
        KEY_CAPSLOCK => "[CAPSLOCK]",
        KEY_F1 => "[F1]",
        KEY_F2 => "[F2]",
        KEY_F3 => "[F3]",
        KEY_F4 => "[F4]",
        KEY_F5 => "[F5]",
        KEY_F6 => "[F6]",
        KEY_F7 => "[F7]",
        KEY_F8 => "[F8]",
        KEY_F9 => "[F9]",
        KEY_F10 => "[F10]",
        KEY_NUMLOCK => "[NUMLOCK]",
        KEY_SCROLLLOCK => "[SCROLLLOCK]",
        KEY_KP7 => "7",
        KEY_KP8 => "8",
        KEY_KP9 => "9",
        KEY_KPMINUS => "-",
        KEY_KP4 => "4",
        KEY_KP5 => "5",
        KEY_KP6 => "6",
        KEY_KPPLUS => "+",
        KEY_KP1 => "1",
        KEY_KP2 => "2",
        KEY_KP3 => "3",
        KEY_KP0 => "0",
        KEY_KPDOT => ".",
        KEY_102ND => "\\",
        KEY_F11 => "[F11]",
        KEY_F12 => "[F12]",
        KEY_KPENTER => "\n",
        KEY_RIGHTCTRL => "[RCTRL]",
        KEY_KPSLASH => "/",
        KEY_SYSRQ => "[PRTSC]",
        KEY_RIGHTALT => "[RALT]",
        KEY_HOME => "[HOME]",
        KEY_UP => "[UP]",
        KEY_PAGEUP => "[PGUP]",
        KEY_LEFT => "[LEFT]",
        KEY_RIGHT => "[RIGHT]",
        KEY_END => "[END]",
        KEY_DOWN => "[DOWN]",
        KEY_PAGEDOWN => "[PGDN]",
        KEY_INSERT => "[INS]",
        KEY_DELETE => "[DEL]",
        KEY_KPEQUAL => "=",
        KEY_PAUSE => "[PAUSE]",
        KEY_LEFTMETA => "[LMETA]",
        KEY_RIGHTMETA => "[RMETA]",
        KEY_COMPOSE => "[MENU]",
        _ => return None,
    };
    Some(text)
}

fn shifted_text(code: u16) -> Option<&'static str> {
    let text = match code {
        KEY_1 => "!",
        KEY_2 => "@",
        KEY_3 => "#",
        KEY_4 => "$",
        KEY_5 => "%",
        KEY_6 => "^",
        KEY_7 => "&",
        KEY_8 => "*",
        KEY_9 => "(",
        KEY_0 => ")",
        KEY_MINUS => "_",
        KEY_EQUAL => "+",
        KEY_Q => "Q",
        KEY_W => "W",
        KEY_E => "E",
        KEY_R => "R",
        KEY_T => "T",
        KEY_Y => "Y",
        KEY_U => "U",
        KEY_I => "I",
        KEY_O => "O",
        KEY_P => "P",
        KEY_LEFTBRACE => "{",
        KEY_RIGHTBRACE => "}",
        KEY_A => "A",
        KEY_S => "S",
        KEY_D => "D",
        KEY_F => "F",
        KEY_G => "G",
        KEY_H => "H",
        KEY_J => "J",
        KEY_K => "K",
        KEY_L => "L",
        KEY_SEMICOLON => ":",
        KEY_APOSTROPHE => "\"",
        KEY_GRAVE => "~",
        KEY_BACKSLASH => "|",
        KEY_Z => "Z",
        KEY_X => "X",
        KEY_C => "C",
        KEY_V => "V",
        KEY_B => "B",
        KEY_N => "N",
        KEY_M => "M",
        KEY_COMMA => "<",
        KEY_DOT => ">",
        KEY_SLASH => "?",
        KEY_102ND => "|",
        _ => return None,
    };
    Some(text)
}
