//! Active window lookup via Xlib and EWMH properties.
//!
//! Each probe opens its own display connection, so a display that comes and
//! goes between sessions is picked up without restarting.

use super::process::application_name;
use super::{ContextFailure, ContextProber, Probed, WindowContext};
use std::ffi::{c_char, c_int, c_uchar, c_ulong, c_void, CStr, CString};
use std::mem::size_of;
use x11::xlib;

/// Context prober backed by the X server named in `DISPLAY`.
#[derive(Debug, Default)]
pub struct X11Prober;

impl X11Prober {
    pub fn new() -> Self {
        Self
    }
}

impl ContextProber for X11Prober {
    fn probe(&mut self) -> WindowContext {
        let Some(display) = Display::open() else {
            tracing::debug!("XOpenDisplay failed");
            return WindowContext::unavailable(ContextFailure::NoDisplay);
        };

        let window = match display.active_window() {
            Ok(window) => window,
            Err(reason) => return WindowContext::unavailable(reason),
        };

        let window_title = display.window_title(window);
        let application = match display.window_pid(window) {
            Some(pid) => application_name(pid),
            None => Probed::Unavailable(ContextFailure::UnknownApplication),
        };

        WindowContext {
            window_title,
            application,
        }
    }
}

/// Owned display connection, closed on drop.
struct Display {
    raw: *mut xlib::Display,
}

/// Raw property payload: format (8/16/32), item count and bytes.
struct Property {
    format: c_int,
    items: usize,
    data: Vec<u8>,
}

impl Display {
    fn open() -> Option<Self> {
        // SAFETY: a null name means "use $DISPLAY"; the result is checked.
        let raw = unsafe { xlib::XOpenDisplay(std::ptr::null()) };
        if raw.is_null() {
            None
        } else {
            Some(Self { raw })
        }
    }

    fn atom(&self, name: &str) -> Option<xlib::Atom> {
        let name = CString::new(name).ok()?;
        // SAFETY: `raw` is an open display and `name` is NUL terminated.
        // only_if_exists = True so missing atoms come back as None (0).
        let atom = unsafe { xlib::XInternAtom(self.raw, name.as_ptr(), xlib::True) };
        (atom != 0).then_some(atom)
    }

    fn property(&self, window: xlib::Window, atom: xlib::Atom) -> Option<Property> {
        let mut actual_type: xlib::Atom = 0;
        let mut format: c_int = 0;
        let mut items: c_ulong = 0;
        let mut bytes_after: c_ulong = 0;
        let mut data: *mut c_uchar = std::ptr::null_mut();

        // SAFETY: all out-pointers reference live locals; `data` is freed below.
        let status = unsafe {
            xlib::XGetWindowProperty(
                self.raw,
                window,
                atom,
                0,
                !0,
                xlib::False,
                xlib::AnyPropertyType as xlib::Atom,
                &mut actual_type,
                &mut format,
                &mut items,
                &mut bytes_after,
                &mut data,
            )
        };

        if status != xlib::Success as c_int || data.is_null() {
            return None;
        }

        // Format-32 items are stored as C longs client side.
        let item_size = match format {
            8 => 1,
            16 => size_of::<std::ffi::c_short>(),
            32 => size_of::<std::ffi::c_long>(),
            _ => 0,
        };
        let len = items as usize * item_size;
        // SAFETY: Xlib returned `items` elements of `item_size` bytes at `data`.
        let bytes = unsafe { std::slice::from_raw_parts(data, len) }.to_vec();
        // SAFETY: `data` was allocated by Xlib and is not used after this.
        unsafe { xlib::XFree(data as *mut c_void) };

        Some(Property {
            format,
            items: items as usize,
            data: bytes,
        })
    }

    fn first_long(&self, window: xlib::Window, atom: xlib::Atom) -> Option<c_ulong> {
        let prop = self.property(window, atom)?;
        if prop.format != 32 || prop.items == 0 {
            return None;
        }
        let mut raw = [0u8; size_of::<c_ulong>()];
        raw.copy_from_slice(&prop.data[..size_of::<c_ulong>()]);
        Some(c_ulong::from_ne_bytes(raw))
    }

    fn active_window(&self) -> Result<xlib::Window, ContextFailure> {
        let atom = self
            .atom("_NET_ACTIVE_WINDOW")
            .ok_or(ContextFailure::NoActiveWindow)?;
        // SAFETY: `raw` is an open display.
        let root = unsafe { xlib::XDefaultRootWindow(self.raw) };
        match self.first_long(root, atom) {
            Some(0) => Err(ContextFailure::NoActiveWindow),
            Some(window) => Ok(window),
            None => Err(ContextFailure::UnknownWindow),
        }
    }

    fn window_title(&self, window: xlib::Window) -> Probed {
        if let Some(atom) = self.atom("_NET_WM_NAME") {
            if let Some(prop) = self.property(window, atom) {
                if prop.format == 8 && !prop.data.is_empty() {
                    return Probed::Known(String::from_utf8_lossy(&prop.data).into_owned());
                }
            }
        }
        self.fetch_name(window)
    }

    fn fetch_name(&self, window: xlib::Window) -> Probed {
        let mut name: *mut c_char = std::ptr::null_mut();
        // SAFETY: `name` is freed with XFree when set.
        let status = unsafe { xlib::XFetchName(self.raw, window, &mut name) };
        if status == 0 || name.is_null() {
            return Probed::Unavailable(ContextFailure::UntitledWindow);
        }
        // SAFETY: XFetchName returns a NUL-terminated string on success.
        let title = unsafe { CStr::from_ptr(name) }
            .to_string_lossy()
            .into_owned();
        unsafe { xlib::XFree(name as *mut c_void) };

        if title.is_empty() {
            Probed::Unavailable(ContextFailure::UntitledWindow)
        } else {
            Probed::Known(title)
        }
    }

    fn window_pid(&self, window: xlib::Window) -> Option<u32> {
        let atom = self.atom("_NET_WM_PID")?;
        self.first_long(window, atom)
            .and_then(|pid| u32::try_from(pid).ok())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // SAFETY: `raw` came from XOpenDisplay and is closed exactly once.
        unsafe { xlib::XCloseDisplay(self.raw) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Without DISPLAY the prober must degrade to placeholders, not fail.
    #[test]
    fn test_probe_without_display() {
        if std::env::var("DISPLAY").is_ok() {
            return;
        }
        let ctx = X11Prober::new().probe();
        assert_eq!(ctx, WindowContext::unavailable(ContextFailure::NoDisplay));
    }
}
