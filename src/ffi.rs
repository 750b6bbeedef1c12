//! C Foreign Function Interface (FFI) for the display session.
//!
//! This module provides a C-compatible API so game loops written in other
//! languages can drive a display session. All functions are `extern "C"`
//! with stable ABI.
//!
//! # Safety
//!
//! All functions that accept pointers require valid, non-null pointers.
//! The caller is responsible for proper memory management of handles.
//!
//! # Example (C)
//!
//! ```c
//! #include "rasterm.h"
//!
//! int main() {
//!     RastermDisplay* display = rasterm_display_open(80, 25, 12, 12);
//!     if (!display) return 1;
//!
//!     rasterm_display_clear(display, ' ', 7, 0);
//!     rasterm_display_draw_text(display, 2, 1, "Hello from C!", 10, 0);
//!     rasterm_display_present(display);
//!
//!     // Main loop...
//!
//!     rasterm_display_destroy(display);
//!     return 0;
//! }
//! ```

// FFI modules intentionally use unsafe and no_mangle
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use crate::display::{Display, DisplayConfig, FontMetrics, ShutdownCoordinator};
use crate::error::DisplayError;
use crate::screen::{IndexedPixel, PaletteEntry, Rect, Rgb};
use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::sync::Arc;

// =============================================================================
// Opaque Handle Types
// =============================================================================

/// Opaque handle to a display session (indexed pixels).
pub struct RastermDisplay(Display<IndexedPixel>);

/// Opaque handle to a session's shutdown coordinator.
///
/// Safe to use from an interrupt context while the display handle is busy
/// on the owning thread.
pub struct RastermShutdown(Arc<ShutdownCoordinator>);

// =============================================================================
// Result Codes
// =============================================================================

/// Result codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RastermResult {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer passed.
    NullPointer = 1,
    /// Invalid UTF-8 string.
    InvalidUtf8 = 2,
    /// I/O error talking to the device.
    IoError = 3,
    /// Region or coordinates out of bounds.
    OutOfBounds = 4,
    /// The output handle is not a usable terminal.
    InvalidHandle = 5,
    /// Zero or otherwise invalid dimensions.
    InvalidDimensions = 6,
    /// Requested size exceeds the platform maximum.
    TooBig = 7,
    /// Palette index above 15 on the native path.
    PaletteIndexOutOfRange = 8,
    /// The session was already destroyed.
    Destroyed = 9,
}

// =============================================================================
// Display Functions
// =============================================================================

/// Open a native-surface display session on the process terminal.
///
/// Returns NULL on failure.
#[unsafe(no_mangle)]
pub extern "C" fn rasterm_display_open(
    width: u16,
    height: u16,
    font_width: u16,
    font_height: u16,
) -> *mut RastermDisplay {
    let config = DisplayConfig {
        font: FontMetrics::new(font_width, font_height),
        ..DisplayConfig::new(width, height)
    };
    match Display::native(config) {
        Ok(display) => Box::into_raw(Box::new(RastermDisplay(display))),
        Err(_) => ptr::null_mut(),
    }
}

/// Open an escape-stream display session (indexed pixels) on the process
/// terminal.
///
/// Returns NULL on failure.
#[unsafe(no_mangle)]
pub extern "C" fn rasterm_display_open_escape(
    width: u16,
    height: u16,
    font_width: u16,
    font_height: u16,
) -> *mut RastermDisplay {
    let config = DisplayConfig {
        font: FontMetrics::new(font_width, font_height),
        ..DisplayConfig::new(width, height)
    };
    match Display::<IndexedPixel>::escape_with(crate::console::TermConsole::new(), config) {
        Ok(display) => Box::into_raw(Box::new(RastermDisplay(display))),
        Err(_) => ptr::null_mut(),
    }
}

/// Destroy a display session and free its handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_destroy(display: *mut RastermDisplay) {
    if !display.is_null() {
        drop(Box::from_raw(display));
    }
}

/// Get the screen width in cells.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_width(display: *const RastermDisplay) -> u16 {
    if display.is_null() {
        return 0;
    }
    (*display).0.width()
}

/// Get the screen height in cells.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_height(display: *const RastermDisplay) -> u16 {
    if display.is_null() {
        return 0;
    }
    (*display).0.height()
}

/// Query the device window size in cells.
///
/// Unlike [`rasterm_display_width`]/[`rasterm_display_height`] this asks
/// the platform rather than the session, so it reflects a resize the
/// session has not yet absorbed. Out parameters may be NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_window_size(
    display: *const RastermDisplay,
    width_out: *mut u16,
    height_out: *mut u16,
) -> RastermResult {
    if display.is_null() {
        return RastermResult::NullPointer;
    }
    match (*display).0.window_size() {
        Ok(geometry) => {
            if !width_out.is_null() {
                *width_out = geometry.width;
            }
            if !height_out.is_null() {
                *height_out = geometry.height;
            }
            RastermResult::Ok
        }
        Err(e) => convert_error(&e),
    }
}

/// Set one cell of the composed buffer.
///
/// `glyph` is a Unicode scalar value; invalid values are ignored.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_set_cell(
    display: *mut RastermDisplay,
    x: u16,
    y: u16,
    glyph: u32,
    fg: u8,
    bg: u8,
) {
    if display.is_null() {
        return;
    }
    let Some(glyph) = char::from_u32(glyph) else {
        return;
    };
    let cell = IndexedPixel::new(glyph).with_fg(fg).with_bg(bg);
    (*display).0.buffer_mut().set(x, y, cell);
}

/// Draw text into the composed buffer.
///
/// Returns the number of columns consumed (0 on error).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_draw_text(
    display: *mut RastermDisplay,
    x: u16,
    y: u16,
    text: *const c_char,
    fg: u8,
    bg: u8,
) -> u16 {
    if display.is_null() || text.is_null() {
        return 0;
    }

    let text_str = match CStr::from_ptr(text).to_str() {
        Ok(s) => s,
        Err(_) => return 0,
    };

    let template = IndexedPixel::new(' ').with_fg(fg).with_bg(bg);
    (*display).0.buffer_mut().put_str(x, y, text_str, template)
}

/// Fill the whole composed buffer with one cell.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_clear(
    display: *mut RastermDisplay,
    glyph: u32,
    fg: u8,
    bg: u8,
) {
    if display.is_null() {
        return;
    }
    let glyph = char::from_u32(glyph).unwrap_or(' ');
    (*display)
        .0
        .clear(IndexedPixel::new(glyph).with_fg(fg).with_bg(bg));
}

/// Push the whole composed buffer to the device.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_present(display: *mut RastermDisplay) -> RastermResult {
    if display.is_null() {
        return RastermResult::NullPointer;
    }
    match (*display).0.present() {
        Ok(()) => RastermResult::Ok,
        Err(e) => convert_error(&e),
    }
}

/// Push one rectangle of the composed buffer to the device.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_present_region(
    display: *mut RastermDisplay,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
) -> RastermResult {
    if display.is_null() {
        return RastermResult::NullPointer;
    }
    let region = Rect::new(x, y, width, height);
    let session = &mut (*display).0;
    if !region.fits_within(session.width(), session.height()) {
        return RastermResult::OutOfBounds;
    }
    match session.present_region(region) {
        Ok(()) => RastermResult::Ok,
        Err(e) => convert_error(&e),
    }
}

/// Assign one palette index to an RGB color.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_set_color(
    display: *mut RastermDisplay,
    index: u8,
    r: u8,
    g: u8,
    b: u8,
) -> RastermResult {
    if display.is_null() {
        return RastermResult::NullPointer;
    }
    match (*display)
        .0
        .set_colors(&[PaletteEntry::new(index, Rgb::new(r, g, b))])
    {
        Ok(()) => RastermResult::Ok,
        Err(e) => convert_error(&e),
    }
}

/// Set the window title.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_set_title(
    display: *mut RastermDisplay,
    title: *const c_char,
) -> RastermResult {
    if display.is_null() || title.is_null() {
        return RastermResult::NullPointer;
    }
    let title_str = match CStr::from_ptr(title).to_str() {
        Ok(s) => s,
        Err(_) => return RastermResult::InvalidUtf8,
    };
    match (*display).0.set_title(title_str) {
        Ok(()) => RastermResult::Ok,
        Err(e) => convert_error(&e),
    }
}

/// Check for a window resize.
///
/// Returns true when the window changed and the screen buffer was
/// reallocated, writing the new size to `width_out`/`height_out`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_check_resize(
    display: *mut RastermDisplay,
    width_out: *mut u16,
    height_out: *mut u16,
) -> bool {
    if display.is_null() {
        return false;
    }
    match (*display).0.check_resize() {
        Ok(Some(geometry)) => {
            if !width_out.is_null() {
                *width_out = geometry.width;
            }
            if !height_out.is_null() {
                *height_out = geometry.height;
            }
            true
        }
        Ok(None) | Err(_) => false,
    }
}

// =============================================================================
// Shutdown Handshake
// =============================================================================

/// Get a shutdown handle for the session.
///
/// The handle stays valid after the display is destroyed; free it with
/// [`rasterm_shutdown_destroy`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_display_shutdown_handle(
    display: *const RastermDisplay,
) -> *mut RastermShutdown {
    if display.is_null() {
        return ptr::null_mut();
    }
    Box::into_raw(Box::new(RastermShutdown((*display).0.shutdown())))
}

/// Request a stop and block until the owning thread acknowledges.
///
/// Call this from the interrupt/close handler; it returns once the display
/// has been torn down.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_shutdown_request_stop(shutdown: *const RastermShutdown) {
    if !shutdown.is_null() {
        (*shutdown).0.request_stop();
    }
}

/// Whether a stop has been requested. Poll this once per frame.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_shutdown_should_stop(shutdown: *const RastermShutdown) -> bool {
    if shutdown.is_null() {
        return false;
    }
    (*shutdown).0.should_stop()
}

/// Free a shutdown handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rasterm_shutdown_destroy(shutdown: *mut RastermShutdown) {
    if !shutdown.is_null() {
        drop(Box::from_raw(shutdown));
    }
}

// =============================================================================
// Version Information
// =============================================================================

/// Get the library version string.
#[unsafe(no_mangle)]
pub extern "C" fn rasterm_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr().cast::<c_char>()
}

// =============================================================================
// Helper Functions
// =============================================================================

fn convert_error(err: &DisplayError) -> RastermResult {
    match err {
        DisplayError::Io(_)
        | DisplayError::BufferSizeRejected { .. }
        | DisplayError::FontRejected { .. } => RastermResult::IoError,
        DisplayError::InvalidHandle { .. } => RastermResult::InvalidHandle,
        DisplayError::InvalidDimensions { .. } => RastermResult::InvalidDimensions,
        DisplayError::TooBig { .. } => RastermResult::TooBig,
        DisplayError::PaletteIndexOutOfRange { .. } => RastermResult::PaletteIndexOutOfRange,
        DisplayError::Destroyed => RastermResult::Destroyed,
    }
}
