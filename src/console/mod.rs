//! Console module: the platform boundary every display session renders through.
//!
//! This module contains:
//! - [`Console`]: The device trait (surface lifecycle, geometry, blit, stream)
//! - [`CharCell`]: One glyph-plus-attribute unit as devices store it
//! - [`Attr`]: Packed foreground/background palette indices
//! - [`SurfaceOptions`]: Flags applied when a surface is acquired
//! - [`TermConsole`]: The real device, driving a VT100-class terminal
//! - [`HeadlessConsole`]: An in-memory device for tests and capture
//!
//! A [`Console`] owns everything platform-specific: acquiring and releasing
//! the output surface, sizing the buffer and window, fonts, the 16-entry
//! color table, and the two ways pixels reach the device (cell blits and
//! raw byte streams). Everything above this trait is pure computation, so
//! the whole session can run against [`HeadlessConsole`] in tests.

use std::io;

use bitflags::bitflags;

use crate::error::DisplayError;
use crate::screen::{Rect, Rgb};

mod headless;
mod term;

pub use headless::{BlitRecord, HeadlessConsole};
pub use term::TermConsole;

/// Packed color attribute: a 4-bit foreground and 4-bit background
/// palette index, in the low byte of a `u16`.
///
/// Indices above 15 are masked; the native render path rejects them
/// before an [`Attr`] is ever built, so masking only matters for
/// callers constructing attributes by hand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr(u16);

impl Attr {
    /// Pack a foreground and background palette index.
    #[inline]
    #[must_use]
    pub const fn from_indices(fg: u8, bg: u8) -> Self {
        Self(((fg & 0x0F) as u16) | (((bg & 0x0F) as u16) << 4))
    }

    /// The foreground palette index (0-15).
    #[inline]
    #[must_use]
    pub const fn fg_index(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    /// The background palette index (0-15).
    #[inline]
    #[must_use]
    pub const fn bg_index(self) -> u8 {
        ((self.0 >> 4) & 0x0F) as u8
    }

    /// The raw packed value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Debug for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Attr(fg={}, bg={})", self.fg_index(), self.bg_index())
    }
}

/// One device cell: a glyph and its packed attribute.
///
/// This is the unit a [`Console::blit`] call transfers. The empty glyph
/// (`'\0'`) renders as a blank in whatever colors the attribute names.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CharCell {
    /// The character to display.
    pub glyph: char,
    /// Packed foreground/background indices.
    pub attr: Attr,
}

// Blit slices should stay dense: char + u16 pads to 8 bytes.
const _: () = assert!(std::mem::size_of::<CharCell>() == 8);

impl CharCell {
    /// Create a device cell.
    #[inline]
    #[must_use]
    pub const fn new(glyph: char, attr: Attr) -> Self {
        Self { glyph, attr }
    }
}

bitflags! {
    /// Options applied when a console surface is acquired.
    ///
    /// These can be combined using bitwise OR.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceOptions: u8 {
        /// Hide the cursor while the surface is held
        const HIDE_CURSOR = 0b0000_0001;
        /// Capture mouse input on the surface
        const MOUSE_CAPTURE = 0b0000_0010;
        /// Report window resize events
        const WINDOW_EVENTS = 0b0000_0100;
        /// Switch to the alternate screen, restoring scrollback on release
        const ALTERNATE_SCREEN = 0b0000_1000;
    }
}

impl std::fmt::Debug for SurfaceOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// The device a display session renders through.
///
/// Lifecycle methods ([`acquire`](Console::acquire) /
/// [`release`](Console::release)) return [`DisplayError`] because their
/// failures end the session; the rest return [`io::Result`] and the
/// session layer decides which failures are fatal.
pub trait Console {
    /// Take exclusive hold of the output surface.
    fn acquire(&mut self, options: SurfaceOptions) -> Result<(), DisplayError>;

    /// Give the surface back, undoing everything `acquire` changed.
    fn release(&mut self) -> Result<(), DisplayError>;

    /// Resize the character buffer backing the surface.
    fn set_buffer_size(&mut self, width: u16, height: u16) -> io::Result<()>;

    /// Select a glyph cell size in pixels.
    fn set_font(&mut self, width: u16, height: u16) -> io::Result<()>;

    /// The largest window the device supports for the given font, in cells.
    fn max_size(&self, font_width: u16, font_height: u16) -> (u16, u16);

    /// Move and size the visible window within the buffer.
    fn set_window_rect(&mut self, rect: Rect) -> io::Result<()>;

    /// The current visible window rectangle, in cells.
    fn window_rect(&self) -> io::Result<Rect>;

    /// Copy a dense cell rectangle onto the surface.
    ///
    /// `cells` holds `dest.area()` entries in row-major order.
    fn blit(&mut self, cells: &[CharCell], dest: Rect) -> io::Result<()>;

    /// Write raw bytes (escape sequences and text) to the surface and flush.
    fn write_stream(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read the device's 16-entry color table.
    fn color_table(&self) -> io::Result<[Rgb; 16]>;

    /// Replace the device's 16-entry color table.
    fn set_color_table(&mut self, table: &[Rgb; 16]) -> io::Result<()>;

    /// Set the window title.
    fn set_title(&mut self, title: &str) -> io::Result<()>;
}
