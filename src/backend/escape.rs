//! Escape stream rendering: minimal VT100 sequences for a pixel rectangle.
//!
//! One render call produces one stream: a single cursor move addressing the
//! rectangle's origin, then every visible cell in row-major order. Rows are
//! not re-addressed; the terminal's auto-wrap carries the stream onto the
//! next line, which is exact for the full-width frames a per-frame caller
//! pushes. Two rules keep the stream small:
//! 1. A color SGR is emitted only when it differs from the previously
//!    emitted cell's color, so same-colored runs cost their glyphs alone
//! 2. Empty cells are skipped outright: no bytes, no cursor advance, and
//!    no effect on the color run either side of them
//!
//! Color state lives within a single call. Every call starts with colors
//! unknown, so its first visible cell always re-establishes foreground and
//! background and a given rectangle renders to reproducible bytes.

use std::io::Write;

use crate::console::Console;
use crate::error::DisplayError;
use crate::screen::{PaletteEntry, Pixel, Rect};

use super::Backend;

/// Renders pixel rectangles as a VT100 escape stream.
///
/// Works with any pixel format on any console; all device traffic goes
/// through [`Console::write_stream`], accumulated per call and flushed
/// with a single write.
#[derive(Debug)]
pub struct EscapeBackend {
    out: Vec<u8>,
}

impl Default for EscapeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EscapeBackend {
    /// Create a backend with a pre-allocated output buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(65536),
        }
    }
}

impl<P: Pixel> Backend<P> for EscapeBackend {
    fn render(
        &mut self,
        console: &mut dyn Console,
        cells: &[P],
        dest: Rect,
    ) -> Result<(), DisplayError> {
        debug_assert_eq!(cells.len(), dest.area() as usize);
        if dest.is_empty() {
            return Ok(());
        }

        self.out.clear();
        emit_cursor_move(&mut self.out, dest.x, dest.y);

        let mut prev: Option<P> = None;
        for cell in cells {
            if cell.is_empty() {
                continue;
            }
            match prev {
                Some(p) => {
                    if !cell.same_fg(&p) {
                        cell.emit_fg(&mut self.out);
                    }
                    if !cell.same_bg(&p) {
                        cell.emit_bg(&mut self.out);
                    }
                }
                None => {
                    cell.emit_fg(&mut self.out);
                    cell.emit_bg(&mut self.out);
                }
            }

            let mut utf8 = [0u8; 4];
            self.out
                .extend_from_slice(cell.glyph().encode_utf8(&mut utf8).as_bytes());
            prev = Some(*cell);
        }

        console.write_stream(&self.out)?;
        Ok(())
    }

    fn set_colors(
        &mut self,
        console: &mut dyn Console,
        entries: &[PaletteEntry],
    ) -> Result<(), DisplayError> {
        self.out.clear();
        for entry in entries {
            emit_palette_define(&mut self.out, *entry);
        }
        if !self.out.is_empty() {
            console.write_stream(&self.out)?;
        }
        Ok(())
    }
}

/// Emit an absolute cursor position sequence (CUP, 1-indexed).
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    let _ = write!(output, "\x1b[{};{}H", y + 1, x + 1);
}

/// Emit an OSC 4 palette definition with X11 `rgb:RR/GG/BB` color syntax.
#[inline]
fn emit_palette_define(output: &mut Vec<u8>, entry: PaletteEntry) {
    let _ = write!(
        output,
        "\x1b]4;{};rgb:{:02x}/{:02x}/{:02x}\x1b\\",
        entry.index, entry.color.r, entry.color.g, entry.color.b
    );
}
