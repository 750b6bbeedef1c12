//! Native surface rendering: packed cell blits and the 16-entry color table.

use crate::console::{Attr, CharCell, Console};
use crate::error::DisplayError;
use crate::screen::{IndexedPixel, PaletteEntry, Rect};

use super::Backend;

/// Renders by packing pixels into [`CharCell`]s and blitting them through
/// the device surface.
///
/// Only `Backend<IndexedPixel>` is implemented: the packed attribute has
/// four bits per channel, so a true-color buffer has nowhere to go on this
/// path and the mismatch fails to compile.
#[derive(Debug, Default)]
pub struct NativeBackend {
    cells: Vec<CharCell>,
}

impl NativeBackend {
    /// Create a backend with an empty translation buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }
}

impl Backend<IndexedPixel> for NativeBackend {
    fn render(
        &mut self,
        console: &mut dyn Console,
        cells: &[IndexedPixel],
        dest: Rect,
    ) -> Result<(), DisplayError> {
        debug_assert_eq!(cells.len(), dest.area() as usize);

        // Every cell is transferred, empty ones included; the blit owns the
        // whole destination rectangle.
        self.cells.clear();
        self.cells.reserve(cells.len());
        for px in cells {
            self.cells
                .push(CharCell::new(px.glyph, Attr::from_indices(px.fg, px.bg)));
        }

        console.blit(&self.cells, dest)?;
        Ok(())
    }

    fn set_colors(
        &mut self,
        console: &mut dyn Console,
        entries: &[PaletteEntry],
    ) -> Result<(), DisplayError> {
        // Indices are checked before the device is touched.
        for entry in entries {
            if entry.index > 15 {
                return Err(DisplayError::PaletteIndexOutOfRange { index: entry.index });
            }
        }
        if entries.is_empty() {
            return Ok(());
        }

        let mut table = console.color_table()?;
        for entry in entries {
            table[entry.index as usize] = entry.color;
        }
        console.set_color_table(&table)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::HeadlessConsole;
    use crate::screen::{Rgb, default_color_table};

    #[test]
    fn test_render_packs_indices_into_attributes() {
        let console = HeadlessConsole::new();
        let mut backend = NativeBackend::new();
        let cells = [
            IndexedPixel::new('x').with_fg(3).with_bg(12),
            IndexedPixel::new('y').with_fg(15).with_bg(0),
        ];

        backend
            .render(&mut console.clone(), &cells, Rect::new(1, 1, 2, 1))
            .unwrap();

        let blit = console.last_blit().unwrap();
        assert_eq!(blit.dest, Rect::new(1, 1, 2, 1));
        let x = blit.cell(0, 0).unwrap();
        assert_eq!(x.glyph, 'x');
        assert_eq!(x.attr.fg_index(), 3);
        assert_eq!(x.attr.bg_index(), 12);
        let y = blit.cell(1, 0).unwrap();
        assert_eq!(y.attr.fg_index(), 15);
        assert_eq!(y.attr.bg_index(), 0);
    }

    #[test]
    fn test_render_transfers_empty_cells_too() {
        let console = HeadlessConsole::new();
        let mut backend = NativeBackend::new();
        let cells = [IndexedPixel::default(); 6];

        backend
            .render(&mut console.clone(), &cells, Rect::from_size(3, 2))
            .unwrap();

        let blit = console.last_blit().unwrap();
        assert_eq!(blit.cells.len(), 6);
        assert_eq!(blit.cell(2, 1).unwrap().glyph, '\0');
    }

    #[test]
    fn test_set_colors_overwrites_only_named_entries() {
        let console = HeadlessConsole::new();
        let mut backend = NativeBackend::new();

        backend
            .set_colors(
                &mut console.clone(),
                &[
                    PaletteEntry::new(3, Rgb::new(10, 20, 30)),
                    PaletteEntry::new(12, Rgb::new(1, 2, 3)),
                ],
            )
            .unwrap();

        let colors = console.colors();
        assert_eq!(colors[3], Rgb::new(10, 20, 30));
        assert_eq!(colors[12], Rgb::new(1, 2, 3));
        let defaults = default_color_table();
        assert_eq!(colors[0], defaults[0]);
        assert_eq!(colors[15], defaults[15]);
        assert_eq!(console.color_write_count(), 1);
    }

    #[test]
    fn test_set_colors_rejects_high_index_before_reading_device() {
        let console = HeadlessConsole::new();
        // A device read would fail loudly; the index check must come first.
        console.set_fail_color_read(true);
        let mut backend = NativeBackend::new();

        let err = backend
            .set_colors(
                &mut console.clone(),
                &[PaletteEntry::new(16, Rgb::new(1, 2, 3))],
            )
            .unwrap_err();

        assert!(matches!(
            err,
            DisplayError::PaletteIndexOutOfRange { index: 16 }
        ));
        assert_eq!(console.color_write_count(), 0);
    }

    #[test]
    fn test_set_colors_skips_write_when_read_fails() {
        let console = HeadlessConsole::new();
        console.set_fail_color_read(true);
        let mut backend = NativeBackend::new();

        let err = backend
            .set_colors(
                &mut console.clone(),
                &[PaletteEntry::new(3, Rgb::new(10, 20, 30))],
            )
            .unwrap_err();

        assert!(matches!(err, DisplayError::Io(_)));
        assert_eq!(console.color_write_count(), 0);
    }

    #[test]
    fn test_set_colors_with_no_entries_touches_nothing() {
        let console = HeadlessConsole::new();
        console.set_fail_color_read(true);
        let mut backend = NativeBackend::new();

        backend.set_colors(&mut console.clone(), &[]).unwrap();
        assert_eq!(console.color_write_count(), 0);
    }
}
