//! ScreenBuffer: the logical screen state as a row-major pixel grid.
//!
//! The buffer is the compositing surface: a frame is produced by writing
//! pixel regions into it, then handing a region to a render backend. Storage
//! is one contiguous `Vec`, row-major, owned by the display session and
//! replaced wholesale on resize (old contents are discarded, never copied
//! into the new allocation).
//!
//! Region operations treat an out-of-bounds rectangle as a caller bug and
//! panic; the text helper [`ScreenBuffer::put_str`] clips instead, because
//! text length is rarely known in cell units up front.

use unicode_width::UnicodeWidthChar;

use super::cell::Pixel;
use super::rect::Rect;

/// A width×height grid of pixels, row-major and contiguous.
#[derive(Clone, Debug)]
pub struct ScreenBuffer<P = super::cell::IndexedPixel> {
    cells: Vec<P>,
    width: u16,
    height: u16,
}

impl<P: Pixel> ScreenBuffer<P> {
    /// Create a zero-initialized (fully transparent) buffer.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "buffer dimensions must be nonzero");
        let len = usize::from(width) * usize::from(height);
        Self {
            cells: vec![P::default(); len],
            width,
            height,
        }
    }

    /// Buffer width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The rectangle covering the whole buffer.
    #[inline]
    pub const fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[P] {
        &self.cells
    }

    /// Flat index of a cell position, or `None` if out of bounds.
    #[inline]
    fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Get a cell, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&P> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a single cell. Out-of-bounds positions are ignored.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, pixel: P) {
        if let Some(i) = self.index_of(x, y) {
            self.cells[i] = pixel;
        }
    }

    /// Copy `cells` (row-major, exactly `region.area()` of them) into the
    /// buffer at `region`.
    ///
    /// # Panics
    /// Panics if `region` does not fit the buffer or `cells` has the wrong
    /// length. Both are caller-contract violations, not runtime conditions.
    pub fn write_region(&mut self, region: Rect, cells: &[P]) {
        assert!(
            region.fits_within(self.width, self.height),
            "write region {region:?} outside {}x{} buffer",
            self.width,
            self.height
        );
        assert_eq!(
            cells.len(),
            region.area() as usize,
            "cell count must match region area"
        );
        let w = usize::from(region.width);
        for row in 0..usize::from(region.height) {
            let src = row * w;
            let dst = (usize::from(region.y) + row) * usize::from(self.width)
                + usize::from(region.x);
            self.cells[dst..dst + w].copy_from_slice(&cells[src..src + w]);
        }
    }

    /// Fill every cell of `region` with `fill`.
    ///
    /// Equivalent to a [`write_region`](Self::write_region) of a uniformly
    /// filled source, without materializing it.
    ///
    /// # Panics
    /// Panics if `region` does not fit the buffer.
    pub fn clear_region(&mut self, region: Rect, fill: P) {
        assert!(
            region.fits_within(self.width, self.height),
            "clear region {region:?} outside {}x{} buffer",
            self.width,
            self.height
        );
        let w = usize::from(region.width);
        for row in 0..usize::from(region.height) {
            let dst = (usize::from(region.y) + row) * usize::from(self.width)
                + usize::from(region.x);
            self.cells[dst..dst + w].fill(fill);
        }
    }

    /// Fill the whole buffer with `fill`.
    pub fn clear(&mut self, fill: P) {
        self.cells.fill(fill);
    }

    /// Copy `region` out of the buffer into `out` (cleared first), row-major.
    ///
    /// # Panics
    /// Panics if `region` does not fit the buffer.
    pub fn copy_region(&self, region: Rect, out: &mut Vec<P>) {
        assert!(
            region.fits_within(self.width, self.height),
            "copy region {region:?} outside {}x{} buffer",
            self.width,
            self.height
        );
        out.clear();
        out.reserve(region.area() as usize);
        let w = usize::from(region.width);
        for row in 0..usize::from(region.height) {
            let src = (usize::from(region.y) + row) * usize::from(self.width)
                + usize::from(region.x);
            out.extend_from_slice(&self.cells[src..src + w]);
        }
    }

    /// Stamp a string into row `y` starting at column `x`, taking colors from
    /// `template` and replacing its glyph per character.
    ///
    /// Advances by each character's terminal column width: wide characters
    /// consume two columns (the continuation cell is left untouched),
    /// zero-width and control characters are skipped. Clips at the right
    /// edge. Returns the number of columns consumed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, template: P) -> u16 {
        if y >= self.height || x >= self.width {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            let Some(w) = ch.width().filter(|w| *w > 0) else {
                continue;
            };
            let w = w.min(2) as u16;
            if col >= self.width || self.width - col < w {
                break;
            }
            self.set(col, y, template.with_glyph(ch));
            col += w;
        }
        col - x
    }
}
