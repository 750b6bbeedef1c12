//! Pixel types: the atomic units of screen content.
//!
//! Two representations exist, and a display session uses exactly one of them:
//!
//! - [`RgbPixel`] carries full truecolor per cell. Rendered by the escape
//!   backend with `38;2`/`48;2` SGR sequences.
//! - [`IndexedPixel`] carries palette indices. Rendered by the native backend
//!   as packed character+attribute pairs, or by the escape backend with
//!   `38;5`/`48;5` SGR sequences; the palette itself is set separately.
//!
//! The [`Pixel`] trait is the small surface the screen buffer and the escape
//! backend need from either representation. The glyph `'\0'` is the
//! transparent sentinel: the escape backend emits nothing at all for such a
//! cell, and a zero-initialized buffer is entirely transparent.
//!
//! # Memory layout
//!
//! ```text
//! RgbPixel (12 bytes)            IndexedPixel (8 bytes)
//! ┌─────┬─────┬─────┬───────┐    ┌────┬────┬─────┬───────┐
//! │ fg  │ bg  │ pad │ glyph │    │ fg │ bg │ pad │ glyph │
//! │ 3 B │ 3 B │ 2 B │  4 B  │    │ 1B │ 1B │ 2 B │  4 B  │
//! └─────┴─────┴─────┴───────┘    └────┴────┴─────┴───────┘
//! ```

use std::io::Write;

/// The transparent glyph sentinel. A pixel whose glyph is this value is
/// skipped entirely by the escape backend and rendered as a blank by the
/// native blit.
pub const EMPTY_GLYPH: char = '\0';

/// True-color RGB value.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

/// What the screen buffer and the escape backend need from a pixel
/// representation.
///
/// Implemented by [`RgbPixel`] and [`IndexedPixel`]; a display session is
/// generic over one of the two, so the representations never mix at runtime.
pub trait Pixel: Copy + PartialEq + Eq + Default + std::fmt::Debug {
    /// Character shown by this pixel.
    fn glyph(&self) -> char;

    /// The same pixel with a different glyph (used for text stamping).
    #[must_use]
    fn with_glyph(self, glyph: char) -> Self;

    /// True when the glyph is the transparent sentinel.
    #[inline]
    fn is_empty(&self) -> bool {
        self.glyph() == EMPTY_GLYPH
    }

    /// True when both pixels have the same foreground color.
    fn same_fg(&self, other: &Self) -> bool;

    /// True when both pixels have the same background color.
    fn same_bg(&self, other: &Self) -> bool;

    /// Append the SGR sequence selecting this pixel's foreground.
    fn emit_fg(&self, out: &mut Vec<u8>);

    /// Append the SGR sequence selecting this pixel's background.
    fn emit_bg(&self, out: &mut Vec<u8>);
}

/// Direct-color pixel: truecolor foreground and background plus a glyph.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RgbPixel {
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
    /// Displayed character; [`EMPTY_GLYPH`] marks a transparent cell.
    pub glyph: char,
}

const _: () = assert!(
    std::mem::size_of::<RgbPixel>() == 12,
    "RgbPixel is expected to pack into 12 bytes"
);

impl RgbPixel {
    /// A transparent pixel: zeroed colors, empty glyph.
    pub const EMPTY: Self = Self {
        fg: Rgb::BLACK,
        bg: Rgb::BLACK,
        glyph: EMPTY_GLYPH,
    };

    /// Create a visible pixel: white on black with the given glyph.
    #[inline]
    pub const fn new(glyph: char) -> Self {
        Self {
            fg: Rgb::WHITE,
            bg: Rgb::BLACK,
            glyph,
        }
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }
}

impl Default for RgbPixel {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Pixel for RgbPixel {
    #[inline]
    fn glyph(&self) -> char {
        self.glyph
    }

    #[inline]
    fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    #[inline]
    fn same_fg(&self, other: &Self) -> bool {
        self.fg == other.fg
    }

    #[inline]
    fn same_bg(&self, other: &Self) -> bool {
        self.bg == other.bg
    }

    fn emit_fg(&self, out: &mut Vec<u8>) {
        let _ = write!(out, "\x1b[38;2;{};{};{}m", self.fg.r, self.fg.g, self.fg.b);
    }

    fn emit_bg(&self, out: &mut Vec<u8>) {
        let _ = write!(out, "\x1b[48;2;{};{};{}m", self.bg.r, self.bg.g, self.bg.b);
    }
}

impl std::fmt::Debug for RgbPixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RgbPixel({:?} fg={:?} bg={:?})", self.glyph, self.fg, self.bg)
    }
}

/// Indexed pixel: palette indices plus a glyph.
///
/// Indices are resolved per backend: the native color table for blits
/// (where only 0-15 are representable in the attribute word), or the
/// terminal emulator's 256-entry palette for the escape backend.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IndexedPixel {
    /// Foreground palette index.
    pub fg: u8,
    /// Background palette index.
    pub bg: u8,
    /// Displayed character; [`EMPTY_GLYPH`] marks a transparent cell.
    pub glyph: char,
}

const _: () = assert!(
    std::mem::size_of::<IndexedPixel>() == 8,
    "IndexedPixel is expected to pack into 8 bytes"
);

impl IndexedPixel {
    /// A transparent pixel: index 0 on index 0, empty glyph.
    pub const EMPTY: Self = Self {
        fg: 0,
        bg: 0,
        glyph: EMPTY_GLYPH,
    };

    /// Create a visible pixel: index 7 (white) on index 0 (black).
    #[inline]
    pub const fn new(glyph: char) -> Self {
        Self { fg: 7, bg: 0, glyph }
    }

    /// Set the foreground index (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: u8) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background index (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: u8) -> Self {
        self.bg = bg;
        self
    }
}

impl Default for IndexedPixel {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Pixel for IndexedPixel {
    #[inline]
    fn glyph(&self) -> char {
        self.glyph
    }

    #[inline]
    fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    #[inline]
    fn same_fg(&self, other: &Self) -> bool {
        self.fg == other.fg
    }

    #[inline]
    fn same_bg(&self, other: &Self) -> bool {
        self.bg == other.bg
    }

    fn emit_fg(&self, out: &mut Vec<u8>) {
        let _ = write!(out, "\x1b[38;5;{}m", self.fg);
    }

    fn emit_bg(&self, out: &mut Vec<u8>) {
        let _ = write!(out, "\x1b[48;5;{}m", self.bg);
    }
}

impl std::fmt::Debug for IndexedPixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IndexedPixel({:?} fg={} bg={})", self.glyph, self.fg, self.bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_sizes() {
        assert_eq!(std::mem::size_of::<RgbPixel>(), 12);
        assert_eq!(std::mem::size_of::<IndexedPixel>(), 8);
    }

    #[test]
    fn test_rgb_from_tuple() {
        let rgb: Rgb = (255, 128, 0).into();
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_rgb_from_hex() {
        let rgb: Rgb = 0xFF8000.into();
        assert_eq!(rgb, Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_rgb_debug_is_hex() {
        assert_eq!(format!("{:?}", Rgb::new(10, 20, 30)), "#0a141e");
    }

    #[test]
    fn test_default_pixels_are_empty() {
        assert!(RgbPixel::default().is_empty());
        assert!(IndexedPixel::default().is_empty());
        assert_eq!(RgbPixel::default(), RgbPixel::EMPTY);
        assert_eq!(IndexedPixel::default(), IndexedPixel::EMPTY);
    }

    #[test]
    fn test_new_pixels_are_visible() {
        assert!(!RgbPixel::new('A').is_empty());
        assert!(!IndexedPixel::new('A').is_empty());
    }

    #[test]
    fn test_builder_pattern() {
        let px = RgbPixel::new('X')
            .with_fg(Rgb::new(255, 0, 0))
            .with_bg(Rgb::new(0, 0, 255));
        assert_eq!(px.fg, Rgb::new(255, 0, 0));
        assert_eq!(px.bg, Rgb::new(0, 0, 255));
        assert_eq!(px.glyph, 'X');
    }

    #[test]
    fn test_with_glyph_keeps_colors() {
        let px = IndexedPixel::new(' ').with_fg(3).with_bg(5);
        let stamped = px.with_glyph('Q');
        assert_eq!(stamped.fg, 3);
        assert_eq!(stamped.bg, 5);
        assert_eq!(stamped.glyph, 'Q');
    }

    #[test]
    fn test_truecolor_sgr_bytes() {
        let px = RgbPixel::new('A')
            .with_fg(Rgb::new(10, 20, 30))
            .with_bg(Rgb::new(1, 2, 3));
        let mut out = Vec::new();
        px.emit_fg(&mut out);
        assert_eq!(out, b"\x1b[38;2;10;20;30m");
        out.clear();
        px.emit_bg(&mut out);
        assert_eq!(out, b"\x1b[48;2;1;2;3m");
    }

    #[test]
    fn test_indexed_sgr_bytes() {
        let px = IndexedPixel::new('A').with_fg(3).with_bg(250);
        let mut out = Vec::new();
        px.emit_fg(&mut out);
        assert_eq!(out, b"\x1b[38;5;3m");
        out.clear();
        px.emit_bg(&mut out);
        assert_eq!(out, b"\x1b[48;5;250m");
    }

    #[test]
    fn test_color_comparison() {
        let a = RgbPixel::new('A').with_fg(Rgb::new(1, 2, 3));
        let b = RgbPixel::new('B').with_fg(Rgb::new(1, 2, 3));
        let c = RgbPixel::new('A').with_fg(Rgb::new(9, 9, 9));
        assert!(a.same_fg(&b));
        assert!(!a.same_fg(&c));
        assert!(a.same_bg(&c));
    }
}
