//! Screen module: the in-memory picture the display session composites.
//!
//! This module contains:
//! - [`Rgb`]: True-color representation
//! - [`Pixel`]: The cell contract both pixel formats implement
//! - [`RgbPixel`] / [`IndexedPixel`]: True-color and palette-indexed cells
//! - [`ScreenBuffer`]: A grid of pixels holding the composed frame
//! - [`Rect`]: Rectangular regions within a buffer
//! - [`PaletteEntry`]: Palette index assignments and the xterm defaults

mod buffer;
mod cell;
mod palette;
mod rect;

pub use buffer::ScreenBuffer;
pub use cell::{EMPTY_GLYPH, IndexedPixel, Pixel, Rgb, RgbPixel};
pub use palette::{PaletteEntry, default_color_table, xterm_color};
pub use rect::Rect;
