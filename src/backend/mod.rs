//! Backend module: translation from composed pixels to device operations.
//!
//! This module contains:
//! - [`Backend`]: The strategy trait a display session renders through
//! - [`EscapeBackend`]: VT100 escape stream rendering, any pixel format
//! - [`NativeBackend`]: Cell blits through the device surface, indexed only
//!
//! Picking a backend picks a wire. [`EscapeBackend`] turns pixel rectangles
//! into cursor moves, SGR colors and glyph bytes on
//! [`Console::write_stream`]; [`NativeBackend`] packs cells into
//! [`CharCell`](crate::console::CharCell) slices for [`Console::blit`].
//! Formats and backends pair in the type system: [`NativeBackend`] only
//! implements `Backend<IndexedPixel>`, so a true-color buffer cannot be
//! pointed at a 16-color device surface.

mod escape;
mod native;

pub use escape::EscapeBackend;
pub use native::NativeBackend;

use crate::console::Console;
use crate::error::DisplayError;
use crate::screen::{PaletteEntry, Pixel, Rect};

/// Translation strategy from composed pixels to console operations.
pub trait Backend<P: Pixel> {
    /// Render a dense pixel rectangle onto the console.
    ///
    /// `cells` holds `dest.area()` pixels in row-major order.
    fn render(
        &mut self,
        console: &mut dyn Console,
        cells: &[P],
        dest: Rect,
    ) -> Result<(), DisplayError>;

    /// Apply palette assignments to the device.
    fn set_colors(
        &mut self,
        console: &mut dyn Console,
        entries: &[PaletteEntry],
    ) -> Result<(), DisplayError>;
}
