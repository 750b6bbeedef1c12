//! Display module: the session tying screen, backend and console together.
//!
//! This module contains:
//! - [`Display`]: An active display session over a console device
//! - [`DisplayConfig`]: Size, font and surface options for session setup
//! - [`FontMetrics`]: Glyph cell size in pixels
//! - [`Geometry`]: The window placement a session occupies
//! - [`ShutdownCoordinator`]: The stop handshake render loops poll
//!
//! ## Lifecycle
//!
//! ```text
//!   DisplayConfig ──native()/escape()──▶ Display
//!        frame loop:  compose into buffer_mut() ─▶ present()
//!                     check_resize() ─▶ Some(geometry)? buffer reallocated
//!                     shutdown().should_stop()? ─▶ destroy() acknowledges
//! ```
//!
//! ## Example
//!
//! ```
//! use rasterm::console::HeadlessConsole;
//! use rasterm::display::{Display, DisplayConfig};
//! use rasterm::screen::IndexedPixel;
//!
//! let mut display = Display::native_with(HeadlessConsole::new(), DisplayConfig::new(40, 12))?;
//! display.clear(IndexedPixel::new(' '));
//! display.buffer_mut().put_str(2, 1, "hello", IndexedPixel::new(' ').with_fg(10));
//! display.present()?;
//! display.destroy()?;
//! # Ok::<(), rasterm::error::DisplayError>(())
//! ```

mod geometry;
mod shutdown;

pub use geometry::Geometry;
pub use shutdown::ShutdownCoordinator;

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::backend::{Backend, EscapeBackend, NativeBackend};
use crate::console::{Console, SurfaceOptions, TermConsole};
use crate::error::DisplayError;
use crate::screen::{IndexedPixel, PaletteEntry, Pixel, Rect, RgbPixel, ScreenBuffer};

/// Glyph cell size in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FontMetrics {
    /// Glyph width in pixels.
    pub width: u16,
    /// Glyph height in pixels.
    pub height: u16,
}

impl FontMetrics {
    /// The raster font a session uses unless configured otherwise.
    pub const DEFAULT: Self = Self::new(12, 12);

    /// Create font metrics.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for opening a display session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayConfig {
    /// Screen width in cells.
    pub width: u16,
    /// Screen height in cells.
    pub height: u16,
    /// Glyph cell size.
    pub font: FontMetrics,
    /// Hide the cursor while the session runs.
    pub hide_cursor: bool,
    /// Capture mouse input on the surface.
    pub mouse_capture: bool,
    /// Use the alternate screen, restoring scrollback on destroy.
    pub alternate_screen: bool,
}

impl DisplayConfig {
    /// A session of `width` x `height` cells with default everything else.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            font: FontMetrics::DEFAULT,
            hide_cursor: true,
            mouse_capture: true,
            alternate_screen: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(80, 25)
    }
}

/// An active display session.
///
/// Owns the console device, the composed screen buffer and the backend
/// translating between them. The buffer is mutated only through
/// [`buffer_mut`](Self::buffer_mut), [`write_region`](Self::write_region)
/// and [`clear`](Self::clear); a frame reaches the device only on
/// [`present`](Self::present) or [`present_region`](Self::present_region).
///
/// The pixel format is fixed at open time. [`native`](Self::native)
/// sessions are always indexed; [`escape`](Self::escape) sessions default
/// to true color.
pub struct Display<P: Pixel = IndexedPixel> {
    console: Box<dyn Console>,
    backend: Box<dyn Backend<P>>,
    buffer: ScreenBuffer<P>,
    region_scratch: Vec<P>,
    geometry: Geometry,
    font: FontMetrics,
    shutdown: Arc<ShutdownCoordinator>,
    active: bool,
}

impl<P: Pixel> fmt::Debug for Display<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("geometry", &self.geometry)
            .field("font", &self.font)
            .field("shutdown", &self.shutdown)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Display<IndexedPixel> {
    /// Open a native-surface session on the process terminal.
    pub fn native(config: DisplayConfig) -> Result<Self, DisplayError> {
        Self::native_with(TermConsole::new(), config)
    }

    /// Open a native-surface session on the given device.
    pub fn native_with(
        console: impl Console + 'static,
        config: DisplayConfig,
    ) -> Result<Self, DisplayError> {
        Self::with_backend(console, NativeBackend::new(), config)
    }
}

impl Display<RgbPixel> {
    /// Open a true-color escape-stream session on the process terminal.
    pub fn escape(config: DisplayConfig) -> Result<Self, DisplayError> {
        Self::escape_with(TermConsole::new(), config)
    }
}

impl<P: Pixel> Display<P> {
    /// Open an escape-stream session on the given device.
    pub fn escape_with(
        console: impl Console + 'static,
        config: DisplayConfig,
    ) -> Result<Self, DisplayError> {
        Self::with_backend(console, EscapeBackend::new(), config)
    }

    /// Open a session with an explicit backend.
    pub fn with_backend(
        console: impl Console + 'static,
        backend: impl Backend<P> + 'static,
        config: DisplayConfig,
    ) -> Result<Self, DisplayError> {
        if config.width == 0 || config.height == 0 {
            return Err(DisplayError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        if config.font.width == 0 || config.font.height == 0 {
            return Err(DisplayError::FontRejected {
                width: config.font.width,
                height: config.font.height,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "font dimensions must be nonzero",
                ),
            });
        }

        let mut options = SurfaceOptions::WINDOW_EVENTS;
        if config.hide_cursor {
            options |= SurfaceOptions::HIDE_CURSOR;
        }
        if config.mouse_capture {
            options |= SurfaceOptions::MOUSE_CAPTURE;
        }
        if config.alternate_screen {
            options |= SurfaceOptions::ALTERNATE_SCREEN;
        }

        let mut console: Box<dyn Console> = Box::new(console);
        console.acquire(options)?;

        let geometry =
            match Self::configure(console.as_mut(), config.width, config.height, config.font) {
                Ok(geometry) => geometry,
                Err(e) => {
                    // A half-configured surface must not leak past a failed
                    // open.
                    let _ = console.release();
                    return Err(e);
                }
            };

        Ok(Self {
            console,
            backend: Box::new(backend),
            buffer: ScreenBuffer::new(config.width, config.height),
            region_scratch: Vec::new(),
            geometry,
            font: config.font,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            active: true,
        })
    }

    /// Size the device for `width` x `height` cells: buffer, font, maximum
    /// check, then window placement.
    fn configure(
        console: &mut dyn Console,
        width: u16,
        height: u16,
        font: FontMetrics,
    ) -> Result<Geometry, DisplayError> {
        console
            .set_buffer_size(width, height)
            .map_err(|source| DisplayError::BufferSizeRejected {
                width,
                height,
                source,
            })?;
        console
            .set_font(font.width, font.height)
            .map_err(|source| DisplayError::FontRejected {
                width: font.width,
                height: font.height,
                source,
            })?;

        let (max_width, max_height) = console.max_size(font.width, font.height);
        if width > max_width || height > max_height {
            return Err(DisplayError::TooBig {
                width,
                height,
                max_width,
                max_height,
                font_width: font.width,
                font_height: font.height,
            });
        }

        let geometry = Geometry::of_size(width, height);
        console.set_window_rect(geometry.rect())?;
        Ok(geometry)
    }

    fn ensure_active(&self) -> Result<(), DisplayError> {
        if self.active {
            Ok(())
        } else {
            Err(DisplayError::Destroyed)
        }
    }

    /// Screen width in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.geometry.width
    }

    /// Screen height in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.geometry.height
    }

    /// The session's last-known window geometry.
    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The session's font metrics.
    #[must_use]
    pub const fn font(&self) -> FontMetrics {
        self.font
    }

    /// The composed screen buffer.
    #[must_use]
    pub const fn buffer(&self) -> &ScreenBuffer<P> {
        &self.buffer
    }

    /// The composed screen buffer, for writing a frame into.
    pub fn buffer_mut(&mut self) -> &mut ScreenBuffer<P> {
        &mut self.buffer
    }

    /// A handle to the stop handshake, for wiring into a Ctrl-C or
    /// window-close handler. See [`ShutdownCoordinator`].
    #[must_use]
    pub fn shutdown(&self) -> Arc<ShutdownCoordinator> {
        Arc::clone(&self.shutdown)
    }

    /// Copy `cells` into the buffer at `region` (row-major, length =
    /// `region.area()`).
    pub fn write_region(&mut self, region: Rect, cells: &[P]) {
        self.buffer.write_region(region, cells);
    }

    /// Fill the whole buffer with `fill`. Nothing reaches the device until
    /// the next present.
    pub fn clear(&mut self, fill: P) {
        self.buffer.clear(fill);
    }

    /// Fill `region` of the buffer with `fill`.
    pub fn clear_region(&mut self, region: Rect, fill: P) {
        self.buffer.clear_region(region, fill);
    }

    /// Push the whole composed buffer to the device.
    pub fn present(&mut self) -> Result<(), DisplayError> {
        self.ensure_active()?;
        self.backend
            .render(self.console.as_mut(), self.buffer.cells(), self.buffer.rect())
    }

    /// Push one rectangle of the composed buffer to the device.
    pub fn present_region(&mut self, region: Rect) -> Result<(), DisplayError> {
        self.ensure_active()?;
        self.buffer.copy_region(region, &mut self.region_scratch);
        self.backend
            .render(self.console.as_mut(), &self.region_scratch, region)
    }

    /// Apply palette assignments through the session's backend.
    ///
    /// Failures here are degraded, not fatal: rendering may continue with
    /// the previous colors.
    pub fn set_colors(&mut self, entries: &[PaletteEntry]) -> Result<(), DisplayError> {
        self.ensure_active()?;
        self.backend.set_colors(self.console.as_mut(), entries)
    }

    /// Set the device window title.
    pub fn set_title(&mut self, title: &str) -> Result<(), DisplayError> {
        self.ensure_active()?;
        self.console.set_title(title)?;
        Ok(())
    }

    /// The window geometry as the device currently reports it.
    ///
    /// Unlike [`geometry`](Self::geometry) this queries the platform; on
    /// failure the caller should treat the geometry as unchanged.
    pub fn window_size(&self) -> Result<Geometry, DisplayError> {
        Ok(Geometry::from_rect(self.console.window_rect()?))
    }

    /// Compare the device window against the session geometry and
    /// reconfigure on any edge mismatch.
    ///
    /// On a resize the device is configured for the new size with the
    /// session's font, the screen buffer is reallocated (old contents are
    /// discarded) and the new geometry is returned. Returns `None` when
    /// nothing changed.
    pub fn check_resize(&mut self) -> Result<Option<Geometry>, DisplayError> {
        self.ensure_active()?;
        let reported = Geometry::from_rect(self.console.window_rect()?);
        if reported == self.geometry {
            return Ok(None);
        }

        let (width, height) = reported.size();
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidDimensions { width, height });
        }

        let geometry = Self::configure(self.console.as_mut(), width, height, self.font)?;
        self.buffer = ScreenBuffer::new(width, height);
        self.geometry = geometry;
        Ok(Some(geometry))
    }

    /// Tear the session down: release the device and acknowledge any
    /// pending stop request. Idempotent.
    pub fn destroy(&mut self) -> Result<(), DisplayError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let released = self.console.release();
        // A pending stop request is acknowledged even when release fails.
        self.shutdown.acknowledge();
        released
    }
}

impl<P: Pixel> Drop for Display<P> {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::HeadlessConsole;
    use crate::screen::Rgb;

    fn open_native(
        config: DisplayConfig,
    ) -> (HeadlessConsole, Display<IndexedPixel>) {
        let console = HeadlessConsole::new();
        let display = Display::native_with(console.clone(), config).expect("open session");
        (console, display)
    }

    #[test]
    fn test_open_configures_device_in_order() {
        let (console, display) = open_native(DisplayConfig::default());

        assert!(console.is_acquired());
        assert_eq!(console.buffer_size(), Some((80, 25)));
        assert_eq!(console.font(), Some((12, 12)));
        assert_eq!(console.window_sets(), vec![Rect::from_size(80, 25)]);
        assert!(console.options().contains(SurfaceOptions::HIDE_CURSOR));
        assert!(console.options().contains(SurfaceOptions::WINDOW_EVENTS));
        assert_eq!(display.width(), 80);
        assert_eq!(display.height(), 25);
    }

    #[test]
    fn test_geometry_edges_are_inclusive() {
        let (_console, display) = open_native(DisplayConfig::default());
        let g = display.geometry();
        assert_eq!((g.left, g.top, g.right, g.bottom), (0, 0, 79, 24));
        assert_eq!(display.window_size().unwrap(), g);
    }

    #[test]
    fn test_zero_dimensions_rejected_before_device() {
        let console = HeadlessConsole::new();
        let err = Display::native_with(console.clone(), DisplayConfig::new(0, 25)).unwrap_err();
        assert!(matches!(
            err,
            DisplayError::InvalidDimensions {
                width: 0,
                height: 25
            }
        ));
        assert!(!console.is_acquired());
    }

    #[test]
    fn test_zero_font_rejected_before_device() {
        let console = HeadlessConsole::new();
        let config = DisplayConfig {
            font: FontMetrics::new(0, 12),
            ..DisplayConfig::default()
        };
        let err = Display::native_with(console.clone(), config).unwrap_err();
        assert!(matches!(err, DisplayError::FontRejected { width: 0, .. }));
        assert!(!console.is_acquired());
    }

    #[test]
    fn test_too_big_fails_and_releases_surface() {
        let console = HeadlessConsole::new();
        let err =
            Display::native_with(console.clone(), DisplayConfig::new(10000, 25)).unwrap_err();

        assert!(matches!(
            err,
            DisplayError::TooBig {
                width: 10000,
                max_width: 240,
                ..
            }
        ));
        assert!(!console.is_acquired());
        assert_eq!(console.release_count(), 1);
    }

    #[test]
    fn test_buffer_size_rejection_releases_surface() {
        let console = HeadlessConsole::new();
        console.set_fail_buffer_size(true);
        let err = Display::native_with(console.clone(), DisplayConfig::default()).unwrap_err();

        assert!(matches!(err, DisplayError::BufferSizeRejected { .. }));
        assert!(!console.is_acquired());
    }

    #[test]
    fn test_clear_present_covers_full_window() {
        let (console, mut display) = open_native(DisplayConfig::default());

        display.clear(IndexedPixel::new(' '));
        display.present().unwrap();

        assert_eq!(console.blit_count(), 1);
        let blit = console.last_blit().unwrap();
        assert_eq!(blit.dest, Rect::from_size(80, 25));
        assert_eq!(blit.cell(40, 12).unwrap().glyph, ' ');
        assert_eq!(display.buffer().get(79, 24), Some(&IndexedPixel::new(' ')));
    }

    #[test]
    fn test_present_region_sends_exactly_that_rect() {
        let (console, mut display) = open_native(DisplayConfig::default());

        let region = Rect::new(2, 1, 3, 2);
        let star = IndexedPixel::new('*').with_fg(12);
        display.write_region(region, &[star; 6]);
        display.present_region(region).unwrap();

        let blit = console.last_blit().unwrap();
        assert_eq!(blit.dest, region);
        assert_eq!(blit.cells.len(), 6);
        assert_eq!(blit.cell(0, 0).unwrap().glyph, '*');
    }

    #[test]
    fn test_set_colors_reaches_native_table() {
        let (console, mut display) = open_native(DisplayConfig::default());

        display
            .set_colors(&[PaletteEntry::new(3, Rgb::new(10, 20, 30))])
            .unwrap();

        assert_eq!(console.colors()[3], Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_check_resize_reallocates_with_session_font() {
        let config = DisplayConfig {
            font: FontMetrics::new(8, 16),
            ..DisplayConfig::default()
        };
        let (console, mut display) = open_native(config);

        display.buffer_mut().set(0, 0, IndexedPixel::new('x'));
        console.resize_to(100, 30);

        let geometry = display.check_resize().unwrap().expect("resize detected");
        assert_eq!(geometry.size(), (100, 30));
        assert_eq!((geometry.right, geometry.bottom), (99, 29));
        assert_eq!(display.width(), 100);
        // Old contents are discarded, not copied.
        assert_eq!(display.buffer().get(0, 0), Some(&IndexedPixel::default()));
        // The session font survives the reconfigure.
        assert_eq!(console.font(), Some((8, 16)));
        assert_eq!(console.buffer_size(), Some((100, 30)));
    }

    #[test]
    fn test_check_resize_unchanged_returns_none() {
        let (_console, mut display) = open_native(DisplayConfig::default());
        assert_eq!(display.check_resize().unwrap(), None);
    }

    #[test]
    fn test_destroy_is_idempotent_and_acknowledges() {
        let (console, mut display) = open_native(DisplayConfig::default());
        let shutdown = display.shutdown();

        display.destroy().unwrap();
        display.destroy().unwrap();

        assert!(!console.is_acquired());
        assert_eq!(console.release_count(), 1);
        assert!(shutdown.is_acknowledged());
        assert!(matches!(
            display.present().unwrap_err(),
            DisplayError::Destroyed
        ));
    }

    #[test]
    fn test_drop_releases_the_device() {
        let console = HeadlessConsole::new();
        {
            let _display =
                Display::native_with(console.clone(), DisplayConfig::default()).unwrap();
        }
        assert!(!console.is_acquired());
        assert_eq!(console.release_count(), 1);
    }

    #[test]
    fn test_escape_session_streams_instead_of_blitting() {
        let console = HeadlessConsole::new();
        let mut display =
            Display::<RgbPixel>::escape_with(console.clone(), DisplayConfig::new(10, 2)).unwrap();

        display
            .buffer_mut()
            .set(0, 0, RgbPixel::new('X').with_fg(Rgb::new(255, 0, 0)));
        display.present().unwrap();

        assert_eq!(console.blit_count(), 0);
        let stream = String::from_utf8(console.take_stream()).unwrap();
        assert!(stream.contains('X'));
        assert!(stream.contains("38;2;255;0;0m"));
    }
}
