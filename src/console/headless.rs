//! An in-memory console device that records every call.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::DisplayError;
use crate::screen::{Rect, Rgb, default_color_table};

use super::{CharCell, Console, SurfaceOptions};

/// One recorded [`Console::blit`] call.
#[derive(Clone, Debug)]
pub struct BlitRecord {
    /// The cells transferred, row-major.
    pub cells: Vec<CharCell>,
    /// The destination rectangle.
    pub dest: Rect,
}

impl BlitRecord {
    /// The cell at destination-relative coordinates.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<CharCell> {
        if x >= self.dest.width || y >= self.dest.height {
            return None;
        }
        let idx = y as usize * self.dest.width as usize + x as usize;
        self.cells.get(idx).copied()
    }
}

#[derive(Debug)]
struct HeadlessState {
    acquired: bool,
    options: SurfaceOptions,
    release_count: u32,
    buffer_sizes: Vec<(u16, u16)>,
    fonts: Vec<(u16, u16)>,
    max_size: (u16, u16),
    window: Rect,
    window_sets: Vec<Rect>,
    blits: Vec<BlitRecord>,
    stream: Vec<u8>,
    color_table: [Rgb; 16],
    color_write_count: u32,
    titles: Vec<String>,
    fail_buffer_size: bool,
    fail_font: bool,
    fail_color_read: bool,
    fail_color_write: bool,
}

/// An in-memory [`Console`] for tests and headless capture.
///
/// Clones share state, so a test can hand one clone to a display session
/// and keep another to inspect what the session did:
///
/// ```
/// use rasterm::console::HeadlessConsole;
/// use rasterm::display::{Display, DisplayConfig};
///
/// let console = HeadlessConsole::new();
/// let mut display = Display::native_with(console.clone(), DisplayConfig::default()).unwrap();
/// display.present().unwrap();
/// assert_eq!(console.blit_count(), 1);
/// # display.destroy().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HeadlessConsole {
    state: Arc<Mutex<HeadlessState>>,
}

impl Default for HeadlessConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessConsole {
    /// Default maximum window size, mirroring a 1080p-ish device.
    pub const DEFAULT_MAX: (u16, u16) = (240, 63);

    /// Create a device with the default maximum window size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                acquired: false,
                options: SurfaceOptions::empty(),
                release_count: 0,
                buffer_sizes: Vec::new(),
                fonts: Vec::new(),
                max_size: Self::DEFAULT_MAX,
                window: Rect::new(0, 0, 0, 0),
                window_sets: Vec::new(),
                blits: Vec::new(),
                stream: Vec::new(),
                color_table: default_color_table(),
                color_write_count: 0,
                titles: Vec::new(),
                fail_buffer_size: false,
                fail_font: false,
                fail_color_read: false,
                fail_color_write: false,
            })),
        }
    }

    /// Override the maximum window size the device reports.
    #[must_use]
    pub fn with_max_size(self, width: u16, height: u16) -> Self {
        self.state(|s| s.max_size = (width, height));
        self
    }

    fn state<R>(&self, f: impl FnOnce(&mut HeadlessState) -> R) -> R {
        let mut guard: MutexGuard<'_, HeadlessState> =
            self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Whether the surface is currently held.
    #[must_use]
    pub fn is_acquired(&self) -> bool {
        self.state(|s| s.acquired)
    }

    /// The options passed to the most recent acquire.
    #[must_use]
    pub fn options(&self) -> SurfaceOptions {
        self.state(|s| s.options)
    }

    /// How many times the surface has been released.
    #[must_use]
    pub fn release_count(&self) -> u32 {
        self.state(|s| s.release_count)
    }

    /// The most recent buffer size set, if any.
    #[must_use]
    pub fn buffer_size(&self) -> Option<(u16, u16)> {
        self.state(|s| s.buffer_sizes.last().copied())
    }

    /// Every buffer size set, in order.
    #[must_use]
    pub fn buffer_sizes(&self) -> Vec<(u16, u16)> {
        self.state(|s| s.buffer_sizes.clone())
    }

    /// The most recent font set, if any.
    #[must_use]
    pub fn font(&self) -> Option<(u16, u16)> {
        self.state(|s| s.fonts.last().copied())
    }

    /// Every font set, in order.
    #[must_use]
    pub fn fonts(&self) -> Vec<(u16, u16)> {
        self.state(|s| s.fonts.clone())
    }

    /// Every window rectangle set, in order.
    #[must_use]
    pub fn window_sets(&self) -> Vec<Rect> {
        self.state(|s| s.window_sets.clone())
    }

    /// How many blits the device has received.
    #[must_use]
    pub fn blit_count(&self) -> usize {
        self.state(|s| s.blits.len())
    }

    /// The most recent blit, if any.
    #[must_use]
    pub fn last_blit(&self) -> Option<BlitRecord> {
        self.state(|s| s.blits.last().cloned())
    }

    /// Every byte written to the stream so far.
    #[must_use]
    pub fn stream(&self) -> Vec<u8> {
        self.state(|s| s.stream.clone())
    }

    /// Drain and return the stream, leaving it empty.
    #[must_use]
    pub fn take_stream(&self) -> Vec<u8> {
        self.state(|s| std::mem::take(&mut s.stream))
    }

    /// The device color table, bypassing failure injection.
    #[must_use]
    pub fn colors(&self) -> [Rgb; 16] {
        self.state(|s| s.color_table)
    }

    /// How many times the color table has been written.
    #[must_use]
    pub fn color_write_count(&self) -> u32 {
        self.state(|s| s.color_write_count)
    }

    /// Every title set, in order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.state(|s| s.titles.clone())
    }

    /// Simulate the user resizing the window to `width` x `height` cells.
    pub fn resize_to(&self, width: u16, height: u16) {
        self.state(|s| {
            s.window = Rect { width, height, ..s.window };
        });
    }

    /// Make subsequent buffer size changes fail.
    pub fn set_fail_buffer_size(&self, fail: bool) {
        self.state(|s| s.fail_buffer_size = fail);
    }

    /// Make subsequent font changes fail.
    pub fn set_fail_font(&self, fail: bool) {
        self.state(|s| s.fail_font = fail);
    }

    /// Make subsequent color table reads fail.
    pub fn set_fail_color_read(&self, fail: bool) {
        self.state(|s| s.fail_color_read = fail);
    }

    /// Make subsequent color table writes fail.
    pub fn set_fail_color_write(&self, fail: bool) {
        self.state(|s| s.fail_color_write = fail);
    }
}

fn injected(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("injected {what} failure"))
}

impl Console for HeadlessConsole {
    fn acquire(&mut self, options: SurfaceOptions) -> Result<(), DisplayError> {
        self.state(|s| {
            if s.acquired {
                return Err(DisplayError::InvalidHandle {
                    reason: "surface already acquired".into(),
                });
            }
            s.acquired = true;
            s.options = options;
            Ok(())
        })
    }

    fn release(&mut self) -> Result<(), DisplayError> {
        self.state(|s| {
            s.acquired = false;
            s.release_count += 1;
        });
        Ok(())
    }

    fn set_buffer_size(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.state(|s| {
            if s.fail_buffer_size {
                return Err(injected("buffer size"));
            }
            s.buffer_sizes.push((width, height));
            Ok(())
        })
    }

    fn set_font(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.state(|s| {
            if s.fail_font {
                return Err(injected("font"));
            }
            s.fonts.push((width, height));
            Ok(())
        })
    }

    fn max_size(&self, _font_width: u16, _font_height: u16) -> (u16, u16) {
        self.state(|s| s.max_size)
    }

    fn set_window_rect(&mut self, rect: Rect) -> io::Result<()> {
        self.state(|s| {
            s.window = rect;
            s.window_sets.push(rect);
        });
        Ok(())
    }

    fn window_rect(&self) -> io::Result<Rect> {
        Ok(self.state(|s| s.window))
    }

    fn blit(&mut self, cells: &[CharCell], dest: Rect) -> io::Result<()> {
        debug_assert_eq!(cells.len(), dest.area() as usize);
        self.state(|s| {
            s.blits.push(BlitRecord { cells: cells.to_vec(), dest });
        });
        Ok(())
    }

    fn write_stream(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.state(|s| s.stream.extend_from_slice(bytes));
        Ok(())
    }

    fn color_table(&self) -> io::Result<[Rgb; 16]> {
        self.state(|s| {
            if s.fail_color_read {
                return Err(injected("color read"));
            }
            Ok(s.color_table)
        })
    }

    fn set_color_table(&mut self, table: &[Rgb; 16]) -> io::Result<()> {
        self.state(|s| {
            if s.fail_color_write {
                return Err(injected("color write"));
            }
            s.color_table = *table;
            s.color_write_count += 1;
            Ok(())
        })
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.state(|s| s.titles.push(title.to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Attr;

    #[test]
    fn test_clones_share_state() {
        let console = HeadlessConsole::new();
        let mut held = console.clone();
        held.acquire(SurfaceOptions::HIDE_CURSOR).unwrap();
        assert!(console.is_acquired());
        assert_eq!(console.options(), SurfaceOptions::HIDE_CURSOR);
    }

    #[test]
    fn test_double_acquire_rejected() {
        let mut console = HeadlessConsole::new();
        console.acquire(SurfaceOptions::empty()).unwrap();
        assert!(console.acquire(SurfaceOptions::empty()).is_err());
    }

    #[test]
    fn test_blit_records_dest_relative_cells() {
        let mut console = HeadlessConsole::new();
        let attr = Attr::from_indices(7, 0);
        let cells = vec![
            CharCell::new('a', attr),
            CharCell::new('b', attr),
            CharCell::new('c', attr),
            CharCell::new('d', attr),
        ];
        console.blit(&cells, Rect::new(3, 5, 2, 2)).unwrap();

        let blit = console.last_blit().unwrap();
        assert_eq!(blit.cell(0, 0).unwrap().glyph, 'a');
        assert_eq!(blit.cell(1, 1).unwrap().glyph, 'd');
        assert_eq!(blit.cell(2, 0), None);
    }

    #[test]
    fn test_take_stream_drains() {
        let mut console = HeadlessConsole::new();
        console.write_stream(b"\x1b[2J").unwrap();
        assert_eq!(console.take_stream(), b"\x1b[2J");
        assert!(console.stream().is_empty());
    }

    #[test]
    fn test_color_failure_injection() {
        let mut console = HeadlessConsole::new();
        console.set_fail_color_read(true);
        assert!(console.color_table().is_err());

        console.set_fail_color_write(true);
        let table = console.colors();
        assert!(console.set_color_table(&table).is_err());
        assert_eq!(console.color_write_count(), 0);
    }

    #[test]
    fn test_resize_to_changes_window_rect() {
        let mut console = HeadlessConsole::new();
        console.set_window_rect(Rect::new(0, 0, 80, 25)).unwrap();
        console.resize_to(100, 30);
        assert_eq!(console.window_rect().unwrap(), Rect::new(0, 0, 100, 30));
    }
}
