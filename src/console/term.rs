//! The real console device, driving a VT100-class terminal over stdout.

use std::io::{self, Stdout, Write};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Color, Colors, Print, ResetColor, SetColors};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetSize, SetTitle};
use crossterm::tty::IsTty;
use crossterm::{cursor, execute, queue};

use crate::error::DisplayError;
use crate::screen::{EMPTY_GLYPH, Rect, Rgb, default_color_table};

use super::{CharCell, Console, SurfaceOptions};

/// Largest window reported when the terminal will not say how big it can get.
const UNBOUNDED_MAX: (u16, u16) = (4096, 4096);

/// A [`Console`] backed by the process terminal.
///
/// Blits are translated into cursor moves and indexed SGR colors, queued
/// into a pre-allocated buffer and flushed in a single `write()` syscall to
/// prevent flickering. The 16-entry color table is shadowed locally (VT100
/// streams cannot be read back) and programmed into the emulator with
/// OSC 4, so a table write recolors cells already on screen.
pub struct TermConsole {
    stdout: Stdout,
    scratch: Vec<u8>,
    color_table: [Rgb; 16],
    options: SurfaceOptions,
    size: Option<(u16, u16)>,
    acquired: bool,
}

impl Default for TermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl TermConsole {
    /// Create a device over the process stdout.
    ///
    /// Nothing touches the terminal until [`Console::acquire`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            scratch: Vec::with_capacity(65536),
            color_table: default_color_table(),
            options: SurfaceOptions::empty(),
            size: None,
            acquired: false,
        }
    }

    fn flush_scratch(&mut self) -> io::Result<()> {
        self.stdout.write_all(&self.scratch)?;
        self.stdout.flush()?;
        self.scratch.clear();
        Ok(())
    }
}

impl Console for TermConsole {
    fn acquire(&mut self, options: SurfaceOptions) -> Result<(), DisplayError> {
        if !self.stdout.is_tty() {
            return Err(DisplayError::InvalidHandle {
                reason: "stdout is not a terminal".into(),
            });
        }

        terminal::enable_raw_mode()?;
        if options.contains(SurfaceOptions::ALTERNATE_SCREEN) {
            execute!(self.stdout, EnterAlternateScreen)?;
        }
        if options.contains(SurfaceOptions::MOUSE_CAPTURE) {
            execute!(self.stdout, EnableMouseCapture)?;
        }
        if options.contains(SurfaceOptions::HIDE_CURSOR) {
            execute!(self.stdout, cursor::Hide)?;
        }
        // WINDOW_EVENTS needs no setup: resize notifications arrive on the
        // crossterm event stream whenever the caller polls it.

        self.options = options;
        self.acquired = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), DisplayError> {
        if !self.acquired {
            return Ok(());
        }
        self.acquired = false;

        // Undo everything acquire changed, in reverse, and keep going past
        // failures so a broken pipe cannot leave raw mode enabled.
        let mut first_err: Option<io::Error> = None;
        let mut note = |res: io::Result<()>| {
            if let Err(e) = res {
                first_err.get_or_insert(e);
            }
        };

        note(execute!(self.stdout, ResetColor));
        if self.options.contains(SurfaceOptions::HIDE_CURSOR) {
            note(execute!(self.stdout, cursor::Show));
        }
        if self.options.contains(SurfaceOptions::MOUSE_CAPTURE) {
            note(execute!(self.stdout, DisableMouseCapture));
        }
        if self.options.contains(SurfaceOptions::ALTERNATE_SCREEN) {
            note(execute!(self.stdout, LeaveAlternateScreen));
        }
        note(terminal::disable_raw_mode());

        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn set_buffer_size(&mut self, width: u16, height: u16) -> io::Result<()> {
        // Terminals have no separate scrollback-style buffer to size; the
        // window is the buffer.
        execute!(self.stdout, SetSize(width, height))?;
        self.size = Some((width, height));
        Ok(())
    }

    fn set_font(&mut self, _width: u16, _height: u16) -> io::Result<()> {
        // The emulator owns its font. Accepted so sessions can carry one
        // configuration across device kinds.
        Ok(())
    }

    fn max_size(&self, font_width: u16, font_height: u16) -> (u16, u16) {
        match terminal::window_size() {
            Ok(ws) if ws.width > 0 && ws.height > 0 => (
                ws.width / font_width.max(1),
                ws.height / font_height.max(1),
            ),
            _ => UNBOUNDED_MAX,
        }
    }

    fn set_window_rect(&mut self, rect: Rect) -> io::Result<()> {
        // Position within a larger buffer does not exist here; only the
        // size is realized.
        if self.size != Some((rect.width, rect.height)) {
            execute!(self.stdout, SetSize(rect.width, rect.height))?;
            self.size = Some((rect.width, rect.height));
        }
        Ok(())
    }

    fn window_rect(&self) -> io::Result<Rect> {
        let (cols, rows) = terminal::size()?;
        Ok(Rect::from_size(cols, rows))
    }

    fn blit(&mut self, cells: &[CharCell], dest: Rect) -> io::Result<()> {
        debug_assert_eq!(cells.len(), dest.area() as usize);

        self.scratch.clear();
        for row in 0..dest.height {
            queue!(self.scratch, cursor::MoveTo(dest.x, dest.y + row))?;
            let base = row as usize * dest.width as usize;
            let mut last_attr = None;
            for cell in &cells[base..base + dest.width as usize] {
                if last_attr != Some(cell.attr) {
                    queue!(
                        self.scratch,
                        SetColors(Colors::new(
                            Color::AnsiValue(cell.attr.fg_index()),
                            Color::AnsiValue(cell.attr.bg_index()),
                        ))
                    )?;
                    last_attr = Some(cell.attr);
                }
                let glyph = if cell.glyph == EMPTY_GLYPH { ' ' } else { cell.glyph };
                queue!(self.scratch, Print(glyph))?;
            }
        }
        self.flush_scratch()
    }

    fn write_stream(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stdout.write_all(bytes)?;
        self.stdout.flush()
    }

    fn color_table(&self) -> io::Result<[Rgb; 16]> {
        Ok(self.color_table)
    }

    fn set_color_table(&mut self, table: &[Rgb; 16]) -> io::Result<()> {
        self.scratch.clear();
        for (index, color) in table.iter().enumerate() {
            let _ = write!(
                self.scratch,
                "\x1b]4;{index};rgb:{:02x}/{:02x}/{:02x}\x1b\\",
                color.r, color.g, color.b
            );
        }
        self.flush_scratch()?;
        self.color_table = *table;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        execute!(self.stdout, SetTitle(title))
    }
}

impl Drop for TermConsole {
    fn drop(&mut self) {
        if self.acquired {
            let _ = Console::release(self);
        }
    }
}
