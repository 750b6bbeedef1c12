//! Color bars: Draws a 16-color test pattern.
//!
//! Runs on the native blit path by default; pass `--escape` to drive the
//! same frame through the VT100 escape backend instead.
//!
//! Press 'q' or Escape to quit. Resizing the window redraws the bars.

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use rasterm::{Display, DisplayConfig, DisplayError, IndexedPixel, TermConsole};
use std::time::Duration;

fn main() -> Result<(), DisplayError> {
    let use_escape = std::env::args().any(|a| a == "--escape");

    println!("Rasterm Color Bars");
    println!("==================");
    println!(
        "Backend: {}",
        if use_escape { "escape stream" } else { "native blit" }
    );
    println!("Press 'q' or Escape to quit.");
    std::thread::sleep(Duration::from_secs(1));

    let config = DisplayConfig::new(80, 25);
    let mut display = if use_escape {
        Display::<IndexedPixel>::escape_with(TermConsole::new(), config)?
    } else {
        Display::native(config)?
    };
    display.set_title("rasterm color bars")?;

    draw_bars(&mut display);
    display.present()?;

    loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    _ => {}
                }
            }
        }

        // Redraw at the new size when the window changes.
        if display.check_resize()?.is_some() {
            draw_bars(&mut display);
            display.present()?;
        }
    }

    display.destroy()
}

/// Fill the frame with one vertical bar per palette index.
fn draw_bars(display: &mut Display<IndexedPixel>) {
    let width = display.width();
    let height = display.height();
    display.clear(IndexedPixel::new(' '));

    let bar_width = (width / 16).max(1);
    for index in 0..16u8 {
        let x0 = u16::from(index) * bar_width;
        if x0 >= width {
            break;
        }
        let bar = IndexedPixel::new(' ').with_bg(index);
        for y in 1..height.saturating_sub(1) {
            for x in x0..(x0 + bar_width).min(width) {
                display.buffer_mut().set(x, y, bar);
            }
        }
        // Contrasting label on top of each bar.
        let label_fg = if index < 7 { 15 } else { 0 };
        let label = format!("{index:2}");
        display.buffer_mut().put_str(
            x0,
            height / 2,
            &label,
            IndexedPixel::new(' ').with_fg(label_fg).with_bg(index),
        );
    }

    let title = IndexedPixel::new(' ').with_fg(15).with_bg(0);
    display
        .buffer_mut()
        .put_str(2, 0, "rasterm 16-color test pattern", title);
    display.buffer_mut().put_str(
        2,
        height.saturating_sub(1),
        "q to quit",
        IndexedPixel::new(' ').with_fg(8).with_bg(0),
    );
}
