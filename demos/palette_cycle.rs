//! Palette cycle: Recolors a static frame by rewriting the palette.
//!
//! The frame is composed and presented exactly once. Everything that moves
//! afterwards is palette animation: the cell data on the device never
//! changes, only what the 15 non-background indices mean.
//!
//! Press 'q' or Escape to quit.

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use rasterm::{Display, DisplayConfig, DisplayError, IndexedPixel, PaletteEntry, Rgb};
use std::time::Duration;

fn main() -> Result<(), DisplayError> {
    println!("Rasterm Palette Cycle");
    println!("=====================");
    println!("Press 'q' or Escape to quit.");
    std::thread::sleep(Duration::from_secs(1));

    let mut display = Display::native(DisplayConfig::new(80, 25))?;
    display.set_title("rasterm palette cycle")?;

    draw_rings(&mut display);
    display.present()?;

    let mut phase = 0u8;
    loop {
        if event::poll(Duration::from_millis(40)).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    _ => {}
                }
            }
        }

        if display.check_resize()?.is_some() {
            draw_rings(&mut display);
            display.present()?;
        }

        // Rotate indices 1..=15 around the color wheel; 0 stays black.
        let entries: Vec<PaletteEntry> = (1..16u8)
            .map(|index| PaletteEntry::new(index, wheel(phase.wrapping_add(index * 17))))
            .collect();
        display.set_colors(&entries)?;
        phase = phase.wrapping_add(4);
    }

    display.destroy()
}

/// Fill the frame with concentric rectangles, one palette index per ring.
fn draw_rings(display: &mut Display<IndexedPixel>) {
    let width = display.width();
    let height = display.height();
    display.clear(IndexedPixel::new(' '));

    for y in 0..height {
        for x in 0..width {
            // Chebyshev distance from the frame edge, squashed 2:1 so the
            // rings look round-ish in character cells.
            let dx = x.min(width - 1 - x);
            let dy = y.min(height - 1 - y) * 2;
            let ring = (dx.min(dy) % 15) as u8 + 1;
            display
                .buffer_mut()
                .set(x, y, IndexedPixel::new(' ').with_bg(ring));
        }
    }

    display.buffer_mut().put_str(
        2,
        0,
        "palette animation, zero re-renders",
        IndexedPixel::new(' ').with_fg(15).with_bg(1),
    );
}

/// Map a 0..=255 position to a color on a red-green-blue wheel.
fn wheel(pos: u8) -> Rgb {
    match pos {
        0..=84 => Rgb::new(255 - pos * 3, pos * 3, 0),
        85..=169 => {
            let pos = pos - 85;
            Rgb::new(0, 255 - pos * 3, pos * 3)
        }
        170..=255 => {
            let pos = pos - 170;
            Rgb::new(pos * 3, 0, 255 - pos * 3)
        }
    }
}
