//! Palette entries and the default color tables.
//!
//! Indexed pixels resolve through one of two palettes depending on backend:
//! the native backend's 16-entry color table (read-modify-written as a
//! whole), or the terminal emulator's 256-entry palette (programmed with
//! OSC 4 escapes). The defaults here are the xterm defaults, so an untouched
//! palette renders the colors users already expect from their terminal.

use super::cell::Rgb;

/// One palette assignment: which index, and what color it becomes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PaletteEntry {
    /// Palette index (0-255; the native table only accepts 0-15).
    pub index: u8,
    /// The color to assign.
    pub color: Rgb,
}

impl PaletteEntry {
    /// Create a palette entry.
    #[inline]
    pub const fn new(index: u8, color: Rgb) -> Self {
        Self { index, color }
    }
}

/// The 16 xterm base colors (standard 0-7, bright 8-15).
const XTERM_BASE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // 0: black
    Rgb::new(205, 0, 0),     // 1: red
    Rgb::new(0, 205, 0),     // 2: green
    Rgb::new(205, 205, 0),   // 3: yellow
    Rgb::new(0, 0, 238),     // 4: blue
    Rgb::new(205, 0, 205),   // 5: magenta
    Rgb::new(0, 205, 205),   // 6: cyan
    Rgb::new(229, 229, 229), // 7: white
    Rgb::new(127, 127, 127), // 8: bright black (gray)
    Rgb::new(255, 0, 0),     // 9: bright red
    Rgb::new(0, 255, 0),     // 10: bright green
    Rgb::new(255, 255, 0),   // 11: bright yellow
    Rgb::new(92, 92, 255),   // 12: bright blue
    Rgb::new(255, 0, 255),   // 13: bright magenta
    Rgb::new(0, 255, 255),   // 14: bright cyan
    Rgb::new(255, 255, 255), // 15: bright white
];

/// The xterm default color for a palette index.
///
/// Indices 16-231 form the 6×6×6 color cube, 232-255 the grayscale ramp.
#[must_use]
pub const fn xterm_color(index: u8) -> Rgb {
    match index {
        0..=15 => XTERM_BASE[index as usize],
        16..=231 => {
            let idx = index - 16;
            let r = idx / 36;
            let g = (idx % 36) / 6;
            let b = idx % 6;
            Rgb::new(
                if r == 0 { 0 } else { 55 + 40 * r },
                if g == 0 { 0 } else { 55 + 40 * g },
                if b == 0 { 0 } else { 55 + 40 * b },
            )
        }
        232..=255 => {
            let gray = 8 + 10 * (index - 232);
            Rgb::new(gray, gray, gray)
        }
    }
}

/// The default 16-entry native color table (xterm base colors).
///
/// Console devices start from this table; `SetScreenColors` overwrites
/// entries in place.
#[must_use]
pub const fn default_color_table() -> [Rgb; 16] {
    XTERM_BASE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_colors() {
        assert_eq!(xterm_color(0), Rgb::new(0, 0, 0));
        assert_eq!(xterm_color(3), Rgb::new(205, 205, 0));
        assert_eq!(xterm_color(7), Rgb::new(229, 229, 229));
        assert_eq!(xterm_color(9), Rgb::new(255, 0, 0));
        assert_eq!(xterm_color(15), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_color_cube_corners() {
        // Cube origin is pure black, axis maxima are pure channels.
        assert_eq!(xterm_color(16), Rgb::new(0, 0, 0));
        assert_eq!(xterm_color(21), Rgb::new(0, 0, 255));
        assert_eq!(xterm_color(196), Rgb::new(255, 0, 0));
        assert_eq!(xterm_color(231), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_cube_component_steps() {
        // Second step of each axis is 95 (0, then 55 + 40·n).
        assert_eq!(xterm_color(17), Rgb::new(0, 0, 95));
        assert_eq!(xterm_color(22), Rgb::new(0, 95, 0));
        assert_eq!(xterm_color(52), Rgb::new(95, 0, 0));
    }

    #[test]
    fn test_grayscale_ramp() {
        assert_eq!(xterm_color(232), Rgb::new(8, 8, 8));
        assert_eq!(xterm_color(243), Rgb::new(118, 118, 118));
        assert_eq!(xterm_color(255), Rgb::new(238, 238, 238));
    }

    #[test]
    fn test_default_table_matches_base() {
        let table = default_color_table();
        for (i, color) in table.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let index = i as u8;
            assert_eq!(*color, xterm_color(index));
        }
    }
}
