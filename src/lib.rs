//! # Rasterm
//!
//! A raster-style terminal display engine for cell-addressed graphics.
//!
//! Rasterm drives a fixed-size grid of colored character cells the way a
//! game drives a framebuffer: compose off-screen, then present the whole
//! frame (or a dirty rectangle) in one device write.
//!
//! ## Core Concepts
//!
//! - **Composed screen buffer**: draw into an off-screen cell grid, present later
//! - **Dual backends**: native surface blits or a minimal VT100 escape stream
//! - **Palette control**: retarget the 16-color indexed palette mid-session
//! - **Shutdown handshake**: interrupt-safe stop flag with blocking acknowledge
//!
//! ## Example
//!
//! ```rust
//! use rasterm::{Display, DisplayConfig, HeadlessConsole, IndexedPixel};
//!
//! // Open a session against an in-memory device
//! let mut display = Display::native_with(HeadlessConsole::new(), DisplayConfig::new(80, 25))?;
//!
//! display.clear(IndexedPixel::new(' '));
//! display.buffer_mut().put_str(2, 1, "ready", IndexedPixel::new(' ').with_fg(10));
//! display.present()?;
//! display.destroy()?;
//! # Ok::<(), rasterm::DisplayError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod screen;
pub mod console;
pub mod backend;
pub mod display;
pub mod error;
pub mod ffi;

// Re-exports for convenience
pub use screen::{IndexedPixel, PaletteEntry, Pixel, Rect, Rgb, RgbPixel, ScreenBuffer};
pub use console::{Attr, CharCell, Console, HeadlessConsole, SurfaceOptions, TermConsole};
pub use backend::{Backend, EscapeBackend, NativeBackend};
pub use display::{Display, DisplayConfig, FontMetrics, Geometry, ShutdownCoordinator};
pub use error::DisplayError;
