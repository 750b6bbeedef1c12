//! Error types for display sessions, backends, and console devices.
//!
//! Errors fall into three classes, mirroring how callers should react:
//!
//! - **Fatal setup errors** (`InvalidHandle`, `InvalidDimensions`,
//!   `BufferSizeRejected`, `FontRejected`, `TooBig`): initialization failed,
//!   the caller must not proceed to render.
//! - **Degraded palette errors** (`PaletteIndexOutOfRange`, or an `Io` from a
//!   color-table access): the palette call failed, but rendering may continue
//!   with stale colors.
//! - **Query errors** (an `Io` from a geometry read): the caller should treat
//!   the geometry as unknown/unchanged and try again next frame.
//!
//! Platform last-error text rides inside the wrapped [`std::io::Error`]s, so
//! a rejected system call keeps its OS message in the chain.

use std::io;
use thiserror::Error;

/// The error type for all fallible display operations.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// A console I/O call failed; carries the platform's own error text.
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The console device is not usable as a display surface.
    #[error("invalid console handle: {reason}")]
    InvalidHandle {
        /// Why the device was rejected (e.g. output is not a terminal).
        reason: String,
    },

    /// Zero width or height was requested.
    #[error("display dimensions must be nonzero (got {width}x{height})")]
    InvalidDimensions {
        /// Requested width in cells.
        width: u16,
        /// Requested height in cells.
        height: u16,
    },

    /// The platform rejected the requested screen-buffer size.
    #[error("platform rejected screen buffer size {width}x{height}")]
    BufferSizeRejected {
        /// Requested width in cells.
        width: u16,
        /// Requested height in cells.
        height: u16,
        /// The underlying platform error.
        #[source]
        source: io::Error,
    },

    /// The platform rejected the requested font metrics.
    #[error("platform rejected font metrics {width}x{height}")]
    FontRejected {
        /// Requested cell width in pixels.
        width: u16,
        /// Requested cell height in pixels.
        height: u16,
        /// The underlying platform error.
        #[source]
        source: io::Error,
    },

    /// The requested grid does not fit the display with these font metrics.
    #[error(
        "screen {width}x{height} too big: platform maximum is \
         {max_width}x{max_height} for a {font_width}x{font_height} font"
    )]
    TooBig {
        /// Requested width in cells.
        width: u16,
        /// Requested height in cells.
        height: u16,
        /// Maximum columns the platform reports.
        max_width: u16,
        /// Maximum rows the platform reports.
        max_height: u16,
        /// Font cell width used for the query.
        font_width: u16,
        /// Font cell height used for the query.
        font_height: u16,
    },

    /// A palette entry addressed an index outside the native color table.
    #[error("palette index {index} outside the native color table (0-15)")]
    PaletteIndexOutOfRange {
        /// The offending index.
        index: u8,
    },

    /// An operation was attempted on a session that was already destroyed.
    #[error("display session already destroyed")]
    Destroyed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_platform_text() {
        let err: DisplayError =
            io::Error::new(io::ErrorKind::PermissionDenied, "handle is invalid").into();
        assert!(err.to_string().contains("handle is invalid"));
    }

    #[test]
    fn test_too_big_names_the_limit() {
        let err = DisplayError::TooBig {
            width: 10000,
            height: 25,
            max_width: 240,
            max_height: 63,
            font_width: 12,
            font_height: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("too big"));
        assert!(msg.contains("10000x25"));
        assert!(msg.contains("240x63"));
    }

    #[test]
    fn test_rejected_buffer_size_chains_source() {
        use std::error::Error as _;
        let err = DisplayError::BufferSizeRejected {
            width: 80,
            height: 25,
            source: io::Error::new(io::ErrorKind::InvalidInput, "rejected by console"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "platform rejected screen buffer size 80x25");
    }

    #[test]
    fn test_palette_index_message() {
        let err = DisplayError::PaletteIndexOutOfRange { index: 200 };
        assert!(err.to_string().contains("200"));
        assert!(err.to_string().contains("0-15"));
    }
}
