//! Window geometry: size plus inclusive cell edges.

use crate::screen::Rect;

/// The placement of a display window, in character cells.
///
/// Edges are zero-based and inclusive, the way console window rectangles
/// report them: `right - left + 1 == width` and `bottom - top + 1 ==
/// height` after a successful configure.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Geometry {
    /// Window width in cells.
    pub width: u16,
    /// Window height in cells.
    pub height: u16,
    /// Leftmost cell column.
    pub left: u16,
    /// Topmost cell row.
    pub top: u16,
    /// Rightmost cell column, inclusive.
    pub right: u16,
    /// Bottommost cell row, inclusive.
    pub bottom: u16,
}

impl Geometry {
    /// Geometry for a `width` x `height` window at the origin.
    #[must_use]
    pub const fn of_size(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            left: 0,
            top: 0,
            right: width.saturating_sub(1),
            bottom: height.saturating_sub(1),
        }
    }

    /// Geometry for a device window rectangle.
    #[must_use]
    pub const fn from_rect(rect: Rect) -> Self {
        Self {
            width: rect.width,
            height: rect.height,
            left: rect.x,
            top: rect.y,
            right: rect.x + rect.width.saturating_sub(1),
            bottom: rect.y + rect.height.saturating_sub(1),
        }
    }

    /// The window as an exclusive rectangle.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// The size as a `(width, height)` pair.
    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}
