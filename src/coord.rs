//! Screen-cell coordinate types.
//!
//! Geometry in this crate is always measured in screen cells, non-negative
//! and small enough to fit a terminal, so we use `u16` throughout — the same
//! choice a terminal-cell based editor makes for its own coordinate system.

use geo::{Point, Rect};

/// Position in screen cells.
pub type U16Pos = Point<u16>;

/// Rectangle in screen cells.
pub type U16Rect = Rect<u16>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Width/height pair in screen cells.
pub struct U16Size {
  width: u16,
  height: u16,
}

impl U16Size {
  /// Make a size from width(columns) and height(rows).
  pub fn new(width: u16, height: u16) -> Self {
    U16Size { width, height }
  }

  /// Get width(columns).
  pub fn width(&self) -> u16 {
    self.width
  }

  /// Get height(rows).
  pub fn height(&self) -> u16 {
    self.height
  }
}

impl From<U16Rect> for U16Size {
  fn from(rect: U16Rect) -> U16Size {
    U16Size::new(rect.width() as u16, rect.height() as u16)
  }
}

/// Build a [`U16Rect`] from `(left, top, width, height)`.
pub fn rect_from_lwth(left: u16, top: u16, width: u16, height: u16) -> U16Rect {
  Rect::new(
    (left, top),
    (left.saturating_add(width), top.saturating_add(height)),
  )
}
