//! The text-motion collaborator.
//!
//! spec.md §1 lists `compute_motion`/`vertical_motion` as external
//! primitives the scroll/recenter component (§4.H) consumes but does not
//! implement — line wrapping, double-width glyphs and tab expansion belong
//! to the redisplay/motion layer of a real editor, not to the window tree.
//! [`MotionOracle`] is that seam; [`LineMotion`] is a reference
//! implementation (no wrapping, one screen line per buffer line) good
//! enough to drive and test the scroll engine in isolation.

use crate::buffer::BufferRc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of moving vertically from a buffer position.
pub struct MotionResult {
  /// The char offset landed on.
  pub position: usize,
  /// How many screen lines were actually traversed; may be fewer than
  /// requested if a buffer boundary was hit first.
  pub lines_moved: isize,
  /// `position` is the beginning of its buffer line.
  pub start_at_line_beg: bool,
  /// The motion was stopped by beginning-of-buffer.
  pub hit_bob: bool,
  /// The motion was stopped by end-of-buffer.
  pub hit_eob: bool,
}

/// The text-motion collaborator's interface.
pub trait MotionOracle {
  /// Move `n` screen lines (positive = forward) from `from`, wrapping text
  /// at `width` columns per screen line.
  fn vertical_motion(
    &self,
    buf: &BufferRc,
    from: usize,
    n: isize,
    width: u16,
  ) -> MotionResult;

  /// Find the position `target_line` screen lines below `from`'s buffer
  /// line (used by [`crate::tree::scroll::recenter`]); `target_line` may be
  /// negative to count from the last visible line.
  fn compute_motion(
    &self,
    buf: &BufferRc,
    from: usize,
    target_line: isize,
    width: u16,
  ) -> MotionResult;
}

#[derive(Debug, Default, Clone, Copy)]
/// Reference [`MotionOracle`]: one buffer line is one screen line,
/// regardless of `width`. Sufficient for testing the scroll engine; a host
/// with real line-wrap display swaps in its own oracle.
pub struct LineMotion;

impl LineMotion {
  fn move_lines(&self, buf: &BufferRc, from: usize, n: isize) -> MotionResult {
    let buf_ref = buf.borrow();
    let text = buf_ref.text();
    let total_lines = text.len_lines();
    let from_line = text.char_to_line(from.min(text.len_chars()));

    let target_line = from_line as isize + n;
    let clamped = target_line.clamp(0, total_lines as isize - 1);
    let moved = clamped - from_line as isize;
    let position = text.line_to_char(clamped as usize);

    MotionResult {
      position,
      lines_moved: moved,
      start_at_line_beg: true,
      hit_bob: clamped == 0 && target_line <= 0,
      hit_eob: clamped as usize == total_lines.saturating_sub(1) && target_line >= clamped,
    }
  }
}

impl MotionOracle for LineMotion {
  fn vertical_motion(
    &self,
    buf: &BufferRc,
    from: usize,
    n: isize,
    _width: u16,
  ) -> MotionResult {
    self.move_lines(buf, from, n)
  }

  fn compute_motion(
    &self,
    buf: &BufferRc,
    from: usize,
    target_line: isize,
    _width: u16,
  ) -> MotionResult {
    let buf_ref = buf.borrow();
    let from_line = buf_ref.text().char_to_line(from.min(buf_ref.text().len_chars()));
    drop(buf_ref);
    let n = if target_line >= 0 {
      target_line - from_line as isize
    } else {
      target_line
    };
    self.move_lines(buf, from, n)
  }
}
