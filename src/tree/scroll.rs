//! Scroll & recenter, built on the [`crate::motion`] collaborator rather
//! than any text-layout logic of its own.

use super::{NodeId, Tree};
use crate::error::{WindowErr, WindowResult};
use crate::motion::MotionOracle;

impl Tree {
  /// `scroll(w, n)`: recenter first if `point` has scrolled out of view,
  /// then move `start` by `n` screen lines, signalling a buffer-boundary
  /// error instead of scrolling past it.
  pub fn scroll(&mut self, w: NodeId, n: isize, motion: &dyn MotionOracle) -> WindowResult<()> {
    let buf = self.buffer_of(w)?.ok_or(WindowErr::DeletedWindow(w))?;
    let width = self.width(w)?;
    let point = self.point_of(w)?;

    if !self.position_visible_p(point, w)? {
      let half = (self.height(w)? / 2) as isize;
      let recentered = motion.vertical_motion(&buf, point, -half, width);
      self.set_start(w, recentered.position, true)?;
    }

    let start = self.start_of(w)?;
    let moved = motion.vertical_motion(&buf, start, n, width);

    if n < 0 && moved.hit_bob && moved.position == crate::buffer::begv(&buf) {
      return Err(WindowErr::BeginningOfBuffer);
    }
    if n > 0 && moved.position >= crate::buffer::zv(&buf) {
      return Err(WindowErr::EndOfBuffer);
    }

    self.set_start(w, moved.position, false)?;
    self.leaf_mut(w)?.start_at_line_beg = moved.start_at_line_beg;

    if point < moved.position {
      let down = motion.vertical_motion(&buf, moved.position, 1, width);
      self.set_point(w, down.position)?;
    }
    Ok(())
  }

  pub fn scroll_up(&mut self, w: NodeId, n: Option<isize>, motion: &dyn MotionOracle) -> WindowResult<()> {
    let height = self.height(w)? as isize;
    self.scroll(w, n.unwrap_or(height), motion)
  }

  pub fn scroll_down(&mut self, w: NodeId, n: Option<isize>, motion: &dyn MotionOracle) -> WindowResult<()> {
    let height = self.height(w)? as isize;
    self.scroll(w, -n.unwrap_or(height), motion)
  }

  pub fn scroll_other_window(&mut self, n: Option<isize>, motion: &dyn MotionOracle) -> WindowResult<()> {
    let other = self.next_window(
      self.selected_window(),
      crate::tree::traverse::MiniBufferPolicy::Never,
      false,
    )?;
    self.scroll_up(other, n, motion)
  }

  pub fn scroll_left(&mut self, w: NodeId, n: Option<u16>) -> WindowResult<()> {
    let width = self.width(w)?;
    let delta = n.unwrap_or(width.saturating_sub(2));
    let current = self.hscroll(w)?;
    self.set_hscroll(w, current.saturating_add(delta))
  }

  pub fn scroll_right(&mut self, w: NodeId, n: Option<u16>) -> WindowResult<()> {
    let width = self.width(w)?;
    let delta = n.unwrap_or(width.saturating_sub(2));
    let current = self.hscroll(w)?;
    self.set_hscroll(w, current.saturating_sub(delta))
  }

  /// `recenter(n)`: put `point`'s screen line at row `n` (default
  /// `height/2`; negative counts from the bottom) by moving `start`.
  pub fn recenter(&mut self, w: NodeId, n: Option<isize>, motion: &dyn MotionOracle) -> WindowResult<()> {
    let buf = self.buffer_of(w)?.ok_or(WindowErr::DeletedWindow(w))?;
    let width = self.width(w)?;
    let height = self.height(w)? as isize;
    let row = n.unwrap_or(height / 2);
    let row = if row < 0 { height + row } else { row };

    let point = self.point_of(w)?;
    let moved = motion.vertical_motion(&buf, point, -row, width);
    self.set_start(w, moved.position, true)?;
    self.leaf_mut(w)?.force_start = true;
    Ok(())
  }

  /// `move_to_window_line(n)`: move `point` to the buffer line at screen
  /// row `n` (default `height/2`; negative counts from the bottom) of
  /// `w`'s current viewport.
  pub fn move_to_window_line(&mut self, w: NodeId, n: Option<isize>, motion: &dyn MotionOracle) -> WindowResult<()> {
    let buf = self.buffer_of(w)?.ok_or(WindowErr::DeletedWindow(w))?;
    let width = self.width(w)?;
    let height = self.height(w)? as isize;
    let row = n.unwrap_or(height / 2);
    let row = if row < 0 { height + row } else { row };

    let start = self.start_of(w)?;
    let moved = motion.vertical_motion(&buf, start, row, width);
    self.set_point(w, moved.position)
  }
}
