//! Buffer binding: attaching a buffer to a window, making a window
//! selected, and the marker plumbing that keeps `start`/`pointm`
//! meaningful across both.

use super::{NodeId, Tree};
use crate::buffer::BufferRc;
use crate::error::{WindowErr, WindowResult};

impl Tree {
  /// `set_buffer(w, buf)`: unshow whatever `w` currently displays, then
  /// bind `buf` with fresh `start`/`pointm` markers. Rejects rebinding a
  /// dedicated window to a different buffer.
  pub fn set_buffer(&mut self, w: NodeId, buf: &BufferRc) -> WindowResult<()> {
    if self.is_dedicated(w)? {
      if let Some(current) = self.buffer_of(w)? {
        if current.borrow().id() != buf.borrow().id() {
          return Err(WindowErr::DedicatedViolation(w, buf.borrow().id()));
        }
      }
    }

    if self.leaf(w)?.buffer.is_some() {
      self.unshow_buffer(w)?;
    }

    let last_start = buf.borrow().last_window_start();
    let point = crate::buffer::point(buf);
    let start = crate::buffer::create_marker(buf, last_start);
    let pointm = crate::buffer::create_marker(buf, point);

    let leaf = self.leaf_mut(w)?;
    leaf.buffer = Some(std::rc::Rc::downgrade(buf));
    leaf.last_buffer_id = Some(buf.borrow().id());
    leaf.start = Some(start);
    leaf.pointm = Some(pointm);
    leaf.start_at_line_beg = true;
    leaf.hints.last_modified = 0;

    self.context.mark_windows_or_buffers_changed();
    Ok(())
  }

  pub fn set_buffer_dedicated(&mut self, w: NodeId, dedicated: bool) -> WindowResult<()> {
    self.leaf_mut(w)?.dedicated = dedicated;
    Ok(())
  }

  /// `select(w)`: persist the previously selected leaf's `pointm`, make
  /// `w` the screen's (and tree's) selected window, bump `use_time`, and
  /// clip its buffer's point into the visible range.
  pub fn select(&mut self, w: NodeId) -> WindowResult<()> {
    if !self.node(w)?.is_leaf() {
      return Err(WindowErr::ArgumentTypeMismatch { node: w, expected: "leaf" });
    }
    let screen_id = self.node(w)?.header.screen_id;
    let prev_selected = self.screen(screen_id)?.selected_window;

    if prev_selected != w {
      if let Some(buf) = self.buffer_of(prev_selected)? {
        let pt = crate::buffer::point(&buf);
        if let Some(pm) = self.leaf(prev_selected)?.pointm.clone() {
          crate::buffer::set_marker(&pm, pt);
        }
      }
    }

    self.screen_mut(screen_id)?.selected_window = w;
    self.selected_screen = screen_id;
    let use_time = self.context.bump_use_time();
    self.node_mut(w)?.header.use_time = use_time;

    if let Some(buf) = self.buffer_of(w)? {
      let pt = self
        .leaf(w)?
        .pointm
        .as_ref()
        .and_then(|m| m.position())
        .unwrap_or_else(|| crate::buffer::point(&buf));
      let (begv, zv) = (crate::buffer::begv(&buf), crate::buffer::zv(&buf));
      crate::buffer::set_point(&buf, pt.clamp(begv, zv));
    }

    self.context.mark_windows_or_buffers_changed();
    Ok(())
  }

  /// `set_point(w, pos)`: move `w`'s cursor, clipped to `[begv, zv]`. Moves
  /// the buffer's real point if `w` is selected, else just `w`'s `pointm`.
  pub fn set_point(&mut self, w: NodeId, pos: usize) -> WindowResult<()> {
    let buf = self.buffer_of(w)?.ok_or(WindowErr::DeletedWindow(w))?;
    let (begv, zv) = (crate::buffer::begv(&buf), crate::buffer::zv(&buf));
    let clamped = pos.clamp(begv, zv);
    let screen_id = self.node(w)?.header.screen_id;
    if self.screen(screen_id)?.selected_window == w {
      crate::buffer::set_point(&buf, clamped);
    } else if let Some(pm) = self.leaf(w)?.pointm.clone() {
      crate::buffer::set_marker(&pm, clamped);
    }
    Ok(())
  }
}
