//! Split and delete: creating a new sibling leaf, and tearing one down
//! again — unshowing its buffer, donating its space to a sibling, and
//! collapsing a parent left with only one child.

use super::resize::Axis;
use super::traverse::{MiniBufferPolicy, Scope};
use super::{NodeId, Tree};
use crate::buffer::{BufferDirectory, BufferId};
use crate::error::{WindowErr, WindowResult};

impl Tree {
  /// Split `target` (must be an ordinary leaf) into two leaves viewing the
  /// same buffer. `size` is the first leaf's new extent along the split
  /// axis; defaults to half, rounded up, so the first half gets the
  /// separator column. Returns the newly created leaf.
  pub fn split(&mut self, target: NodeId, size: Option<u16>, horizontal: bool) -> WindowResult<NodeId> {
    if !self.node(target)?.is_leaf() {
      return Err(WindowErr::ArgumentTypeMismatch { node: target, expected: "leaf" });
    }
    if self.is_minibuffer(target)? {
      return Err(WindowErr::AttemptOnMinibuffer);
    }
    let screen_id = self.node(target)?.header.screen_id;
    if self.screen(screen_id)?.no_split {
      return Err(WindowErr::UnsplittableScreen);
    }

    let axis = if horizontal { Axis::Width } else { Axis::Height };
    let total = self.axis_size(target, axis)?;
    let min = self.axis_min(axis);
    let size = size.unwrap_or_else(|| total.div_ceil(2));
    let remainder = total.saturating_sub(size);
    if size < min || remainder < min {
      return Err(WindowErr::MinSizeViolation { min });
    }

    let needs_wrap = match self.node(target)?.header.parent {
      None => true,
      Some(p) => !self.matches_axis(p, axis)?,
    };
    let parent = if needs_wrap {
      self.make_dummy_parent(target, horizontal)?
    } else {
      self.node(target)?.header.parent.unwrap()
    };

    let header = self.node(target)?.header.clone();
    let new_leaf = self.alloc_leaf(screen_id);
    {
      let n = self.node_mut(new_leaf)?;
      n.header.left = header.left;
      n.header.top = header.top;
      n.header.width = header.width;
      n.header.height = header.height;
      n.header.parent = Some(parent);
    }

    self.set_axis_size(target, size, axis)?;
    let new_origin = self.axis_origin(target, axis)? + size;
    self.set_axis_origin(new_leaf, new_origin, axis)?;
    self.set_axis_size(new_leaf, remainder, axis)?;

    let old_next = self.node(target)?.header.next;
    self.node_mut(target)?.header.next = Some(new_leaf);
    {
      let n = self.node_mut(new_leaf)?;
      n.header.prev = Some(target);
      n.header.next = old_next;
    }
    if let Some(on) = old_next {
      self.node_mut(on)?.header.prev = Some(new_leaf);
    }

    let buffer = self.leaf(target)?.buffer.clone().and_then(|b| b.upgrade());
    if let Some(buf) = buffer {
      self.bind_buffer_raw(new_leaf, &buf);
    }

    self.context.mark_windows_or_buffers_changed();
    Ok(new_leaf)
  }

  /// Delete `w`, which may be an ordinary leaf or an entire combination
  /// subtree (as `change_size`'s below-minimum branch hands it a
  /// combination whenever `find_resize_target` climbed past a
  /// wrong-orientation ancestor): reselects if the selected window lies
  /// anywhere under `w`, persists and unchains every contained leaf's
  /// markers, donates `w`'s space to a sibling, and collapses its parent
  /// if that leaves it with one child.
  pub fn delete(&mut self, w: NodeId) -> WindowResult<()> {
    if self.is_minibuffer(w)? {
      return Err(WindowErr::AttemptOnMinibuffer);
    }
    let screen_id = self.node(w)?.header.screen_id;
    let leaves = self.subtree_leaves(w)?;
    if self.ordinary_window_count(Scope::Screen(screen_id))? <= leaves.len() {
      return Err(WindowErr::AttemptOnSoleOrdinaryWindow);
    }

    if leaves.contains(&self.screen(screen_id)?.selected_window) {
      // Climb from `w` itself, not from the selected leaf: if `w` is a
      // combination with several leaves, climbing from the selected leaf
      // could land on another leaf inside the very subtree being deleted.
      let next = self.next_window(w, MiniBufferPolicy::Never, false)?;
      self.select(next)?;
    }

    for leaf in &leaves {
      self.unshow_buffer(*leaf)?;
    }

    let header = self.node(w)?.header.clone();
    self.unlink(w)?;
    self.remove_subtree_nodes(w)?;

    if let Some(par) = header.parent {
      let (donor, takes_origin) = match header.prev {
        Some(p) => (p, false),
        None => (header.next.expect("combination always has >=2 children (invariant 7)"), true),
      };
      if takes_origin {
        self.node_mut(donor)?.header.left = header.left;
        self.node_mut(donor)?.header.top = header.top;
      }
      let axis = if self.node(par)?.is_hcombination() { Axis::Width } else { Axis::Height };
      let donor_old = self.axis_size(donor, axis)?;
      let w_size = match axis {
        Axis::Height => header.height,
        Axis::Width => header.width,
      };
      self.set_size(donor, donor_old + w_size, true, axis)?;

      if let Some(fc) = self.node(par)?.first_child() {
        if self.node(fc)?.header.next.is_none() {
          self.replace_node(par, fc)?;
          self.nodes.remove(&par);
        }
      }
    }

    self.context.mark_windows_or_buffers_changed();
    Ok(())
  }

  /// Every leaf reachable under `id` (including `id` itself if it's
  /// already a leaf), in no particular order — just the set `delete` needs
  /// to unshow before tearing the subtree down.
  fn subtree_leaves(&self, id: NodeId) -> WindowResult<Vec<NodeId>> {
    let mut out = Vec::new();
    self.collect_subtree_leaves(id, &mut out)?;
    Ok(out)
  }

  fn collect_subtree_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) -> WindowResult<()> {
    match self.node(id)?.first_child() {
      None => {
        out.push(id);
        Ok(())
      }
      Some(fc) => {
        let mut cur = fc;
        loop {
          self.collect_subtree_leaves(cur, out)?;
          match self.node(cur)?.header.next {
            Some(n) => cur = n,
            None => break,
          }
        }
        Ok(())
      }
    }
  }

  /// Remove `id` and every node under it from the arena. Callers must have
  /// already unshown and unchained any contained leaves' markers (see
  /// [`Tree::subtree_leaves`]) — this only drops the node records.
  fn remove_subtree_nodes(&mut self, id: NodeId) -> WindowResult<()> {
    let mut children = Vec::new();
    if let Some(fc) = self.node(id)?.first_child() {
      let mut cur = fc;
      loop {
        children.push(cur);
        match self.node(cur)?.header.next {
          Some(n) => cur = n,
          None => break,
        }
      }
    }
    for child in children {
      self.remove_subtree_nodes(child)?;
    }
    self.nodes.remove(&id);
    Ok(())
  }

  /// Persist `w`'s viewport/point into its buffer and unchain its markers,
  /// leaving the leaf's `buffer` field empty. Shared by [`Tree::delete`]
  /// and [`Tree::set_buffer`] (which unshows the old buffer before
  /// rebinding).
  pub(crate) fn unshow_buffer(&mut self, w: NodeId) -> WindowResult<()> {
    let buf = self.leaf(w)?.buffer.clone().and_then(|b| b.upgrade());
    if let Some(buf) = &buf {
      if let Some(pos) = self.leaf(w)?.start.as_ref().and_then(|m| m.position()) {
        buf.borrow_mut().set_last_window_start(pos);
      }
      let buf_id = buf.borrow().id();
      let shown_elsewhere_selected = self.screens.values().any(|s| {
        s.selected_window != w
          && self
            .buffer_of(s.selected_window)
            .ok()
            .flatten()
            .map(|b| b.borrow().id())
            == Some(buf_id)
      });
      if !shown_elsewhere_selected {
        if let Some(pt) = self.leaf(w)?.pointm.as_ref().and_then(|m| m.position()) {
          crate::buffer::set_point(buf, pt);
        }
      }
    }
    if let Some(start) = self.leaf(w)?.start.clone() {
      crate::buffer::unchain_marker(&start);
    }
    if let Some(pm) = self.leaf(w)?.pointm.clone() {
      crate::buffer::unchain_marker(&pm);
    }
    self.leaf_mut(w)?.buffer = None;
    Ok(())
  }

  /// `delete_other_windows(keep)`: delete every ordinary window on
  /// `keep`'s screen except `keep` itself.
  pub fn delete_other_windows(&mut self, keep: NodeId) -> WindowResult<()> {
    let screen_id = self.node(keep)?.header.screen_id;
    loop {
      let list = self.window_list(Scope::Screen(screen_id), MiniBufferPolicy::Never)?;
      match list.into_iter().find(|&id| id != keep) {
        Some(id) => self.delete(id)?,
        None => break,
      }
    }
    Ok(())
  }

  /// `delete_windows_on(buf)`: delete every window showing `buf` across
  /// all screens; where that would leave a screen with no ordinary
  /// window, rebind the last one to a fallback buffer instead.
  pub fn delete_windows_on(&mut self, buf_id: BufferId, directory: &BufferDirectory) -> WindowResult<()> {
    loop {
      let list = self.window_list(Scope::AllScreens, MiniBufferPolicy::Never)?;
      let victim = list.into_iter().find(|&id| self.shows_buffer(id, buf_id));
      match victim {
        None => break,
        Some(id) => match self.delete(id) {
          Ok(()) => {}
          Err(WindowErr::AttemptOnSoleOrdinaryWindow) => {
            self.replace_buffer_in_window(id, buf_id, directory)?;
          }
          Err(e) => return Err(e),
        },
      }
    }
    Ok(())
  }

  /// `replace_buffer_in_windows(buf)`: rebind every window showing `buf`
  /// to a fallback buffer, without deleting any window.
  pub fn replace_buffer_in_windows(&mut self, buf_id: BufferId, directory: &BufferDirectory) -> WindowResult<()> {
    let list = self.window_list(Scope::AllScreens, MiniBufferPolicy::IncludeAlways)?;
    for id in list {
      if self.shows_buffer(id, buf_id) {
        self.replace_buffer_in_window(id, buf_id, directory)?;
      }
    }
    Ok(())
  }

  fn shows_buffer(&self, w: NodeId, buf_id: BufferId) -> bool {
    self.buffer_of(w).ok().flatten().map(|b| b.borrow().id()) == Some(buf_id)
  }

  fn replace_buffer_in_window(&mut self, id: NodeId, buf_id: BufferId, directory: &BufferDirectory) -> WindowResult<()> {
    if let Some(fallback) = directory.fallback_buffer(buf_id) {
      self.set_buffer(id, &fallback)?;
    }
    Ok(())
  }
}
