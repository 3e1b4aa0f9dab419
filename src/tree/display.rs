//! Display-buffer policy: choose an existing window, the LRU window, or
//! the largest window to show a buffer in, splitting when the configured
//! threshold allows it.

use super::traverse::{MiniBufferPolicy, Scope};
use super::{NodeId, Tree};
use crate::buffer::{BufferId, BufferRc};
use crate::error::{WindowErr, WindowResult};
use tracing::debug;

impl Tree {
  /// `get_buffer_window(buf, scope)`: any window (including the
  /// minibuffer, which can show a buffer while recursive editing) already
  /// displaying `buf`.
  pub fn get_buffer_window(&self, buf_id: BufferId, scope: Scope) -> WindowResult<Option<NodeId>> {
    let list = self.window_list(scope, MiniBufferPolicy::IncludeAlways)?;
    Ok(list.into_iter().find(|&id| self.shows_buffer(id, buf_id)))
  }

  /// `get_lru_window(scope)`: the non-dedicated, non-minibuffer leaf with
  /// the smallest `use_time`.
  pub fn get_lru_window(&self, scope: Scope) -> WindowResult<Option<NodeId>> {
    let list = self.window_list(scope, MiniBufferPolicy::Never)?;
    Ok(
      list
        .into_iter()
        .filter(|&id| !self.is_dedicated(id).unwrap_or(true))
        .min_by_key(|&id| self.node(id).map(|n| n.header.use_time).unwrap_or(u64::MAX)),
    )
  }

  /// `get_largest_window(scope)`: the non-dedicated, non-minibuffer leaf
  /// with the largest `width * height` area.
  pub fn get_largest_window(&self, scope: Scope) -> WindowResult<Option<NodeId>> {
    let list = self.window_list(scope, MiniBufferPolicy::Never)?;
    Ok(
      list
        .into_iter()
        .filter(|&id| !self.is_dedicated(id).unwrap_or(true))
        .max_by_key(|&id| {
          self
            .node(id)
            .map(|n| n.header.width as u32 * n.header.height as u32)
            .unwrap_or(0)
        }),
    )
  }

  /// `display_buffer(buf, not_this_window)`: reuse the selected window if
  /// it already shows `buf`, else an existing window showing it, else a
  /// fresh screen if `auto_new_screen` is set, else pop up or reuse per
  /// the configured policy. The override-function hook (§4.G step 1) is a
  /// host concern this crate doesn't model on its own — a host that wants
  /// it delegates before falling back to this function.
  pub fn display_buffer(&mut self, buf: &BufferRc, not_this_window: bool) -> WindowResult<NodeId> {
    let buf_id = buf.borrow().id();
    let selected = self.selected_window();

    if !not_this_window && self.shows_buffer(selected, buf_id) {
      return Ok(selected);
    }

    if let Some(existing) = self.get_buffer_window(buf_id, Scope::AllScreens)? {
      if !(not_this_window && existing == selected) {
        self.set_buffer(existing, buf)?;
        return Ok(existing);
      }
    }

    if self.config.auto_new_screen() {
      let current = self.screen(self.selected_screen)?;
      let (width, height, wants_modeline) = (current.width, current.height, current.wants_modeline);
      let new_screen = self.add_screen(width, height, buf, wants_modeline);
      let new_root = self.screen(new_screen)?.root_window;
      debug!(?new_screen, ?new_root, "display_buffer: auto_new_screen, created fresh screen");
      self.select(new_root)?;
      self.set_buffer(new_root, buf)?;
      return Ok(new_root);
    }

    let scope = Scope::Screen(self.selected_screen);
    if self.config.pop_up_windows() {
      if let Some(largest) = self.get_largest_window(scope)? {
        let is_full_width = {
          let node = self.node(largest)?;
          node.header.width >= self.screen(node.header.screen_id)?.width
        };
        if is_full_width && self.height(largest)? >= self.config.split_height_threshold() {
          let new_win = self.split(largest, None, false)?;
          self.set_buffer(new_win, buf)?;
          return Ok(new_win);
        }
      }
      if let Some(lru) = self.get_lru_window(scope)? {
        let screen = self.screen(self.selected_screen)?;
        if lru == screen.selected_window || lru == screen.root_window {
          let new_win = self.split(lru, None, false)?;
          self.set_buffer(new_win, buf)?;
          return Ok(new_win);
        }
        self.set_buffer(lru, buf)?;
        return Ok(lru);
      }
    }

    let lru = self
      .get_lru_window(scope)?
      .ok_or(WindowErr::AttemptOnSoleOrdinaryWindow)?;
    self.set_buffer(lru, buf)?;
    Ok(lru)
  }

  fn shows_buffer(&self, w: NodeId, buf_id: BufferId) -> bool {
    self.buffer_of(w).ok().flatten().map(|b| b.borrow().id()) == Some(buf_id)
  }
}

#[cfg(test)]
mod display_tests {
  use super::*;
  use crate::buffer::Buffer;
  use crate::config::Config;

  #[test]
  fn get_lru_window_picks_smallest_use_time() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    let other = tree.split(root, None, false).unwrap();

    tree.select(root).unwrap();
    tree.select(other).unwrap();
    tree.select(root).unwrap();

    let lru = tree.get_lru_window(Scope::Screen(screen_id)).unwrap().unwrap();
    assert_eq!(lru, other);
  }

  #[test]
  fn get_largest_window_by_area() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    let smaller = tree.split(root, Some(18), false).unwrap();

    let largest = tree.get_largest_window(Scope::Screen(screen_id)).unwrap().unwrap();
    assert_eq!(largest, root);
    assert_ne!(largest, smaller);
  }

  #[test]
  fn display_buffer_reuses_selected_window_when_already_shown() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    tree.select(root).unwrap();

    let win = tree.display_buffer(&buf, false).unwrap();
    assert_eq!(win, root);
  }

  #[test]
  fn display_buffer_opens_new_screen_when_auto_new_screen_is_set() {
    let mut cfg = Config::default();
    cfg.set_auto_new_screen(true);
    let mut tree = Tree::new(cfg);
    let buf_a = Buffer::new("a");
    let buf_b = Buffer::new("b");
    let screen_id = tree.add_screen(80, 24, &buf_a, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    tree.select(root).unwrap();

    let win = tree.display_buffer(&buf_b, false).unwrap();
    assert_ne!(tree.node(win).unwrap().header.screen_id, screen_id);
    assert_eq!(tree.buffer_of(win).unwrap().unwrap().borrow().id(), buf_b.borrow().id());
    assert_eq!(tree.selected_window(), win);
  }

  #[test]
  fn display_buffer_splits_when_no_other_window_available() {
    let mut tree = Tree::new(Config::default());
    let buf_a = Buffer::new("a");
    let buf_b = Buffer::new("b");
    let screen_id = tree.add_screen(80, 24, &buf_a, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    tree.select(root).unwrap();

    let win = tree.display_buffer(&buf_b, false).unwrap();
    assert_ne!(win, root);
    assert_eq!(tree.buffer_of(win).unwrap().unwrap().borrow().id(), buf_b.borrow().id());
  }
}
