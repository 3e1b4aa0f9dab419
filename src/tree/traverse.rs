//! Canonical traversal and the generic visitor every multi-window
//! operation is built on: one `window_loop`-style primitive rather than
//! five bespoke tree walks.

use super::{NodeId, ScreenId, Tree};
use crate::error::WindowResult;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a traversal or search should include the minibuffer leaf.
pub enum MiniBufferPolicy {
  IncludeAlways,
  /// Included only while a recursive minibuffer is active
  /// ([`Tree::minibuffer_active`]).
  IncludeIfActive,
  Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which screens a search or traversal ranges over.
pub enum Scope {
  Screen(ScreenId),
  AllScreens,
}

impl Tree {
  fn screen_index(&self, id: ScreenId) -> usize {
    self.screen_order.iter().position(|&s| s == id).unwrap_or(0)
  }

  fn next_screen(&self, id: ScreenId) -> ScreenId {
    let idx = self.screen_index(id);
    self.screen_order[(idx + 1) % self.screen_order.len()]
  }

  fn prev_screen(&self, id: ScreenId) -> ScreenId {
    let idx = self.screen_index(id);
    let len = self.screen_order.len();
    self.screen_order[(idx + len - 1) % len]
  }

  fn last_sibling(&self, first: NodeId) -> WindowResult<NodeId> {
    let mut cur = first;
    loop {
      match self.node(cur)?.header.next {
        Some(n) => cur = n,
        None => return Ok(cur),
      }
    }
  }

  fn descend_first(&self, mut cur: NodeId) -> WindowResult<NodeId> {
    loop {
      match self.node(cur)?.first_child() {
        Some(fc) => cur = fc,
        None => return Ok(cur),
      }
    }
  }

  fn descend_last(&self, mut cur: NodeId) -> WindowResult<NodeId> {
    loop {
      match self.node(cur)?.first_child() {
        Some(fc) => cur = self.last_sibling(fc)?,
        None => return Ok(cur),
      }
    }
  }

  fn accepts_minibuffer(&self, policy: MiniBufferPolicy) -> bool {
    match policy {
      MiniBufferPolicy::IncludeAlways => true,
      MiniBufferPolicy::Never => false,
      MiniBufferPolicy::IncludeIfActive => self.minibuffer_active(),
    }
  }

  /// Next leaf in canonical order. Climbs to the first
  /// ancestor with a `next` sibling, descends to that sibling's first
  /// leaf; wraps from a screen's minibuffer to the next screen's root (or
  /// the same screen's root if `all_screens` is false).
  pub fn next_window(&self, w: NodeId, mini_policy: MiniBufferPolicy, all_screens: bool) -> WindowResult<NodeId> {
    let mut w = w;
    loop {
      let mut cur = w;
      loop {
        let node = self.node(cur)?;
        if let Some(next) = node.header.next {
          cur = next;
          break;
        } else if let Some(parent) = node.header.parent {
          cur = parent;
        } else {
          let screen_id = node.header.screen_id;
          let target_screen = if all_screens { self.next_screen(screen_id) } else { screen_id };
          trace!(from = ?w, ?screen_id, ?target_screen, "next_window: wrapped to screen root");
          cur = self.screen(target_screen)?.root_window;
          break;
        }
      }
      cur = self.descend_first(cur)?;
      if self.is_minibuffer(cur)? && !self.accepts_minibuffer(mini_policy) {
        w = cur;
        continue;
      }
      return Ok(cur);
    }
  }

  /// Mirror of [`Tree::next_window`]: climbs via `prev`, descends to the
  /// last child, wraps from a screen's root to the previous screen's
  /// minibuffer.
  pub fn previous_window(
    &self,
    w: NodeId,
    mini_policy: MiniBufferPolicy,
    all_screens: bool,
  ) -> WindowResult<NodeId> {
    let mut w = w;
    loop {
      let mut cur = w;
      loop {
        let node = self.node(cur)?;
        if let Some(prev) = node.header.prev {
          cur = prev;
          break;
        } else if let Some(parent) = node.header.parent {
          cur = parent;
        } else {
          let screen_id = node.header.screen_id;
          let target_screen = if all_screens { self.prev_screen(screen_id) } else { screen_id };
          trace!(from = ?w, ?screen_id, ?target_screen, "previous_window: wrapped to screen minibuffer");
          cur = self.screen(target_screen)?.minibuffer_window;
          break;
        }
      }
      cur = self.descend_last(cur)?;
      if self.is_minibuffer(cur)? && !self.accepts_minibuffer(mini_policy) {
        w = cur;
        continue;
      }
      return Ok(cur);
    }
  }

  /// `other_window(n)`: step `n` times forward (or `-n` times backward)
  /// through [`Tree::next_window`]/[`Tree::previous_window`] from the
  /// selected window.
  pub fn other_window(&self, n: isize, all_screens: bool) -> WindowResult<NodeId> {
    let mut w = self.selected_window();
    if n >= 0 {
      for _ in 0..n {
        w = self.next_window(w, MiniBufferPolicy::IncludeIfActive, all_screens)?;
      }
    } else {
      for _ in 0..-n {
        w = self.previous_window(w, MiniBufferPolicy::IncludeIfActive, all_screens)?;
      }
    }
    Ok(w)
  }

  /// Visit every leaf in `scope` in canonical order, honoring
  /// `mini_policy`. The shared traversal underneath `window_list`,
  /// `fold_windows`, `ordinary_window_count` and the §4.D/§4.G operations.
  pub fn for_each_window(
    &self,
    scope: Scope,
    mini_policy: MiniBufferPolicy,
    mut visit: impl FnMut(NodeId),
  ) -> WindowResult<()> {
    let screens: Vec<ScreenId> = match scope {
      Scope::Screen(id) => vec![id],
      Scope::AllScreens => self.screen_order.clone(),
    };
    for screen_id in screens {
      let root = self.screen(screen_id)?.root_window;
      let mut cur = root;
      loop {
        self.visit_subtree(cur, mini_policy, &mut visit)?;
        match self.node(cur)?.header.next {
          Some(n) => cur = n,
          None => break,
        }
      }
    }
    Ok(())
  }

  fn visit_subtree(&self, id: NodeId, mini_policy: MiniBufferPolicy, visit: &mut impl FnMut(NodeId)) -> WindowResult<()> {
    let node = self.node(id)?;
    match node.first_child() {
      None => {
        let include = if self.is_minibuffer(id)? {
          self.accepts_minibuffer(mini_policy)
        } else {
          true
        };
        if include {
          visit(id);
        }
        Ok(())
      }
      Some(fc) => {
        let mut cur = fc;
        loop {
          self.visit_subtree(cur, mini_policy, visit)?;
          match self.node(cur)?.header.next {
            Some(n) => cur = n,
            None => break,
          }
        }
        Ok(())
      }
    }
  }

  /// Collect [`Tree::for_each_window`]'s visits into a `Vec`, in canonical
  /// order.
  pub fn window_list(&self, scope: Scope, mini_policy: MiniBufferPolicy) -> WindowResult<Vec<NodeId>> {
    let mut out = Vec::new();
    self.for_each_window(scope, mini_policy, |id| out.push(id))?;
    Ok(out)
  }

  /// Fold over every leaf in `scope`, the generalized form of the
  /// original's `window_loop` (get LRU/largest window, delete windows on a
  /// buffer, replace buffer in windows are all instances of this fold).
  pub fn fold_windows<T>(
    &self,
    scope: Scope,
    mini_policy: MiniBufferPolicy,
    init: T,
    mut f: impl FnMut(T, NodeId) -> T,
  ) -> WindowResult<T> {
    let ids = self.window_list(scope, mini_policy)?;
    Ok(ids.into_iter().fold(init, |acc, id| f(acc, id)))
  }

  /// Count of non-minibuffer leaves in `scope` (the original's
  /// `count_windows`), used to guard against deleting the last ordinary
  /// window.
  pub fn ordinary_window_count(&self, scope: Scope) -> WindowResult<usize> {
    self.fold_windows(scope, MiniBufferPolicy::Never, 0usize, |acc, _| acc + 1)
  }
}
