//! Snapshot/restore: flatten one screen's window tree into a sequence a
//! host can stash away (in an undo ring, a register, whatever
//! `save-window-excursion` wraps), then rebuild an equivalent tree from
//! that sequence later — even if some of the buffers it referenced have
//! since been killed.
//!
//! Unlike most of this crate, [`WindowConfiguration`] is not keyed by
//! `NodeId` handles a caller holds onto; it's an owned, self-contained
//! value, the way the original's opaque `Lisp_Object` window
//! configuration is a value a caller can squirrel away indefinitely
//! without holding the tree borrowed.

use super::{NodeId, ScreenId, Tree};
use crate::buffer::{BufferDirectory, BufferId, BufferWk};
use crate::error::{WindowErr, WindowResult};

#[derive(Debug, Clone)]
enum SavedKind {
  Leaf(SavedLeaf),
  /// Orientation is not stored: restore infers it by comparing a child's
  /// recorded `width` to the parent's.
  Combination,
}

#[derive(Debug, Clone)]
struct SavedLeaf {
  buffer_id: Option<BufferId>,
  start: usize,
  pointm: usize,
  hscroll: u16,
  display_table: Option<u32>,
  dedicated: bool,
  start_at_line_beg: bool,
}

#[derive(Debug, Clone)]
struct SavedNode {
  /// The node's own id at capture time. `NodeId`s are stable for a node's
  /// lifetime and never reissued, so replaying this same id on restore
  /// recreates the *same* window identity rather than a lookalike with a
  /// fresh id — the closest a stable arena handle gets to saving a live
  /// window object directly.
  window_id: NodeId,
  kind: SavedKind,
  left: u16,
  top: u16,
  width: u16,
  height: u16,
  /// Index into the owning [`WindowConfiguration::nodes`] sequence.
  parent: Option<usize>,
  /// Index into the same sequence.
  prev: Option<usize>,
}

#[derive(Debug, Clone)]
/// A serialized snapshot of one screen's window tree: a flat sequence of
/// serialized leaves and combinations. Scoped to a single screen rather
/// than every screen in the tree, matching the per-frame scope of Emacs's
/// own window configurations.
pub struct WindowConfiguration {
  screen_id: ScreenId,
  width: u16,
  height: u16,
  wants_modeline: bool,
  no_split: bool,
  root_window: NodeId,
  minibuffer_window: NodeId,
  selected_window: NodeId,
  nodes: Vec<SavedNode>,
}

impl Tree {
  /// `current_window_configuration()`: serialize the selected screen's
  /// tree by a pre-order walk of its root (which, since the minibuffer is
  /// always the root's last sibling per invariant 5, captures the
  /// minibuffer chain too without special-casing it).
  pub fn current_window_configuration(&self) -> WindowResult<WindowConfiguration> {
    self.window_configuration_of(self.selected_screen)
  }

  /// As [`Tree::current_window_configuration`], for an arbitrary screen.
  pub fn window_configuration_of(&self, screen_id: ScreenId) -> WindowResult<WindowConfiguration> {
    let screen = self.screen(screen_id)?.clone();
    let mut nodes = Vec::new();
    self.record_chain(screen.root_window, None, &mut nodes)?;
    Ok(WindowConfiguration {
      screen_id,
      width: screen.width,
      height: screen.height,
      wants_modeline: screen.wants_modeline,
      no_split: screen.no_split,
      root_window: screen.root_window,
      minibuffer_window: screen.minibuffer_window,
      selected_window: screen.selected_window,
      nodes,
    })
  }

  /// Record `first` and every `.next` sibling after it, each as a
  /// pre-order subtree, appending to `out`. Returns nothing: callers don't
  /// need the indices back, only the recorded sequence.
  fn record_chain(&self, first: NodeId, parent: Option<usize>, out: &mut Vec<SavedNode>) -> WindowResult<()> {
    let mut cur = Some(first);
    let mut prev_idx = None;
    while let Some(id) = cur {
      let idx = self.record_node(id, parent, prev_idx, out)?;
      prev_idx = Some(idx);
      cur = self.node(id)?.header.next;
    }
    Ok(())
  }

  /// Record one node (and, if it's a combination, its children's chain),
  /// returning the index it landed at in `out`.
  fn record_node(
    &self,
    id: NodeId,
    parent: Option<usize>,
    prev: Option<usize>,
    out: &mut Vec<SavedNode>,
  ) -> WindowResult<usize> {
    let node = self.node(id)?;
    let (left, top, width, height) = (node.header.left, node.header.top, node.header.width, node.header.height);
    let kind = match node.leaf() {
      Some(leaf) => SavedKind::Leaf(SavedLeaf {
        buffer_id: leaf.buffer.as_ref().and_then(|b| b.upgrade()).map(|b| b.borrow().id()),
        start: leaf.start.as_ref().and_then(|m| m.position()).unwrap_or(0),
        // For the selected window `pointm` is stale (only kept in sync
        // when a window is deselected); `point_of` already knows to read
        // the buffer's real point for the selected leaf instead.
        pointm: self.point_of(id).unwrap_or(0),
        hscroll: leaf.hscroll,
        display_table: leaf.display_table,
        dedicated: leaf.dedicated,
        start_at_line_beg: leaf.start_at_line_beg,
      }),
      None => SavedKind::Combination,
    };
    let idx = out.len();
    out.push(SavedNode {
      window_id: id,
      kind,
      left,
      top,
      width,
      height,
      parent,
      prev,
    });
    if let Some(fc) = node.first_child() {
      self.record_chain(fc, Some(idx), out)?;
    }
    Ok(idx)
  }

  /// `set_window_configuration(snapshot)`: validate the screen still has
  /// the dimensions the snapshot was taken at (signalling
  /// `screen-size-mismatch` *before touching anything* if not, so a
  /// rejected restore never leaves the tree half-mutated), then discard
  /// the screen's current tree and rebuild one from the snapshot,
  /// reinstating buffers where they're still alive and falling back where
  /// they aren't.
  pub fn set_window_configuration(
    &mut self,
    config: &WindowConfiguration,
    directory: &BufferDirectory,
  ) -> WindowResult<()> {
    let screen = self.screen(config.screen_id)?.clone();
    if screen.width != config.width || screen.height != config.height {
      return Err(WindowErr::ScreenSizeMismatch);
    }

    // Keep a weak handle to whatever buffer each surviving window_id shows
    // right now, for the "leaf's previous buffer" fallback below, before
    // any teardown touches it.
    let previous_buffer: std::collections::HashMap<NodeId, BufferWk> = config
      .nodes
      .iter()
      .filter_map(|n| {
        let id = n.window_id;
        let node = self.nodes.get(&id)?;
        let leaf = node.leaf()?;
        leaf.buffer.clone().map(|b| (id, b))
      })
      .collect();

    let old_ids: Vec<NodeId> = self
      .nodes
      .values()
      .filter(|n| n.header.screen_id == config.screen_id)
      .map(|n| n.header.id)
      .collect();
    for id in &old_ids {
      if self.node(*id).map(|n| n.is_leaf()).unwrap_or(false) {
        let _ = self.unshow_buffer(*id);
      }
    }
    for id in old_ids {
      self.nodes.remove(&id);
    }

    let n = config.nodes.len();
    let mut next_of: Vec<Option<usize>> = vec![None; n];
    let mut first_child_of: Vec<Option<usize>> = vec![None; n];
    for (i, saved) in config.nodes.iter().enumerate() {
      if let Some(p) = saved.prev {
        next_of[p] = Some(i);
      }
      if let (Some(par), None) = (saved.parent, saved.prev) {
        first_child_of[par] = Some(i);
      }
    }

    for (i, saved) in config.nodes.iter().enumerate() {
      let seq = self.context.next_sequence_number();
      let node = match &saved.kind {
        SavedKind::Leaf(_) => super::node::Node::new_leaf(saved.window_id, seq, config.screen_id),
        SavedKind::Combination => {
          let fc_idx = first_child_of[i].expect("combination recorded with a first child");
          let horizontal = config.nodes[fc_idx].width != saved.width;
          super::node::Node::new_combination(saved.window_id, seq, config.screen_id, horizontal, config.nodes[fc_idx].window_id)
        }
      };
      self.nodes.insert(saved.window_id, node);
    }

    for (i, saved) in config.nodes.iter().enumerate() {
      let header = &mut self.node_mut(saved.window_id)?.header;
      header.left = saved.left;
      header.top = saved.top;
      header.width = saved.width;
      header.height = saved.height;
      header.parent = saved.parent.map(|p| config.nodes[p].window_id);
      header.prev = saved.prev.map(|p| config.nodes[p].window_id);
      header.next = next_of[i].map(|nx| config.nodes[nx].window_id);
    }

    for saved in &config.nodes {
      let SavedKind::Leaf(leaf) = &saved.kind else { continue };
      self.restore_leaf_buffer(saved.window_id, leaf, directory, &previous_buffer)?;
    }

    // Sync the restored buffer's real point from the selected window's
    // freshly-recreated `pointm`, the way `select` would on an ordinary
    // selection change — but without consulting a previously-selected
    // window, since the whole previous tree was just discarded rather
    // than deselected.
    if let Some(buf) = self.buffer_of(config.selected_window)? {
      let pt = self
        .leaf(config.selected_window)?
        .pointm
        .as_ref()
        .and_then(|m| m.position())
        .unwrap_or(0);
      let (begv, zv) = (crate::buffer::begv(&buf), crate::buffer::zv(&buf));
      crate::buffer::set_point(&buf, pt.clamp(begv, zv));
    }
    let use_time = self.context.bump_use_time();
    self.node_mut(config.selected_window)?.header.use_time = use_time;

    let screen_mut = self.screen_mut(config.screen_id)?;
    screen_mut.root_window = config.root_window;
    screen_mut.minibuffer_window = config.minibuffer_window;
    screen_mut.selected_window = config.selected_window;
    self.selected_screen = config.screen_id;

    self.context.mark_windows_or_buffers_changed();
    Ok(())
  }

  fn restore_leaf_buffer(
    &mut self,
    id: NodeId,
    saved: &SavedLeaf,
    directory: &BufferDirectory,
    previous_buffer: &std::collections::HashMap<NodeId, BufferWk>,
  ) -> WindowResult<()> {
    let reinstall = saved.buffer_id.and_then(|bid| directory.find(bid));

    let buffer = match reinstall {
      Some(buf) => buf,
      None => {
        let previous_alive = previous_buffer.get(&id).and_then(|w| w.upgrade());
        match previous_alive {
          Some(buf) => buf,
          None => {
            let exclude = saved.buffer_id.unwrap_or(BufferId::MIN);
            match directory.fallback_buffer(exclude) {
              Some(buf) => buf,
              None => {
                let leaf = self.leaf_mut(id)?;
                leaf.buffer = None;
                return Ok(());
              }
            }
          }
        }
      }
    };

    let start = crate::buffer::create_marker(&buffer, saved.start);
    let pointm = crate::buffer::create_marker(&buffer, saved.pointm);
    let leaf = self.leaf_mut(id)?;
    leaf.buffer = Some(std::rc::Rc::downgrade(&buffer));
    leaf.last_buffer_id = Some(buffer.borrow().id());
    leaf.start = Some(start);
    leaf.pointm = Some(pointm);
    leaf.hscroll = saved.hscroll;
    leaf.display_table = saved.display_table;
    leaf.dedicated = saved.dedicated;
    leaf.start_at_line_beg = saved.start_at_line_beg;
    Ok(())
  }

  /// `save_window_excursion(body)`: snapshot the selected screen, run
  /// `body`, then restore the snapshot unconditionally — whether `body`
  /// returned `Ok` or `Err` — so an ill-behaved or failing body can never
  /// leave the tree in an intermediate state. If `body` itself errors,
  /// that error wins even if the restore afterwards also fails; a restore
  /// failure only surfaces when `body` succeeded.
  pub fn save_window_excursion<T>(
    &mut self,
    directory: &BufferDirectory,
    body: impl FnOnce(&mut Tree) -> WindowResult<T>,
  ) -> WindowResult<T> {
    let saved = self.current_window_configuration()?;
    let result = body(self);
    let restore = self.set_window_configuration(&saved, directory);
    match result {
      Ok(v) => restore.map(|()| v),
      Err(e) => Err(e),
    }
  }
}

impl WindowConfiguration {
  pub fn screen_id(&self) -> ScreenId {
    self.screen_id
  }

  pub fn selected_window(&self) -> NodeId {
    self.selected_window
  }
}

/// `is_window_configuration(x)`: the original's runtime type predicate over
/// an opaque `Lisp_Object`, kept for hosts that stash window configurations
/// behind a type-erased handle (an undo ring, a register slot) and need to
/// ask what's in it before downcasting. A caller holding a typed
/// `&WindowConfiguration` has no need for this — Rust's static typing
/// already rules out confusing it with anything else.
pub fn is_window_configuration(x: &dyn std::any::Any) -> bool {
  x.is::<WindowConfiguration>()
}

#[cfg(test)]
mod is_window_configuration_tests {
  use super::*;

  #[test]
  fn recognizes_a_window_configuration_and_rejects_other_types() {
    let mut tree = Tree::new(crate::config::Config::default());
    let buf = crate::buffer::Buffer::new("x");
    tree.add_screen(80, 24, &buf, true);
    let saved = tree.current_window_configuration().unwrap();

    assert!(is_window_configuration(&saved));
    assert!(!is_window_configuration(&42i32));
  }
}
