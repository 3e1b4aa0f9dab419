//! Tree mutation primitives (spec.md §4.B): rewiring handles in the arena
//! rather than chasing owned pointers. These three operations are the only
//! places that touch `parent`/`prev`/`next`/`{h,v}child` links directly;
//! every higher-level operation (split, delete, resize) is built on top of
//! them.

use super::{NodeId, Tree};
use crate::error::WindowResult;

impl Tree {
  /// Copy `old`'s geometry and topology into `new`, then rewire everyone
  /// who pointed at `old` to point at `new` instead. `old`'s children are
  /// untouched — the caller decides what happens to them.
  pub(crate) fn replace_node(&mut self, old: NodeId, new: NodeId) -> WindowResult<()> {
    let header = self.node(old)?.header.clone();

    {
      let n = self.node_mut(new)?;
      n.header.left = header.left;
      n.header.top = header.top;
      n.header.width = header.width;
      n.header.height = header.height;
      n.header.parent = header.parent;
      n.header.prev = header.prev;
      n.header.next = header.next;
    }

    if let Some(p) = header.prev {
      self.node_mut(p)?.header.next = Some(new);
    }
    if let Some(next) = header.next {
      self.node_mut(next)?.header.prev = Some(new);
    }

    if let Some(parent) = header.parent {
      let parent_node = self.node_mut(parent)?;
      if parent_node.first_child() == Some(old) {
        parent_node.set_first_child(new);
      }
    } else if let Some(screen) = self.screens.get_mut(&header.screen_id) {
      if screen.root_window == old {
        screen.root_window = new;
      }
      if screen.minibuffer_window == old {
        screen.minibuffer_window = new;
      }
      if screen.selected_window == old {
        screen.selected_window = new;
      }
    }

    Ok(())
  }

  /// Interpose a fresh combination node where `leaf` used to sit, with
  /// `leaf` as its sole child. Used by `split` to change orientation above
  /// a leaf whose parent doesn't already match the split direction.
  pub(crate) fn make_dummy_parent(&mut self, leaf: NodeId, horizontal: bool) -> WindowResult<NodeId> {
    let screen_id = self.node(leaf)?.header.screen_id;
    let combo = self.alloc_combination(screen_id, horizontal, leaf);
    self.replace_node(leaf, combo)?;
    let leaf_node = self.node_mut(leaf)?;
    leaf_node.header.parent = Some(combo);
    leaf_node.header.prev = None;
    leaf_node.header.next = None;
    Ok(combo)
  }

  /// Detach `node` from its sibling list and its parent's child pointer.
  /// Geometry is left as-is; the caller redistributes it.
  pub(crate) fn unlink(&mut self, node: NodeId) -> WindowResult<()> {
    let header = self.node(node)?.header.clone();

    if let Some(p) = header.prev {
      self.node_mut(p)?.header.next = header.next;
    }
    if let Some(next) = header.next {
      self.node_mut(next)?.header.prev = header.prev;
    }
    if let Some(parent) = header.parent {
      let parent_node = self.node_mut(parent)?;
      if parent_node.first_child() == Some(node) {
        if let Some(new_first) = header.next {
          parent_node.set_first_child(new_first);
        }
      }
    }

    let n = self.node_mut(node)?;
    n.header.parent = None;
    n.header.prev = None;
    n.header.next = None;
    Ok(())
  }
}
