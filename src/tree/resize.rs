//! Resize engine: `set_height`/`set_width` keep a combination's children
//! tiling their parent exactly under arbitrary growth or shrinkage, and
//! `enlarge`/`shrink` implement the interactive grow/shrink of the
//! selected window, including the inflate-and-reshrink trick for the case
//! where neither sibling has enough slack to donate.

use super::{NodeId, NodeKind, Tree};
use crate::error::{WindowErr, WindowResult};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
  Height,
  Width,
}

impl Tree {
  pub(crate) fn axis_min(&self, axis: Axis) -> u16 {
    match axis {
      Axis::Height => self.config.window_min_height(),
      Axis::Width => self.config.window_min_width(),
    }
  }

  pub(crate) fn axis_size(&self, id: NodeId, axis: Axis) -> WindowResult<u16> {
    let n = self.node(id)?;
    Ok(match axis {
      Axis::Height => n.header.height,
      Axis::Width => n.header.width,
    })
  }

  pub(crate) fn axis_origin(&self, id: NodeId, axis: Axis) -> WindowResult<u16> {
    let n = self.node(id)?;
    Ok(match axis {
      Axis::Height => n.header.top,
      Axis::Width => n.header.left,
    })
  }

  pub(crate) fn set_axis_size(&mut self, id: NodeId, value: u16, axis: Axis) -> WindowResult<()> {
    let n = self.node_mut(id)?;
    match axis {
      Axis::Height => n.header.height = value,
      Axis::Width => n.header.width = value,
    }
    Ok(())
  }

  pub(crate) fn set_axis_origin(&mut self, id: NodeId, value: u16, axis: Axis) -> WindowResult<()> {
    let n = self.node_mut(id)?;
    match axis {
      Axis::Height => n.header.top = value,
      Axis::Width => n.header.left = value,
    }
    Ok(())
  }

  /// Whether `id` is a combination whose children are independently sized
  /// along `axis` (so resizing `id` means apportioning, not broadcasting).
  pub(crate) fn matches_axis(&self, id: NodeId, axis: Axis) -> WindowResult<bool> {
    let node = self.node(id)?;
    Ok(matches!(
      (&node.kind, axis),
      (NodeKind::VCombination { .. }, Axis::Height) | (NodeKind::HCombination { .. }, Axis::Width)
    ))
  }

  fn children_of(&self, node: NodeId) -> WindowResult<Vec<NodeId>> {
    let mut out = Vec::new();
    if let Some(fc) = self.node(node)?.first_child() {
      let mut cur = fc;
      loop {
        out.push(cur);
        match self.node(cur)?.header.next {
          Some(n) => cur = n,
          None => break,
        }
      }
    }
    Ok(out)
  }

  pub fn set_height(&mut self, node: NodeId, new_height: u16, nodelete: bool) -> WindowResult<()> {
    self.set_size(node, new_height, nodelete, Axis::Height)
  }

  pub fn set_width(&mut self, node: NodeId, new_width: u16, nodelete: bool) -> WindowResult<()> {
    self.set_size(node, new_width, nodelete, Axis::Width)
  }

  pub(crate) fn set_size(&mut self, node: NodeId, new_size: u16, nodelete: bool, axis: Axis) -> WindowResult<()> {
    let is_top_level = self.node(node)?.header.parent.is_none();
    let min = self.axis_min(axis);
    if !nodelete && new_size < min && !is_top_level {
      debug!(?node, new_size, min, ?axis, "set_size: below minimum, deleting node");
      self.delete(node)?;
      return Ok(());
    }

    let old_size = self.axis_size(node, axis)?;
    self.set_axis_size(node, new_size, axis)?;

    let matches = self.matches_axis(node, axis)?;
    let is_combination = !self.node(node)?.is_leaf();

    if is_combination && matches {
      self.apportion_children(node, old_size, new_size, axis)?;
      if !nodelete {
        let children = self.children_of(node)?;
        for child in children {
          if self.node(child).is_err() {
            continue; // deleted by an earlier sibling's own rescale
          }
          let size = self.axis_size(child, axis)?;
          self.set_size(child, size, false, axis)?;
        }
      }
    } else if is_combination {
      // cross-axis combination: every child shares this dimension.
      let children = self.children_of(node)?;
      for child in children {
        self.set_size(child, new_size, true, axis)?;
      }
    }
    Ok(())
  }

  /// The shifted-add rounding formula:
  /// `pos = ((opos * height) * 2 + oheight) / (oheight * 2)`. Guarantees
  /// the new partition sums to exactly `newtotal` regardless of rounding.
  fn apportion_children(&mut self, node: NodeId, oldtotal: u16, newtotal: u16, axis: Axis) -> WindowResult<()> {
    let children = self.children_of(node)?;
    let parent_origin = self.axis_origin(node, axis)? as u64;
    let oheight = oldtotal as u64;
    let height = newtotal as u64;

    let mut cumulative_old: u64 = 0;
    let mut prev_new_pos: u64 = 0;
    for child in &children {
      cumulative_old += self.axis_size(*child, axis)? as u64;
      let opos = cumulative_old;
      let pos = if oheight == 0 {
        0
      } else {
        (opos * height * 2 + oheight) / (oheight * 2)
      };
      let new_size = (pos - prev_new_pos) as u16;
      trace!(child = ?*child, opos, pos, new_size, ?axis, "apportion_children: child rescaled");
      self.set_axis_origin(*child, (parent_origin + prev_new_pos) as u16, axis)?;
      self.set_size(*child, new_size, true, axis)?;
      prev_new_pos = pos;
    }
    Ok(())
  }

  /// Climb from `leaf` to the nearest ancestor whose orientation matches
  /// `axis` (spec.md §4.E step 1). If no ancestor matches — the leaf's
  /// chain of parents runs out first — the climb stops at that top-level
  /// node itself; it's then up to the caller to decide whether its
  /// existing `next`/`prev` sibling (e.g. a lone root window's minibuffer)
  /// is a legitimate donor for `axis`.
  fn find_resize_target(&self, leaf: NodeId, axis: Axis) -> WindowResult<NodeId> {
    let mut target = leaf;
    loop {
      let parent = self.node(target)?.header.parent;
      match parent {
        None => return Ok(target),
        Some(p) => {
          if self.matches_axis(p, axis)? {
            return Ok(target);
          }
          target = p;
        }
      }
    }
  }

  /// Interactive grow/shrink of the selected window, generalized over both
  /// axes. Steals size from the next sibling first, then the previous one,
  /// falling back to the inflate-and-reshrink trick when neither has
  /// enough slack.
  pub(crate) fn change_size(&mut self, delta: i32, axis: Axis) -> WindowResult<()> {
    if delta == 0 {
      return Ok(());
    }
    let leaf = self.selected_window();
    let target = self.find_resize_target(leaf, axis)?;
    let min = self.axis_min(axis) as i32;
    let target_size = self.axis_size(target, axis)? as i32;
    let is_top_level = self.node(target)?.header.parent.is_none();

    if target_size + delta < min && !is_top_level {
      debug!(?target, delta, min, ?axis, "change_size: target would fall below minimum, deleting");
      self.delete(target)?;
      self.context.mark_windows_or_buffers_changed();
      return Ok(());
    }

    let comb = self.node(target)?.header.parent;
    let matching_parent = match comb {
      Some(p) if self.matches_axis(p, axis)? => Some(p),
      _ => None,
    };

    // spec.md §4.E step 3 and §7's `no-such-sibling`: a width change that
    // climbs past every ancestor without finding an h-combination has no
    // legitimate donor on a single-column screen — the root and minibuffer
    // are an implicit top-level v-combination (same `left`/`width` always,
    // per `add_screen`), so "steal width from the minibuffer" would break
    // that invariant rather than resize anything. A height change in the
    // same situation is fine: the root and minibuffer *do* vary
    // independently in height, so they're a legitimate donor pair below.
    if matching_parent.is_none() && axis == Axis::Width {
      return Err(WindowErr::NoSuchSibling(leaf));
    }

    let next = self.node(target)?.header.next;
    let prev = self.node(target)?.header.prev;

    // maxdelta (spec.md §4.E step 3/4): the parent's remaining slack when
    // `target` has a matching-axis parent to grow into, else — the lone
    // root-plus-minibuffer case — the most either sibling can give up
    // without itself going below the minimum.
    let maxdelta = match matching_parent {
      Some(p) => self.axis_size(p, axis)? as i32 - target_size,
      None => {
        let slack = |this: &Self, id: Option<NodeId>| -> WindowResult<i32> {
          Ok(match id {
            Some(s) => (this.axis_size(s, axis)? as i32 - min).max(0),
            None => 0,
          })
        };
        slack(self, next)?.max(slack(self, prev)?)
      }
    };
    let delta = if delta > 0 { delta.min(maxdelta.max(0)) } else { delta };
    if delta == 0 {
      return Ok(());
    }

    let can_absorb = |this: &Self, donor: NodeId| -> WindowResult<bool> {
      Ok(this.axis_size(donor, axis)? as i32 - delta >= min)
    };

    if let Some(n) = next {
      if can_absorb(self, n)? {
        self.steal_from_sibling(target, n, delta, axis)?;
        self.context.mark_windows_or_buffers_changed();
        return Ok(());
      }
    }
    if let Some(p) = prev {
      if can_absorb(self, p)? {
        self.steal_from_sibling(target, p, delta, axis)?;
        self.context.mark_windows_or_buffers_changed();
        return Ok(());
      }
    }

    let comb = matching_parent.ok_or(WindowErr::NoSuchSibling(leaf))?;
    debug!(?target, ?comb, delta, ?axis, "change_size: no sibling slack, inflate-and-reshrink");
    self.inflate_and_reshrink(comb, target, delta, axis)?;
    self.context.mark_windows_or_buffers_changed();
    Ok(())
  }

  fn steal_from_sibling(&mut self, target: NodeId, donor: NodeId, delta: i32, axis: Axis) -> WindowResult<()> {
    let target_size = self.axis_size(target, axis)? as i32;
    let donor_size = self.axis_size(donor, axis)? as i32;
    let target_new = (target_size + delta) as u16;
    let donor_new = (donor_size - delta) as u16;

    let target_precedes_donor = self.node(donor)?.header.prev == Some(target);
    if target_precedes_donor {
      self.set_size(target, target_new, true, axis)?;
      let target_origin = self.axis_origin(target, axis)?;
      self.set_axis_origin(donor, target_origin + target_new, axis)?;
      self.set_size(donor, donor_new, true, axis)?;
    } else {
      self.set_size(donor, donor_new, true, axis)?;
      let donor_origin = self.axis_origin(donor, axis)?;
      self.set_axis_origin(target, donor_origin + donor_new, axis)?;
      self.set_size(target, target_new, true, axis)?;
    }
    Ok(())
  }

  /// `target` has no sibling that alone can absorb `delta`: inflate it by
  /// an amount proportional to its parent's current size, then re-apply
  /// the parent's own (unchanged) total through `set_size`, which
  /// apportions every child — including the now-oversized `target` —
  /// back down, squeezing the other children (deleting any that land
  /// below the minimum).
  fn inflate_and_reshrink(&mut self, comb: NodeId, target: NodeId, delta: i32, axis: Axis) -> WindowResult<()> {
    let ph = self.axis_size(comb, axis)? as i64;
    let target_size = self.axis_size(target, axis)? as i64;
    let denom = ph - target_size - delta as i64;

    let delta1: i64 = if denom <= 0 {
      2 * ph * ph
    } else {
      (delta as i64) * ph * 100 / (denom * 100)
    };

    let inflated = (target_size + delta1).max(0) as u16;
    self.set_size(target, inflated, true, axis)?;
    self.set_size(comb, ph as u16, false, axis)?;
    Ok(())
  }

  /// `enlarge(n, horizontal)`: grow the selected window by `n` along the
  /// chosen axis, stealing from a sibling or (if none has room) the
  /// inflate-and-reshrink fallback.
  pub fn enlarge(&mut self, n: u16, horizontal: bool) -> WindowResult<()> {
    let axis = if horizontal { Axis::Width } else { Axis::Height };
    self.change_size(n as i32, axis)
  }

  /// `shrink(n, horizontal)`: the mirror of [`Tree::enlarge`].
  pub fn shrink(&mut self, n: u16, horizontal: bool) -> WindowResult<()> {
    let axis = if horizontal { Axis::Width } else { Axis::Height };
    self.change_size(-(n as i32), axis)
  }
}

#[cfg(test)]
mod resize_tests {
  use super::*;
  use crate::buffer::Buffer;
  use crate::config::Config;

  #[test]
  fn apportion_preserves_sum_exactly() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    let a = tree.split(root, Some(20), true).unwrap();
    let b = tree.split(a, Some(20), true).unwrap();
    let _c = b;

    let parent = tree.node(root).unwrap().header.parent.unwrap();
    tree.set_width(parent, 160, false).unwrap();

    let children_total: u32 = {
      let mut total = 0u32;
      let mut cur = tree.node(parent).unwrap().first_child().unwrap();
      loop {
        total += tree.node(cur).unwrap().header.width as u32;
        match tree.node(cur).unwrap().header.next {
          Some(n) => cur = n,
          None => break,
        }
      }
      total
    };
    assert_eq!(children_total, 160);
  }

  #[test]
  fn enlarge_steals_from_next_sibling() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    tree.split(root, Some(12), false).unwrap();
    tree.select(root).unwrap();

    tree.enlarge(3, false).unwrap();
    assert_eq!(tree.node(root).unwrap().header.height, 15);
  }

  #[test]
  fn shrink_below_minimum_deletes_window_and_collapses_parent() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    let bottom = tree.split(root, Some(12), false).unwrap();
    let parent = tree.node(root).unwrap().header.parent.unwrap();
    // force the top leaf down near the minimum, as if prior resizes had
    // already squeezed it there (keeping the pair's total constant).
    tree.node_mut(root).unwrap().header.height = 3;
    tree.node_mut(bottom).unwrap().header.height = 20;
    tree.node_mut(bottom).unwrap().header.top = 3;
    tree.select(root).unwrap();

    tree.shrink(1, false).unwrap();

    assert!(tree.node(root).is_err());
    assert!(tree.node(parent).is_err());
    let screen = tree.screen(screen_id).unwrap();
    assert_eq!(screen.root_window, bottom);
  }

  #[test]
  fn shrink_below_minimum_deletes_nested_combination_and_collapses_grandparent() {
    // `find_resize_target` can return a *combination*, not just a leaf,
    // whenever the selected leaf's immediate parent is the wrong
    // orientation for the axis being resized: root's parent here is an
    // h-combination `H` (wrong orientation for a height change), nested
    // inside the outer v-combination `V` that also holds `bottom`. Shrinking
    // root's height must delete the whole `H` subtree (both `root` and
    // `right`), not just `root`, and collapse `V` into `bottom`.
    let mut tree = Tree::new(Config::builder().window_min_width(2).build());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;

    let bottom = tree.split(root, Some(12), false).unwrap(); // V { root, bottom }
    let right = tree.split(root, Some(6), true).unwrap(); // H { root, right }, nested in V
    let h = tree.node(root).unwrap().header.parent.unwrap();
    let v = tree.node(bottom).unwrap().header.parent.unwrap();
    assert_ne!(h, v);
    tree.select(root).unwrap();

    tree.shrink(9, false).unwrap();

    assert!(tree.node(h).is_err(), "the h-combination subtree must have been deleted");
    assert!(tree.node(root).is_err());
    assert!(tree.node(right).is_err());
    assert!(tree.node(v).is_err(), "v must have collapsed into its sole remaining child");
    let screen = tree.screen(screen_id).unwrap();
    assert_eq!(screen.root_window, bottom);
    assert_eq!(screen.selected_window, bottom);
  }

  #[test]
  fn enlarge_height_on_lone_window_screen_steals_from_minibuffer() {
    // A fresh single-window screen has no h/v-combination at all: the root
    // and minibuffer are siblings with no shared parent. Growing the root's
    // height must still work by stealing from the minibuffer directly,
    // per `original_source/src/window.c`'s `change_window_height`.
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    let mini = tree.screen(screen_id).unwrap().minibuffer_window;
    assert!(tree.node(root).unwrap().header.parent.is_none());
    tree.select(root).unwrap();

    let root_height_before = tree.node(root).unwrap().header.height;
    let mini_height_before = tree.node(mini).unwrap().header.height;

    tree.enlarge(1, false).unwrap();

    assert_eq!(tree.node(root).unwrap().header.height, root_height_before + 1);
    assert_eq!(tree.node(mini).unwrap().header.height, mini_height_before - 1);
  }

  #[test]
  fn change_width_on_lone_window_screen_is_no_such_sibling() {
    // Root and minibuffer always share `width` (`add_screen`), so growing
    // width with no h-combination ancestor has no legitimate donor — this
    // is spec.md §7's literal "`change_height` with width on a
    // single-column screen" case.
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("x");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let root = tree.screen(screen_id).unwrap().root_window;
    tree.select(root).unwrap();

    let err = tree.enlarge(1, true).unwrap_err();
    assert!(matches!(err, WindowErr::NoSuchSibling(_)));
  }
}
