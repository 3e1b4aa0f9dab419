//! The literal end-to-end scenarios of spec.md §8, each as its own
//! top-level integration test rather than folded into a unit test module,
//! since they exercise the public API across several components at once
//! (split + resize + delete + snapshot + LRU) rather than one module in
//! isolation.

use wintree::buffer::{Buffer, BufferDirectory};
use wintree::config::Config;
use wintree::tree::traverse::{MiniBufferPolicy, Scope};
use wintree::tree::Tree;

/// Row 1: splitting a lone root on an 80x24 screen with a one-line
/// minibuffer leaves 23 usable rows, split 12/11.
#[test]
fn scenario_split_lone_root() {
  let mut tree = Tree::new(Config::default());
  let buf = Buffer::new("hello");
  let screen_id = tree.add_screen(80, 24, &buf, true);
  let root = tree.screen(screen_id).unwrap().root_window;

  let new_leaf = tree.split(root, None, false).unwrap();

  assert_eq!(tree.node(root).unwrap().header.height, 12);
  assert_eq!(tree.node(new_leaf).unwrap().header.height, 11);
  assert!(tree.node(root).unwrap().header.parent.is_some());
  let b1 = tree.buffer_of(root).unwrap().unwrap();
  let b2 = tree.buffer_of(new_leaf).unwrap().unwrap();
  assert_eq!(b1.borrow().id(), b2.borrow().id());
}

/// Row 2: a two-leaf v-combination with equal 12/12 heights; enlarging
/// the top leaf by 3 steals from its sibling: 15/9.
#[test]
fn scenario_enlarge_steals_from_sibling() {
  let mut tree = Tree::new(Config::default());
  let buf = Buffer::new("hello");
  let screen_id = tree.add_screen(80, 24, &buf, true);
  let root = tree.screen(screen_id).unwrap().root_window;
  let bottom = tree.split(root, Some(12), false).unwrap();
  // The default split on a 23-row usable root gives 12/11; force the
  // literal scenario's exact 12/12 starting point.
  tree.node_mut(bottom).unwrap().header.height = 12;
  let parent = tree.node(root).unwrap().header.parent.unwrap();
  tree.node_mut(parent).unwrap().header.height = 24;
  tree.select(root).unwrap();

  tree.enlarge(3, false).unwrap();

  assert_eq!(tree.node(root).unwrap().header.height, 15);
  assert_eq!(tree.node(bottom).unwrap().header.height, 9);
}

/// Row 3: a two-leaf v-combination where the top leaf sits right at
/// `window_min_height`; shrinking it by 1 deletes it and collapses the
/// parent into the sole remaining leaf.
#[test]
fn scenario_shrink_below_minimum_deletes_and_collapses() {
  let mut tree = Tree::new(Config::default());
  let buf = Buffer::new("hello");
  let screen_id = tree.add_screen(80, 24, &buf, true);
  let root = tree.screen(screen_id).unwrap().root_window;
  let bottom = tree.split(root, Some(12), false).unwrap();
  let parent = tree.node(root).unwrap().header.parent.unwrap();
  tree.node_mut(root).unwrap().header.height = 4; // == window_min_height
  tree.node_mut(bottom).unwrap().header.height = 19;
  tree.node_mut(bottom).unwrap().header.top = 4;
  tree.select(root).unwrap();

  tree.shrink(1, false).unwrap();

  assert!(tree.node(root).is_err(), "top window must have been deleted");
  assert!(tree.node(parent).is_err(), "degenerate parent must have collapsed");
  assert_eq!(tree.screen(screen_id).unwrap().root_window, bottom);
}

/// Row 4: three h-combination siblings with widths 20/20/40 in a parent
/// 80 wide; widening the parent to 160 apportions by the shifted-add
/// rounding formula (~40/40/80) and keeps every child at or above the
/// configured minimum.
#[test]
fn scenario_set_width_apportions_proportionally() {
  let mut tree = Tree::new(Config::default());
  let buf = Buffer::new("hello");
  let screen_id = tree.add_screen(80, 24, &buf, true);
  let root = tree.screen(screen_id).unwrap().root_window;
  let second = tree.split(root, Some(20), true).unwrap();
  let _third = tree.split(second, Some(20), true).unwrap();
  let parent = tree.node(root).unwrap().header.parent.unwrap();

  tree.set_width(parent, 160, false).unwrap();

  let mut cur = tree.node(parent).unwrap().first_child().unwrap();
  let mut widths = Vec::new();
  loop {
    let n = tree.node(cur).unwrap();
    widths.push(n.header.width);
    assert!(n.header.width >= tree.config().window_min_width());
    match n.header.next {
      Some(next) => cur = next,
      None => break,
    }
  }
  assert_eq!(widths.iter().map(|&w| w as u32).sum::<u32>(), 160);
  assert_eq!(widths, vec![40, 40, 80]);
}

/// Row 5: an arbitrarily mutated configuration is restored byte-for-byte
/// (topology, geometry and markers) from a snapshot taken earlier.
#[test]
fn scenario_restore_configuration_after_arbitrary_mutation() {
  let mut tree = Tree::new(Config::default());
  let buf = Buffer::new("one two three four five\nsix seven eight\n");
  let directory = {
    let mut d = BufferDirectory::new();
    d.register(buf.clone());
    d
  };
  let screen_id = tree.add_screen(80, 24, &buf, true);
  let root = tree.screen(screen_id).unwrap().root_window;
  let second = tree.split(root, Some(10), false).unwrap();
  tree.select(second).unwrap();
  tree.set_point(second, 4).unwrap();

  let saved = tree.current_window_configuration().unwrap();
  let saved_edges: Vec<_> = tree
    .window_list(Scope::Screen(screen_id), MiniBufferPolicy::IncludeAlways)
    .unwrap()
    .iter()
    .map(|&id| tree.edges(id).unwrap())
    .collect();

  tree.split(root, None, true).unwrap();
  tree.enlarge(2, false).unwrap();
  tree.select(root).unwrap();
  tree.set_point(root, 2).unwrap();

  tree.set_window_configuration(&saved, &directory).unwrap();

  let restored_edges: Vec<_> = tree
    .window_list(Scope::Screen(screen_id), MiniBufferPolicy::IncludeAlways)
    .unwrap()
    .iter()
    .map(|&id| tree.edges(id).unwrap())
    .collect();
  assert_eq!(restored_edges, saved_edges);
  assert_eq!(tree.screen(screen_id).unwrap().selected_window, second);
  assert_eq!(tree.point_of(second).unwrap(), 4);
}

/// Row 6: among two non-selected leaves, `get_lru_window` returns the one
/// with the smaller `use_time`.
#[test]
fn scenario_lru_window_picks_smallest_use_time() {
  let mut tree = Tree::new(Config::default());
  let buf = Buffer::new("hello");
  let screen_id = tree.add_screen(80, 24, &buf, true);
  let root = tree.screen(screen_id).unwrap().root_window;
  let w2 = tree.split(root, None, false).unwrap();

  tree.select(w2).unwrap();
  tree.select(root).unwrap();
  tree.select(w2).unwrap();
  tree.select(root).unwrap();
  // w2 was selected twice, root (w1) selected last and is currently
  // selected; deselect root by selecting w2 then back isn't needed here —
  // both are non-selected relative to each other only via use_time order,
  // so exercise the literal "w1 use_time=5, w2 use_time=3" shape directly.
  tree.node_mut(root).unwrap().header.use_time = 5;
  tree.node_mut(w2).unwrap().header.use_time = 3;

  let lru = tree.get_lru_window(Scope::Screen(screen_id)).unwrap().unwrap();
  assert_eq!(lru, w2);
}
