//! The window tree: one arena of [`Node`]s per editor, partitioned into one
//! or more [`Screen`]s, each screen's nodes tiling that screen's rectangle
//! exactly. Each component below lives in its own sibling module, all as
//! `impl Tree` blocks over this one type.

pub mod binding;
pub mod context;
pub mod display;
pub mod mutate;
pub mod node;
pub mod resize;
pub mod scroll;
pub mod snapshot;
pub mod split_delete;
pub mod traverse;

pub use context::Context;
pub use node::{LeafContent, Node, NodeId, NodeKind, ScreenId};
pub use snapshot::{is_window_configuration, WindowConfiguration};

use crate::buffer::{point, set_point, BufferId, BufferRc};
use crate::config::Config;
use crate::error::{WindowErr, WindowResult};
use crate::prelude::HashMap;

#[derive(Debug, Clone)]
/// A screen's fixed properties and the three windows that are always
/// meaningful relative to it. Conceptually a collaborator external to the
/// window tree, but tightly enough coupled (every split, delete and resize
/// reads or writes it) that the tree owns it directly, the way a terminal
/// editor's window and frame/screen structs usually live side by side.
pub struct Screen {
  pub width: u16,
  pub height: u16,
  pub root_window: NodeId,
  pub minibuffer_window: NodeId,
  pub selected_window: NodeId,
  pub wants_modeline: bool,
  pub no_split: bool,
}

#[derive(Debug, Default)]
pub struct Tree {
  pub(crate) context: Context,
  pub(crate) config: Config,
  pub(crate) nodes: HashMap<NodeId, Node>,
  pub(crate) screens: HashMap<ScreenId, Screen>,
  /// Creation order of screens, used for `all_screens` traversal's
  /// "next screen" step.
  pub(crate) screen_order: Vec<ScreenId>,
  pub(crate) selected_screen: ScreenId,
  next_screen_id: ScreenId,
  /// Non-zero while `minibuf_level` > 0, i.e. a recursive minibuffer is
  /// active; `MiniBufferPolicy::IncludeIfActive` consults it.
  pub(crate) minibuf_level: u32,
}

impl Tree {
  pub fn new(config: Config) -> Self {
    Tree {
      context: Context::new(),
      config,
      nodes: HashMap::default(),
      screens: HashMap::default(),
      screen_order: Vec::new(),
      selected_screen: 0,
      next_screen_id: 0,
      minibuf_level: 0,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn config_mut(&mut self) -> &mut Config {
    &mut self.config
  }

  pub fn context(&self) -> &Context {
    &self.context
  }

  /// Whether an active recursive minibuffer is open (`minibuf_level > 0`).
  pub fn minibuffer_active(&self) -> bool {
    self.minibuf_level > 0
  }

  pub fn set_minibuffer_active(&mut self, active: bool) {
    if active {
      self.minibuf_level += 1;
    } else if self.minibuf_level > 0 {
      self.minibuf_level -= 1;
    }
  }

  /// Create a new screen with a single root leaf (showing `buffer`) and a
  /// one-line minibuffer sibling, and select it.
  pub fn add_screen(&mut self, width: u16, height: u16, buffer: &BufferRc, wants_modeline: bool) -> ScreenId {
    let screen_id = self.next_screen_id;
    self.next_screen_id += 1;

    let mini_height = 1;
    let root_height = height.saturating_sub(mini_height).max(1);

    let root_id = self.alloc_leaf(screen_id);
    {
      let root = self.node_mut(root_id).unwrap();
      root.header.left = 0;
      root.header.top = 0;
      root.header.width = width;
      root.header.height = root_height;
    }
    self.bind_buffer_raw(root_id, buffer);

    let mini_id = self.alloc_leaf(screen_id);
    {
      let mini = self.node_mut(mini_id).unwrap();
      mini.header.left = 0;
      mini.header.top = root_height;
      mini.header.width = width;
      mini.header.height = mini_height;
    }
    self.bind_buffer_raw(mini_id, buffer);

    {
      let root = self.node_mut(root_id).unwrap();
      root.header.next = Some(mini_id);
    }
    {
      let mini = self.node_mut(mini_id).unwrap();
      mini.header.prev = Some(root_id);
    }

    self.screens.insert(
      screen_id,
      Screen {
        width,
        height,
        root_window: root_id,
        minibuffer_window: mini_id,
        selected_window: root_id,
        wants_modeline,
        no_split: false,
      },
    );
    self.screen_order.push(screen_id);
    if self.screen_order.len() == 1 {
      self.selected_screen = screen_id;
    }
    screen_id
  }

  pub fn screen(&self, id: ScreenId) -> WindowResult<&Screen> {
    self.screens.get(&id).ok_or(WindowErr::NoSuchScreen(id))
  }

  pub fn screen_mut(&mut self, id: ScreenId) -> WindowResult<&mut Screen> {
    self.screens.get_mut(&id).ok_or(WindowErr::NoSuchScreen(id))
  }

  pub fn selected_screen_id(&self) -> ScreenId {
    self.selected_screen
  }

  /// Allocate a bare leaf in `screen_id` with zero geometry. Callers must
  /// set geometry and link it into the tree before it's observable through
  /// any public API.
  pub(crate) fn alloc_leaf(&mut self, screen_id: ScreenId) -> NodeId {
    let id = self.context.next_node_id();
    let seq = self.context.next_sequence_number();
    self.nodes.insert(id, Node::new_leaf(id, seq, screen_id));
    id
  }

  pub(crate) fn alloc_combination(
    &mut self,
    screen_id: ScreenId,
    horizontal: bool,
    first_child: NodeId,
  ) -> NodeId {
    let id = self.context.next_node_id();
    let seq = self.context.next_sequence_number();
    self
      .nodes
      .insert(id, Node::new_combination(id, seq, screen_id, horizontal, first_child));
    id
  }

  pub fn node(&self, id: NodeId) -> WindowResult<&Node> {
    self
      .nodes
      .get(&id)
      .ok_or(WindowErr::DeletedWindow(id))
  }

  pub fn node_mut(&mut self, id: NodeId) -> WindowResult<&mut Node> {
    self
      .nodes
      .get_mut(&id)
      .ok_or(WindowErr::DeletedWindow(id))
  }

  pub fn is_window(&self, id: NodeId) -> bool {
    self.nodes.contains_key(&id)
  }

  pub fn is_minibuffer(&self, id: NodeId) -> WindowResult<bool> {
    let node = self.node(id)?;
    let screen = self.screen(node.header.screen_id)?;
    Ok(screen.minibuffer_window == id)
  }

  pub fn selected_window(&self) -> NodeId {
    self.screens[&self.selected_screen].selected_window
  }

  pub fn minibuffer_window(&self, screen_id: ScreenId) -> WindowResult<NodeId> {
    Ok(self.screen(screen_id)?.minibuffer_window)
  }

  pub fn root_window(&self, screen_id: ScreenId) -> WindowResult<NodeId> {
    Ok(self.screen(screen_id)?.root_window)
  }

  fn leaf(&self, id: NodeId) -> WindowResult<&LeafContent> {
    self
      .node(id)?
      .leaf()
      .ok_or(WindowErr::ArgumentTypeMismatch { node: id, expected: "leaf" })
  }

  fn leaf_mut(&mut self, id: NodeId) -> WindowResult<&mut LeafContent> {
    self
      .node_mut(id)?
      .leaf_mut()
      .ok_or(WindowErr::ArgumentTypeMismatch { node: id, expected: "leaf" })
  }

  pub fn buffer_of(&self, id: NodeId) -> WindowResult<Option<BufferRc>> {
    Ok(self.leaf(id)?.buffer.as_ref().and_then(|b| b.upgrade()))
  }

  /// Usable interior height: `height - 1` if a mode line is shown for this
  /// leaf, else `height`.
  pub fn height(&self, id: NodeId) -> WindowResult<u16> {
    let node = self.node(id)?;
    let screen = self.screen(node.header.screen_id)?;
    let shows_modeline = screen.wants_modeline && screen.minibuffer_window != id;
    Ok(if shows_modeline {
      node.header.height.saturating_sub(1)
    } else {
      node.header.height
    })
  }

  /// Usable interior width: `width - 1` unless the leaf abuts the screen's
  /// right edge.
  pub fn width(&self, id: NodeId) -> WindowResult<u16> {
    let node = self.node(id)?;
    let screen = self.screen(node.header.screen_id)?;
    let abuts_right_edge = node.header.left + node.header.width >= screen.width;
    Ok(if abuts_right_edge {
      node.header.width
    } else {
      node.header.width.saturating_sub(1)
    })
  }

  pub fn hscroll(&self, id: NodeId) -> WindowResult<u16> {
    Ok(self.leaf(id)?.hscroll)
  }

  pub fn set_hscroll(&mut self, id: NodeId, columns: u16) -> WindowResult<()> {
    self.leaf_mut(id)?.hscroll = columns;
    Ok(())
  }

  pub fn is_dedicated(&self, id: NodeId) -> WindowResult<bool> {
    Ok(self.leaf(id)?.dedicated)
  }

  pub fn display_table(&self, id: NodeId) -> WindowResult<Option<u32>> {
    Ok(self.leaf(id)?.display_table)
  }

  pub fn set_display_table(&mut self, id: NodeId, table: Option<u32>) -> WindowResult<()> {
    self.leaf_mut(id)?.display_table = table;
    Ok(())
  }

  /// `(left, top, right, bottom)`.
  pub fn edges(&self, id: NodeId) -> WindowResult<(u16, u16, u16, u16)> {
    Ok(self.node(id)?.edges())
  }

  pub fn point_of(&self, id: NodeId) -> WindowResult<usize> {
    let leaf = self.leaf(id)?;
    match (&leaf.buffer, self.is_selected(id)) {
      (Some(buf), true) => Ok(buf.upgrade().map(|b| point(&b)).unwrap_or(0)),
      (Some(_), false) => Ok(leaf.pointm.as_ref().and_then(|m| m.position()).unwrap_or(0)),
      (None, _) => Err(WindowErr::DeletedWindow(id)),
    }
  }

  pub fn start_of(&self, id: NodeId) -> WindowResult<usize> {
    Ok(self.leaf(id)?.start.as_ref().and_then(|m| m.position()).unwrap_or(0))
  }

  pub fn set_start(&mut self, id: NodeId, pos: usize, noforce: bool) -> WindowResult<()> {
    let leaf = self.leaf_mut(id)?;
    if let Some(start) = &leaf.start {
      crate::buffer::set_marker(start, pos);
    }
    leaf.force_start = !noforce;
    Ok(())
  }

  pub fn end_of(&self, id: NodeId) -> WindowResult<usize> {
    Ok(self.leaf(id)?.hints.window_end_pos)
  }

  fn is_selected(&self, id: NodeId) -> bool {
    self
      .node(id)
      .ok()
      .map(|n| {
        self
          .screen(n.header.screen_id)
          .map(|s| s.selected_window == id)
          .unwrap_or(false)
      })
      .unwrap_or(false)
  }

  /// Whether `pos` is currently within `[start, end]` of window `id`.
  pub fn position_visible_p(&self, pos: usize, id: NodeId) -> WindowResult<bool> {
    let leaf = self.leaf(id)?;
    let start = leaf.start.as_ref().and_then(|m| m.position()).unwrap_or(0);
    Ok(pos >= start && pos <= leaf.hints.window_end_pos)
  }

  /// Find the leaf under `(x, y)` on `screen_id`, and whether that point
  /// falls on its mode line row.
  pub fn window_from_coordinates(
    &self,
    screen_id: ScreenId,
    x: u16,
    y: u16,
  ) -> WindowResult<Option<(NodeId, bool)>> {
    let screen = self.screen(screen_id)?;
    for id in self.leaves_of_screen(screen_id) {
      let node = self.node(id)?;
      let (left, top, right, bottom) = node.edges();
      if x >= left && x < right && y >= top && y < bottom {
        let shows_modeline =
          screen.wants_modeline && screen.minibuffer_window != id && y == bottom - 1;
        return Ok(Some((id, shows_modeline)));
      }
    }
    Ok(None)
  }

  pub(crate) fn leaves_of_screen(&self, screen_id: ScreenId) -> Vec<NodeId> {
    self
      .nodes
      .values()
      .filter(|n| n.header.screen_id == screen_id && n.is_leaf())
      .map(|n| n.header.id)
      .collect()
  }

  fn bind_buffer_raw(&mut self, id: NodeId, buffer: &BufferRc) {
    let b = buffer.borrow();
    let last_start = b.last_window_start();
    let pt = point(buffer);
    drop(b);
    let start = crate::buffer::create_marker(buffer, last_start);
    let pointm = crate::buffer::create_marker(buffer, pt);
    set_point(buffer, pt);
    let leaf = self.leaf_mut(id).unwrap();
    leaf.buffer = Some(std::rc::Rc::downgrade(buffer));
    leaf.last_buffer_id = Some(buffer.borrow().id());
    leaf.start = Some(start);
    leaf.pointm = Some(pointm);
  }
}

#[cfg(test)]
mod tree_tests {
  use super::*;
  use crate::buffer::Buffer;

  #[test]
  fn add_screen_splits_off_one_line_minibuffer() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("hello");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let screen = tree.screen(screen_id).unwrap();
    assert_eq!(tree.node(screen.root_window).unwrap().header.height, 23);
    assert_eq!(tree.node(screen.minibuffer_window).unwrap().header.height, 1);
    assert_eq!(tree.node(screen.root_window).unwrap().header.next, Some(screen.minibuffer_window));
    assert!(tree.is_minibuffer(screen.minibuffer_window).unwrap());
    assert!(!tree.is_minibuffer(screen.root_window).unwrap());
  }

  #[test]
  fn usable_height_accounts_for_modeline() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("hello");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let screen = tree.screen(screen_id).unwrap();
    // root shows a mode line, minibuffer does not.
    assert_eq!(tree.height(screen.root_window).unwrap(), 22);
    assert_eq!(tree.height(screen.minibuffer_window).unwrap(), 1);
  }

  #[test]
  fn edges_and_width_abutting_right_edge() {
    let mut tree = Tree::new(Config::default());
    let buf = Buffer::new("hello");
    let screen_id = tree.add_screen(80, 24, &buf, true);
    let screen = tree.screen(screen_id).unwrap();
    assert_eq!(tree.edges(screen.root_window).unwrap(), (0, 0, 80, 23));
    // abuts the screen's right edge, so no separator column is subtracted.
    assert_eq!(tree.width(screen.root_window).unwrap(), 80);
  }
}
