//! Window node & tree model.
//!
//! A single record shape serves both leaves and combinations, the
//! discriminant enforced by construction rather than by a loose "one of
//! these fields is set" convention: [`NodeKind`] is a proper tagged union,
//! `Leaf | HCombination | VCombination`, and shared geometry/topology lives
//! in [`NodeHeader`]. Cross-node references are arena handles ([`NodeId`]),
//! never direct pointers, so `parent`/`prev`/`next`/`hchild`/`vchild` can all
//! be rewritten in place without fighting the borrow checker over a cyclic
//! ownership graph.

use crate::buffer::{BufferId, BufferWk, Marker};
use crate::redisplay::RedisplayHints;

/// Arena handle for a window node. Stable for the node's lifetime; never
/// reused even after the node is deleted, so a stale handle reliably fails
/// lookups instead of aliasing an unrelated later node.
pub type NodeId = u64;

/// Which screen a node belongs to.
pub type ScreenId = u32;

#[derive(Debug, Clone)]
pub struct NodeHeader {
  pub id: NodeId,
  pub sequence_number: u64,
  pub use_time: u64,
  pub screen_id: ScreenId,

  pub parent: Option<NodeId>,
  pub prev: Option<NodeId>,
  pub next: Option<NodeId>,

  pub left: u16,
  pub top: u16,
  pub width: u16,
  pub height: u16,
}

#[derive(Debug, Clone)]
/// Leaf-only content: what buffer it shows and where.
pub struct LeafContent {
  /// `None` means this leaf has been deleted: the node record can still
  /// be looked at briefly while being torn down, but no operation besides
  /// teardown should touch it.
  pub buffer: Option<BufferWk>,
  /// Retained even after `buffer` is cleared, so restore can tell what a
  /// leaf *used* to show.
  pub last_buffer_id: Option<BufferId>,
  pub start: Option<Marker>,
  pub pointm: Option<Marker>,
  pub hscroll: u16,
  /// Opaque override handle; the window tree never interprets it.
  pub display_table: Option<u32>,
  pub dedicated: bool,
  pub start_at_line_beg: bool,
  pub force_start: bool,
  pub hints: RedisplayHints,
}

impl LeafContent {
  fn new() -> Self {
    LeafContent {
      buffer: None,
      last_buffer_id: None,
      start: None,
      pointm: None,
      hscroll: 0,
      display_table: None,
      dedicated: false,
      start_at_line_beg: true,
      force_start: false,
      hints: RedisplayHints::default(),
    }
  }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
  Leaf(LeafContent),
  /// Children share `top`/`height`; their `width`s tile the parent's.
  HCombination { first_child: NodeId },
  /// Children share `left`/`width`; their `height`s tile the parent's.
  VCombination { first_child: NodeId },
}

#[derive(Debug, Clone)]
pub struct Node {
  pub header: NodeHeader,
  pub kind: NodeKind,
}

impl Node {
  pub fn new_leaf(id: NodeId, sequence_number: u64, screen_id: ScreenId) -> Self {
    Node {
      header: NodeHeader {
        id,
        sequence_number,
        use_time: 0,
        screen_id,
        parent: None,
        prev: None,
        next: None,
        left: 0,
        top: 0,
        width: 0,
        height: 0,
      },
      kind: NodeKind::Leaf(LeafContent::new()),
    }
  }

  pub fn new_combination(
    id: NodeId,
    sequence_number: u64,
    screen_id: ScreenId,
    horizontal: bool,
    first_child: NodeId,
  ) -> Self {
    Node {
      header: NodeHeader {
        id,
        sequence_number,
        use_time: 0,
        screen_id,
        parent: None,
        prev: None,
        next: None,
        left: 0,
        top: 0,
        width: 0,
        height: 0,
      },
      kind: if horizontal {
        NodeKind::HCombination { first_child }
      } else {
        NodeKind::VCombination { first_child }
      },
    }
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, NodeKind::Leaf(_))
  }

  pub fn is_hcombination(&self) -> bool {
    matches!(self.kind, NodeKind::HCombination { .. })
  }

  pub fn is_vcombination(&self) -> bool {
    matches!(self.kind, NodeKind::VCombination { .. })
  }

  pub fn leaf(&self) -> Option<&LeafContent> {
    match &self.kind {
      NodeKind::Leaf(l) => Some(l),
      _ => None,
    }
  }

  pub fn leaf_mut(&mut self) -> Option<&mut LeafContent> {
    match &mut self.kind {
      NodeKind::Leaf(l) => Some(l),
      _ => None,
    }
  }

  pub fn first_child(&self) -> Option<NodeId> {
    match self.kind {
      NodeKind::HCombination { first_child } | NodeKind::VCombination { first_child } => {
        Some(first_child)
      }
      NodeKind::Leaf(_) => None,
    }
  }

  pub fn set_first_child(&mut self, child: NodeId) {
    match &mut self.kind {
      NodeKind::HCombination { first_child } | NodeKind::VCombination { first_child } => {
        *first_child = child;
      }
      NodeKind::Leaf(_) => panic!("leaf has no children"),
    }
  }

  /// `(left, top, right, bottom)`.
  pub fn edges(&self) -> (u16, u16, u16, u16) {
    let h = &self.header;
    (h.left, h.top, h.left + h.width, h.top + h.height)
  }
}
