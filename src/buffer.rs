//! The buffer/marker collaborator.
//!
//! The window tree treats buffers as an external module, consumed only
//! through `create_marker`, `marker_position`, `set_marker`,
//! `unchain_marker`, `point`, `begv`, `zv`. This module is that small
//! interface plus the minimal reference implementation needed to exercise
//! and test the window tree without a whole host editor attached — text
//! editing, file I/O and undo are deliberately out of scope here, so this
//! buffer is deliberately thin: it stores text, a modification counter, and
//! a marker chain, nothing else.
//!
//! Markers are never simulated with raw offsets: an offset captured before
//! an edit is meaningless after it, so every marker is chained onto its
//! buffer and shifted whenever that buffer's text changes.

use ropey::Rope;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicI32, Ordering};

/// Buffer identity. Stable even after the buffer itself is destroyed, so a
/// window can remember which buffer it *used* to show.
pub type BufferId = i32;

fn next_buffer_id() -> BufferId {
  static VALUE: AtomicI32 = AtomicI32::new(1);
  VALUE.fetch_add(1, Ordering::Relaxed)
}

/// Shared handle to a live buffer.
pub type BufferRc = Rc<RefCell<Buffer>>;
/// Non-owning handle, the kind a window should hold: a window does not keep
/// a buffer alive by looking at it.
pub type BufferWk = Weak<RefCell<Buffer>>;

#[derive(Debug)]
struct MarkerInner {
  buffer: BufferWk,
  /// `None` once unchained: the marker still exists as a handle but no
  /// longer tracks anything.
  position: Option<usize>,
}

#[derive(Debug, Clone)]
/// A position in a buffer's text that moves with edits around it.
pub struct Marker(Rc<RefCell<MarkerInner>>);

impl Marker {
  /// Current char offset, or `None` if unchained.
  pub fn position(&self) -> Option<usize> {
    self.0.borrow().position
  }

  fn set_position_raw(&self, pos: usize) {
    self.0.borrow_mut().position = Some(pos);
  }
}

impl PartialEq for Marker {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}
impl Eq for Marker {}

#[derive(Debug)]
/// The minimal buffer: text plus the bookkeeping the window tree needs.
pub struct Buffer {
  id: BufferId,
  text: Rope,
  /// Real cursor position when this buffer is current.
  point: usize,
  /// Bottom of the narrowed/visible range (beginning-of-buffer unless a
  /// host narrows it; this crate never narrows on its own).
  begv: usize,
  /// Top of the narrowed/visible range.
  zv: usize,
  /// Modification counter (`BUF_MODIFF`), bumped on every edit.
  modiff: u64,
  /// Where the last window that looked at this buffer had scrolled to,
  /// persisted by `delete_window`/`unshow_buffer` so a freshly created
  /// window resumes where the last one left off.
  last_window_start: usize,
  markers: Vec<Weak<RefCell<MarkerInner>>>,
}

impl Buffer {
  /// Create a new, empty-or-seeded buffer and wrap it for sharing.
  pub fn new(text: impl Into<String>) -> BufferRc {
    let text: Rope = Rope::from_str(&text.into());
    let len = text.len_chars();
    Rc::new(RefCell::new(Buffer {
      id: next_buffer_id(),
      text,
      point: 0,
      begv: 0,
      zv: len,
      modiff: 0,
      last_window_start: 0,
      markers: Vec::new(),
    }))
  }

  pub fn id(&self) -> BufferId {
    self.id
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  pub fn len_chars(&self) -> usize {
    self.text.len_chars()
  }

  pub fn modiff(&self) -> u64 {
    self.modiff
  }

  pub fn last_window_start(&self) -> usize {
    self.last_window_start
  }

  pub fn set_last_window_start(&mut self, pos: usize) {
    self.last_window_start = pos.min(self.text.len_chars());
  }

  /// Insert `text` at `at` (char offset) and shift `point`/markers/`zv`
  /// accordingly; bumps [`Buffer::modiff`].
  pub fn insert(&mut self, at: usize, text: &str) {
    self.text.insert(at, text);
    let n = text.chars().count();
    self.modiff += 1;
    self.shift_from(at, n as isize);
  }

  /// Delete `[start, end)` (char offsets) and shift accordingly; bumps
  /// [`Buffer::modiff`].
  pub fn delete(&mut self, start: usize, end: usize) {
    self.text.remove(start..end);
    self.modiff += 1;
    self.shift_from(end, -((end - start) as isize));
  }

  fn shift_from(&mut self, at: usize, delta: isize) {
    let shift = |pos: usize| -> usize {
      if pos < at {
        pos
      } else {
        (pos as isize + delta).max(at.min(pos) as isize).max(0) as usize
      }
    };
    self.point = shift(self.point);
    self.begv = shift(self.begv);
    self.zv = shift(self.zv).min(self.text.len_chars());
    self.last_window_start = shift(self.last_window_start);
    self.markers.retain(|m| m.strong_count() > 0);
    for weak in &self.markers {
      if let Some(inner) = weak.upgrade() {
        let mut inner = inner.borrow_mut();
        if let Some(pos) = inner.position {
          inner.position = Some(shift(pos));
        }
      }
    }
  }
}

/// Real cursor position of `buf`.
pub fn point(buf: &BufferRc) -> usize {
  buf.borrow().point
}

/// Move the real cursor position, clamped to `[begv, zv]`.
pub fn set_point(buf: &BufferRc, pos: usize) {
  let mut buf = buf.borrow_mut();
  buf.point = pos.clamp(buf.begv, buf.zv);
}

/// Bottom of the visible range.
pub fn begv(buf: &BufferRc) -> usize {
  buf.borrow().begv
}

/// Top of the visible range.
pub fn zv(buf: &BufferRc) -> usize {
  buf.borrow().zv
}

/// Create a marker chained to `buf` at `pos`.
pub fn create_marker(buf: &BufferRc, pos: usize) -> Marker {
  let pos = pos.min(buf.borrow().text.len_chars());
  let inner = Rc::new(RefCell::new(MarkerInner {
    buffer: Rc::downgrade(buf),
    position: Some(pos),
  }));
  buf.borrow_mut().markers.push(Rc::downgrade(&inner));
  Marker(inner)
}

/// Current position of `marker`, or `None` if unchained.
pub fn marker_position(marker: &Marker) -> Option<usize> {
  marker.position()
}

/// Reposition `marker` within its own buffer. No-op if unchained.
pub fn set_marker(marker: &Marker, pos: usize) {
  let buffer = marker.0.borrow().buffer.clone();
  if let Some(buf) = buffer.upgrade() {
    let pos = pos.min(buf.borrow().text.len_chars());
    marker.set_position_raw(pos);
  }
}

/// Detach `marker` from its buffer. The buffer will stop shifting it, and
/// further [`marker_position`] calls return `None`.
pub fn unchain_marker(marker: &Marker) {
  let mut inner = marker.0.borrow_mut();
  inner.position = None;
  inner.buffer = Weak::new();
}

#[derive(Debug, Default)]
/// The set of all buffers the host currently knows about. Out of this
/// crate's scope to *create* buffers for editing, but the window tree does
/// need to ask "is this buffer still alive" and "give me some other
/// buffer to fall back on" when `unshow_buffer`/`replace_buffer_in_windows`
/// need a replacement, so this tiny directory exists to answer that.
pub struct BufferDirectory {
  buffers: Vec<BufferRc>,
}

impl BufferDirectory {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, buf: BufferRc) {
    self.buffers.push(buf);
  }

  pub fn is_alive(&self, id: BufferId) -> bool {
    self.buffers.iter().any(|b| b.borrow().id() == id)
  }

  pub fn find(&self, id: BufferId) -> Option<BufferRc> {
    self.buffers.iter().find(|b| b.borrow().id() == id).cloned()
  }

  /// Some other live buffer than `exclude`, preferring the most recently
  /// registered one, mirroring the original's `Fother_buffer`. Returns
  /// `None` if `exclude` is the only buffer left — callers create a
  /// scratch buffer in that case, exactly as the original falls back to
  /// `*scratch*`.
  pub fn fallback_buffer(&self, exclude: BufferId) -> Option<BufferRc> {
    self
      .buffers
      .iter()
      .rev()
      .find(|b| b.borrow().id() != exclude)
      .cloned()
  }
}
