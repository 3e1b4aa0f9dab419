//! Process-wide bookkeeping, encapsulated per-instance.
//!
//! `selected_window`, `minibuf_window`, `windows_or_buffers_changed`,
//! `sequence_number` and `window_select_count` are conceptually
//! process-wide counters, but they live on an explicit context object
//! instead of true globals, specifically so tests can build independent
//! trees that don't share counters. [`Context`] is that object;
//! [`crate::tree::Tree`] owns one.

#[derive(Debug, Clone, Default)]
pub struct Context {
  next_sequence_number: u64,
  next_node_id: u64,
  use_time_counter: u64,
  windows_or_buffers_changed: u64,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  /// Allocate the next monotonic `sequence_number` for a newly created node.
  pub fn next_sequence_number(&mut self) -> u64 {
    self.next_sequence_number += 1;
    self.next_sequence_number
  }

  /// Allocate the next arena handle.
  pub fn next_node_id(&mut self) -> u64 {
    self.next_node_id += 1;
    self.next_node_id
  }

  /// Bump and return the `use_time` counter (a.k.a. `window_select_count`),
  /// used to timestamp window selection for LRU search.
  pub fn bump_use_time(&mut self) -> u64 {
    self.use_time_counter += 1;
    self.use_time_counter
  }

  /// Current value without bumping, for tests that want to assert ordering.
  pub fn use_time_counter(&self) -> u64 {
    self.use_time_counter
  }

  /// Signal the redisplay collaborator that topology or buffer bindings
  /// changed. Write-only from the tree's perspective: a host polls this
  /// between redraws and compares against the value it last observed.
  pub fn mark_windows_or_buffers_changed(&mut self) {
    self.windows_or_buffers_changed += 1;
  }

  pub fn windows_or_buffers_changed(&self) -> u64 {
    self.windows_or_buffers_changed
  }
}

#[cfg(test)]
mod context_tests {
  use super::*;

  #[test]
  fn counters_are_independent_per_instance() {
    let mut a = Context::new();
    let mut b = Context::new();
    a.next_node_id();
    a.next_node_id();
    assert_eq!(b.next_node_id(), 1);
  }

  #[test]
  fn sequence_number_and_use_time_are_monotonic() {
    let mut ctx = Context::new();
    let s1 = ctx.next_sequence_number();
    let s2 = ctx.next_sequence_number();
    assert!(s2 > s1);
    let u1 = ctx.bump_use_time();
    let u2 = ctx.bump_use_time();
    assert!(u2 > u1);
  }
}
