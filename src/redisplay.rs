//! The redisplay collaborator's view of a leaf window.
//!
//! spec.md §1 treats redisplay as an external module: it draws nothing
//! here, but it does read and write a handful of per-leaf fields
//! (`window_end_pos`, `last_modified`, `force_start`, `start_at_line_beg`,
//! `update_mode_line`) across every redraw. Grouping them in one struct
//! keeps that redisplay-facing state visibly separate from the topology
//! and buffer-binding state the window tree itself owns and mutates.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Hints a leaf window carries for its redisplay cycle. The window tree
/// never reads these for its own decisions; it only resets them at the
/// moments spec.md calls for (e.g. `set_buffer` resets `last_modified`).
pub struct RedisplayHints {
  /// Buffer modification counter as of the last redraw. A cached layout is
  /// valid iff `last_modified >= buffer.modiff()` (spec.md §5).
  pub last_modified: u64,
  /// Char position of the last visible character, set by redisplay after
  /// drawing.
  pub window_end_pos: usize,
  /// Screen row of the last visible character.
  pub window_end_vpos: u16,
  /// Redisplay must redraw this window's mode line on the next cycle.
  pub update_mode_line: bool,
  /// Column of `pointm` as of the last redraw (for cursor-motion
  /// shortcuts).
  pub last_point_x: u16,
  /// Row of `pointm` as of the last redraw.
  pub last_point_y: u16,
}

impl RedisplayHints {
  /// A leaf's cached layout is reusable iff its last redraw happened at or
  /// after the buffer's current modification count.
  pub fn is_valid_for(&self, buffer_modiff: u64) -> bool {
    self.last_modified >= buffer_modiff
  }
}

#[cfg(test)]
mod redisplay_tests {
  use super::*;

  #[test]
  fn validity_tracks_modiff() {
    let mut hints = RedisplayHints::default();
    hints.last_modified = 5;
    assert!(hints.is_valid_for(5));
    assert!(hints.is_valid_for(3));
    assert!(!hints.is_valid_for(6));
  }
}
