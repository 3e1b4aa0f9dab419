//! Errors and results.

use crate::buffer::BufferId;
use crate::tree::{NodeId, ScreenId};
use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
/// All error kinds a window-tree operation can signal. Carried the way the
/// host's own signal mechanism would carry them: as a typed, unwindable
/// value, never silently swallowed.
pub enum WindowErr {
  #[error("wrong type: expected {expected}, node {0:?} is not one", .node)]
  ArgumentTypeMismatch { node: NodeId, expected: &'static str },

  #[error("window {0:?} has no sibling to steal size from")]
  NoSuchSibling(NodeId),

  #[error("split would leave a window below the minimum size ({min} < required)")]
  MinSizeViolation { min: u16 },

  #[error("cannot delete the only ordinary window left on the screen")]
  AttemptOnSoleOrdinaryWindow,

  #[error("operation not allowed on the minibuffer window")]
  AttemptOnMinibuffer,

  #[error("window {0:?} is dedicated to a different buffer than {1:?}")]
  DedicatedViolation(NodeId, BufferId),

  #[error("window {0:?} has already been deleted")]
  DeletedWindow(NodeId),

  #[error("beginning of buffer")]
  BeginningOfBuffer,

  #[error("end of buffer")]
  EndOfBuffer,

  #[error("saved configuration's screen size does not match the current screen")]
  ScreenSizeMismatch,

  #[error("screen does not allow splitting")]
  UnsplittableScreen,

  #[error("no such screen {0:?}")]
  NoSuchScreen(ScreenId),
}

/// [`std::result::Result`] with `T` if ok, [`WindowErr`] if error.
pub type WindowResult<T> = std::result::Result<T, WindowErr>;
