//! The window tree subsystem of a screen-oriented text editor.
//!
//! A screen is partitioned into non-overlapping rectangular windows by a
//! doubly-linked binary tree: internal nodes are horizontal or vertical
//! combinations, leaves view a buffer. This crate owns that tree and the
//! algorithms that keep it consistent under splitting, deleting, resizing,
//! navigating, selecting and snapshotting — it does not draw anything, bind
//! any keys, or touch the filesystem. See [`tree::Tree`] for the entry
//! point.

pub mod buffer;
pub mod config;
pub mod coord;
pub mod error;
pub mod log;
pub mod motion;
pub mod prelude;
pub mod redisplay;
pub mod tree;


pub use error::{WindowErr, WindowResult};
pub use tree::Tree;
