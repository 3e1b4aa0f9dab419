//! Prelude.

// Re-export `coord`.
pub use crate::coord::*;
pub use crate::error::*;

// Re-export `ahash`.
pub use ahash::AHashMap as HashMap;
pub use ahash::AHashSet as HashSet;
