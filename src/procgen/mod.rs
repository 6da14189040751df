//! Procedural generation module
//!
//! Seeded recursive tree skeletons.

pub mod tree;

pub use tree::{generate, BranchSegment, TreeParams, TreeSkeleton};
