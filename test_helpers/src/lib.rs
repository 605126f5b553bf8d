//! Test helpers shared across crates in the workspace.

pub mod env;
pub mod tree;

pub use tree::SourceTree;
