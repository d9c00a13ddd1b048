//! Flows module - Operations combining several files
//!
//! Provides:
//! - tree: Compare two directory trees file by file

pub mod tree;
