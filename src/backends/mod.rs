//! Backends module - Filesystem operations
//!
//! Provides:
//! - scan: Directory traversal with walkdir

pub mod scan;
