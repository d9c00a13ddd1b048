//! Core module - The comparison engine
//!
//! This module provides:
//! - Normalization and tokenization of raw text
//! - LCS alignment and per-side segment rendering
//! - Line reconciliation into row pairs
//! - HTML, report and JSON rendering
//! - File reading and path keys for the outer layers

pub mod compare;
pub mod error;
pub mod file_reader;
pub mod html;
pub mod lcs;
pub mod markup;
pub mod model;
pub mod normalize;
pub mod paths;
pub mod reconcile;
pub mod render;
pub mod report;
pub mod segment;
