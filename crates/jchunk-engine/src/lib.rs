//! Run orchestration for jchunk.
//!
//! Discovers Java files under a project root, runs the class-level or method-level
//! chunk builders on each, and assembles the run report. A file that fails to read or
//! parse is counted and skipped; only discovery and output failures abort a run.

pub mod aggregate;
pub mod discovery;
pub mod pipeline;

pub use pipeline::{Chunker, Report};
