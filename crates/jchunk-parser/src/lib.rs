//! Tree-sitter based Java chunk extraction.
//!
//! Parses a source file into a [`syntax::SourceUnit`], then builds class-level
//! ([`class_chunks`]) or method-level ([`method_chunks`]) records from it, using the
//! signature, symbol and metric passes.

pub mod class_chunks;
pub mod method_chunks;
pub mod metrics;
pub mod signature;
pub mod symbols;
pub mod syntax;
pub mod treesitter;

pub use class_chunks::FileChunks;
