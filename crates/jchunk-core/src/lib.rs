//! Core types and storage for jchunk.
//!
//! Provides the chunk data model ([`model::Chunk`], [`model::MethodChunk`],
//! [`model::ClassInfo`]), run reports, configuration, identifier tokens, and JSON
//! output.

pub mod config;
pub mod ids;
pub mod model;
pub mod report;
pub mod schema;
pub mod storage;
