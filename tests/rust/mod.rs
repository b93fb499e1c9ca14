//! receiptvec Integration Tests
//!
//! Exercises the public pipeline end to end: parsing, repair and
//! normalization, batch statistics, configuration loading, and the
//! property-based invariants of both entry points.

pub mod common;
pub mod test_processing_context;
pub mod test_vector_parser;
pub mod test_vector_properties;

// Re-export common utilities
pub use common::*;
