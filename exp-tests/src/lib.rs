//! Shared test utilities for the lineage crates
//!
//! This crate provides:
//! - **Fixtures**: LSID factories for materials, data, runs and protocol applications
//! - **Builders**: A fluent builder for raw edge sets
//! - **Assertions**: Checks for the invariants every resolved lineage must hold
//!
//! # Example
//!
//! ```ignore
//! use exp_tests::{assertions, builders::EdgeSetBuilder, fixtures};
//!
//! let edges = EdgeSetBuilder::new()
//!     .through_run(&[fixtures::material("S-1")], "run-1", &[fixtures::data("d1.txt")])
//!     .build();
//! let lineage = resolver.resolve(edges.clone())?;
//! assertions::assert_lineage_invariants(&lineage, &classifier);
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::assert_lineage_invariants;
pub use builders::EdgeSetBuilder;
