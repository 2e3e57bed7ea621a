//! # Exp Core
//!
//! Core types for experiment lineage: node identity, node kinds, raw
//! derivation edges, traversal options, and node classification.

pub mod classifier;
pub mod config;
pub mod node;
pub mod options;

// Re-export commonly used types
pub use classifier::{ClassifierError, MapClassifier, NodeClassifier, PrefixClassifier};
pub use config::{ClassifierRule, LineageConfig, DEFAULT_MAX_DEPTH};
pub use node::{Edge, Identifiable, NodeId, NodeKind};
pub use options::{LineageOptions, SeedRef};

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}
