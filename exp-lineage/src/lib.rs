//! # Exp Lineage
//!
//! Lineage graph resolution for experiment objects: fetches raw derivation
//! edges around a seed, collapses run and protocol-application junctions,
//! and renders the resulting material/data graph.

pub mod document;
pub mod dot;
pub mod graph;
pub mod resolver;
pub mod result;
pub mod service;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use document::{LineageDocument, NodeDocument};
pub use graph::{ProvenanceGraph, ProvenanceNode};
pub use resolver::{LineageGraphResolver, LineageNode, ResolvedLineage};
pub use result::LineageResult;
pub use service::LineageService;
pub use source::EdgeSource;
pub use store::{EdgeFilter, EdgeStore, StoredEdge};

use exp_core::ClassifierError;

/// Result type for lineage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lineage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Unsupported run edge operation: {0}")]
    UnsupportedRunEdge(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Edge store lock poisoned")]
    LockPoisoned,
}

impl From<exp_core::Error> for Error {
    fn from(err: exp_core::Error) -> Self {
        match err {
            exp_core::Error::InvalidArgument(msg) => Error::InvalidArgument(msg),
            exp_core::Error::Classifier(err) => Error::Classifier(err),
        }
    }
}
