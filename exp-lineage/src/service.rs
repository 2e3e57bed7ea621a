//! Lineage service
//!
//! Ties an [`EdgeSource`] to a [`LineageGraphResolver`]: fetch the raw edges
//! around a seed, then resolve them into a display-ready lineage.

use crate::resolver::LineageGraphResolver;
use crate::result::LineageResult;
use crate::source::EdgeSource;
use crate::Result;
use exp_core::{Identifiable, LineageOptions, NodeClassifier};
use tracing::{info, instrument};

/// Entry point for lineage requests
pub struct LineageService<S, C> {
    source: S,
    resolver: LineageGraphResolver<C>,
}

impl<S: EdgeSource, C: NodeClassifier> LineageService<S, C> {
    pub fn new(source: S, classifier: C) -> Self {
        Self {
            source,
            resolver: LineageGraphResolver::new(classifier),
        }
    }

    /// Lineage of `seed` according to `options`.
    ///
    /// The seed reference in `options` is checked before any edge is fetched.
    #[instrument(
        skip(self, seed, options),
        fields(
            seed = %seed.lsid,
            depth = options.depth,
            parents = options.include_parents,
            children = options.include_children
        )
    )]
    pub fn lineage(&self, seed: &Identifiable, options: &LineageOptions) -> Result<LineageResult> {
        options.check_seed(seed)?;

        let edges = self.source.fetch_edges(seed, options)?;
        let edge_count = edges.len();
        let result = self
            .resolver
            .build_result(seed.clone(), options.clone(), edges)?;

        info!(
            edges = edge_count,
            nodes = result.lineage().len(),
            collapsed = result.lineage().collapsed().len(),
            "Resolved lineage"
        );
        Ok(result)
    }
}
