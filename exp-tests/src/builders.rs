//! Builders for raw lineage edge sets

use crate::fixtures;
use exp_core::{Edge, NodeId};
use std::collections::BTreeSet;

/// Fluent builder for a raw edge set
#[derive(Debug, Default, Clone)]
pub struct EdgeSetBuilder {
    edges: Vec<Edge>,
}

impl EdgeSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single `parent -> child` edge
    pub fn edge(mut self, parent: &NodeId, child: &NodeId) -> Self {
        self.edges.push(Edge::new(parent.clone(), child.clone()));
        self
    }

    /// Add `input -> run` for every input and `run -> output` for every output
    pub fn through_run(
        mut self,
        inputs: &[NodeId],
        run_name: &str,
        outputs: &[NodeId],
    ) -> Self {
        let run = fixtures::run(run_name);
        for input in inputs {
            self.edges.push(Edge::new(input.clone(), run.clone()));
        }
        for output in outputs {
            self.edges.push(Edge::new(run.clone(), output.clone()));
        }
        self
    }

    /// Add a linear chain `nodes[0] -> nodes[1] -> ...`
    pub fn chain(mut self, nodes: &[NodeId]) -> Self {
        for pair in nodes.windows(2) {
            self.edges.push(Edge::new(pair[0].clone(), pair[1].clone()));
        }
        self
    }

    /// Edges in insertion order, duplicates kept
    pub fn build(self) -> Vec<Edge> {
        self.edges
    }

    pub fn build_set(self) -> BTreeSet<Edge> {
        self.edges.into_iter().collect()
    }
}
