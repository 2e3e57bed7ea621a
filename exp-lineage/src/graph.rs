//! Raw provenance graph
//!
//! Unlike [`ResolvedLineage`](crate::ResolvedLineage), the provenance graph
//! keeps every node of an edge set, runs and protocol applications
//! included. It is used to inspect the raw shape of a traversal.

use exp_core::{Edge, NodeClassifier, NodeId, NodeKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node in the provenance graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceNode {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// Directed graph over raw lineage edges
pub struct ProvenanceGraph {
    graph: DiGraph<ProvenanceNode, ()>,
    id_to_node: HashMap<NodeId, NodeIndex>,
}

impl ProvenanceGraph {
    /// Create a new empty provenance graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_to_node: HashMap::new(),
        }
    }

    /// Build a graph from raw edges, classifying every endpoint.
    /// Self-edges and duplicates are dropped.
    pub fn from_edges<'e, I, C>(edges: I, classifier: &C) -> crate::Result<Self>
    where
        I: IntoIterator<Item = &'e Edge>,
        C: NodeClassifier,
    {
        let mut graph = Self::new();
        for edge in edges {
            edge.validate()?;
            if edge.is_self_edge() {
                continue;
            }
            for id in [&edge.parent, &edge.child] {
                if !graph.contains(id) {
                    let kind = classifier.classify(id)?;
                    graph.add_node(ProvenanceNode {
                        id: id.clone(),
                        kind,
                    });
                }
            }
            graph.add_edge(&edge.parent, &edge.child)?;
        }
        Ok(graph)
    }

    /// Add a node to the graph, returning the existing index if already present
    pub fn add_node(&mut self, node: ProvenanceNode) -> NodeIndex {
        if let Some(&idx) = self.id_to_node.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.id_to_node.insert(id, idx);
        idx
    }

    /// Add an edge between two nodes; a repeated edge is stored once
    pub fn add_edge(&mut self, from: &NodeId, to: &NodeId) -> crate::Result<()> {
        let from_idx = self
            .id_to_node
            .get(from)
            .ok_or_else(|| crate::Error::NodeNotFound(from.to_string()))?;
        let to_idx = self
            .id_to_node
            .get(to)
            .ok_or_else(|| crate::Error::NodeNotFound(to.to_string()))?;

        self.graph.update_edge(*from_idx, *to_idx, ());
        Ok(())
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.id_to_node.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&ProvenanceNode> {
        self.id_to_node.get(id).map(|&idx| &self.graph[idx])
    }

    /// Direct parents of a node
    pub fn get_upstream(&self, id: &NodeId) -> Vec<&ProvenanceNode> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Direct children of a node
    pub fn get_downstream(&self, id: &NodeId) -> Vec<&ProvenanceNode> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &NodeId, direction: Direction) -> Vec<&ProvenanceNode> {
        match self.id_to_node.get(id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, direction)
                .map(|idx| &self.graph[idx])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Check if the graph has cycles
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Number of run and protocol-application nodes
    pub fn junction_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|node| !node.kind.is_displayable())
            .count()
    }

    /// Get the total number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for ProvenanceGraph {
    fn default() -> Self {
        Self::new()
    }
}
