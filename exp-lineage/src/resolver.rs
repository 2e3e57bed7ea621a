//! Lineage graph resolution
//!
//! Raw lineage edges run through junction nodes: a sample feeds a run, the
//! run produces a data file. Users only care that the data file derives
//! from the sample, so [`LineageGraphResolver`] collapses every node the
//! classifier marks as non-displayable and fuses the edges across it.
//!
//! Resolution is two passes over the edge set:
//!
//! 1. Record, for every junction, which nodes feed into it and which nodes
//!    leave it, then pre-resolve both sets through chains of consecutive
//!    junctions so that they only hold displayable nodes.
//! 2. Walk the edges again, wiring displayable endpoints directly and
//!    substituting a junction endpoint with its pre-resolved set.

use crate::Result;
use exp_core::{Edge, NodeClassifier, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Parents and children of a resolved node. Both sets only hold displayable nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageNode {
    parents: BTreeSet<NodeId>,
    children: BTreeSet<NodeId>,
}

impl LineageNode {
    pub fn parents(&self) -> &BTreeSet<NodeId> {
        &self.parents
    }

    pub fn children(&self) -> &BTreeSet<NodeId> {
        &self.children
    }
}

/// Display-ready lineage: only data objects and materials, junctions fused away
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLineage {
    nodes: BTreeMap<NodeId, LineageNode>,
    kinds: BTreeMap<NodeId, NodeKind>,
    collapsed: BTreeMap<NodeId, NodeKind>,
}

impl ResolvedLineage {
    /// Resolved nodes keyed by identifier
    pub fn nodes(&self) -> &BTreeMap<NodeId, LineageNode> {
        &self.nodes
    }

    pub fn get(&self, id: &NodeId) -> Option<&LineageNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Parents of `id`, empty when `id` is not part of the lineage
    pub fn parents(&self, id: &NodeId) -> BTreeSet<NodeId> {
        self.nodes
            .get(id)
            .map(|node| node.parents.clone())
            .unwrap_or_default()
    }

    /// Children of `id`, empty when `id` is not part of the lineage
    pub fn children(&self, id: &NodeId) -> BTreeSet<NodeId> {
        self.nodes
            .get(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Kind of a resolved node
    pub fn kind_of(&self, id: &NodeId) -> Option<NodeKind> {
        self.kinds.get(id).copied()
    }

    /// Junction nodes that were seen in the edge set and collapsed
    pub fn collapsed(&self) -> &BTreeMap<NodeId, NodeKind> {
        &self.collapsed
    }

    /// Resolved `(parent, child)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.nodes
            .iter()
            .flat_map(|(id, node)| node.children.iter().map(move |c| (id, c)))
    }

    /// Nodes of the given kind seen in the edge set, collapsed junctions included
    pub fn ids_of_kind(&self, kind: NodeKind) -> BTreeSet<NodeId> {
        self.kinds
            .iter()
            .chain(self.collapsed.iter())
            .filter(|(_, k)| **k == kind)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Collapses junction nodes out of a raw lineage edge set
#[derive(Debug, Clone)]
pub struct LineageGraphResolver<C> {
    classifier: C,
}

impl<C: NodeClassifier> LineageGraphResolver<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Resolve a raw edge set into a display-ready lineage.
    ///
    /// Self-edges are discarded and duplicate edges collapse. The edge set is
    /// expected to already contain every hop up to the requested depth,
    /// including the hops through junction nodes.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidArgument`] when an edge has a blank endpoint, checked
    /// before any work is done; classifier failures are propagated as-is.
    pub fn resolve<I>(&self, edges: I) -> Result<ResolvedLineage>
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut unique = BTreeSet::new();
        for edge in edges {
            edge.validate()?;
            if !edge.is_self_edge() {
                unique.insert(edge);
            }
        }

        let mut kinds: HashMap<NodeId, NodeKind> = HashMap::new();
        for edge in &unique {
            for id in [&edge.parent, &edge.child] {
                if !kinds.contains_key(id) {
                    let kind = self.classifier.classify(id)?;
                    kinds.insert(id.clone(), kind);
                }
            }
        }
        let displayable = |id: &NodeId| kinds.get(id).is_some_and(|kind| kind.is_displayable());

        // Pass 1: what enters and leaves every junction
        let mut pass_through_children_of: HashMap<&NodeId, BTreeSet<&NodeId>> = HashMap::new();
        let mut pass_through_parents_of: HashMap<&NodeId, BTreeSet<&NodeId>> = HashMap::new();
        for edge in &unique {
            if !displayable(&edge.parent) {
                pass_through_children_of
                    .entry(&edge.parent)
                    .or_default()
                    .insert(&edge.child);
            }
            if !displayable(&edge.child) {
                pass_through_parents_of
                    .entry(&edge.child)
                    .or_default()
                    .insert(&edge.parent);
            }
        }

        let fused_children = fuse_all(&pass_through_children_of, &displayable);
        let fused_parents = fuse_all(&pass_through_parents_of, &displayable);

        // Pass 2: wire displayable endpoints, substituting junctions
        let mut nodes: BTreeMap<NodeId, LineageNode> = BTreeMap::new();
        for edge in &unique {
            let (parent, child) = (&edge.parent, &edge.child);
            let parent_ok = displayable(parent);
            let child_ok = displayable(child);

            if parent_ok {
                let entry = nodes.entry(parent.clone()).or_default();
                if child_ok {
                    entry.children.insert(child.clone());
                } else if let Some(through) = fused_children.get(child) {
                    entry.children.extend(
                        through
                            .iter()
                            .filter(|&&id| id != parent)
                            .map(|id| (*id).clone()),
                    );
                }
            }

            if child_ok {
                let entry = nodes.entry(child.clone()).or_default();
                if parent_ok {
                    entry.parents.insert(parent.clone());
                } else if let Some(through) = fused_parents.get(parent) {
                    entry.parents.extend(
                        through
                            .iter()
                            .filter(|&&id| id != child)
                            .map(|id| (*id).clone()),
                    );
                }
            }
        }

        let mut resolved_kinds = BTreeMap::new();
        let mut collapsed = BTreeMap::new();
        for (id, kind) in kinds {
            if kind.is_displayable() {
                resolved_kinds.insert(id, kind);
            } else {
                collapsed.insert(id, kind);
            }
        }

        debug!(
            edges = unique.len(),
            junctions = collapsed.len(),
            nodes = nodes.len(),
            "Resolved lineage graph"
        );

        Ok(ResolvedLineage {
            nodes,
            kinds: resolved_kinds,
            collapsed,
        })
    }
}

/// For every junction, follow `links` through further junctions until only
/// displayable nodes remain.
fn fuse_all<'a, F>(
    links: &HashMap<&'a NodeId, BTreeSet<&'a NodeId>>,
    displayable: &F,
) -> HashMap<&'a NodeId, BTreeSet<&'a NodeId>>
where
    F: Fn(&NodeId) -> bool,
{
    links
        .keys()
        .map(|&junction| (junction, fuse(junction, links, displayable)))
        .collect()
}

fn fuse<'a, F>(
    junction: &'a NodeId,
    links: &HashMap<&'a NodeId, BTreeSet<&'a NodeId>>,
    displayable: &F,
) -> BTreeSet<&'a NodeId>
where
    F: Fn(&NodeId) -> bool,
{
    let mut reached = BTreeSet::new();
    let mut visited = BTreeSet::from([junction]);
    let mut stack = vec![junction];

    while let Some(current) = stack.pop() {
        let Some(next) = links.get(current) else {
            continue;
        };
        for &id in next {
            if displayable(id) {
                reached.insert(id);
            } else if visited.insert(id) {
                stack.push(id);
            }
        }
    }

    reached
}
