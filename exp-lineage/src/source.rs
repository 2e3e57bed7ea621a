//! Edge sources
//!
//! An [`EdgeSource`] produces the raw edges reachable from a seed, junction
//! hops included. [`EdgeStore`] implements it with a breadth-first walk
//! over its stored edges:
//! - upwards from the seed when `include_parents` is set
//! - downwards when `include_children` is set
//! - at most `depth` hops, or the store's default when the depth is 0
//! - only along edges carrying `source_key`, when one is given

use crate::store::{EdgeStore, StoredEdge};
use crate::Result;
use exp_core::{Edge, Identifiable, LineageOptions, NodeId};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Yields the raw lineage edges around a seed
pub trait EdgeSource: Send + Sync {
    fn fetch_edges(&self, seed: &Identifiable, options: &LineageOptions) -> Result<BTreeSet<Edge>>;
}

impl<S: EdgeSource + ?Sized> EdgeSource for &S {
    fn fetch_edges(&self, seed: &Identifiable, options: &LineageOptions) -> Result<BTreeSet<Edge>> {
        (**self).fetch_edges(seed, options)
    }
}

impl<S: EdgeSource + ?Sized> EdgeSource for std::sync::Arc<S> {
    fn fetch_edges(&self, seed: &Identifiable, options: &LineageOptions) -> Result<BTreeSet<Edge>> {
        (**self).fetch_edges(seed, options)
    }
}

#[derive(Clone, Copy)]
enum Walk {
    Up,
    Down,
}

impl EdgeSource for EdgeStore {
    fn fetch_edges(&self, seed: &Identifiable, options: &LineageOptions) -> Result<BTreeSet<Edge>> {
        let max_depth = options.effective_depth(self.default_max_depth());
        let stored = self.read()?;

        let followed: Vec<&StoredEdge> = stored
            .iter()
            .filter(|edge| match &options.source_key {
                Some(key) => edge.source_key.as_ref() == Some(key),
                None => true,
            })
            .collect();

        let mut by_child: HashMap<&NodeId, Vec<&StoredEdge>> = HashMap::new();
        let mut by_parent: HashMap<&NodeId, Vec<&StoredEdge>> = HashMap::new();
        for &edge in &followed {
            by_child.entry(&edge.to).or_default().push(edge);
            by_parent.entry(&edge.from).or_default().push(edge);
        }

        let mut edges = BTreeSet::new();
        if options.include_parents {
            walk(&seed.lsid, &by_child, Walk::Up, max_depth, &mut edges);
        }
        if options.include_children {
            walk(&seed.lsid, &by_parent, Walk::Down, max_depth, &mut edges);
        }

        tracing::debug!(
            seed = %seed.lsid,
            depth = max_depth,
            edges = edges.len(),
            "Fetched lineage edges"
        );
        Ok(edges)
    }
}

fn walk(
    start: &NodeId,
    adjacency: &HashMap<&NodeId, Vec<&StoredEdge>>,
    direction: Walk,
    max_depth: u32,
    edges: &mut BTreeSet<Edge>,
) {
    let mut visited: HashSet<&NodeId> = HashSet::from([start]);
    let mut queue: VecDeque<(&NodeId, u32)> = VecDeque::from([(start, 0)]);

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let Some(links) = adjacency.get(current) else {
            continue;
        };
        for &stored in links {
            edges.insert(Edge::new(stored.from.clone(), stored.to.clone()));
            let next = match direction {
                Walk::Up => &stored.from,
                Walk::Down => &stored.to,
            };
            if visited.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }
}
