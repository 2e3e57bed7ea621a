//! Edge store
//!
//! Holds persisted lineage edges between experiment objects. Edges are
//! either owned by a run (written through [`EdgeStore::sync_run`]) or added
//! directly by a caller, optionally tagged with a source id and key so they
//! can be filtered and removed later.
//! Provides thread-safe concurrent access for multi-threaded environments.

use crate::{Error, Result};
use exp_core::{Identifiable, NodeId, NodeKind, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument};

/// A persisted lineage edge
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoredEdge {
    pub from: NodeId,
    pub to: NodeId,

    /// Run that owns this edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<i64>,

    /// Object that recorded this edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
}

impl StoredEdge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            run_id: None,
            source_id: None,
            source_key: None,
        }
    }

    pub fn with_source(mut self, source_id: i64, source_key: impl Into<String>) -> Self {
        self.source_id = Some(source_id);
        self.source_key = Some(source_key.into());
        self
    }

    fn owned_by_run(mut self, run_id: i64) -> Self {
        self.run_id = Some(run_id);
        self
    }
}

/// Constraints for selecting stored edges; every field that is set must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeFilter {
    pub from: Option<NodeId>,
    pub to: Option<NodeId>,
    pub run_id: Option<i64>,
    pub source_id: Option<i64>,
    pub source_key: Option<String>,
}

impl EdgeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, from: NodeId) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: NodeId) -> Self {
        self.to = Some(to);
        self
    }

    pub fn run_id(mut self, run_id: i64) -> Self {
        self.run_id = Some(run_id);
        self
    }

    pub fn source_id(mut self, source_id: i64) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn source_key(mut self, source_key: impl Into<String>) -> Self {
        self.source_key = Some(source_key.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, edge: &StoredEdge) -> bool {
        self.from.as_ref().map_or(true, |from| &edge.from == from)
            && self.to.as_ref().map_or(true, |to| &edge.to == to)
            && self.run_id.map_or(true, |run_id| edge.run_id == Some(run_id))
            && self
                .source_id
                .map_or(true, |source_id| edge.source_id == Some(source_id))
            && self
                .source_key
                .as_ref()
                .map_or(true, |key| edge.source_key.as_ref() == Some(key))
    }
}

/// In-memory edge store with thread-safe concurrent access.
/// This type uses blocking locks and is intended for synchronous contexts.
#[derive(Debug, Clone)]
pub struct EdgeStore {
    inner: Arc<RwLock<BTreeSet<StoredEdge>>>,
    default_max_depth: u32,
}

impl EdgeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeSet::new())),
            default_max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Hop limit used for traversals that leave the depth unset
    pub fn with_default_depth(mut self, depth: u32) -> Self {
        self.default_max_depth = depth;
        self
    }

    pub fn default_max_depth(&self) -> u32 {
        self.default_max_depth
    }

    /// Persist edges that are not owned by a run.
    ///
    /// Self-edges are skipped and duplicates collapse. Returns the number of
    /// edges that were not already stored. Nothing is written if any edge
    /// carries a run id or a blank endpoint.
    #[instrument(skip_all, fields(count = tracing::field::Empty))]
    pub fn add_edges<I>(&self, edges: I) -> Result<usize>
    where
        I: IntoIterator<Item = StoredEdge>,
    {
        let edges: Vec<StoredEdge> = edges.into_iter().collect();
        tracing::Span::current().record("count", edges.len());
        if edges.is_empty() {
            return Ok(0);
        }

        for edge in &edges {
            if edge.run_id.is_some() {
                return Err(Error::UnsupportedRunEdge(
                    "Adding edges with a runId is not supported".to_string(),
                ));
            }
            check_endpoints(edge)?;
        }

        let mut inner = self.write()?;
        let mut added = 0;
        for edge in edges {
            if edge.from == edge.to {
                debug!(node = %edge.from, "Skipping self-referencing edge");
                continue;
            }
            if inner.insert(edge) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Replace the edges owned by `run` with `input -> run` and
    /// `run -> output` edges.
    #[instrument(skip(self, run, inputs, outputs), fields(run = %run.lsid))]
    pub fn sync_run(
        &self,
        run: &Identifiable,
        inputs: &[NodeId],
        outputs: &[NodeId],
    ) -> Result<()> {
        if run.kind != NodeKind::Run {
            return Err(Error::InvalidArgument(format!(
                "{} is a {}, not a run",
                run.lsid, run.kind
            )));
        }
        let run_id = run.row_id.ok_or_else(|| {
            Error::InvalidArgument(format!("run {} has no row id", run.lsid))
        })?;

        let edges: Vec<StoredEdge> = inputs
            .iter()
            .map(|input| StoredEdge::new(input.clone(), run.lsid.clone()))
            .chain(
                outputs
                    .iter()
                    .map(|output| StoredEdge::new(run.lsid.clone(), output.clone())),
            )
            .filter(|edge| edge.from != edge.to)
            .map(|edge| edge.owned_by_run(run_id))
            .collect();
        for edge in &edges {
            check_endpoints(edge)?;
        }

        let mut inner = self.write()?;
        inner.retain(|edge| edge.run_id != Some(run_id));
        debug!(edges = edges.len(), "Synced run edges");
        inner.extend(edges);
        Ok(())
    }

    /// Stored edges matching `filter`
    pub fn edges(&self, filter: &EdgeFilter) -> Result<Vec<StoredEdge>> {
        let inner = self.read()?;
        let matching = inner
            .iter()
            .filter(|edge| filter.matches(edge))
            .cloned()
            .collect();
        Ok(matching)
    }

    /// Remove edges matching `filter`, returning how many were removed.
    ///
    /// An empty filter removes nothing. Run-owned edges can only be replaced
    /// through [`EdgeStore::sync_run`].
    pub fn remove_edges(&self, filter: &EdgeFilter) -> Result<usize> {
        if filter.run_id.is_some() {
            return Err(Error::UnsupportedRunEdge(
                "Edges with a runId cannot be deleted via remove_edges()".to_string(),
            ));
        }
        if filter.is_empty() {
            return Ok(0);
        }

        let mut inner = self.write()?;
        let before = inner.len();
        inner.retain(|edge| edge.run_id.is_some() || !filter.matches(edge));
        Ok(before - inner.len())
    }

    /// Count stored edges
    pub fn len(&self) -> usize {
        self.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, BTreeSet<StoredEdge>>> {
        self.inner.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeSet<StoredEdge>>> {
        self.inner.write().map_err(|_| Error::LockPoisoned)
    }
}

impl Default for EdgeStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_endpoints(edge: &StoredEdge) -> Result<()> {
    if !edge.from.is_valid() || !edge.to.is_valid() {
        return Err(Error::InvalidArgument(format!(
            "edge has an empty endpoint: {:?} -> {:?}",
            edge.from.as_str(),
            edge.to.as_str()
        )));
    }
    Ok(())
}
