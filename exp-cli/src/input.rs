//! Edge file loading
//!
//! An edge file is either a JSON array of stored edges, or an object with
//! `objects` (known samples and data with their row ids), `runs` (replayed
//! through [`EdgeStore::sync_run`]) and `edges` (added directly). Every key
//! is snake_case.

use anyhow::{Context, Result};
use exp_core::{Identifiable, NodeId, NodeKind};
use exp_lineage::{EdgeStore, StoredEdge};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A sample or data object the file knows the row id of
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectRecord {
    pub lsid: NodeId,
    pub row_id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A run with its inputs and outputs
#[derive(Debug, Deserialize)]
pub struct RunRecord {
    pub lsid: NodeId,
    pub row_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<NodeId>,
    #[serde(default)]
    pub outputs: Vec<NodeId>,
}

/// Row ids of the objects and runs named in an edge file, keyed by LSID
pub type KnownObjects = BTreeMap<NodeId, ObjectRecord>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EdgeFile {
    Edges(Vec<StoredEdge>),
    Full {
        #[serde(default)]
        objects: Vec<ObjectRecord>,
        #[serde(default)]
        runs: Vec<RunRecord>,
        #[serde(default)]
        edges: Vec<StoredEdge>,
    },
}

impl EdgeFile {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse edge file")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read edge file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid edge file {}", path.display()))
    }

    /// Writes every run and edge into `store` and returns the objects whose
    /// row ids the file declares, runs included
    pub fn populate(self, store: &EdgeStore) -> Result<KnownObjects> {
        let (objects, runs, edges) = match self {
            EdgeFile::Edges(edges) => (Vec::new(), Vec::new(), edges),
            EdgeFile::Full {
                objects,
                runs,
                edges,
            } => (objects, runs, edges),
        };

        let mut known = KnownObjects::new();
        for object in objects {
            if let Some(previous) = known.get(&object.lsid) {
                if previous.row_id != object.row_id {
                    anyhow::bail!(
                        "Object {} is listed with row ids {} and {}",
                        object.lsid,
                        previous.row_id,
                        object.row_id
                    );
                }
            }
            known.insert(object.lsid.clone(), object);
        }

        for record in runs {
            let mut run = Identifiable::new(record.lsid, NodeKind::Run).with_row_id(record.row_id);
            if let Some(name) = record.name {
                run = run.with_name(name);
            }
            store
                .sync_run(&run, &record.inputs, &record.outputs)
                .with_context(|| format!("Failed to record run {}", run.lsid))?;
            known.insert(
                run.lsid.clone(),
                ObjectRecord {
                    lsid: run.lsid,
                    row_id: record.row_id,
                    name: run.name,
                },
            );
        }

        let added = store.add_edges(edges).context("Failed to add edges")?;
        tracing::debug!(
            added,
            total = store.len(),
            known = known.len(),
            "Loaded edge file"
        );
        Ok(known)
    }
}
