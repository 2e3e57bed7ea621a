//! Serialized form of a lineage result
//!
//! ```json
//! {
//!   "seed": "urn:lsid:labkey.com:Sample.Folder-1:S-1",
//!   "nodes": {
//!     "urn:lsid:labkey.com:Sample.Folder-1:S-1": {
//!       "lsid": "urn:lsid:labkey.com:Sample.Folder-1:S-1",
//!       "type": "material",
//!       "parents": [],
//!       "children": ["urn:lsid:labkey.com:Data.Folder-1:d1.txt"]
//!     }
//!   }
//! }
//! ```

use crate::result::LineageResult;
use exp_core::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level lineage document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageDocument {
    pub seed: NodeId,
    pub nodes: BTreeMap<NodeId, NodeDocument>,
}

/// One resolved node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub lsid: NodeId,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,

    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
}

impl From<&LineageResult> for LineageDocument {
    fn from(result: &LineageResult) -> Self {
        let lineage = result.lineage();
        let nodes = lineage
            .nodes()
            .iter()
            .map(|(id, node)| {
                let doc = NodeDocument {
                    lsid: id.clone(),
                    kind: lineage.kind_of(id),
                    parents: node.parents().iter().cloned().collect(),
                    children: node.children().iter().cloned().collect(),
                };
                (id.clone(), doc)
            })
            .collect();

        Self {
            seed: result.seed().lsid.clone(),
            nodes,
        }
    }
}

impl LineageResult {
    pub fn to_document(&self) -> LineageDocument {
        LineageDocument::from(self)
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.to_document())
    }
}
