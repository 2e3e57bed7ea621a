//! Lineage traversal options
//!
//! Options describe how far and in which directions a lineage traversal
//! walks from its seed. The seed itself is referenced in exactly one
//! canonical form, either its row id or its LSID.

use crate::node::{Identifiable, NodeId};
use serde::{Deserialize, Serialize};

/// Reference to the seed of a traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeedRef {
    RowId(i64),
    Lsid(NodeId),
}

impl SeedRef {
    /// True when this reference names the given entity
    pub fn matches(&self, seed: &Identifiable) -> bool {
        match self {
            SeedRef::RowId(row_id) => seed.row_id == Some(*row_id),
            SeedRef::Lsid(lsid) => &seed.lsid == lsid,
        }
    }
}

/// Traversal configuration for a lineage request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageOptions {
    /// Maximum number of hops; 0 defers to the configured default
    pub depth: u32,

    /// Walk towards ancestors
    pub include_parents: bool,

    /// Walk towards descendants
    pub include_children: bool,

    /// Only follow edges recorded with this source key
    pub source_key: Option<String>,

    seed: Option<SeedRef>,
}

impl Default for LineageOptions {
    fn default() -> Self {
        Self {
            depth: 0,
            include_parents: true,
            include_children: true,
            source_key: None,
            seed: None,
        }
    }
}

impl LineageOptions {
    pub fn new(include_parents: bool, include_children: bool, depth: u32) -> Self {
        Self {
            depth,
            include_parents,
            include_children,
            ..Self::default()
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn parents_only(mut self) -> Self {
        self.include_parents = true;
        self.include_children = false;
        self
    }

    pub fn children_only(mut self) -> Self {
        self.include_parents = false;
        self.include_children = true;
        self
    }

    pub fn with_source_key(mut self, source_key: impl Into<String>) -> Self {
        self.source_key = Some(source_key.into());
        self
    }

    /// Reference the seed by row id, replacing any previous seed reference
    pub fn with_row_id(mut self, row_id: i64) -> Self {
        self.seed = Some(SeedRef::RowId(row_id));
        self
    }

    /// Reference the seed by LSID, replacing any previous seed reference
    pub fn with_lsid(mut self, lsid: NodeId) -> Self {
        self.seed = Some(SeedRef::Lsid(lsid));
        self
    }

    pub fn seed(&self) -> Option<&SeedRef> {
        self.seed.as_ref()
    }

    /// Effective hop limit given the configured default
    pub fn effective_depth(&self, default_depth: u32) -> u32 {
        if self.depth == 0 {
            default_depth
        } else {
            self.depth
        }
    }

    /// Verify that the seed reference, if any, names `seed`
    pub fn check_seed(&self, seed: &Identifiable) -> crate::Result<()> {
        match &self.seed {
            Some(seed_ref) if !seed_ref.matches(seed) => {
                Err(crate::Error::InvalidArgument(format!(
                    "lineage options reference seed {:?} but the request was made for {}",
                    seed_ref, seed.lsid
                )))
            }
            _ => Ok(()),
        }
    }
}
