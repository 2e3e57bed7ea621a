//! Lineage participants and the edges between them
//!
//! Every participant in a lineage graph (sample, data object, run or
//! protocol application) is named by an LSID. This module provides the
//! identifier newtype, the closed set of node kinds, the seed descriptor
//! used to anchor a traversal, and the raw parent/child edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a lineage participant, usually an LSID.
///
/// Equality is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create an identifier, rejecting empty or blank values
    pub fn new(value: impl Into<String>) -> crate::Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(crate::Error::InvalidArgument(
                "node identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this identifier is well formed (non-blank)
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for NodeId {
    type Error = crate::Error;

    fn try_from(value: &str) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for NodeId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

/// The kind of a lineage participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A data file or data class row
    Data,

    /// A sample
    Material,

    /// An experiment run
    Run,

    /// A workflow step execution inside a run
    ProtocolApplication,
}

impl NodeKind {
    /// Only data objects and materials appear in a resolved lineage.
    /// Runs and protocol applications are junctions that get collapsed.
    pub fn is_displayable(self) -> bool {
        matches!(self, NodeKind::Data | NodeKind::Material)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Data => "data",
            NodeKind::Material => "material",
            NodeKind::Run => "run",
            NodeKind::ProtocolApplication => "protocolApplication",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "data" => Ok(NodeKind::Data),
            "material" | "sample" => Ok(NodeKind::Material),
            "run" => Ok(NodeKind::Run),
            "protocolapplication" | "protocol_application" => Ok(NodeKind::ProtocolApplication),
            other => Err(crate::Error::InvalidArgument(format!(
                "unknown node kind: {}",
                other
            ))),
        }
    }
}

/// An entity that can anchor a lineage traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifiable {
    /// LSID of the entity
    pub lsid: NodeId,

    /// Database row id, when the entity has one
    pub row_id: Option<i64>,

    /// Display name
    pub name: Option<String>,

    pub kind: NodeKind,
}

impl Identifiable {
    pub fn new(lsid: NodeId, kind: NodeKind) -> Self {
        Self {
            lsid,
            row_id: None,
            name: None,
            kind,
        }
    }

    pub fn with_row_id(mut self, row_id: i64) -> Self {
        self.row_id = Some(row_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A raw derivation edge, `parent -> child`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
}

impl Edge {
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self { parent, child }
    }

    /// Build an edge from raw strings, validating both endpoints
    pub fn parse(parent: &str, child: &str) -> crate::Result<Self> {
        Ok(Self {
            parent: NodeId::new(parent)?,
            child: NodeId::new(child)?,
        })
    }

    pub fn is_self_edge(&self) -> bool {
        self.parent == self.child
    }

    /// Reject edges whose endpoints are blank (e.g. deserialized from bad input)
    pub fn validate(&self) -> crate::Result<()> {
        if !self.parent.is_valid() || !self.child.is_valid() {
            return Err(crate::Error::InvalidArgument(format!(
                "edge has an empty endpoint: {:?} -> {:?}",
                self.parent.as_str(),
                self.child.as_str()
            )));
        }
        Ok(())
    }
}
