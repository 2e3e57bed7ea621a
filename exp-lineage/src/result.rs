//! Lineage results
//!
//! A [`LineageResult`] bundles the seed a traversal started from, the
//! options it ran with, and the resolved lineage, and offers typed views
//! over the resolved nodes.

use crate::resolver::{LineageGraphResolver, ResolvedLineage};
use crate::Result;
use exp_core::{Edge, Identifiable, LineageOptions, NodeClassifier, NodeId, NodeKind};
use std::collections::BTreeSet;

/// Resolved lineage for one seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageResult {
    seed: Identifiable,
    options: LineageOptions,
    lineage: ResolvedLineage,
}

impl LineageResult {
    pub fn seed(&self) -> &Identifiable {
        &self.seed
    }

    pub fn options(&self) -> &LineageOptions {
        &self.options
    }

    pub fn lineage(&self) -> &ResolvedLineage {
        &self.lineage
    }

    /// Seeds of this lineage, keyed by LSID
    pub fn seeds(&self) -> BTreeSet<NodeId> {
        BTreeSet::from([self.seed.lsid.clone()])
    }

    /// Every resolved node except the seed
    pub fn objects(&self) -> BTreeSet<NodeId> {
        self.lineage
            .nodes()
            .keys()
            .filter(|id| **id != self.seed.lsid)
            .cloned()
            .collect()
    }

    /// Resolved data objects
    pub fn datas(&self) -> BTreeSet<NodeId> {
        self.objects_of_kind(NodeKind::Data)
    }

    /// Resolved materials
    pub fn materials(&self) -> BTreeSet<NodeId> {
        self.objects_of_kind(NodeKind::Material)
    }

    /// Runs that were crossed while resolving, other than the seed
    pub fn runs(&self) -> BTreeSet<NodeId> {
        self.objects_of_kind(NodeKind::Run)
    }

    /// Protocol applications that were crossed while resolving, other than the seed
    pub fn protocol_applications(&self) -> BTreeSet<NodeId> {
        self.objects_of_kind(NodeKind::ProtocolApplication)
    }

    pub fn node_parents(&self, id: &NodeId) -> BTreeSet<NodeId> {
        self.lineage.parents(id)
    }

    pub fn node_children(&self, id: &NodeId) -> BTreeSet<NodeId> {
        self.lineage.children(id)
    }

    fn objects_of_kind(&self, kind: NodeKind) -> BTreeSet<NodeId> {
        self.lineage
            .ids_of_kind(kind)
            .into_iter()
            .filter(|id| *id != self.seed.lsid)
            .collect()
    }
}

impl<C: NodeClassifier> LineageGraphResolver<C> {
    /// Resolve `edges` and bundle the outcome with its seed and options.
    ///
    /// Fails with `InvalidArgument` when `options` reference a different seed.
    pub fn build_result<I>(
        &self,
        seed: Identifiable,
        options: LineageOptions,
        edges: I,
    ) -> Result<LineageResult>
    where
        I: IntoIterator<Item = Edge>,
    {
        options.check_seed(&seed)?;
        let lineage = self.resolve(edges)?;
        Ok(LineageResult {
            seed,
            options,
            lineage,
        })
    }
}
