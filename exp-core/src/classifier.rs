//! Node classification
//!
//! The resolver never inspects identifiers itself. It asks a
//! [`NodeClassifier`] for the kind of each node and collapses every node
//! whose kind is not displayable.

use crate::config::{ClassifierRule, LineageConfig};
use crate::node::{NodeId, NodeKind};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while classifying a node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("No classification rule matches node: {0}")]
    Unclassified(NodeId),

    #[error("Unknown node: {0}")]
    Unknown(NodeId),
}

/// Decides the kind of a lineage node. Implementations must be pure.
pub trait NodeClassifier: Send + Sync {
    fn classify(&self, id: &NodeId) -> Result<NodeKind, ClassifierError>;

    fn is_displayable(&self, id: &NodeId) -> Result<bool, ClassifierError> {
        Ok(self.classify(id)?.is_displayable())
    }
}

impl<C: NodeClassifier + ?Sized> NodeClassifier for &C {
    fn classify(&self, id: &NodeId) -> Result<NodeKind, ClassifierError> {
        (**self).classify(id)
    }
}

impl<C: NodeClassifier + ?Sized> NodeClassifier for Box<C> {
    fn classify(&self, id: &NodeId) -> Result<NodeKind, ClassifierError> {
        (**self).classify(id)
    }
}

impl<C: NodeClassifier + ?Sized> NodeClassifier for std::sync::Arc<C> {
    fn classify(&self, id: &NodeId) -> Result<NodeKind, ClassifierError> {
        (**self).classify(id)
    }
}

/// Classifies identifiers by string prefix, first matching rule wins
#[derive(Debug, Clone)]
pub struct PrefixClassifier {
    rules: Vec<ClassifierRule>,
    fallback: Option<NodeKind>,
}

impl PrefixClassifier {
    pub fn new(rules: Vec<ClassifierRule>, fallback: Option<NodeKind>) -> Self {
        Self { rules, fallback }
    }

    pub fn from_config(config: &LineageConfig) -> Self {
        Self::new(config.rules.clone(), config.fallback_kind)
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }
}

impl Default for PrefixClassifier {
    fn default() -> Self {
        Self::from_config(&LineageConfig::default())
    }
}

impl NodeClassifier for PrefixClassifier {
    fn classify(&self, id: &NodeId) -> Result<NodeKind, ClassifierError> {
        self.rules
            .iter()
            .find(|rule| id.as_str().starts_with(&rule.prefix))
            .map(|rule| rule.kind)
            .or(self.fallback)
            .ok_or_else(|| ClassifierError::Unclassified(id.clone()))
    }
}

/// Classifies identifiers from an explicit lookup table
#[derive(Debug, Clone, Default)]
pub struct MapClassifier {
    kinds: HashMap<NodeId, NodeKind>,
}

impl MapClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, kind: NodeKind) {
        self.kinds.insert(id, kind);
    }

    pub fn with(mut self, id: NodeId, kind: NodeKind) -> Self {
        self.insert(id, kind);
        self
    }
}

impl FromIterator<(NodeId, NodeKind)> for MapClassifier {
    fn from_iter<T: IntoIterator<Item = (NodeId, NodeKind)>>(iter: T) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

impl NodeClassifier for MapClassifier {
    fn classify(&self, id: &NodeId) -> Result<NodeKind, ClassifierError> {
        self.kinds
            .get(id)
            .copied()
            .ok_or_else(|| ClassifierError::Unknown(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn test_default_rules_collapse_runs() {
        let classifier = PrefixClassifier::default();
        let config = LineageConfig::default();
        assert_eq!(classifier.rules(), config.rules.as_slice());
        assert_eq!(
            classifier
                .classify(&id("urn:lsid:labkey.com:Run.Folder-4:abc"))
                .unwrap(),
            NodeKind::Run
        );
        assert!(!classifier
            .is_displayable(&id("urn:lsid:labkey.com:Run.Folder-4:abc"))
            .unwrap());
        assert_eq!(
            classifier
                .classify(&id("urn:lsid:labkey.com:Data.Folder-4:file.txt"))
                .unwrap(),
            NodeKind::Data
        );
        assert_eq!(
            classifier
                .classify(&id("urn:lsid:labkey.com:Sample.Folder-4.Blood:S-1"))
                .unwrap(),
            NodeKind::Material
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let classifier = PrefixClassifier::new(
            vec![
                ClassifierRule::new("run:special", NodeKind::Data),
                ClassifierRule::new("run:", NodeKind::Run),
            ],
            None,
        );
        let special = classifier.classify(&id("run:special-1"));
        assert_eq!(special, Ok(NodeKind::Data));
        assert_eq!(classifier.classify(&id("run:1")).unwrap(), NodeKind::Run);
    }

    #[test]
    fn test_unmatched_without_fallback_fails() {
        let classifier = PrefixClassifier::new(vec![], None);
        assert_eq!(
            classifier.classify(&id("whatever")),
            Err(ClassifierError::Unclassified(id("whatever")))
        );
    }

    #[test]
    fn test_map_classifier() {
        let classifier = MapClassifier::new()
            .with(id("M1"), NodeKind::Material)
            .with(id("R1"), NodeKind::Run);
        assert!(classifier.is_displayable(&id("M1")).unwrap());
        assert!(!classifier.is_displayable(&id("R1")).unwrap());
        assert!(classifier.classify(&id("X")).is_err());
    }
}
