//! Invariant assertions for resolved lineages

use exp_core::NodeClassifier;
use exp_lineage::ResolvedLineage;

/// Assert the invariants every resolved lineage holds:
/// - every key and every parent/child is displayable
/// - no node is its own parent or child
/// - parent and child sets mirror each other
pub fn assert_lineage_invariants<C: NodeClassifier>(lineage: &ResolvedLineage, classifier: &C) {
    for (id, node) in lineage.nodes() {
        assert!(
            classifier.is_displayable(id).unwrap_or(false),
            "Junction node {} leaked into the lineage",
            id
        );
        assert!(!node.parents().contains(id), "{} is its own parent", id);
        assert!(!node.children().contains(id), "{} is its own child", id);

        for parent in node.parents() {
            assert!(
                classifier.is_displayable(parent).unwrap_or(false),
                "Junction node {} listed as parent of {}",
                parent,
                id
            );
            assert!(
                lineage.children(parent).contains(id),
                "{} lists parent {} but {} does not list it as a child",
                id,
                parent,
                parent
            );
        }

        for child in node.children() {
            assert!(
                classifier.is_displayable(child).unwrap_or(false),
                "Junction node {} listed as child of {}",
                child,
                id
            );
            assert!(
                lineage.parents(child).contains(id),
                "{} lists child {} but {} does not list it as a parent",
                id,
                child,
                child
            );
        }
    }
}
