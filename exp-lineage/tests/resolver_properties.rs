//! Behavioural tests for lineage resolution over generated and hand-built edge sets

use exp_core::{Edge, NodeClassifier, NodeId, PrefixClassifier};
use exp_lineage::{LineageGraphResolver, ResolvedLineage};
use exp_tests::{assert_lineage_invariants, fixtures, EdgeSetBuilder};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn resolver() -> LineageGraphResolver<PrefixClassifier> {
    LineageGraphResolver::new(PrefixClassifier::default())
}

fn pool() -> Vec<NodeId> {
    let mut nodes = Vec::new();
    for i in 0..5 {
        nodes.push(fixtures::material(&format!("S-{}", i)));
    }
    for i in 0..3 {
        nodes.push(fixtures::data(&format!("d{}.txt", i)));
    }
    for i in 0..3 {
        nodes.push(fixtures::run(&format!("run-{}", i)));
    }
    for i in 0..2 {
        nodes.push(fixtures::protocol_application(&format!("app-{}", i)));
    }
    nodes
}

fn edges_from(indices: &[(usize, usize)]) -> Vec<Edge> {
    let nodes = pool();
    indices
        .iter()
        .map(|&(p, c)| Edge::new(nodes[p].clone(), nodes[c].clone()))
        .collect()
}

/// Children of every displayable node, found by walking raw edges through junctions only
fn expected_children(edges: &[Edge]) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
    let classifier = PrefixClassifier::default();
    let displayable = |id: &NodeId| classifier.is_displayable(id).unwrap();

    let mut out: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
    for start in edges
        .iter()
        .filter(|e| !e.is_self_edge())
        .flat_map(|e| [&e.parent, &e.child])
        .filter(|id| displayable(id))
    {
        let mut reached = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut stack = vec![start.clone()];
        while let Some(current) = stack.pop() {
            for edge in edges.iter().filter(|e| e.parent == current && !e.is_self_edge()) {
                if displayable(&edge.child) {
                    if &edge.child != start {
                        reached.insert(edge.child.clone());
                    }
                } else if visited.insert(edge.child.clone()) {
                    stack.push(edge.child.clone());
                }
            }
        }
        out.insert(start.clone(), reached);
    }
    out
}

fn children_map(lineage: &ResolvedLineage) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
    lineage
        .nodes()
        .iter()
        .map(|(id, node)| (id.clone(), node.children().clone()))
        .collect()
}

proptest! {
    #[test]
    fn prop_resolved_lineage_holds_invariants(
        indices in proptest::collection::vec((0..13usize, 0..13usize), 0..40)
    ) {
        let edges = edges_from(&indices);
        let lineage = resolver().resolve(edges).unwrap();
        assert_lineage_invariants(&lineage, &PrefixClassifier::default());
    }

    #[test]
    fn prop_children_match_junction_reachability(
        indices in proptest::collection::vec((0..13usize, 0..13usize), 0..40)
    ) {
        let edges = edges_from(&indices);
        let lineage = resolver().resolve(edges.clone()).unwrap();
        prop_assert_eq!(children_map(&lineage), expected_children(&edges));
    }

    #[test]
    fn prop_duplicate_edges_do_not_change_result(
        indices in proptest::collection::vec((0..13usize, 0..13usize), 0..30)
    ) {
        let edges = edges_from(&indices);
        let mut doubled = edges.clone();
        doubled.extend(edges.iter().rev().cloned());

        let once = resolver().resolve(edges).unwrap();
        let twice = resolver().resolve(doubled).unwrap();
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn test_empty_edge_set() {
    assert!(resolver().resolve(Vec::new()).unwrap().is_empty());
}

#[test]
fn test_fan_out_through_one_run() {
    let (a, b, c) = (
        fixtures::material("A"),
        fixtures::material("B"),
        fixtures::data("C"),
    );
    let edges = EdgeSetBuilder::new()
        .through_run(&[a.clone()], "X", &[b.clone(), c.clone()])
        .build();
    let lineage = resolver().resolve(edges).unwrap();

    assert_eq!(lineage.children(&a), BTreeSet::from([b.clone(), c.clone()]));
    assert_eq!(lineage.parents(&b), BTreeSet::from([a.clone()]));
    assert_eq!(lineage.parents(&c), BTreeSet::from([a]));
    assert!(!lineage.contains(&fixtures::run("X")));
}

#[test]
fn test_chain_of_run_and_protocol_application() {
    let (a, b) = (fixtures::material("A"), fixtures::data("B"));
    let edges = EdgeSetBuilder::new()
        .chain(&[
            a.clone(),
            fixtures::run("X"),
            fixtures::protocol_application("Y"),
            b.clone(),
        ])
        .build_set();
    let lineage = resolver().resolve(edges).unwrap();

    assert_eq!(lineage.len(), 2);
    assert_eq!(lineage.children(&a), BTreeSet::from([b.clone()]));
    assert_eq!(lineage.parents(&b), BTreeSet::from([a]));
}

#[test]
fn test_self_edge_only() {
    let a = fixtures::material("A");
    let lineage = resolver()
        .resolve(EdgeSetBuilder::new().edge(&a, &a).build())
        .unwrap();
    assert!(!lineage.contains(&a));
}

#[test]
fn test_materials_and_data_through_shared_run() {
    let (m1, m2, d1) = (
        fixtures::material("M1"),
        fixtures::material("M2"),
        fixtures::data("D1"),
    );
    let r1 = fixtures::run("R1");
    let edges = EdgeSetBuilder::new()
        .edge(&m1, &r1)
        .edge(&r1, &m2)
        .edge(&m1, &r1)
        .edge(&r1, &d1)
        .build();
    let lineage = resolver().resolve(edges).unwrap();

    assert_eq!(lineage.len(), 3);
    assert!(lineage.parents(&m1).is_empty());
    let children = BTreeSet::from([m2.clone(), d1.clone()]);
    assert_eq!(lineage.children(&m1), children);
    assert_eq!(lineage.parents(&m2), BTreeSet::from([m1.clone()]));
    assert!(lineage.children(&m2).is_empty());
    assert_eq!(lineage.parents(&d1), BTreeSet::from([m1]));
    assert!(lineage.children(&d1).is_empty());
    assert!(!lineage.contains(&r1));
}
