//! Criterion benchmarks for lineage resolution
//!
//! These benchmarks measure edge fetching and junction collapsing at
//! various graph sizes to ensure resolution stays linear in the edge count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use exp_core::{Edge, Identifiable, LineageOptions, NodeId, NodeKind, PrefixClassifier};
use exp_lineage::{EdgeSource, EdgeStore, LineageGraphResolver, LineageService, StoredEdge};

fn lsid(namespace: &str, name: String) -> NodeId {
    let raw = format!("urn:lsid:labkey.com:{}.Folder-1:{}", namespace, name);
    NodeId::new(raw).unwrap()
}

/// Sample chain where every derivation goes through its own run:
/// S0 -> R0 -> S1 -> R1 -> ... -> Sn
fn create_run_chain(size: usize) -> (Vec<Edge>, Vec<NodeId>) {
    let samples: Vec<NodeId> = (0..=size)
        .map(|i| lsid("Sample", format!("S-{}", i)))
        .collect();
    let mut edges = Vec::with_capacity(size * 2);

    for i in 0..size {
        let run = lsid("Run", format!("run-{}", i));
        edges.push(Edge::new(samples[i].clone(), run.clone()));
        edges.push(Edge::new(run, samples[i + 1].clone()));
    }

    (edges, samples)
}

/// One sample feeding a single run with `fan_out` data outputs
fn create_fan_out(fan_out: usize) -> Vec<Edge> {
    let source = lsid("Sample", "source".to_string());
    let run = lsid("Run", "run".to_string());
    let mut edges = vec![Edge::new(source, run.clone())];
    for i in 0..fan_out {
        edges.push(Edge::new(run.clone(), lsid("Data", format!("d{}.txt", i))));
    }
    edges
}

/// Layers of `width` samples, each layer fully connected to the next
/// through a chain of `junctions` runs
fn create_layered(layers: usize, width: usize, junctions: usize) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut prev: Vec<NodeId> = (0..width)
        .map(|i| lsid("Sample", format!("L0-{}", i)))
        .collect();

    for layer in 1..layers {
        let current: Vec<NodeId> = (0..width)
            .map(|i| lsid("Sample", format!("L{}-{}", layer, i)))
            .collect();
        let runs: Vec<NodeId> = (0..junctions)
            .map(|j| lsid("Run", format!("L{}-run-{}", layer, j)))
            .collect();

        for p in &prev {
            edges.push(Edge::new(p.clone(), runs[0].clone()));
        }
        for pair in runs.windows(2) {
            edges.push(Edge::new(pair[0].clone(), pair[1].clone()));
        }
        for c in &current {
            edges.push(Edge::new(runs[junctions - 1].clone(), c.clone()));
        }
        prev = current;
    }

    edges
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = LineageGraphResolver::new(PrefixClassifier::default());
    let mut group = c.benchmark_group("resolve");

    for size in [10, 100, 1000].iter() {
        let (edges, _) = create_run_chain(*size);
        group.throughput(Throughput::Elements(edges.len() as u64));
        group.bench_with_input(BenchmarkId::new("run_chain", size), &edges, |b, edges| {
            b.iter(|| black_box(resolver.resolve(edges.to_vec()).unwrap()));
        });

        let edges = create_fan_out(*size);
        group.throughput(Throughput::Elements(edges.len() as u64));
        group.bench_with_input(BenchmarkId::new("fan_out", size), &edges, |b, edges| {
            b.iter(|| black_box(resolver.resolve(edges.to_vec()).unwrap()));
        });
    }

    for junctions in [1, 3, 5].iter() {
        let edges = create_layered(5, 10, *junctions);
        let id = BenchmarkId::new("layered_junction_chain", junctions);
        group.throughput(Throughput::Elements(edges.len() as u64));
        group.bench_with_input(id, &edges, |b, edges| {
            b.iter(|| black_box(resolver.resolve(edges.to_vec()).unwrap()));
        });
    }

    group.finish();
}

fn bench_fetch_and_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("fetch_and_resolve");
    let options = LineageOptions::default().children_only();

    for size in [10, 100, 500].iter() {
        let (edges, samples) = create_run_chain(*size);
        let store = EdgeStore::new();
        let stored = edges
            .into_iter()
            .map(|edge| StoredEdge::new(edge.parent, edge.child));
        store.add_edges(stored).unwrap();
        let seed = Identifiable::new(samples[0].clone(), NodeKind::Material);

        let id = BenchmarkId::new("fetch_chain_first", size);
        group.bench_with_input(id, &seed, |b, seed| {
            b.iter(|| {
                let edges = store.fetch_edges(black_box(seed), &options).unwrap();
                black_box(edges)
            });
        });

        let service = LineageService::new(&store, PrefixClassifier::default());
        let id = BenchmarkId::new("service_chain_first", size);
        group.bench_with_input(id, &seed, |b, seed| {
            b.iter(|| {
                let result = service.lineage(black_box(seed), &options).unwrap();
                black_box(result)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_fetch_and_resolve);
criterion_main!(benches);
