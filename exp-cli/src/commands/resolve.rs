//! Resolve command

use crate::input::{EdgeFile, KnownObjects};
use anyhow::{Context, Result};
use exp_core::{
    Identifiable, LineageConfig, LineageOptions, NodeClassifier, NodeId, PrefixClassifier,
};
use exp_lineage::{EdgeSource, EdgeStore, LineageResult, LineageService, ProvenanceGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Dot,
}

#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub edges_path: String,
    pub seed: String,
    pub row_id: Option<i64>,
    pub depth: u32,
    pub parents_only: bool,
    pub children_only: bool,
    pub source_key: Option<String>,
    pub format: OutputFormat,
}

impl ResolveRequest {
    fn options(&self) -> LineageOptions {
        let mut options = LineageOptions::default().with_depth(self.depth);
        if self.parents_only {
            options = options.parents_only();
        } else if self.children_only {
            options = options.children_only();
        }
        if let Some(key) = &self.source_key {
            options = options.with_source_key(key.clone());
        }
        if let Some(row_id) = self.row_id {
            options = options.with_row_id(row_id);
        }
        options
    }
}

pub fn execute(config: &LineageConfig, request: &ResolveRequest) -> Result<String> {
    let store = EdgeStore::new().with_default_depth(config.default_max_depth);
    let known = EdgeFile::load(&request.edges_path)?.populate(&store)?;
    resolve_in(&store, &known, config, request)
}

/// Resolve against an already populated store and render the result.
///
/// The seed's row id comes from `known`; a `--row-id` on the request must
/// agree with it.
pub fn resolve_in(
    store: &EdgeStore,
    known: &KnownObjects,
    config: &LineageConfig,
    request: &ResolveRequest,
) -> Result<String> {
    let classifier = PrefixClassifier::from_config(config);
    let lsid = NodeId::new(request.seed.as_str()).context("Invalid seed")?;
    let kind = classifier
        .classify(&lsid)
        .with_context(|| format!("Cannot classify seed {}", lsid))?;

    let mut seed = Identifiable::new(lsid, kind);
    if let Some(object) = known.get(&seed.lsid) {
        seed.row_id = Some(object.row_id);
        seed.name = object.name.clone();
    }
    let options = request.options();

    tracing::info!(
        seed = %seed.lsid,
        kind = %kind,
        row_id = ?seed.row_id,
        "Resolving lineage"
    );
    if tracing::enabled!(tracing::Level::DEBUG) {
        report_raw_graph(store, &seed, &options, &classifier);
    }

    let service = LineageService::new(store, &classifier);
    let result = service
        .lineage(&seed, &options)
        .with_context(|| format!("Failed to resolve lineage of {}", seed.lsid))?;

    render(&result, request.format)
}

fn render(result: &LineageResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&result.to_document())
            .context("Failed to serialize lineage document"),
        OutputFormat::Dot => Ok(result.to_dot()),
    }
}

/// Logs statistics about the raw edge set, junctions included
fn report_raw_graph(
    store: &EdgeStore,
    seed: &Identifiable,
    options: &LineageOptions,
    classifier: &PrefixClassifier,
) {
    let graph = store
        .fetch_edges(seed, options)
        .and_then(|edges| ProvenanceGraph::from_edges(&edges, classifier));
    match graph {
        Ok(graph) => tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            junctions = graph.junction_count(),
            cyclic = graph.has_cycles(),
            "Raw provenance graph"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not build raw provenance graph"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exp_lineage::LineageDocument;

    const SAMPLE: &str = "urn:lsid:labkey.com:Sample.Folder-1:";
    const RUN: &str = "urn:lsid:labkey.com:Run.Folder-1:";

    fn id(prefix: &str, name: &str) -> NodeId {
        NodeId::new(format!("{}{}", prefix, name)).unwrap()
    }

    /// S-1 -> run-1 -> S-2 -> S-3, with S-1 known as row 11
    fn loaded() -> (EdgeStore, KnownObjects) {
        let file = EdgeFile::parse(&format!(
            r#"{{
                "objects": [{{"lsid": "{sample}S-1", "row_id": 11}}],
                "runs": [{{
                    "lsid": "{run}run-1",
                    "row_id": 1,
                    "inputs": ["{sample}S-1"],
                    "outputs": ["{sample}S-2"]
                }}],
                "edges": [{{"from": "{sample}S-2", "to": "{sample}S-3"}}]
            }}"#,
            sample = SAMPLE,
            run = RUN
        ))
        .unwrap();
        let store = EdgeStore::new();
        let known = file.populate(&store).unwrap();
        (store, known)
    }

    fn request(seed: &NodeId, format: OutputFormat) -> ResolveRequest {
        ResolveRequest {
            edges_path: String::new(),
            seed: seed.to_string(),
            row_id: None,
            depth: 0,
            parents_only: false,
            children_only: false,
            source_key: None,
            format,
        }
    }

    fn resolve(request: &ResolveRequest) -> Result<String> {
        let (store, known) = loaded();
        resolve_in(&store, &known, &LineageConfig::default(), request)
    }

    #[test]
    fn test_resolve_json() {
        let seed = id(SAMPLE, "S-2");
        let output = resolve(&request(&seed, OutputFormat::Json)).unwrap();

        let document: LineageDocument = serde_json::from_str(&output).unwrap();
        assert_eq!(document.seed, seed);
        assert_eq!(document.nodes[&seed].parents, vec![id(SAMPLE, "S-1")]);
        assert_eq!(document.nodes[&seed].children, vec![id(SAMPLE, "S-3")]);
        assert!(!document.nodes.contains_key(&id(RUN, "run-1")));
    }

    #[test]
    fn test_resolve_with_debug_logging_reports_raw_graph() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let seed = id(SAMPLE, "S-2");
        let output = tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::DEBUG));
            resolve(&request(&seed, OutputFormat::Json))
        });
        assert!(output.is_ok());
    }

    #[test]
    fn test_resolve_dot_children_only() {
        let mut req = request(&id(SAMPLE, "S-1"), OutputFormat::Dot);
        req.children_only = true;
        let output = resolve(&req).unwrap();

        assert!(output.starts_with("digraph"));
        assert!(output.contains("S-3"));
        assert!(!output.contains("run-1"));
    }

    #[test]
    fn test_row_id_matching_edge_file_is_accepted() {
        let mut req = request(&id(SAMPLE, "S-1"), OutputFormat::Json);
        req.row_id = Some(11);
        assert!(resolve(&req).is_ok());

        let mut req = request(&id(RUN, "run-1"), OutputFormat::Json);
        req.row_id = Some(1);
        let document: LineageDocument = serde_json::from_str(&resolve(&req).unwrap()).unwrap();
        assert_eq!(
            document.nodes[&id(SAMPLE, "S-2")].parents,
            vec![id(SAMPLE, "S-1")]
        );
    }

    #[test]
    fn test_mismatched_row_id_is_rejected() {
        let mut req = request(&id(SAMPLE, "S-1"), OutputFormat::Json);
        req.row_id = Some(987654);
        assert!(resolve(&req).is_err());
    }

    #[test]
    fn test_row_id_for_seed_without_known_row_id_is_rejected() {
        let mut req = request(&id(SAMPLE, "S-3"), OutputFormat::Json);
        req.row_id = Some(3);
        assert!(resolve(&req).is_err());
    }

    #[test]
    fn test_unclassifiable_seed_fails() {
        let (store, known) = loaded();
        let config = LineageConfig {
            fallback_kind: None,
            ..LineageConfig::default()
        };
        let seed = NodeId::new("urn:other:x").unwrap();
        let result = resolve_in(&store, &known, &config, &request(&seed, OutputFormat::Json));
        assert!(result.is_err());
    }
}
