//! Graphviz rendering of a resolved lineage

use crate::result::LineageResult;
use exp_core::{NodeId, NodeKind};
use std::fmt::Write;

const MATERIAL_COLOR: &str = "#FFCC99";
const DATA_COLOR: &str = "#BBE3E3";
const SEED_PEN_WIDTH: u32 = 3;

fn quote(id: &NodeId) -> String {
    let escaped = id.as_str().replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

impl LineageResult {
    /// Render as a Graphviz `digraph`, one `parent -> child` line per edge
    pub fn to_dot(&self) -> String {
        let lineage = self.lineage();
        let seed = &self.seed().lsid;
        let mut out = String::from("digraph lineage {\n    node [style=filled];\n");

        for id in lineage.nodes().keys() {
            let (shape, color) = match lineage.kind_of(id) {
                Some(NodeKind::Data) => ("ellipse", DATA_COLOR),
                _ => ("box", MATERIAL_COLOR),
            };
            let _ = write!(out, "    {} [shape={}", quote(id), shape);
            let _ = write!(out, ", fillcolor=\"{}\"", color);
            if id == seed {
                let _ = write!(out, ", penwidth={}", SEED_PEN_WIDTH);
            }
            out.push_str("];\n");
        }

        for (parent, child) in lineage.edges() {
            let _ = writeln!(out, "    {} -> {};", quote(parent), quote(child));
        }

        out.push_str("}\n");
        out
    }
}
