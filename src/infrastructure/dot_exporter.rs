//! Graphviz DOT exporter.
//!
//! One tab-indented line per edge, in graph order, no sorting or merging.

use crate::domain::callgraph::CallGraph;
use crate::domain::diagnostics::Diagnostic;
use crate::ports::OutputExporter;

pub struct DotExporter;

impl DotExporter {
    /// Convert a CallGraph to DOT text.
    pub fn to_dot(graph: &CallGraph) -> String {
        let mut lines = Vec::with_capacity(graph.len() + 3);
        lines.push("digraph graph_name {".to_string());
        lines.push("\tgraph [ rankdir = LR ];".to_string());

        for edge in graph.edges() {
            lines.push(format!(
                "\t\"{}\" -> \"{}\";",
                Self::escape_label(edge.caller.as_str()),
                Self::escape_label(edge.callee.as_str())
            ));
        }

        lines.push("}".to_string());

        let mut dot = lines.join("\n");
        dot.push('\n');
        dot
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}

impl OutputExporter for DotExporter {
    fn render(&self, graph: &CallGraph, _diagnostics: &[Diagnostic]) -> anyhow::Result<String> {
        Ok(Self::to_dot(graph))
    }
}
