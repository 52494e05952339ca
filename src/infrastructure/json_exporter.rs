use serde::{Deserialize, Serialize};

use crate::domain::callgraph::CallGraph;
use crate::domain::diagnostics::{Diagnostic, DiagnosticKind};
use crate::ports::OutputExporter;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphDto {
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
    pub diagnostics: Vec<DiagnosticDto>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeDto {
    pub name: String,
    /// `<module-level>` or `<unresolved>` rather than a routine.
    #[serde(default)]
    pub sentinel: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeDto {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticDto {
    pub kind: String,
    pub unit: String,
    pub line: usize,
    pub column: usize,
}

impl GraphDto {
    pub fn new(graph: &CallGraph, diagnostics: &[Diagnostic]) -> Self {
        let nodes = graph
            .symbols()
            .into_iter()
            .map(|s| NodeDto {
                name: s.to_string(),
                sentinel: s.is_sentinel(),
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeDto {
                from: e.caller.to_string(),
                to: e.callee.to_string(),
            })
            .collect();

        let diagnostics = diagnostics
            .iter()
            .map(|d| DiagnosticDto {
                kind: match d.kind {
                    DiagnosticKind::UnresolvedCaller => "unresolved_caller".to_string(),
                    DiagnosticKind::UnresolvedCallee => "unresolved_callee".to_string(),
                },
                unit: d.unit.clone(),
                line: d.position.line,
                column: d.position.column,
            })
            .collect();

        GraphDto {
            nodes,
            edges,
            diagnostics,
        }
    }
}

/// Same edge sequence as the DOT output, plus diagnostics, as pretty JSON.
pub struct JsonExporter;

impl OutputExporter for JsonExporter {
    fn render(&self, graph: &CallGraph, diagnostics: &[Diagnostic]) -> anyhow::Result<String> {
        let mut json = serde_json::to_string_pretty(&GraphDto::new(graph, diagnostics))?;
        json.push('\n');
        Ok(json)
    }
}
