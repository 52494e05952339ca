// Ports: the seams between the call-graph core and the outside world.

use anyhow::Context;

use crate::domain::ast::{NodeId, SyntaxTree};
use crate::domain::callgraph::CallGraph;
use crate::domain::diagnostics::Diagnostic;
use crate::domain::project::{ExternalReference, ProjectSource, SourceUnit};

/// Parser + semantic binder consumed by the core.
///
/// The core never sees a front-end's concrete syntax or symbol types; it
/// walks `Tree` through [`SyntaxTree`] and turns `Symbol` into a canonical
/// graph node through `display_name`. Implementations must be pure lookups
/// after `bind`, since units are walked concurrently.
pub trait FrontEnd: Send + Sync {
    /// Parsed and lowered form of one source unit.
    type Tree: SyntaxTree;
    /// Symbol metadata loaded from one external reference.
    type Library: Send + Sync;
    /// Cross-unit binding context, built once per project.
    type Bindings: Send + Sync;
    /// Front-end specific routine identity.
    type Symbol;

    /// Parse one unit. Errors are reported as `ParseError` by the project.
    fn parse(&self, source: &ProjectSource) -> anyhow::Result<Self::Tree>;

    /// Load one external reference. Errors are reported as `MissingReferenceError`.
    fn load_library(&self, reference: &ExternalReference) -> anyhow::Result<Self::Library>;

    /// Build the shared binding context for all units and libraries.
    fn bind(&self, units: &[SourceUnit<Self::Tree>], libraries: &[Self::Library]) -> Self::Bindings;

    /// Symbol declared by a `Declaration` node.
    fn declared_symbol(&self, bindings: &Self::Bindings, tree: &Self::Tree, node: NodeId) -> Option<Self::Symbol>;

    /// Symbol invoked by a `Call` node, or `None` if it cannot be determined statically.
    fn referenced_symbol(&self, bindings: &Self::Bindings, tree: &Self::Tree, node: NodeId) -> Option<Self::Symbol>;

    /// Whether a `Call` node invokes a routine at all.
    ///
    /// Front-ends whose syntax cannot tell a call from a value construction
    /// before binding answer here; a `false` node contributes no call-site.
    fn is_call(&self, _bindings: &Self::Bindings, _tree: &Self::Tree, _node: NodeId) -> bool {
        true
    }

    /// Canonical display string of a symbol.
    fn display_name(&self, symbol: &Self::Symbol) -> String;
}

/// Renders a finished graph to text.
pub trait OutputExporter {
    fn render(&self, graph: &CallGraph, diagnostics: &[Diagnostic]) -> anyhow::Result<String>;

    fn export(&self, graph: &CallGraph, diagnostics: &[Diagnostic], path: &str) -> anyhow::Result<()> {
        let content = self.render(graph, diagnostics)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write output to {}", path))
    }
}
