// Application layer: main usecase orchestration for call graph analysis.

use rayon::prelude::*;
use tracing::{debug, info, info_span};

use crate::domain::callgraph::{CallGraph, GraphBuilder};
use crate::domain::diagnostics::Diagnostic;
use crate::domain::error::AnalysisError;
use crate::domain::project::{ExternalReference, Project, ProjectSource, SourceUnit};
use crate::domain::resolver::SymbolResolver;
use crate::domain::walker::SyntaxWalker;
use crate::ports::{FrontEnd, OutputExporter};

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Walk units on the rayon pool instead of sequentially.
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Result of a successful run: the full graph, sentinel edges included,
/// plus every non-fatal diagnostic in unit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub graph: CallGraph,
    pub diagnostics: Vec<Diagnostic>,
}

/// The main usecase: load a project, build its call graph and render it.
pub struct AnalyzeUsecase<'a, F: FrontEnd> {
    pub front_end: &'a F,
    pub exporter: &'a dyn OutputExporter,
    pub options: AnalysisOptions,
}

impl<'a, F: FrontEnd> AnalyzeUsecase<'a, F> {
    /// Load and analyze. Fatal errors surface before any edge is built.
    pub fn run(
        &self,
        name: &str,
        sources: &[ProjectSource],
        references: &[ExternalReference],
    ) -> Result<AnalysisReport, AnalysisError> {
        let project = Project::load(self.front_end, name, sources, references)?;
        Ok(analyze(&project, self.options))
    }

    pub fn render(&self, report: &AnalysisReport) -> anyhow::Result<String> {
        self.exporter.render(&report.graph, &report.diagnostics)
    }

    pub fn export(&self, report: &AnalysisReport, path: &str) -> anyhow::Result<()> {
        self.exporter.export(&report.graph, &report.diagnostics, path)
    }
}

/// Walk every unit of a loaded project and accumulate its edges.
///
/// Parallel and sequential runs produce the same report.
pub fn analyze<F: FrontEnd>(project: &Project<'_, F>, options: AnalysisOptions) -> AnalysisReport {
    let span = info_span!("analyze", project = project.name());
    let _guard = span.enter();

    // Realize the shared bindings once, before any worker reads them.
    project.bindings();
    debug!("bindings ready");

    let walker = SyntaxWalker::new(SymbolResolver::new(project));
    let builder = GraphBuilder::new();

    let walk_unit = |(index, unit): (usize, &SourceUnit<F::Tree>)| {
        let output = walker.walk(index, unit);
        debug!(unit = unit.id(), calls = output.call_sites.len(), "unit walked");
        for site in output.call_sites {
            builder.accept(site);
        }
        output.diagnostics
    };

    let per_unit: Vec<Vec<Diagnostic>> = if options.parallel {
        project.units().par_iter().enumerate().map(walk_unit).collect()
    } else {
        project.units().iter().enumerate().map(walk_unit).collect()
    };

    let report = AnalysisReport {
        graph: builder.finish(),
        diagnostics: per_unit.into_iter().flatten().collect(),
    };
    info!(
        units = project.units().len(),
        edges = report.graph.len(),
        diagnostics = report.diagnostics.len(),
        "call graph built"
    );
    report
}
