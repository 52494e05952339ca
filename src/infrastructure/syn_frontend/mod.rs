//! Rust front-end built on `syn`.
//!
//! Each unit is parsed with [`syn::parse_file`] and lowered into a
//! [`SynTree`]; [`Bindings`] then resolves call targets across all units and
//! the loaded external references. Routine symbols display as
//! `Owner::name(ParamType, ...)`, e.g. `A::h(&str)`.

mod binder;
mod library;
mod lower;
mod render;
mod tree;

pub use binder::{Bindings, Routine, SynSymbol};
pub use library::{Library, LibraryRoutine};
pub use tree::{CallTarget, SynTree, TypeHint};

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::domain::ast::NodeId;
use crate::domain::project::{ExternalReference, ProjectSource, SourceUnit};
use crate::ports::FrontEnd;

#[derive(Debug, Default, Clone, Copy)]
pub struct SynFrontEnd;

impl FrontEnd for SynFrontEnd {
    type Tree = SynTree;
    type Library = Library;
    type Bindings = Bindings;
    type Symbol = SynSymbol;

    fn parse(&self, source: &ProjectSource) -> anyhow::Result<SynTree> {
        let file = syn::parse_file(&source.text).map_err(|err| {
            let start = err.span().start();
            anyhow!("{}:{}: {}", start.line, start.column, err)
        })?;
        let tree = lower::lower(&file, &source.namespace);
        debug!(
            unit = %source.id,
            namespace = %source.namespace.join("::"),
            declarations = tree.declaration_count(),
            calls = tree.call_count(),
            "unit lowered"
        );
        Ok(tree)
    }

    fn load_library(&self, reference: &ExternalReference) -> anyhow::Result<Library> {
        let library = Library::load(reference)?;
        if library.routines().is_empty() {
            warn!(reference = %reference.name, "reference declares no routines");
        }
        debug!(reference = %library.name(), routines = library.routines().len(), "reference loaded");
        Ok(library)
    }

    fn bind(&self, units: &[SourceUnit<SynTree>], libraries: &[Library]) -> Bindings {
        let bindings = Bindings::build(units, libraries);
        debug!(routines = bindings.routine_count(), "bindings built");
        bindings
    }

    fn declared_symbol(&self, _bindings: &Bindings, tree: &SynTree, node: NodeId) -> Option<SynSymbol> {
        tree.routine_at(node).map(SynSymbol::from)
    }

    fn referenced_symbol(&self, bindings: &Bindings, tree: &SynTree, node: NodeId) -> Option<SynSymbol> {
        let target = tree.call_at(node)?;
        bindings.resolve_call(tree, target).map(|r| r.symbol.clone())
    }

    fn is_call(&self, bindings: &Bindings, tree: &SynTree, node: NodeId) -> bool {
        tree.call_at(node).map_or(true, |target| bindings.is_call(tree, target))
    }

    fn display_name(&self, symbol: &SynSymbol) -> String {
        symbol.to_string()
    }
}
