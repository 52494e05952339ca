// Symbol resolver: translates tree nodes into canonical graph symbols.

use crate::domain::ast::NodeId;
use crate::domain::project::{Project, SourceUnit};
use crate::domain::symbol::Symbol;
use crate::ports::FrontEnd;

/// Thin, side-effect free adapter over the front-end's symbol lookups.
///
/// Both lookups are total: anything the front-end cannot answer comes back
/// as `None`, never as an error.
pub struct SymbolResolver<'a, F: FrontEnd> {
    project: &'a Project<'a, F>,
}

impl<'a, F: FrontEnd> SymbolResolver<'a, F> {
    pub fn new(project: &'a Project<'a, F>) -> Self {
        Self { project }
    }

    /// Canonical symbol of a declaration node.
    pub fn declaring_symbol(&self, unit: &SourceUnit<F::Tree>, node: NodeId) -> Option<Symbol> {
        let front_end = self.project.front_end();
        front_end
            .declared_symbol(self.project.bindings(), unit.tree(), node)
            .and_then(|symbol| canonical(front_end.display_name(&symbol)))
    }

    /// False for call-shaped nodes the front-end binds to something other than a routine.
    pub fn is_call(&self, unit: &SourceUnit<F::Tree>, node: NodeId) -> bool {
        self.project
            .front_end()
            .is_call(self.project.bindings(), unit.tree(), node)
    }

    /// Canonical symbol of the routine a call node invokes.
    pub fn referenced_symbol(&self, unit: &SourceUnit<F::Tree>, node: NodeId) -> Option<Symbol> {
        let front_end = self.project.front_end();
        front_end
            .referenced_symbol(self.project.bindings(), unit.tree(), node)
            .and_then(|symbol| canonical(front_end.display_name(&symbol)))
    }
}

// An empty display string cannot name a graph node.
fn canonical(display: String) -> Option<Symbol> {
    if display.is_empty() {
        None
    } else {
        Some(Symbol::new(display))
    }
}
