//! Syntax walker: finds every call expression of a unit in document order and
//! pairs it with its enclosing declaration.

use tracing::trace;

use crate::domain::ast::{AstNodeKind, NodeId, SyntaxTree};
use crate::domain::callgraph::CallSite;
use crate::domain::diagnostics::Diagnostic;
use crate::domain::project::SourceUnit;
use crate::domain::resolver::SymbolResolver;
use crate::domain::symbol::Symbol;
use crate::ports::FrontEnd;

/// Call-sites of one unit plus the problems met while resolving them.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub call_sites: Vec<CallSite>,
    pub diagnostics: Vec<Diagnostic>,
}

enum Step {
    Enter(NodeId),
    Leave,
}

pub struct SyntaxWalker<'a, F: FrontEnd> {
    resolver: SymbolResolver<'a, F>,
}

impl<'a, F: FrontEnd> SyntaxWalker<'a, F> {
    pub fn new(resolver: SymbolResolver<'a, F>) -> Self {
        Self { resolver }
    }

    /// Depth-first, pre-order walk of one unit.
    ///
    /// A call's own site is emitted before anything nested in its receiver or
    /// arguments. Resolution failures never stop the walk; they become
    /// sentinel symbols plus a diagnostic.
    pub fn walk(&self, index: usize, unit: &SourceUnit<F::Tree>) -> WalkOutput {
        let tree = unit.tree();
        let mut output = WalkOutput::default();
        let mut scopes: Vec<NodeId> = Vec::new();
        let mut work = vec![Step::Enter(tree.root())];

        while let Some(step) = work.pop() {
            let node = match step {
                Step::Leave => {
                    scopes.pop();
                    continue;
                }
                Step::Enter(node) => node,
            };

            match tree.kind(node) {
                AstNodeKind::Declaration => {
                    scopes.push(node);
                    work.push(Step::Leave);
                }
                AstNodeKind::Call if self.resolver.is_call(unit, node) => {
                    let site = self.call_site(index, unit, &scopes, node, &mut output.diagnostics);
                    output.call_sites.push(site);
                }
                AstNodeKind::Call | AstNodeKind::Other => {}
            }

            work.extend(tree.children(node).iter().rev().map(|&child| Step::Enter(child)));
        }

        output
    }

    fn call_site(
        &self,
        index: usize,
        unit: &SourceUnit<F::Tree>,
        scopes: &[NodeId],
        node: NodeId,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> CallSite {
        let position = unit.tree().position(node);

        // Nearest enclosing declaration whose symbol can be determined.
        let caller = scopes
            .iter()
            .rev()
            .find_map(|&decl| self.resolver.declaring_symbol(unit, decl))
            .unwrap_or_else(|| {
                trace!(unit = unit.id(), %position, "call outside any declaration");
                diagnostics.push(Diagnostic::unresolved_caller(unit.id(), position));
                Symbol::module_level()
            });

        let callee = self
            .resolver
            .referenced_symbol(unit, node)
            .unwrap_or_else(|| {
                trace!(unit = unit.id(), %position, "unresolved call target");
                diagnostics.push(Diagnostic::unresolved_callee(unit.id(), position));
                Symbol::unresolved()
            });

        CallSite {
            unit: index,
            position,
            caller,
            callee,
        }
    }
}
