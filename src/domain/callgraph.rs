// Call graph structures for Semgraph.
// Edges are kept in discovery order and never merged.

use dashmap::DashMap;

use crate::domain::ast::Position;
use crate::domain::symbol::Symbol;

/// One located call expression with its resolved endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Index of the unit in project order.
    pub unit: usize,
    pub position: Position,
    pub caller: Symbol,
    pub callee: Symbol,
}

/// A directed caller -> callee pair contributed by exactly one call-site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub caller: Symbol,
    pub callee: Symbol,
}

impl Edge {
    pub fn new(caller: Symbol, callee: Symbol) -> Self {
        Self { caller, callee }
    }
}

impl From<CallSite> for Edge {
    fn from(site: CallSite) -> Self {
        Self::new(site.caller, site.callee)
    }
}

/// The call graph itself: an ordered multiset of edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallGraph {
    edges: Vec<Edge>,
}

impl CallGraph {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Callees of `caller`, one entry per call-site, in discovery order.
    pub fn callees_of<'a>(&'a self, caller: &'a Symbol) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.edges
            .iter()
            .filter(move |e| &e.caller == caller)
            .map(|e| &e.callee)
    }

    /// Callers of `callee`, one entry per call-site, in discovery order.
    pub fn callers_of<'a>(&'a self, callee: &'a Symbol) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.edges
            .iter()
            .filter(move |e| &e.callee == callee)
            .map(|e| &e.caller)
    }

    /// Distinct symbols in order of first appearance (caller before callee).
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut seen = std::collections::HashSet::new();
        self.edges
            .iter()
            .flat_map(|e| [&e.caller, &e.callee])
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

/// Append-only edge accumulator.
///
/// `accept` may be called from several walkers at once; edges are buffered
/// per unit and concatenated in unit order by `finish`, so the result does not
/// depend on scheduling.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    buffers: DashMap<usize, Vec<Edge>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&self, site: CallSite) {
        self.buffers.entry(site.unit).or_default().push(Edge::from(site));
    }

    pub fn finish(self) -> CallGraph {
        let mut units: Vec<(usize, Vec<Edge>)> = self.buffers.into_iter().collect();
        units.sort_by_key(|(unit, _)| *unit);
        CallGraph::new(units.into_iter().flat_map(|(_, edges)| edges).collect())
    }
}
