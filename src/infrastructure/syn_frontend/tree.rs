// Lowered form of one Rust file.
// Everything here is owned data, so trees can move between rayon workers;
// syn types never leave `lower`.

use std::collections::BTreeMap;

use crate::domain::ast::{AstNodeKind, AstTree, NodeId, Position, SyntaxTree};

pub type ScopeId = usize;

/// Name-resolution context of a module, impl or trait body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeInfo {
    /// Module path from the crate root.
    pub namespace: Vec<String>,
    /// What `Self` means here (impl self type or trait), already qualified.
    pub self_type: Option<Vec<String>>,
    /// `use` aliases: local name -> absolute path.
    pub imports: BTreeMap<String, Vec<String>>,
    /// `use foo::*` prefixes, absolute.
    pub globs: Vec<Vec<String>>,
}

impl ScopeInfo {
    /// Absolute paths `path` may refer to from this scope, most specific first.
    pub fn candidates(&self, path: &[String]) -> Vec<Vec<String>> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };

        match first.as_str() {
            "crate" => vec![rest.to_vec()],
            "self" => vec![concat(&self.namespace, rest)],
            "super" => {
                let depth = path.iter().take_while(|s| *s == "super").count();
                let keep = self.namespace.len().saturating_sub(depth);
                let tail = path.get(depth..).unwrap_or_default();
                vec![concat(self.namespace.get(..keep).unwrap_or_default(), tail)]
            }
            "Self" => self
                .self_type
                .as_ref()
                .map(|ty| vec![concat(ty, rest)])
                .unwrap_or_default(),
            _ => {
                let mut out: Vec<Vec<String>> = Vec::new();
                let mut add = |candidate: Vec<String>| {
                    if !out.contains(&candidate) {
                        out.push(candidate);
                    }
                };
                if let Some(target) = self.imports.get(first) {
                    add(concat(target, rest));
                }
                add(concat(&self.namespace, path));
                for glob in &self.globs {
                    add(concat(glob, path));
                }
                add(path.to_vec());
                out
            }
        }
    }

    /// Most specific candidate, or the path unchanged.
    pub fn qualify(&self, path: &[String]) -> Vec<String> {
        self.candidates(path)
            .into_iter()
            .next()
            .unwrap_or_else(|| path.to_vec())
    }
}

pub fn concat(prefix: &[String], tail: &[String]) -> Vec<String> {
    prefix.iter().chain(tail).cloned().collect()
}

pub fn key(path: &[String]) -> String {
    path.join("::")
}

/// Static type of an expression, as far as it can be told without bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// A type written by path, to be resolved in `scope`.
    Named { path: Vec<String>, scope: ScopeId },
    /// Whatever the call returns.
    ReturnOf(Box<CallTarget>),
    Unknown,
}

/// What a call expression invokes, before binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// `f()`, `A::f()`, `Self::f()`, `crate::m::f()`.
    Path { path: Vec<String>, scope: ScopeId },
    /// `Name(..)` or `a::Name(..)`: a tuple struct or enum variant unless it
    /// binds to a routine.
    Construct { path: Vec<String>, scope: ScopeId },
    /// `receiver.name()`.
    Method { receiver: TypeHint, name: String },
    /// Closure variables, call results and other non-path callees.
    Dynamic,
}

/// A routine declared in this file, with or without a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDecl {
    pub path: Vec<String>,
    pub params: Vec<String>,
    pub returns: TypeHint,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplDecl {
    pub self_type: Vec<String>,
    /// Trait path as written, resolved in `scope` at bind time.
    pub trait_path: Option<Vec<String>>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub enum SynNode {
    Root,
    Module,
    /// Index into `SynTree::routines`.
    Declaration(usize),
    Call(CallTarget),
}

#[derive(Debug, Clone)]
pub struct SynTree {
    pub(super) ast: AstTree<SynNode>,
    pub(super) scopes: Vec<ScopeInfo>,
    pub(super) routines: Vec<RoutineDecl>,
    pub(super) types: Vec<Vec<String>>,
    pub(super) impls: Vec<ImplDecl>,
}

impl SynTree {
    pub fn new(root_scope: ScopeInfo) -> Self {
        Self {
            ast: AstTree::new(SynNode::Root),
            scopes: vec![root_scope],
            routines: Vec::new(),
            types: Vec::new(),
            impls: Vec::new(),
        }
    }

    pub fn scope(&self, id: ScopeId) -> Option<&ScopeInfo> {
        self.scopes.get(id)
    }

    pub fn routines(&self) -> &[RoutineDecl] {
        &self.routines
    }

    pub fn types(&self) -> &[Vec<String>] {
        &self.types
    }

    pub fn impls(&self) -> &[ImplDecl] {
        &self.impls
    }

    /// Declaration carried by a `Declaration` node.
    pub fn routine_at(&self, node: NodeId) -> Option<&RoutineDecl> {
        match self.ast.payload(node)? {
            SynNode::Declaration(index) => self.routines.get(*index),
            _ => None,
        }
    }

    /// Target carried by a `Call` node.
    pub fn call_at(&self, node: NodeId) -> Option<&CallTarget> {
        match self.ast.payload(node)? {
            SynNode::Call(target) => Some(target),
            _ => None,
        }
    }

    /// Call targets in document order.
    #[cfg(test)]
    pub fn calls(&self) -> impl Iterator<Item = &CallTarget> {
        (0..self.ast.len()).filter_map(|i| self.call_at(NodeId(i)))
    }

    pub fn declaration_count(&self) -> usize {
        self.ast.count(AstNodeKind::Declaration)
    }

    pub fn call_count(&self) -> usize {
        self.ast.count(AstNodeKind::Call)
    }
}

impl SyntaxTree for SynTree {
    fn root(&self) -> NodeId {
        self.ast.root()
    }

    fn kind(&self, node: NodeId) -> AstNodeKind {
        self.ast.kind(node)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.ast.children(node)
    }

    fn position(&self, node: NodeId) -> Position {
        self.ast.position(node)
    }
}
