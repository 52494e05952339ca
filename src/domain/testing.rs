// In-memory front-end used by the domain unit tests.
//
// Units are written as an indented outline, two spaces per level:
//
//   decl A.F()        declaration named `A.F()`
//     call B.G()      call resolving to `B.G()` if anything declares it
//     call ?          call that never resolves
//     ctor W          call-shaped node; a call only if something declares `W`
//   mod m             non-declaration container
//   !                 parse error

use std::collections::HashSet;

use anyhow::bail;

use crate::domain::ast::{AstNodeKind, AstTree, NodeId, Position, SyntaxTree};
use crate::domain::project::{ExternalReference, Project, ProjectSource, ReferenceSource, SourceUnit};
use crate::ports::FrontEnd;

#[derive(Debug, Clone)]
pub enum FakeNode {
    Root,
    Module,
    Decl(String),
    Call(Option<String>),
    Construct(String),
}

pub struct FakeFrontEnd;

impl FrontEnd for FakeFrontEnd {
    type Tree = AstTree<FakeNode>;
    type Library = Vec<String>;
    type Bindings = HashSet<String>;
    type Symbol = String;

    fn parse(&self, source: &ProjectSource) -> anyhow::Result<Self::Tree> {
        let mut tree = AstTree::new(FakeNode::Root);
        let mut open: Vec<(usize, NodeId)> = Vec::new();

        for (index, line) in source.text.lines().enumerate() {
            let content = line.trim_start();
            if content.is_empty() {
                continue;
            }
            let indent = line.len() - content.len();
            let depth = indent / 2;
            let position = Position::new(index + 1, indent);

            while open.last().is_some_and(|(d, _)| *d >= depth) {
                open.pop();
            }
            let parent = open.last().map_or(tree.root(), |(_, id)| *id);

            let (kind, payload) = match content.split_once(' ') {
                Some(("decl", name)) => (AstNodeKind::Declaration, FakeNode::Decl(name.to_string())),
                Some(("call", "?")) => (AstNodeKind::Call, FakeNode::Call(None)),
                Some(("call", name)) => (AstNodeKind::Call, FakeNode::Call(Some(name.to_string()))),
                Some(("ctor", name)) => (AstNodeKind::Call, FakeNode::Construct(name.to_string())),
                Some(("mod", _)) => (AstNodeKind::Other, FakeNode::Module),
                _ => bail!("{}: unexpected `{}`", position, content),
            };
            let id = tree.push(parent, kind, position, payload);
            open.push((depth, id));
        }
        Ok(tree)
    }

    fn load_library(&self, reference: &ExternalReference) -> anyhow::Result<Self::Library> {
        match &reference.source {
            ReferenceSource::Inline(text) => Ok(text.split_whitespace().map(str::to_string).collect()),
            ReferenceSource::File(path) => bail!("cannot open {}", path.display()),
        }
    }

    fn bind(&self, units: &[SourceUnit<Self::Tree>], libraries: &[Self::Library]) -> Self::Bindings {
        let mut declared = HashSet::new();
        for unit in units {
            let tree = unit.tree();
            for index in 0..tree.len() {
                if let Some(FakeNode::Decl(name)) = tree.payload(NodeId(index)) {
                    declared.insert(name.clone());
                }
            }
        }
        declared.extend(libraries.iter().flatten().cloned());
        declared
    }

    fn declared_symbol(&self, _bindings: &Self::Bindings, tree: &Self::Tree, node: NodeId) -> Option<String> {
        match tree.payload(node) {
            Some(FakeNode::Decl(name)) => Some(name.clone()),
            _ => None,
        }
    }

    fn referenced_symbol(&self, bindings: &Self::Bindings, tree: &Self::Tree, node: NodeId) -> Option<String> {
        match tree.payload(node) {
            Some(FakeNode::Call(Some(name)) | FakeNode::Construct(name)) if bindings.contains(name) => Some(name.clone()),
            _ => None,
        }
    }

    fn is_call(&self, bindings: &Self::Bindings, tree: &Self::Tree, node: NodeId) -> bool {
        match tree.payload(node) {
            Some(FakeNode::Construct(name)) => bindings.contains(name),
            _ => true,
        }
    }

    fn display_name(&self, symbol: &String) -> String {
        symbol.clone()
    }
}

pub fn sources(units: &[(&str, &str)]) -> Vec<ProjectSource> {
    units
        .iter()
        .map(|(id, text)| ProjectSource::new(*id, *text))
        .collect()
}

pub fn references(libraries: &[(&str, &str)]) -> Vec<ExternalReference> {
    libraries
        .iter()
        .map(|(name, text)| ExternalReference::inline(*name, *text))
        .collect()
}

pub fn project<'f>(
    front_end: &'f FakeFrontEnd,
    units: &[(&str, &str)],
    libraries: &[(&str, &str)],
) -> Project<'f, FakeFrontEnd> {
    Project::load(front_end, "test", &sources(units), &references(libraries))
        .expect("fake project should load")
}
