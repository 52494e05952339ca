// Syntax tree view consumed by the call-graph walker.
// Front-ends lower whatever their parser produces into a tree implementing
// `SyntaxTree`; the walker only ever sees node kinds, children and positions.

/// Index of a node inside one unit's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Location of a node in its source unit.
///
/// Lines are 1-based and columns 0-based, matching proc-macro2 spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The closed set of node kinds the walker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstNodeKind {
    /// A routine declaration; opens a caller scope.
    Declaration,
    /// A call expression.
    Call,
    /// Anything else (unit root, modules, containers).
    Other,
}

/// Read-only tree interface implemented by every front-end.
pub trait SyntaxTree: Send + Sync {
    fn root(&self) -> NodeId;
    fn kind(&self, node: NodeId) -> AstNodeKind;
    fn children(&self, node: NodeId) -> &[NodeId];
    fn position(&self, node: NodeId) -> Position;
}

/// A node in an arena-backed tree, carrying a front-end specific payload.
#[derive(Debug, Clone)]
pub struct AstNode<P> {
    pub kind: AstNodeKind,
    pub position: Position,
    pub children: Vec<NodeId>,
    pub payload: P,
}

/// Arena tree with the root at index 0. Children keep insertion order,
/// which front-ends use to encode document order.
#[derive(Debug, Clone)]
pub struct AstTree<P> {
    nodes: Vec<AstNode<P>>,
}

impl<P> AstTree<P> {
    pub fn new(root_payload: P) -> Self {
        Self {
            nodes: vec![AstNode {
                kind: AstNodeKind::Other,
                position: Position::default(),
                children: Vec::new(),
                payload: root_payload,
            }],
        }
    }

    /// Append a node under `parent` and return its id.
    pub fn push(&mut self, parent: NodeId, kind: AstNodeKind, position: Position, payload: P) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AstNode {
            kind,
            position,
            children: Vec::new(),
            payload,
        });
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&AstNode<P>> {
        self.nodes.get(id.0)
    }

    pub fn payload(&self, id: NodeId) -> Option<&P> {
        self.node(id).map(|n| &n.payload)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes of the given kind.
    pub fn count(&self, kind: AstNodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}

impl<P: Send + Sync> SyntaxTree for AstTree<P> {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> AstNodeKind {
        self.node(node).map_or(AstNodeKind::Other, |n| n.kind)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn position(&self, node: NodeId) -> Position {
        self.node(node).map(|n| n.position).unwrap_or_default()
    }
}
