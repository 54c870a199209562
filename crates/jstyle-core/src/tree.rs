//! Arena-backed token tree.
//!
//! A [`Tree`] is built once per file by a [`TreeBuilder`] and is read-only
//! afterwards. Nodes live in a single vector in document (pre-order) order,
//! so a node's descendants always occupy the contiguous index range directly
//! after it. Links between nodes are indices, never owning pointers: the
//! parent is a back reference only.

use crate::token::TokenType;
use std::fmt;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of the node in document order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Source range of a node.
///
/// Lines are 1-based, columns 0-based and counted in characters. The end
/// position is exclusive: it points just past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// First line.
    pub line: usize,
    /// First column.
    pub column: usize,
    /// Last line.
    pub end_line: usize,
    /// Column just past the last character on `end_line`.
    pub end_column: usize,
}

impl Span {
    /// Creates a span from explicit start and end positions.
    #[must_use]
    pub const fn new(line: usize, column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Creates a single-line span of `len` characters.
    #[must_use]
    pub const fn at(line: usize, column: usize, len: usize) -> Self {
        Self::new(line, column, line, column + len)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    token_type: TokenType,
    text: String,
    span: Span,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    child_count: usize,
    subtree_end: usize,
}

/// An immutable token tree for one file.
#[derive(Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// Returns the root node (always `COMPILATION_UNIT` for parsed files).
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.index() < self.nodes.len(), "node id out of range");
        Node { tree: self, id }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A finished tree always holds its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every node in document order.
    pub fn iter(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len()).map(move |i| Node {
            tree: self,
            id: NodeId::new(i),
        })
    }

    /// Renders the tree as an indented outline, one node per line.
    #[must_use]
    pub fn dump(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for node in self.iter() {
            let _ = writeln!(
                out,
                "{}{} {}:{} {:?}",
                "  ".repeat(node.depth()),
                node.token_type(),
                node.line(),
                node.column(),
                node.text()
            );
        }
        out
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// A borrowed handle to one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn wrap(self, id: Option<NodeId>) -> Option<Node<'t>> {
        id.map(|id| Node {
            tree: self.tree,
            id,
        })
    }

    fn data(self) -> &'t NodeData {
        self.tree.data(self.id)
    }

    /// Identifier of this node within its tree.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// The tree this node belongs to.
    #[must_use]
    pub fn tree(self) -> &'t Tree {
        self.tree
    }

    /// Syntactic category.
    #[must_use]
    pub fn token_type(self) -> TokenType {
        self.data().token_type
    }

    /// 1-based line of the first character.
    #[must_use]
    pub fn line(self) -> usize {
        self.data().span.line
    }

    /// 0-based column of the first character, in characters.
    #[must_use]
    pub fn column(self) -> usize {
        self.data().span.column
    }

    /// Line holding the last character.
    #[must_use]
    pub fn end_line(self) -> usize {
        self.data().span.end_line
    }

    /// Column just past the last character.
    #[must_use]
    pub fn end_column(self) -> usize {
        self.data().span.end_column
    }

    /// Full source range.
    #[must_use]
    pub fn span(self) -> Span {
        self.data().span
    }

    /// Token text. Leaves hold their lexeme; keyword and operator nodes hold
    /// the keyword; declarations hold their name.
    #[must_use]
    pub fn text(self) -> &'t str {
        &self.data().text
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(self) -> Option<Node<'t>> {
        self.wrap(self.data().parent)
    }

    /// First child.
    #[must_use]
    pub fn first_child(self) -> Option<Node<'t>> {
        self.wrap(self.data().first_child)
    }

    /// Last child.
    #[must_use]
    pub fn last_child(self) -> Option<Node<'t>> {
        self.wrap(self.data().last_child)
    }

    /// Next sibling.
    #[must_use]
    pub fn next_sibling(self) -> Option<Node<'t>> {
        self.wrap(self.data().next_sibling)
    }

    /// Previous sibling.
    #[must_use]
    pub fn previous_sibling(self) -> Option<Node<'t>> {
        self.wrap(self.data().previous_sibling)
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(self) -> usize {
        self.data().child_count
    }

    /// Direct children in order.
    #[must_use]
    pub fn children(self) -> Children<'t> {
        Children {
            next: self.first_child(),
        }
    }

    /// First direct child of the given type.
    #[must_use]
    pub fn find_first_token(self, token_type: TokenType) -> Option<Node<'t>> {
        self.children().find(|c| c.token_type() == token_type)
    }

    /// Returns true if this node or any descendant has the given type.
    #[must_use]
    pub fn branch_contains(self, token_type: TokenType) -> bool {
        self.token_type() == token_type || self.descendants().any(|d| d.token_type() == token_type)
    }

    /// All descendants in document order, excluding this node.
    pub fn descendants(self) -> impl Iterator<Item = Node<'t>> {
        let tree = self.tree;
        (self.id.index() + 1..self.data().subtree_end).map(move |i| Node {
            tree,
            id: NodeId::new(i),
        })
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(self) -> impl Iterator<Item = Node<'t>> {
        std::iter::successors(self.parent(), |n| n.parent())
    }

    /// Number of ancestors.
    #[must_use]
    pub fn depth(self) -> usize {
        self.ancestors().count()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}:{}] {:?}",
            self.token_type(),
            self.line(),
            self.column(),
            self.text()
        )
    }
}

/// Iterator over the direct children of a node.
#[derive(Debug, Clone)]
pub struct Children<'t> {
    next: Option<Node<'t>>,
}

impl<'t> Iterator for Children<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}

/// Errors detected when finishing a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No node was ever added.
    #[error("tree has no root node")]
    Empty,
    /// `finish` was called while nodes were still open.
    #[error("{0} node(s) left open")]
    Unclosed(usize),
    /// `close` was called with nothing open.
    #[error("close called without an open node")]
    UnbalancedClose,
    /// Top-level nodes were added after the root was closed.
    #[error("tree has {0} root nodes, expected exactly one")]
    MultipleRoots(usize),
}

/// Incremental builder producing a [`Tree`] in document order.
///
/// ```
/// use jstyle_core::{Span, TokenType, TreeBuilder};
///
/// let mut b = TreeBuilder::new();
/// b.open(TokenType::CompilationUnit, "", Span::at(1, 0, 0));
/// b.leaf(TokenType::Semi, ";", Span::at(1, 0, 1));
/// b.close();
/// let tree = b.finish().unwrap();
/// assert_eq!(tree.root().child_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
    roots: usize,
    unbalanced: bool,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and makes it the parent of subsequently added nodes
    /// until the matching [`close`](Self::close).
    pub fn open(&mut self, token_type: TokenType, text: impl Into<String>, span: Span) -> NodeId {
        let id = self.push(token_type, text.into(), span);
        self.open.push(id);
        id
    }

    /// Adds a childless node under the currently open node.
    pub fn leaf(&mut self, token_type: TokenType, text: impl Into<String>, span: Span) -> NodeId {
        let id = self.push(token_type, text.into(), span);
        self.seal(id);
        id
    }

    /// Closes the most recently opened node.
    pub fn close(&mut self) -> Option<NodeId> {
        let Some(id) = self.open.pop() else {
            self.unbalanced = true;
            return None;
        };
        self.seal(id);
        Some(id)
    }

    /// Type of the innermost open node.
    #[must_use]
    pub fn current(&self) -> Option<TokenType> {
        self.open
            .last()
            .map(|id| self.nodes[id.index()].token_type)
    }

    /// Validates the shape and returns the finished tree.
    ///
    /// # Errors
    ///
    /// Fails if no node was added, nodes remain open, `close` was unbalanced,
    /// or more than one top-level node exists.
    pub fn finish(self) -> Result<Tree, TreeError> {
        if self.unbalanced {
            return Err(TreeError::UnbalancedClose);
        }
        if !self.open.is_empty() {
            return Err(TreeError::Unclosed(self.open.len()));
        }
        match self.roots {
            0 => Err(TreeError::Empty),
            1 => Ok(Tree { nodes: self.nodes }),
            n => Err(TreeError::MultipleRoots(n)),
        }
    }

    fn push(&mut self, token_type: TokenType, text: String, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let parent = self.open.last().copied();
        let mut previous_sibling = None;

        match parent {
            Some(p) => {
                let parent_data = &mut self.nodes[p.index()];
                previous_sibling = parent_data.last_child;
                if parent_data.first_child.is_none() {
                    parent_data.first_child = Some(id);
                }
                parent_data.last_child = Some(id);
                parent_data.child_count += 1;
                if let Some(prev) = previous_sibling {
                    self.nodes[prev.index()].next_sibling = Some(id);
                }
            }
            None => self.roots += 1,
        }

        self.nodes.push(NodeData {
            token_type,
            text,
            span,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            previous_sibling,
            child_count: 0,
            subtree_end: id.index() + 1,
        });
        id
    }

    fn seal(&mut self, id: NodeId) {
        let end = self.nodes.len();
        let last_end = self.nodes[id.index()]
            .last_child
            .map(|c| self.nodes[c.index()].span);
        let data = &mut self.nodes[id.index()];
        data.subtree_end = end;
        if let Some(child) = last_end {
            if (child.end_line, child.end_column) > (data.span.end_line, data.span.end_column) {
                data.span.end_line = child.end_line;
                data.span.end_column = child.end_column;
            }
        }
    }
}
