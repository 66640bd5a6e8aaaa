use std::fmt;

use super::tokens::{Token, TokenKind};

/// Type tag of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// One top-level statement, terminating `;` included
    Statement,

    /// A name, optionally qualified or aliased
    ///
    /// # Examples
    /// ```text
    /// users
    /// s.users
    /// users u
    /// x AS (SELECT * FROM y)
    /// ```
    Identifier,

    /// Comma-separated identifiers, functions or literals
    ///
    /// # Examples
    /// ```text
    /// a, b, c
    /// x AS (SELECT 1), y AS (SELECT 2)
    /// ```
    IdentifierList,

    /// A balanced `(` ... `)` group, both parentheses included
    Parenthesis,

    /// A name directly followed by a parenthesis
    ///
    /// # Examples
    /// ```text
    /// COUNT(*)
    /// coalesce(a, b)
    /// ```
    Function,

    /// `WHERE` and its predicate, trailing whitespace excluded
    Where,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Statement => "Statement",
            NodeKind::Identifier => "Identifier",
            NodeKind::IdentifierList => "IdentifierList",
            NodeKind::Parenthesis => "Parenthesis",
            NodeKind::Function => "Function",
            NodeKind::Where => "Where",
        }
    }
}

/// A composite token: a type tag and an ordered, index-addressable list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Element>,
}

/// A child of a [`Node`]: either a leaf token or another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Token(Token),
    Node(Node),
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Element>) -> Self {
        Node { kind, children }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Element> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First immediate child token of kind `Name`.
    pub fn name_token(&self) -> Option<&Token> {
        self.children.iter().find_map(|child| match child {
            Element::Token(token) if token.kind == TokenKind::Name => Some(token),
            _ => None,
        })
    }

    /// Index and node of the first immediate child of the given kind.
    pub fn find_child(&self, kind: NodeKind) -> Option<(usize, &Node)> {
        self.children
            .iter()
            .enumerate()
            .find_map(|(idx, child)| match child {
                Element::Node(node) if node.kind == kind => Some((idx, node)),
                _ => None,
            })
    }
}

impl Element {
    pub fn is_composite(&self) -> bool {
        matches!(self, Element::Node(_))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Node(node) => Some(node),
            Element::Token(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Element::Node(node) => Some(node),
            Element::Token(_) => None,
        }
    }

    pub fn is_node(&self, kind: NodeKind) -> bool {
        matches!(self, Element::Node(node) if node.kind == kind)
    }

    pub fn is_token(&self, kind: TokenKind) -> bool {
        matches!(self, Element::Token(token) if token.kind == kind)
    }

    /// Type tag name, e.g. `Identifier` or `Keyword.CTE`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Token(token) => token.kind.name(),
            Element::Node(node) => node.kind.name(),
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, Element::Token(token) if token.kind.is_trivia())
    }
}

impl From<Token> for Element {
    fn from(token: Token) -> Self {
        Element::Token(token)
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Element::Node(node)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        Ok(())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Token(token) => write!(f, "{}", token),
            Element::Node(node) => write!(f, "{}", node),
        }
    }
}
