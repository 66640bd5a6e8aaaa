//! # Token Tree
//!
//! This module defines the tree form that every rewrite in this crate operates
//! on: a lossless, loosely grouped view of SQL text.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Leaf tokens produced by the lexer (type tag plus literal text)
//! - **[tree]** - Composite nodes produced by the parser and the [`Element`] sum type
//!
//! ## Core Concepts
//!
//! ### Losslessness
//!
//! Every byte of the input lives in exactly one leaf token, whitespace and
//! comments included. Serializing a tree (`to_string()`) concatenates the leaf
//! texts in document order, so regions that are never touched come back out
//! exactly as they went in.
//!
//! ### Shape
//!
//! The tree is not a SQL grammar. Nodes only exist where rewrites need them:
//!
//! ```text
//! WITH x AS (SELECT * FROM y) SELECT * FROM x WHERE a = 1
//!
//! Statement
//! ├── Keyword.CTE  "WITH"
//! ├── Whitespace
//! ├── Identifier
//! │   ├── Name "x"
//! │   ├── Whitespace
//! │   ├── Keyword "AS"
//! │   ├── Whitespace
//! │   └── Parenthesis "(SELECT * FROM y)"
//! ├── Whitespace
//! ├── Keyword.DML "SELECT"
//! ├── ...
//! └── Where "WHERE a = 1"
//! ```
//!
//! ### Addressing
//!
//! Children are plain `Vec`s, so any subtree is reachable by a path of child
//! indices. See [`crate::location`].
pub mod tokens;
pub mod tree;

pub use tokens::{KeywordKind, Token, TokenKind, normalize_keyword};
pub use tree::{Element, Node, NodeKind};
