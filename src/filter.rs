//! Finding and splicing `WHERE` clauses.
//!
//! [`find`] decides where a `WHERE` lives in a statement: either an existing
//! group to overwrite, or the index a new one must be inserted at so that it
//! precedes every clause listed in a [`ClauseOrder`]. [`apply`] builds the new
//! clause text, reparses it and splices it in.

use std::{fmt, str::FromStr};

use tracing::{debug, trace};

use crate::{
    ast::{Element, Node, NodeKind, Token, TokenKind, normalize_keyword},
    error::Error,
    location::{self, Location},
    parser,
};

/// Clauses that must come after `WHERE`, in statement order.
pub const DEFAULT_FOLLOWING_CLAUSES: [&str; 8] = [
    "GROUP BY", "HAVING", "WINDOW", "ORDER BY", "LIMIT", "OFFSET", "FETCH", "FOR",
];

/// Set operations that make the target of a filter ambiguous.
const SET_OPERATIONS: [&str; 2] = ["UNION", "UNION ALL"];

/// How a new predicate combines with an existing `WHERE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Join the predicate to the existing clause with `AND`
    #[default]
    Append,

    /// Discard the existing clause
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode `{0}` (expected `append` or `replace`)")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "append" => Ok(Mode::Append),
            "replace" => Ok(Mode::Replace),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Append => write!(f, "append"),
            Mode::Replace => write!(f, "replace"),
        }
    }
}

/// Keywords that must follow `WHERE`, normalized to uppercase single-spaced form.
///
/// Dialects that know more trailing clauses (`QUALIFY`, `SETTINGS`, ...) build
/// their own list with [`ClauseOrder::new`]. Words the lexer reads as plain
/// names are only recognized in trees parsed with [`parser::parse_with`] and
/// these [`keywords`](ClauseOrder::keywords).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseOrder {
    keywords: Vec<String>,
}

impl ClauseOrder {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ClauseOrder {
            keywords: keywords
                .into_iter()
                .map(|keyword| normalize_keyword(keyword.as_ref()))
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when `token` is a keyword opening a clause that follows `WHERE`.
    pub fn must_follow_where(&self, token: &Token) -> bool {
        token.is_keyword() && {
            let normalized = token.normalized();
            self.keywords.iter().any(|keyword| *keyword == normalized)
        }
    }
}

impl Default for ClauseOrder {
    fn default() -> Self {
        ClauseOrder::new(DEFAULT_FOLLOWING_CLAUSES)
    }
}

/// Where a statement's `WHERE` clause is, or must go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhereSlot<'a> {
    /// An existing clause at `index`
    Existing { index: usize, clause: &'a Node },

    /// No clause yet; a new one belongs at `anchor`
    Insert { anchor: usize },
}

/// Locates the `WHERE` of `statement` among its immediate children.
///
/// Without an existing clause the anchor is the first keyword from `order`
/// after `FROM`, else the statement's closing `)` or `;`, else the end. A
/// trailing `--` comment is kept after the anchor.
pub fn find<'a>(statement: &'a Node, order: &ClauseOrder) -> WhereSlot<'a> {
    let children = statement.children();
    // Clause keywords ahead of FROM are select-list names.
    let from = children
        .iter()
        .position(|child| matches!(child, Element::Token(t) if t.is_keyword_text("FROM")))
        .unwrap_or(0);

    for (index, child) in children.iter().enumerate() {
        match child {
            Element::Node(node) if node.kind == NodeKind::Where => {
                return WhereSlot::Existing {
                    index,
                    clause: node,
                };
            }
            Element::Token(token) if index > from && order.must_follow_where(token) => {
                trace!(keyword = %token.normalized(), index, "WHERE anchored before keyword");
                return WhereSlot::Insert { anchor: index };
            }
            _ => {}
        }
    }

    let last_significant = children.iter().rposition(|child| !child.is_trivia());
    let semicolon = last_significant
        .filter(|&idx| matches!(&children[idx], Element::Token(t) if t.is_punctuation(";")));

    let anchor = match (children.last(), semicolon) {
        (Some(Element::Token(last)), _) if last.is_punctuation(")") => children.len() - 1,
        (_, Some(idx)) => idx,
        (Some(last), None) if is_line_comment(last) => last_significant.map_or(0, |idx| idx + 1),
        _ => children.len(),
    };
    WhereSlot::Insert { anchor }
}

enum Splice {
    Overwrite(usize),
    Insert(usize),
}

/// Adds `clause` to the `WHERE` of `statement`, in place.
///
/// Fails with [`Error::UnsupportedUnion`] when `statement` itself is a `UNION`,
/// leaving it untouched.
pub fn apply(
    statement: &mut Node,
    clause: &str,
    mode: Mode,
    order: &ClauseOrder,
) -> Result<(), Error> {
    let union = statement.children().iter().any(|child| match child {
        Element::Token(token) if token.is_keyword() => {
            SET_OPERATIONS.contains(&token.normalized().as_str())
        }
        _ => false,
    });
    if union {
        return Err(Error::UnsupportedUnion);
    }
    if clause.trim().is_empty() {
        return Err(Error::InvalidClause(clause.to_string()));
    }

    let (splice, text) = match find(statement, order) {
        WhereSlot::Existing { index, clause: existing } if mode == Mode::Append => {
            (Splice::Overwrite(index), format!("{existing} AND {clause}"))
        }
        WhereSlot::Existing { index, .. } => (Splice::Overwrite(index), format!("WHERE {clause}")),
        WhereSlot::Insert { anchor } => (Splice::Insert(anchor), format!("WHERE {clause}")),
    };
    let fragment = parse_fragment(&text, order)?;

    match splice {
        Splice::Overwrite(index) => {
            debug!(index, %mode, "overwriting WHERE clause");
            location::overwrite(statement, &Location::single(index), fragment.into())?;
        }
        Splice::Insert(anchor) => {
            debug!(anchor, "inserting WHERE clause");
            let children = statement.children();
            let lead = anchor > 0 && !ends_open(&children[anchor - 1]);
            let trail = children.get(anchor).is_some_and(|next| !starts_closed(next));

            location::insert(statement, anchor, fragment.into())?;
            if trail {
                location::insert(statement, anchor + 1, Token::whitespace(" ").into())?;
            }
            if lead {
                location::insert(statement, anchor, Token::whitespace(" ").into())?;
            }
        }
    }
    Ok(())
}

/// Reparses `text` and returns its single `WHERE` group.
fn parse_fragment(text: &str, order: &ClauseOrder) -> Result<Node, Error> {
    let invalid = || Error::InvalidClause(text.to_string());

    let mut statements = parser::parse_with(text, order.keywords())?;
    if statements.len() != 1 {
        return Err(invalid());
    }

    let mut significant = statements
        .remove(0)
        .children
        .into_iter()
        .filter(|child| !child.is_trivia());
    match (significant.next(), significant.next()) {
        (Some(Element::Node(node)), None) if node.kind == NodeKind::Where => Ok(node),
        _ => Err(invalid()),
    }
}

fn is_line_comment(element: &Element) -> bool {
    matches!(element, Element::Token(t) if t.kind == TokenKind::Comment && t.text.starts_with("--"))
}

fn ends_open(element: &Element) -> bool {
    element
        .to_string()
        .chars()
        .next_back()
        .is_none_or(|ch| ch.is_whitespace() || ch == '(')
}

fn starts_closed(element: &Element) -> bool {
    element
        .to_string()
        .chars()
        .next()
        .is_none_or(|ch| ch.is_whitespace() || ch == ')' || ch == ';')
}
