//! Text-in, text-out rewrites.
//!
//! Each function parses its input, edits the tree at one spot and serializes it
//! again, so everything outside the edited region keeps its original
//! formatting.

use tracing::debug;

use crate::{
    ast::{Element, Node, NodeKind},
    cte,
    error::Error,
    filter::{self, ClauseOrder, Mode},
    location,
    parser::{self, ParseError},
};

/// Options for [`where_clause`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereOptions {
    /// Name of the CTE to filter; `None` filters the main statement
    pub cte: Option<String>,
    pub mode: Mode,
    pub clause_order: ClauseOrder,
}

impl WhereOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cte(mut self, cte: impl Into<String>) -> Self {
        self.cte = Some(cte.into());
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_clause_order(mut self, clause_order: ClauseOrder) -> Self {
        self.clause_order = clause_order;
        self
    }
}

fn parse_single(query: &str, clause_keywords: &[String]) -> Result<Node, Error> {
    let mut statements = parser::parse_with(query, clause_keywords)?;
    match statements.len() {
        0 => Err(Error::NoStatement),
        1 => Ok(statements.remove(0)),
        n => Err(Error::MultipleStatements(n)),
    }
}

/// Appends to or replaces the `WHERE` clause of a query or of one of its CTEs.
///
/// # Examples
///
/// ```
/// use squeak::{WhereOptions, where_clause};
///
/// let out = where_clause("SELECT * FROM x ORDER BY 1", "y > 2", &WhereOptions::new()).unwrap();
/// assert_eq!(out, "SELECT * FROM x WHERE y > 2 ORDER BY 1");
///
/// let query = "WITH x AS (SELECT * FROM y) SELECT * FROM x";
/// let out = where_clause(query, "a = 1", &WhereOptions::new().with_cte("x")).unwrap();
/// assert_eq!(out, "WITH x AS (SELECT * FROM y WHERE a = 1) SELECT * FROM x");
/// ```
pub fn where_clause(query: &str, clause: &str, options: &WhereOptions) -> Result<String, Error> {
    let mut tree = parse_single(query, options.clause_order.keywords())?;

    match &options.cte {
        Some(name) => {
            let (body, location) = cte::locate(&tree, name)?;
            let mut body = body.clone();
            filter::apply(&mut body, clause, options.mode, &options.clause_order)?;
            location::overwrite(&mut tree, &location, body.into())?;
        }
        None => filter::apply(&mut tree, clause, options.mode, &options.clause_order)?,
    }

    debug!(mode = %options.mode, cte = ?options.cte, "rewrote WHERE clause");
    Ok(tree.to_string())
}

/// Returns the text of the named CTE's parenthesized body.
pub fn choose_cte(query: &str, name: &str) -> Result<String, Error> {
    let tree = parse_single(query, &[])?;
    let (body, _) = cte::locate(&tree, name)?;
    Ok(body.to_string())
}

/// Replaces the named CTE's body with `body`, a parenthesized query.
///
/// # Examples
///
/// ```
/// use squeak::replace_cte;
///
/// let query = "WITH x AS (SELECT 1) SELECT * FROM x";
/// let out = replace_cte(query, "x", "(SELECT 2)").unwrap();
/// assert_eq!(out, "WITH x AS (SELECT 2) SELECT * FROM x");
/// ```
pub fn replace_cte(query: &str, name: &str, body: &str) -> Result<String, Error> {
    let mut tree = parse_single(query, &[])?;
    let (_, location) = cte::locate(&tree, name)?;

    let replacement = parser::parse_one(body.trim()).map_err(|e| match e {
        ParseError::NotSingleStatement { .. } => Error::InvalidClause(body.to_string()),
        e => e.into(),
    })?;
    let parenthesis = match replacement.children.as_slice() {
        [Element::Node(node)] if node.kind == NodeKind::Parenthesis => node.clone(),
        _ => return Err(Error::InvalidClause(body.to_string())),
    };

    location::overwrite(&mut tree, &location, parenthesis.into())?;
    Ok(tree.to_string())
}
