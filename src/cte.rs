//! Locating named common table expressions.
//!
//! Only CTE lists directly inside the searched node are considered. A CTE whose
//! body defines CTEs of its own is not searched recursively.

use tracing::debug;

use crate::{
    ast::{Element, KeywordKind, Node, NodeKind, TokenKind},
    error::Error,
    location::Location,
};

/// Outcome of a search below one node.
enum Search<'a> {
    Found(&'a Node, Location),
    NotFound,
}

/// Returns the body of the CTE called `name` and its location in `tree`.
///
/// The body is the parenthesized query following `AS`. Names compare with exact,
/// case-sensitive equality, and the first match in document order wins.
///
/// # Examples
///
/// ```
/// use squeak::{cte, parser};
///
/// let tree = parser::parse_one("WITH x AS (SELECT * FROM y) SELECT * FROM x").unwrap();
/// let (body, location) = cte::locate(&tree, "x").unwrap();
/// assert_eq!(body.to_string(), "(SELECT * FROM y)");
/// assert_eq!(location.path(), &[2, 4]);
/// ```
pub fn locate<'a>(tree: &'a Node, name: &str) -> Result<(&'a Node, Location), Error> {
    match search(tree, name, true)? {
        Search::Found(body, location) => {
            debug!(cte = name, %location, "located CTE body");
            Ok((body, location))
        }
        Search::NotFound => Err(Error::CteNotFound(name.to_string())),
    }
}

/// Walks `tree`'s children looking for the CTE.
///
/// With `wait_for_keyword` set, an identifier is only a candidate when it comes
/// right after the CTE keyword. Inside an identifier list every identifier is a
/// candidate since no keyword separates the entries.
fn search<'a>(tree: &'a Node, name: &str, wait_for_keyword: bool) -> Result<Search<'a>, Error> {
    let mut gate = !wait_for_keyword;

    for (idx, child) in tree.children().iter().enumerate() {
        let Element::Node(node) = child else {
            if child.is_token(TokenKind::Keyword(KeywordKind::Cte)) {
                gate = true;
            }
            continue;
        };
        if !gate {
            continue;
        }

        match node.kind {
            NodeKind::Identifier => {
                if let Some((body_idx, body)) = body_of(node, name)? {
                    let location = Location::single(body_idx).prefixed(idx);
                    return Ok(Search::Found(body, location));
                }
                gate = !wait_for_keyword;
            }
            NodeKind::IdentifierList => {
                if let Search::Found(body, location) = search(node, name, false)? {
                    return Ok(Search::Found(body, location.prefixed(idx)));
                }
            }
            _ => {}
        }
    }
    Ok(Search::NotFound)
}

/// Index and node of the identifier's parenthesized body when it is named `name`.
fn body_of<'a>(identifier: &'a Node, name: &str) -> Result<Option<(usize, &'a Node)>, Error> {
    if identifier_name(identifier)? != name {
        return Ok(None);
    }
    Ok(identifier.find_child(NodeKind::Parenthesis))
}

/// The identifier's name token text.
///
/// `x(a, b) AS (...)` carries its name inside the leading function node.
pub fn identifier_name(identifier: &Node) -> Result<&str, Error> {
    if let Some(token) = identifier.name_token() {
        return Ok(&token.text);
    }
    identifier
        .find_child(NodeKind::Function)
        .and_then(|(_, function)| function.name_token())
        .map(|token| token.text.as_str())
        .ok_or_else(|| Error::MalformedIdentifier(identifier.to_string()))
}
