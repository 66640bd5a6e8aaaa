use crate::{location::Location, parser::ParseError};

/// Errors raised by the rewrite operations.
///
/// All of them are terminal: a rewrite either returns the full rewritten text
/// or one of these, never partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("CTE {0} not found in query")]
    CteNotFound(String),

    #[error("identifier `{0}` has no name")]
    MalformedIdentifier(String),

    #[error("more than 1 statement in query (found {0})")]
    MultipleStatements(usize),

    #[error("query contains no statement")]
    NoStatement,

    #[error("statement includes a UNION, the target of the filter is ambiguous")]
    UnsupportedUnion,

    #[error("clause does not form a single WHERE clause: {0}")]
    InvalidClause(String),

    #[error("location {0} does not resolve against the tree")]
    InvalidLocation(Location),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
