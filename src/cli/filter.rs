//! The `where` command

use super::CliError;
use crate::{ClauseOrder, Mode, WhereOptions, where_clause};

/// Options for the where command
#[derive(Debug, Clone, Default)]
pub struct WhereCommand {
    /// SQL query text
    pub query: Option<String>,
    /// Predicate to add, e.g. `a = 1 OR b = 2`
    pub clause: String,
    /// CTE to filter instead of the main statement
    pub cte: Option<String>,
    pub mode: Mode,
    /// Replacement for the default list of clauses that follow WHERE
    pub follow_keywords: Vec<String>,
}

impl WhereCommand {
    fn options(&self) -> WhereOptions {
        let mut options = WhereOptions::new().with_mode(self.mode);
        if let Some(cte) = &self.cte {
            options = options.with_cte(cte);
        }
        if !self.follow_keywords.is_empty() {
            options = options.with_clause_order(ClauseOrder::new(&self.follow_keywords));
        }
        options
    }
}

/// Run the where command, returning the rewritten query.
pub fn execute_where(command: &WhereCommand) -> Result<String, CliError> {
    let query = command.query.as_deref().ok_or(CliError::NoInput)?;
    Ok(where_clause(query, &command.clause, &command.options())?)
}
