//! Read-only commands: `cte` and `tree`

use super::CliError;
use crate::{
    choose_cte,
    output::{to_json, to_json_pretty},
    parse,
};

/// Options for the cte command
#[derive(Debug, Clone, Default)]
pub struct CteCommand {
    pub query: Option<String>,
    /// Name of the CTE to print
    pub name: String,
}

/// Options for the tree command
#[derive(Debug, Clone, Default)]
pub struct TreeCommand {
    pub query: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Print the body of a named CTE.
pub fn execute_cte(command: &CteCommand) -> Result<String, CliError> {
    let query = command.query.as_deref().ok_or(CliError::NoInput)?;
    Ok(choose_cte(query, &command.name)?)
}

/// Render the grouped token tree of every statement, one JSON document per line.
pub fn execute_tree(command: &TreeCommand) -> Result<String, CliError> {
    let query = command.query.as_deref().ok_or(CliError::NoInput)?;
    let statements = parse(query)?;

    let rendered = statements
        .iter()
        .map(|statement| {
            if command.pretty {
                to_json_pretty(statement)
            } else {
                Ok(to_json(statement))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n"))
}
