//! CLI support for squeak
//!
//! Provides programmatic access to the `squeak` commands so they can be
//! embedded in other tools without spawning the binary.

mod filter;
mod inspect;

pub use filter::{WhereCommand, execute_where};
pub use inspect::{CteCommand, TreeCommand, execute_cte, execute_tree};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] crate::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No query provided. Use --input or pipe SQL to stdin.")]
    NoInput,
}
