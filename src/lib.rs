pub mod ast;
pub mod cli;
pub mod cte;
pub mod error;
pub mod filter;
pub mod lexer;
pub mod location;
pub mod output;
pub mod parser;
pub mod rewrite;

pub use ast::{Element, KeywordKind, Node, NodeKind, Token, TokenKind};
pub use error::Error;
pub use filter::{ClauseOrder, Mode, WhereSlot};
pub use lexer::{LexError, Lexer};
pub use location::Location;
pub use parser::{ParseError, Parser, parse, parse_one, parse_with};
pub use rewrite::{WhereOptions, choose_cte, replace_cte, where_clause};
