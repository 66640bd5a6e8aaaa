use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::ast::{KeywordKind, Token, TokenKind};

/// Continuation of a two-word keyword: `GROUP BY`, `ORDER BY`, `PARTITION BY`.
static BY_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s+by\b").expect("static regex"));

/// Continuation of `UNION ALL`.
static ALL_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s+all\b").expect("static regex"));

/// Errors raised while splitting text into tokens. Positions are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal starting at byte {position}")]
    UnterminatedString { position: usize },

    #[error("unterminated block comment starting at byte {position}")]
    UnterminatedComment { position: usize },

    #[error("unterminated quoted identifier starting at byte {position}")]
    UnterminatedIdentifier { position: usize },
}

/// Lossless SQL lexer: the concatenated texts of its tokens equal the input.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// Lexes the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.current_char() {
            if pred(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn emit(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.input[start..self.position])
    }

    fn read_line_comment(&mut self) {
        self.advance_while(|ch| ch != '\n');
    }

    fn read_block_comment(&mut self, start: usize) -> Result<(), LexError> {
        self.advance(); // /
        self.advance(); // *
        match self.rest().find("*/") {
            Some(end) => {
                self.position += end + 2;
                Ok(())
            }
            None => Err(LexError::UnterminatedComment { position: start }),
        }
    }

    fn read_string(&mut self, start: usize) -> Result<(), LexError> {
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '\'' {
                // '' is an escaped quote inside the literal
                if self.current_char() == Some('\'') {
                    self.advance();
                } else {
                    return Ok(());
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_quoted_name(&mut self, quote: char, start: usize) -> Result<(), LexError> {
        self.advance();
        match self.rest().find(quote) {
            Some(end) => {
                self.position += end + quote.len_utf8();
                Ok(())
            }
            None => Err(LexError::UnterminatedIdentifier { position: start }),
        }
    }

    fn read_number(&mut self) {
        self.advance_while(|ch| ch.is_ascii_digit());

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            self.advance_while(|ch| ch.is_ascii_digit());
        }

        if matches!(self.current_char(), Some('e' | 'E')) {
            let digit_at = match self.peek_char(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_char(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                self.advance_while(|ch| ch.is_ascii_digit());
            }
        }
    }

    fn read_word(&mut self, start: usize) -> Token {
        self.advance_while(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$');
        let word = self.input[start..self.position].to_uppercase();

        let suffix = match word.as_str() {
            "GROUP" | "ORDER" | "PARTITION" => Some(&*BY_SUFFIX),
            "UNION" => Some(&*ALL_SUFFIX),
            _ => None,
        };
        if let Some(m) = suffix.and_then(|re| re.find(self.rest())) {
            self.position += m.end();
        }

        match keyword_kind(&word) {
            Some(kind) => self.emit(TokenKind::Keyword(kind), start),
            None => self.emit(TokenKind::Name, start),
        }
    }

    fn read_operator(&mut self) {
        const TWO_CHAR: [&str; 7] = ["<>", "!=", "<=", ">=", "||", "::", "=>"];
        if TWO_CHAR.iter().any(|op| self.rest().starts_with(op)) {
            self.advance();
        }
        self.advance();
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.position;

        let kind = match self.current_char() {
            None => return Ok(None),
            Some(ch) if ch.is_whitespace() => {
                self.advance_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            Some('-') if self.peek_char(1) == Some('-') => {
                self.read_line_comment();
                TokenKind::Comment
            }
            Some('/') if self.peek_char(1) == Some('*') => {
                self.read_block_comment(start)?;
                TokenKind::Comment
            }
            Some('\'') => {
                self.read_string(start)?;
                TokenKind::String
            }
            Some(quote @ ('"' | '`')) => {
                self.read_quoted_name(quote, start)?;
                TokenKind::Name
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.read_number();
                TokenKind::Number
            }
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number();
                TokenKind::Number
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => return Ok(Some(self.read_word(start))),
            Some('(' | ')' | ',' | ';' | '.') => {
                self.advance();
                TokenKind::Punctuation
            }
            Some(_) => {
                self.read_operator();
                TokenKind::Operator
            }
        };

        Ok(Some(self.emit(kind, start)))
    }
}

/// Classifies an uppercased word, `None` for plain names.
pub fn keyword_kind(word: &str) -> Option<KeywordKind> {
    let kind = match word {
        "WITH" => KeywordKind::Cte,
        "SELECT" | "INSERT" | "UPDATE" | "DELETE" | "MERGE" => KeywordKind::Dml,
        "ALL" | "AND" | "AS" | "ASC" | "BETWEEN" | "BY" | "CASE" | "CROSS" | "DESC"
        | "DISTINCT" | "ELSE" | "END" | "EXCEPT" | "EXISTS" | "FALSE" | "FETCH" | "FIRST"
        | "FOR" | "FROM" | "FULL" | "GROUP" | "HAVING" | "ILIKE" | "IN" | "INNER"
        | "INTERSECT" | "INTO" | "IS" | "JOIN" | "LAST" | "LATERAL" | "LEFT" | "LIKE"
        | "LIMIT" | "NATURAL" | "NEXT" | "NOT" | "NULL" | "NULLS" | "OFFSET" | "ON"
        | "ONLY" | "OR" | "ORDER" | "OUTER" | "OVER" | "PARTITION" | "QUALIFY"
        | "RECURSIVE" | "RETURNING" | "RIGHT" | "ROW" | "ROWS" | "SET" | "SHARE" | "THEN"
        | "TRUE" | "UNION" | "USING" | "VALUES" | "WHEN" | "WHERE" | "WINDOW" => {
            KeywordKind::General
        }
        _ => return None,
    };
    Some(kind)
}

#[test]
fn test_keywords() {
    let tokens = Lexer::new("select FROM With x").tokenize().unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Keyword(KeywordKind::Dml));
    assert_eq!(tokens[2].kind, TokenKind::Keyword(KeywordKind::General));
    assert_eq!(tokens[4].kind, TokenKind::Keyword(KeywordKind::Cte));
    assert_eq!(tokens[6].kind, TokenKind::Name);
}

#[test]
fn test_group_by_is_one_token() {
    let tokens = Lexer::new("group\n  by 1").tokenize().unwrap();
    assert_eq!(tokens[0].text, "group\n  by");
    assert!(tokens[0].is_keyword_text("GROUP BY"));
    assert_eq!(tokens[2].kind, TokenKind::Number);
}
