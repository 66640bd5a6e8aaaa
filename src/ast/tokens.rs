use std::fmt;

/// Subtype carried by keyword tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// Any keyword without a more specific role
    General,

    /// Keyword that introduces a CTE list
    ///
    /// # Examples
    /// ```text
    /// WITH x AS (SELECT 1)
    /// ```
    Cte,

    /// Data manipulation keyword starting a statement body
    ///
    /// # Examples
    /// ```text
    /// SELECT
    /// INSERT
    /// UPDATE
    /// DELETE
    /// ```
    Dml,
}

/// Type tag of a leaf token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of whitespace, newlines included
    Whitespace,

    /// Line comment (`-- ...`) or block comment (`/* ... */`)
    Comment,

    /// Reserved word, recognized case-insensitively
    ///
    /// Multi-word keywords are a single token:
    /// ```text
    /// GROUP BY
    /// ORDER BY
    /// PARTITION BY
    /// UNION ALL
    /// ```
    Keyword(KeywordKind),

    /// Unquoted or quoted identifier
    ///
    /// # Examples
    /// ```text
    /// users
    /// "Order Items"
    /// `weird name`
    /// ```
    Name,

    /// Integer or decimal literal
    Number,

    /// Single-quoted string literal, quotes included
    String,

    /// Comparison, arithmetic or other operator
    ///
    /// # Examples
    /// ```text
    /// =  <>  !=  <=  >=  ||  ::  *
    /// ```
    Operator,

    /// One of `(`, `)`, `,`, `;`, `.`
    Punctuation,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Keyword(_))
    }

    /// Whitespace and comments carry no meaning for grouping decisions.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Whitespace => "Whitespace",
            TokenKind::Comment => "Comment",
            TokenKind::Keyword(KeywordKind::General) => "Keyword",
            TokenKind::Keyword(KeywordKind::Cte) => "Keyword.CTE",
            TokenKind::Keyword(KeywordKind::Dml) => "Keyword.DML",
            TokenKind::Name => "Name",
            TokenKind::Number => "Number",
            TokenKind::String => "String",
            TokenKind::Operator => "Operator",
            TokenKind::Punctuation => "Punctuation",
        }
    }
}

/// A leaf of the token tree: a type tag plus the literal source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn whitespace(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Whitespace, text)
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    pub fn is_punctuation(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == punct
    }

    /// Uppercased text with internal whitespace runs collapsed to one space.
    ///
    /// `group\n   by` normalizes to `GROUP BY`.
    pub fn normalized(&self) -> String {
        normalize_keyword(&self.text)
    }

    /// True for a keyword token whose normalized text equals `keyword`.
    pub fn is_keyword_text(&self, keyword: &str) -> bool {
        self.is_keyword() && self.normalized() == keyword
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Case-insensitive, whitespace-collapsed form of keyword text.
pub fn normalize_keyword(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}
