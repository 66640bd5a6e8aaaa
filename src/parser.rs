use thiserror::Error;

use crate::{
    ast::{Element, KeywordKind, Node, NodeKind, Token, TokenKind, normalize_keyword},
    lexer::{LexError, Lexer},
};

/// Keywords that end a `WHERE` group at the same nesting level.
const WHERE_CLOSERS: [&str; 14] = [
    "GROUP BY",
    "HAVING",
    "WINDOW",
    "QUALIFY",
    "ORDER BY",
    "LIMIT",
    "OFFSET",
    "FETCH",
    "FOR",
    "UNION",
    "UNION ALL",
    "EXCEPT",
    "INTERSECT",
    "RETURNING",
];

/// Errors raised while grouping tokens into statement trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unbalanced parenthesis at byte {position}")]
    UnbalancedParenthesis { position: usize },

    #[error("expected a single statement, found {found}")]
    NotSingleStatement { found: usize },
}

/// Groups the lexer's flat token stream into one tree per statement.
///
/// The grouping is intentionally shallow: parentheses, functions, identifiers,
/// identifier lists and `WHERE` clauses become nodes, everything else stays a
/// leaf. No grammar is checked, so any text that lexes also parses as long as
/// its parentheses balance.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    clause_keywords: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser {
            lexer,
            clause_keywords: Vec::new(),
        }
    }

    /// Reads each of `keywords` as a clause keyword, even where the lexer
    /// sees a plain name, and ends `WHERE` groups at it.
    ///
    /// Words spelled like a configured keyword become reserved: `settings`
    /// in `SELECT settings` is read as a keyword too.
    pub fn with_clause_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clause_keywords = keywords
            .into_iter()
            .map(|keyword| normalize_keyword(keyword.as_ref()))
            .filter(|keyword| !keyword.is_empty())
            .collect();
        self
    }

    /// Parses every statement in the input.
    ///
    /// A trailing run of whitespace or comments after the last `;` is kept on
    /// the last statement rather than forming a statement of its own, so the
    /// input text is reproduced exactly whenever at least one statement exists.
    pub fn parse_statements(self) -> Result<Vec<Node>, ParseError> {
        let tokens = mark_clause_keywords(self.lexer.tokenize()?, &self.clause_keywords);
        let closers: Vec<&str> = WHERE_CLOSERS
            .into_iter()
            .chain(self.clause_keywords.iter().map(String::as_str))
            .collect();
        let elements = group_parentheses(tokens, &closers)?;

        let mut statements: Vec<Vec<Element>> = Vec::new();
        let mut current = Vec::new();
        for element in elements {
            let terminates = matches!(&element, Element::Token(t) if t.is_punctuation(";"));
            current.push(element);
            if terminates {
                statements.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            let trivia_only = current.iter().all(Element::is_trivia);
            match statements.last_mut() {
                Some(last) if trivia_only => last.extend(current),
                _ if trivia_only => {}
                _ => statements.push(current),
            }
        }

        Ok(statements
            .into_iter()
            .map(|elements| Node::new(NodeKind::Statement, group_level(elements, &closers)))
            .collect())
    }
}

/// Parses text into its top-level statements.
pub fn parse(text: &str) -> Result<Vec<Node>, ParseError> {
    Parser::new(Lexer::new(text)).parse_statements()
}

/// Like [`parse`], with extra clause keywords as in [`Parser::with_clause_keywords`].
pub fn parse_with<S: AsRef<str>>(
    text: &str,
    clause_keywords: &[S],
) -> Result<Vec<Node>, ParseError> {
    Parser::new(Lexer::new(text))
        .with_clause_keywords(clause_keywords)
        .parse_statements()
}

/// Parses text that must contain exactly one statement.
pub fn parse_one(text: &str) -> Result<Node, ParseError> {
    let mut statements = parse(text)?;
    if statements.len() != 1 {
        return Err(ParseError::NotSingleStatement {
            found: statements.len(),
        });
    }
    Ok(statements.remove(0))
}

/// Merges each run of words spelling one of `keywords` into one keyword token.
fn mark_clause_keywords(tokens: Vec<Token>, keywords: &[String]) -> Vec<Token> {
    if keywords.is_empty() {
        return tokens;
    }

    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut idx = 0;
    while idx < tokens.len() {
        let qualified = out.last().is_some_and(|prev| prev.is_punctuation("."));
        let span = keywords
            .iter()
            .filter_map(|keyword| spelled_span(&tokens[idx..], keyword))
            .max()
            .filter(|_| !qualified);

        match span {
            Some(span) => {
                let run = &tokens[idx..idx + span];
                let kind = match run {
                    [single] if single.is_keyword() => single.kind,
                    _ => TokenKind::Keyword(KeywordKind::General),
                };
                let text: String = run.iter().map(|token| token.text.as_str()).collect();
                out.push(Token::new(kind, text));
                idx += span;
            }
            None => {
                out.push(tokens[idx].clone());
                idx += 1;
            }
        }
    }
    out
}

/// Number of leading tokens that spell `keyword`, words separated by whitespace.
fn spelled_span(tokens: &[Token], keyword: &str) -> Option<usize> {
    let mut words = keyword.split(' ').peekable();
    let mut idx = 0;
    loop {
        let token = tokens.get(idx)?;
        if !is_word(token) {
            return None;
        }
        for part in token.normalized().split(' ') {
            if words.next() != Some(part) {
                return None;
            }
        }
        if words.peek().is_none() {
            return Some(idx + 1);
        }
        if tokens.get(idx + 1)?.kind != TokenKind::Whitespace {
            return None;
        }
        idx += 2;
    }
}

fn is_word(token: &Token) -> bool {
    token.is_keyword()
        || (token.kind == TokenKind::Name
            && token.text.starts_with(|ch: char| ch.is_alphabetic() || ch == '_'))
}

fn group_parentheses(tokens: Vec<Token>, closers: &[&str]) -> Result<Vec<Element>, ParseError> {
    let mut stack: Vec<(usize, Vec<Element>)> = vec![(0, Vec::new())];
    let mut offset = 0;

    for token in tokens {
        let len = token.text.len();
        if token.is_punctuation("(") {
            stack.push((offset, vec![token.into()]));
        } else if token.is_punctuation(")") {
            if stack.len() == 1 {
                return Err(ParseError::UnbalancedParenthesis { position: offset });
            }
            let (_, mut children) = stack.pop().unwrap_or_default();
            let open = children.remove(0);
            let mut grouped = vec![open];
            grouped.extend(group_level(children, closers));
            grouped.push(token.into());
            if let Some((_, parent)) = stack.last_mut() {
                parent.push(Node::new(NodeKind::Parenthesis, grouped).into());
            }
        } else if let Some((_, level)) = stack.last_mut() {
            level.push(token.into());
        }
        offset += len;
    }

    if stack.len() > 1 {
        let position = stack.last().map(|(start, _)| *start).unwrap_or_default();
        return Err(ParseError::UnbalancedParenthesis { position });
    }
    Ok(stack.pop().map(|(_, level)| level).unwrap_or_default())
}

/// Applies every grouping pass to one nesting level.
fn group_level(elements: Vec<Element>, closers: &[&str]) -> Vec<Element> {
    let elements = group_functions(elements);
    let elements = group_identifiers(elements);
    let elements = group_identifier_lists(elements);
    group_where(elements, closers)
}

fn next_significant(elements: &[Element], from: usize) -> Option<usize> {
    (from..elements.len()).find(|&idx| !elements[idx].is_trivia())
}

fn is_punct(element: &Element, punct: &str) -> bool {
    matches!(element, Element::Token(t) if t.is_punctuation(punct))
}

fn is_keyword(element: &Element, keyword: &str) -> bool {
    matches!(element, Element::Token(t) if t.is_keyword_text(keyword))
}

fn group_functions(elements: Vec<Element>) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::with_capacity(elements.len());
    for element in elements {
        let call = element.is_node(NodeKind::Parenthesis)
            && out.last().is_some_and(|prev| prev.is_token(TokenKind::Name));
        match out.pop() {
            Some(name) if call => {
                out.push(Node::new(NodeKind::Function, vec![name, element]).into());
            }
            Some(prev) => {
                out.push(prev);
                out.push(element);
            }
            None => out.push(element),
        }
    }
    out
}

fn group_identifiers(elements: Vec<Element>) -> Vec<Element> {
    // Stack with the next element on top.
    let mut pending = elements;
    pending.reverse();
    let mut out = Vec::new();

    while let Some(element) = pending.pop() {
        match element {
            Element::Token(token)
                if token.kind == TokenKind::Keyword(KeywordKind::General)
                    && names_cte(&out, &pending) =>
            {
                pending.push(Token::new(TokenKind::Name, token.text).into());
            }
            Element::Token(token) if token.kind == TokenKind::Name => {
                let mut parts = vec![Element::Token(token)];
                while is_qualifier(&pending) {
                    parts.extend(pending.pop());
                    parts.extend(pending.pop());
                }
                absorb_alias(&mut parts, &mut pending);
                out.push(Node::new(NodeKind::Identifier, parts).into());
            }
            Element::Node(node)
                if matches!(node.kind, NodeKind::Function | NodeKind::Parenthesis) =>
            {
                let mut parts = vec![Element::Node(node)];
                if absorb_alias(&mut parts, &mut pending) {
                    out.push(Node::new(NodeKind::Identifier, parts).into());
                } else {
                    out.extend(parts);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// True when a keyword sits where a CTE name belongs: after `WITH`,
/// `RECURSIVE` or `,` and before `AS (...)`, as in `WITH last AS (...)`.
fn names_cte(out: &[Element], pending: &[Element]) -> bool {
    let after_with = out.iter().rev().find(|e| !e.is_trivia()).is_some_and(|prev| {
        is_punct(prev, ",")
            || is_keyword(prev, "RECURSIVE")
            || prev.is_token(TokenKind::Keyword(KeywordKind::Cte))
    });
    let mut ahead = pending.iter().rev().filter(|e| !e.is_trivia());
    after_with
        && ahead.next().is_some_and(|e| is_keyword(e, "AS"))
        && ahead.next().is_some_and(|e| e.is_node(NodeKind::Parenthesis))
}

/// True when the top of `pending` is `.name` or `.*`.
fn is_qualifier(pending: &[Element]) -> bool {
    let [.., next, dot] = pending else {
        return false;
    };
    is_punct(dot, ".")
        && (next.is_token(TokenKind::Name)
            || matches!(next, Element::Token(t) if t.kind == TokenKind::Operator && t.text == "*"))
}

/// Moves `AS alias`, `AS (...)` or an implicit `alias` from `pending` onto
/// `parts`. Returns whether anything was absorbed.
fn absorb_alias(parts: &mut Vec<Element>, pending: &mut Vec<Element>) -> bool {
    // Indices into `pending` counted from the top of the stack.
    let from_top = |n: usize| pending.len().checked_sub(n + 1).map(|idx| &pending[idx]);
    let significant = |start: usize| {
        (start..pending.len()).find(|&n| from_top(n).is_some_and(|e| !e.is_trivia()))
    };

    let Some(first) = significant(0) else {
        return false;
    };
    let first_element = from_top(first);

    let take = if first_element.is_some_and(|e| is_keyword(e, "AS")) {
        match significant(first + 1) {
            Some(alias)
                if from_top(alias).is_some_and(|e| {
                    e.is_token(TokenKind::Name) || e.is_node(NodeKind::Parenthesis)
                }) =>
            {
                alias + 1
            }
            _ => 0,
        }
    } else if first > 0
        && first_element.is_some_and(|e| e.is_token(TokenKind::Name))
        && (0..first).all(|n| from_top(n).is_some_and(|e| e.is_token(TokenKind::Whitespace)))
    {
        first + 1
    } else {
        0
    };

    for _ in 0..take {
        parts.extend(pending.pop());
    }
    take > 0
}

fn is_listable(element: &Element) -> bool {
    match element {
        Element::Node(node) => matches!(
            node.kind,
            NodeKind::Identifier | NodeKind::Function | NodeKind::Parenthesis
        ),
        Element::Token(token) => {
            matches!(token.kind, TokenKind::Number | TokenKind::String)
                || (token.kind == TokenKind::Operator && token.text == "*")
        }
    }
}

fn group_identifier_lists(elements: Vec<Element>) -> Vec<Element> {
    let mut spans = Vec::new();
    let mut idx = 0;
    while idx < elements.len() {
        if !is_listable(&elements[idx]) {
            idx += 1;
            continue;
        }
        let mut end = idx;
        while let Some(comma) = next_significant(&elements, end + 1) {
            if !is_punct(&elements[comma], ",") {
                break;
            }
            match next_significant(&elements, comma + 1) {
                Some(item) if is_listable(&elements[item]) => end = item,
                _ => break,
            }
        }
        if end > idx {
            spans.push((idx, end));
        }
        idx = end + 1;
    }

    let mut out = Vec::with_capacity(elements.len());
    let mut spans = spans.into_iter().peekable();
    let mut group: Option<Vec<Element>> = None;
    for (idx, element) in elements.into_iter().enumerate() {
        match spans.peek() {
            Some(&(start, end)) if idx >= start && idx <= end => {
                group.get_or_insert_with(Vec::new).push(element);
                if idx == end {
                    let children = group.take().unwrap_or_default();
                    out.push(Node::new(NodeKind::IdentifierList, children).into());
                    spans.next();
                }
            }
            _ => out.push(element),
        }
    }
    out
}

fn group_where(mut elements: Vec<Element>, closers: &[&str]) -> Vec<Element> {
    let Some(start) = elements.iter().position(|e| is_keyword(e, "WHERE")) else {
        return elements;
    };

    let closer = (start + 1..elements.len()).find(|&idx| match &elements[idx] {
        Element::Token(token) if token.is_keyword() => {
            let normalized = token.normalized();
            closers.contains(&normalized.as_str())
        }
        Element::Token(token) => token.is_punctuation(";") || token.is_punctuation(")"),
        Element::Node(_) => false,
    });
    let mut end = closer.unwrap_or(elements.len());
    while end > start + 1 && elements[end - 1].is_trivia() {
        end -= 1;
    }

    let tail = elements.split_off(end);
    let clause = elements.split_off(start);
    elements.push(Node::new(NodeKind::Where, clause).into());
    elements.extend(tail);
    elements
}
