// tests/lexer_tests.rs

use squeak::ast::{KeywordKind, TokenKind};
use squeak::lexer::{LexError, Lexer};

fn lex(input: &str) -> Vec<(TokenKind, String)> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
    (kind, text.to_string())
}

const KEYWORD: TokenKind = TokenKind::Keyword(KeywordKind::General);

// ============================================================================
// Single Tokens
// ============================================================================

#[test]
fn test_punctuation_tokens() {
    for input in ["(", ")", ",", ";", "."] {
        let tokens = lex(input);
        assert_eq!(tokens, vec![tok(TokenKind::Punctuation, input)], "Failed for input: {}", input);
    }
}

#[test]
fn test_operator_tokens() {
    let test_cases = ["=", "<", ">", "<>", "!=", "<=", ">=", "||", "::", "+", "-", "*", "/", "%"];

    for input in test_cases {
        let tokens = lex(input);
        assert_eq!(tokens, vec![tok(TokenKind::Operator, input)], "Failed for input: {}", input);
    }
}

#[test]
fn test_two_char_vs_single_char() {
    assert_eq!(
        lex("< ="),
        vec![
            tok(TokenKind::Operator, "<"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Operator, "="),
        ]
    );
}

#[test]
fn test_numbers() {
    for input in ["42", "3.14", ".5", "1e10", "2.5E-3"] {
        assert_eq!(lex(input), vec![tok(TokenKind::Number, input)], "Failed for input: {}", input);
    }
}

#[test]
fn test_number_followed_by_dot_name() {
    assert_eq!(
        lex("1.x"),
        vec![
            tok(TokenKind::Number, "1"),
            tok(TokenKind::Punctuation, "."),
            tok(TokenKind::Name, "x"),
        ]
    );
}

// ============================================================================
// Keywords and Names
// ============================================================================

#[test]
fn test_keyword_subtypes() {
    assert_eq!(
        lex("with Select from"),
        vec![
            tok(TokenKind::Keyword(KeywordKind::Cte), "with"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Keyword(KeywordKind::Dml), "Select"),
            tok(TokenKind::Whitespace, " "),
            tok(KEYWORD, "from"),
        ]
    );
}

#[test]
fn test_names() {
    assert_eq!(
        lex("users _tmp col$1"),
        vec![
            tok(TokenKind::Name, "users"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Name, "_tmp"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Name, "col$1"),
        ]
    );
}

#[test]
fn test_quoted_names() {
    assert_eq!(lex("\"Order Items\""), vec![tok(TokenKind::Name, "\"Order Items\"")]);
    assert_eq!(lex("`select`"), vec![tok(TokenKind::Name, "`select`")]);
}

#[test]
fn test_multi_word_keywords() {
    let test_cases = [
        ("GROUP BY", "GROUP BY"),
        ("order   by", "ORDER BY"),
        ("Partition\n\tBy", "PARTITION BY"),
        ("union all", "UNION ALL"),
    ];

    for (input, normalized) in test_cases {
        let tokens = Lexer::new(input).tokenize().unwrap();
        assert_eq!(tokens.len(), 1, "Failed for input: {}", input);
        assert_eq!(tokens[0].text, input);
        assert_eq!(tokens[0].normalized(), normalized);
        assert!(tokens[0].is_keyword());
    }
}

#[test]
fn test_multi_word_keyword_needs_word_boundary() {
    assert_eq!(
        lex("order bystander"),
        vec![
            tok(KEYWORD, "order"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Name, "bystander"),
        ]
    );
}

#[test]
fn test_union_alone() {
    assert_eq!(
        lex("UNION SELECT"),
        vec![
            tok(KEYWORD, "UNION"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Keyword(KeywordKind::Dml), "SELECT"),
        ]
    );
}

// ============================================================================
// Strings and Comments
// ============================================================================

#[test]
fn test_string_with_escaped_quote() {
    assert_eq!(lex("'it''s'"), vec![tok(TokenKind::String, "'it''s'")]);
}

#[test]
fn test_string_hides_keywords() {
    assert_eq!(lex("'WHERE x'"), vec![tok(TokenKind::String, "'WHERE x'")]);
}

#[test]
fn test_line_comment() {
    assert_eq!(
        lex("-- note\nSELECT"),
        vec![
            tok(TokenKind::Comment, "-- note"),
            tok(TokenKind::Whitespace, "\n"),
            tok(TokenKind::Keyword(KeywordKind::Dml), "SELECT"),
        ]
    );
}

#[test]
fn test_block_comment() {
    assert_eq!(
        lex("a /* b\n c */ d"),
        vec![
            tok(TokenKind::Name, "a"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Comment, "/* b\n c */"),
            tok(TokenKind::Whitespace, " "),
            tok(TokenKind::Name, "d"),
        ]
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    let err = Lexer::new("SELECT 'abc").tokenize().unwrap_err();
    assert_eq!(err, LexError::UnterminatedString { position: 7 });
}

#[test]
fn test_unterminated_comment() {
    let err = Lexer::new("SELECT /* abc").tokenize().unwrap_err();
    assert_eq!(err, LexError::UnterminatedComment { position: 7 });
}

#[test]
fn test_unterminated_identifier() {
    let err = Lexer::new("SELECT \"abc").tokenize().unwrap_err();
    assert_eq!(err, LexError::UnterminatedIdentifier { position: 7 });
}

// ============================================================================
// Losslessness
// ============================================================================

#[test]
fn test_concatenation_reproduces_input() {
    let input = "WITH x AS (\n  SELECT a, 'b''c' -- trailing\n  FROM \"T\" /* c */\n)\nSELECT * FROM x WHERE a >= 1.5;\n";
    let tokens = Lexer::new(input).tokenize().unwrap();
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt, input);
}

#[test]
fn test_unicode_names() {
    let tokens = lex("SELECT café FROM naïve");
    assert_eq!(tokens[2], tok(TokenKind::Name, "café"));
    assert_eq!(tokens[6], tok(TokenKind::Name, "naïve"));
}
