// tests/cli_tests.rs

use squeak::Mode;
use squeak::cli::{
    CliError, CteCommand, TreeCommand, WhereCommand, execute_cte, execute_tree, execute_where,
};

const QUERY: &str = "WITH x AS (SELECT * FROM y) SELECT * FROM x ORDER BY 1";

// ============================================================================
// where
// ============================================================================

#[test]
fn test_where_command() {
    let command = WhereCommand {
        query: Some(QUERY.to_string()),
        clause: "a = 1".to_string(),
        ..Default::default()
    };
    assert_eq!(
        execute_where(&command).unwrap(),
        "WITH x AS (SELECT * FROM y) SELECT * FROM x WHERE a = 1 ORDER BY 1"
    );
}

#[test]
fn test_where_command_with_cte_and_mode() {
    let command = WhereCommand {
        query: Some("WITH x AS (SELECT * FROM y WHERE b = 2) SELECT * FROM x".to_string()),
        clause: "a = 1".to_string(),
        cte: Some("x".to_string()),
        mode: Mode::Replace,
        follow_keywords: vec![],
    };
    assert_eq!(
        execute_where(&command).unwrap(),
        "WITH x AS (SELECT * FROM y WHERE a = 1) SELECT * FROM x"
    );
}

#[test]
fn test_where_command_with_follow_keywords() {
    // With only LIMIT configured, ORDER BY no longer anchors the clause.
    let command = WhereCommand {
        query: Some("SELECT * FROM t ORDER BY 1 LIMIT 5".to_string()),
        clause: "a = 1".to_string(),
        follow_keywords: vec!["LIMIT".to_string()],
        ..Default::default()
    };
    assert_eq!(
        execute_where(&command).unwrap(),
        "SELECT * FROM t ORDER BY 1 WHERE a = 1 LIMIT 5"
    );
}

#[test]
fn test_where_command_without_input() {
    let command = WhereCommand {
        clause: "a = 1".to_string(),
        ..Default::default()
    };
    assert!(matches!(execute_where(&command), Err(CliError::NoInput)));
}

#[test]
fn test_where_command_error_message() {
    let command = WhereCommand {
        query: Some("SELECT 1; SELECT 2".to_string()),
        clause: "a = 1".to_string(),
        ..Default::default()
    };
    let err = execute_where(&command).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Rewrite error: more than 1 statement in query (found 2)"
    );
}

// ============================================================================
// cte
// ============================================================================

#[test]
fn test_cte_command() {
    let command = CteCommand {
        query: Some(QUERY.to_string()),
        name: "x".to_string(),
    };
    assert_eq!(execute_cte(&command).unwrap(), "(SELECT * FROM y)");
}

#[test]
fn test_cte_command_missing() {
    let command = CteCommand {
        query: Some(QUERY.to_string()),
        name: "q".to_string(),
    };
    let err = execute_cte(&command).unwrap_err();
    assert_eq!(err.to_string(), "Rewrite error: CTE q not found in query");
}

// ============================================================================
// tree
// ============================================================================

#[test]
fn test_tree_command() {
    let command = TreeCommand {
        query: Some("SELECT a; SELECT b".to_string()),
        pretty: false,
    };
    let output = execute_tree(&command).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["kind"], "Statement");
    assert_eq!(first["text"], "SELECT a;");
    assert_eq!(first["children"][2]["kind"], "Identifier");
    assert_eq!(first["children"][2]["children"][0]["kind"], "Name");
}

#[test]
fn test_tree_command_pretty() {
    let command = TreeCommand {
        query: Some("WITH x AS (SELECT 1) SELECT * FROM x".to_string()),
        pretty: true,
    };
    let output = execute_tree(&command).unwrap();
    assert!(output.contains("\n  \"children\": ["));

    let tree: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(tree["children"][0]["kind"], "Keyword.CTE");
    assert_eq!(tree["children"][2]["children"][4]["kind"], "Parenthesis");
}

#[test]
fn test_tree_command_parse_error() {
    let command = TreeCommand {
        query: Some("SELECT (".to_string()),
        pretty: false,
    };
    assert!(matches!(execute_tree(&command), Err(CliError::Parse(_))));
}
