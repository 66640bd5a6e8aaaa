//! JSON rendering of token trees, for inspecting how a query was grouped.
//!
//! Leaves render as `{"kind", "text"}`, nodes as `{"kind", "text", "children"}`
//! where `text` is the node's serialized text.
//!
//! # Examples
//!
//! ```
//! use squeak::{output::to_json, parser::parse_one};
//!
//! let tree = parse_one("SELECT a").unwrap();
//! assert_eq!(
//!     to_json(&tree),
//!     r#"{"children":[{"kind":"Keyword.DML","text":"SELECT"},{"kind":"Whitespace","text":" "},{"children":[{"kind":"Name","text":"a"}],"kind":"Identifier","text":"a"}],"kind":"Statement","text":"SELECT a"}"#
//! );
//! ```

use serde_json::{Map, Value, json};

use crate::ast::{Element, Node};

pub fn tree_to_value(node: &Node) -> Value {
    let mut object = Map::new();
    object.insert("kind".to_string(), json!(node.kind.name()));
    object.insert("text".to_string(), json!(node.to_string()));
    object.insert(
        "children".to_string(),
        Value::Array(node.children().iter().map(element_to_value).collect()),
    );
    Value::Object(object)
}

fn element_to_value(element: &Element) -> Value {
    match element {
        Element::Token(token) => json!({
            "kind": token.kind.name(),
            "text": token.text,
        }),
        Element::Node(node) => tree_to_value(node),
    }
}

/// Compact JSON, keys sorted.
pub fn to_json(node: &Node) -> String {
    tree_to_value(node).to_string()
}

/// Two-space indented JSON, keys sorted.
pub fn to_json_pretty(node: &Node) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&tree_to_value(node))
}
