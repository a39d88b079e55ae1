//! Python front end with tree-sitter integration.

use tracing::{debug, trace};
use tree_sitter::{Node, Parser, TreeCursor};

use super::syntax::{Span, SyntaxNode};
use crate::core::errors::{PyshapeError, Result};

/// Language label used in parse errors.
pub const LANGUAGE: &str = "python";

/// Python 2 constructs the grammar still accepts but Python 3 rejects.
const PYTHON2_KINDS: &[&str] = &["print_statement", "exec_statement", "chevron"];

/// Python parser producing owned [`SyntaxNode`] trees
pub struct PythonParser {
    /// Tree-sitter parser for Python
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|e| {
            PyshapeError::parse(LANGUAGE, format!("Failed to set Python language: {:?}", e))
        })?;

        Ok(Self { parser })
    }

    /// Parse Python source code into a module node.
    ///
    /// Any error or missing token reported by tree-sitter fails the whole
    /// parse; partial trees are never returned. Python 2 `print` and `exec`
    /// statements are syntax errors too.
    pub fn parse(&mut self, source_code: &str) -> Result<SyntaxNode> {
        let tree = self
            .parser
            .parse(source_code, None)
            .ok_or_else(|| PyshapeError::parse(LANGUAGE, "Failed to parse Python source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root, source_code));
        }
        if let Some(legacy) = find_python2_construct(root) {
            return Err(python2_error(legacy));
        }

        debug!(
            bytes = source_code.len(),
            statements = root.named_child_count(),
            "parsed python source"
        );

        let mut cursor = root.walk();
        Ok(convert(&mut cursor, source_code.as_bytes()))
    }
}

/// Parse a snippet with a fresh parser.
pub fn parse_source(source_code: &str) -> Result<SyntaxNode> {
    PythonParser::new()?.parse(source_code)
}

/// Build an owned node from the cursor's current node, recursing into children.
fn convert(cursor: &mut TreeCursor, source: &[u8]) -> SyntaxNode {
    let node = cursor.node();
    let span = span_of(&node);
    let kind = node.kind();

    let mut children = Vec::new();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if keep_child(kind, &child) {
                let field = cursor.field_name();
                let mut converted = convert(cursor, source);
                if let Some(field) = field {
                    converted = converted.with_field(field);
                }
                children.push(converted);
            } else {
                trace!(kind = child.kind(), "dropping extra node");
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    let mut converted = if node.child_count() == 0 {
        SyntaxNode::leaf(kind, node_text(&node, source), span)
    } else {
        let branch = SyntaxNode::branch(kind, span, children);
        if kind == "string" {
            branch.with_text(node_text(&node, source))
        } else {
            branch
        }
    };
    if !node.is_named() {
        converted = converted.anonymous();
    }
    converted
}

/// Comments and statement separators have no counterpart in the tree we expose.
fn keep_child(parent_kind: &str, child: &Node) -> bool {
    if child.is_extra() {
        return false;
    }
    !(matches!(parent_kind, "module" | "block") && child.kind() == ";")
}

fn node_text(node: &Node, source: &[u8]) -> String {
    // Byte ranges come from the same buffer, so lossy decoding only
    // triggers on invalid input that tree-sitter already accepted.
    String::from_utf8_lossy(&source[node.start_byte()..node.end_byte()]).into_owned()
}

fn span_of(node: &Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(start.row + 1, start.column, end.row + 1, end.column)
}

/// First Python 2 only node in source order.
fn find_python2_construct(root: Node) -> Option<Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if PYTHON2_KINDS.contains(&node.kind()) {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn python2_error(node: Node) -> PyshapeError {
    let position = node.start_position();
    let message = match node.kind() {
        "exec_statement" => "'exec' statement is Python 2 syntax; call exec() instead",
        _ => "'print' statement is Python 2 syntax; call print() instead",
    };
    debug!(
        kind = node.kind(),
        line = position.row + 1,
        "rejected python 2 construct"
    );
    PyshapeError::parse_at(LANGUAGE, message, position.row + 1, position.column + 1)
}

/// Locate the first error or missing node and describe it.
fn syntax_error(root: Node, source: &str) -> PyshapeError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_missing() || node.is_error() {
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("missing '{}'", node.kind())
            } else {
                let snippet = node
                    .utf8_text(source.as_bytes())
                    .unwrap_or_default()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                if snippet.is_empty() {
                    "invalid syntax".to_string()
                } else {
                    format!("invalid syntax near '{snippet}'")
                }
            };
            debug!(
                line = position.row + 1,
                column = position.column + 1,
                %message,
                "python source failed to parse"
            );
            return PyshapeError::parse_at(LANGUAGE, message, position.row + 1, position.column + 1);
        }
        if !node.has_error() {
            continue;
        }
        // Push in reverse so the leftmost child is examined first.
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    PyshapeError::parse(LANGUAGE, "invalid syntax")
}

#[cfg(test)]
#[path = "python_tests.rs"]
mod tests;
