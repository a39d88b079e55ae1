//! Owned syntax tree shared by every handle.
//!
//! Tree-sitter trees borrow from the parser that produced them, so the
//! Python front end copies each parse into [`SyntaxNode`]s. The copy keeps
//! every token the canonical serializer needs while dropping comments and
//! statement separators, which carry no structure.

use std::fmt::Write as _;

use serde::Serialize;

/// Source range of a node: 1-based lines, 0-based columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// First line (1-based)
    pub start_line: usize,
    /// First column (0-based)
    pub start_column: usize,
    /// Last line (1-based)
    pub end_line: usize,
    /// Column just past the node (0-based)
    pub end_column: usize,
}

impl Span {
    /// Create a span from its four coordinates
    pub const fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// A node of a parsed Python tree.
///
/// Equality is strict: kind, field, token text, span and children must all
/// match. Use the handle's equivalence check for a loose comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SyntaxNode {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    named: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    span: Span,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<SyntaxNode>,
}

/// Node kinds whose statements live in a `body` field.
const BODY_FIELD_KINDS: &[&str] = &[
    "function_definition",
    "class_definition",
    "for_statement",
    "while_statement",
    "with_statement",
    "try_statement",
    "else_clause",
    "finally_clause",
    "except_clause",
    "except_group_clause",
];

/// Node kinds whose statements live in a `consequence` field.
const CONSEQUENCE_FIELD_KINDS: &[&str] = &["if_statement", "elif_clause", "case_clause"];

impl SyntaxNode {
    /// Create a token or other childless node
    pub fn leaf(kind: &'static str, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            field: None,
            named: true,
            text: Some(text.into()),
            span,
            children: Vec::new(),
        }
    }

    /// Create an interior node
    pub fn branch(kind: &'static str, span: Span, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            field: None,
            named: true,
            text: None,
            span,
            children,
        }
    }

    /// Wrap a list of statements in a module so it can be indexed like one.
    pub fn synthetic_module(statements: Vec<SyntaxNode>, span: Span) -> Self {
        let statements = statements
            .into_iter()
            .map(|mut stmt| {
                stmt.field = None;
                stmt
            })
            .collect();
        Self::branch("module", span, statements)
    }

    /// Set the field name this node occupies in its parent
    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    /// Mark the node as an anonymous token (keyword or punctuation)
    pub fn anonymous(mut self) -> Self {
        self.named = false;
        self
    }

    /// Attach token text to an interior node (used for string literals)
    pub(crate) fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Grammar kind, e.g. `function_definition` or `identifier`
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Field name in the parent node, if any
    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    /// Whether the node is a named grammar rule rather than a bare token
    pub fn is_named(&self) -> bool {
        self.named
    }

    /// Source text for tokens and string literals
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Source range
    pub fn span(&self) -> Span {
        self.span
    }

    /// All children, tokens included
    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// Children that are named grammar rules
    pub fn named_children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(|child| child.named)
    }

    /// First child stored under `field`
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children
            .iter()
            .find(|child| child.field == Some(field))
    }

    /// Every child stored under `field`, in source order
    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a SyntaxNode> {
        self.children
            .iter()
            .filter(move |child| child.field == Some(field))
    }

    /// Text of the identifier stored under `field`
    pub fn field_text(&self, field: &str) -> Option<&str> {
        self.child_by_field(field).and_then(SyntaxNode::text)
    }

    /// The statement list this node owns, if it has one.
    pub fn body(&self) -> Option<&[SyntaxNode]> {
        match self.kind {
            "module" | "block" => Some(&self.children),
            "decorated_definition" => self.child_by_field("definition")?.body(),
            kind if BODY_FIELD_KINDS.contains(&kind) => {
                let block = self
                    .child_by_field("body")
                    .or_else(|| self.children.iter().find(|child| child.kind == "block"))?;
                Some(&block.children)
            }
            kind if CONSEQUENCE_FIELD_KINDS.contains(&kind) => {
                Some(&self.child_by_field("consequence")?.children)
            }
            _ => None,
        }
    }

    /// Whether any token child has exactly this text (e.g. `async`)
    pub fn has_token(&self, token: &str) -> bool {
        self.children
            .iter()
            .any(|child| !child.named && child.text.as_deref() == Some(token))
    }

    /// Indented, human-readable rendering of the tree.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        if !self.named {
            return;
        }
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}");
        if let Some(field) = self.field {
            let _ = write!(out, "{field}: ");
        }
        let _ = write!(
            out,
            "{} [{}:{}-{}:{}]",
            self.kind,
            self.span.start_line,
            self.span.start_column,
            self.span.end_line,
            self.span.end_column
        );
        if let Some(text) = &self.text {
            let _ = write!(out, " {text:?}");
        }
        out.push('\n');
        // String internals are already shown through the literal text.
        if self.kind == "string" {
            return;
        }
        for child in &self.children {
            child.dump_into(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> SyntaxNode {
        SyntaxNode::leaf("identifier", text, Span::new(1, 0, 1, text.len()))
    }

    #[test]
    fn test_child_by_field() {
        let node = SyntaxNode::branch(
            "assignment",
            Span::new(1, 0, 1, 5),
            vec![
                name("x").with_field("left"),
                SyntaxNode::leaf("=", "=", Span::new(1, 2, 1, 3)).anonymous(),
                SyntaxNode::leaf("integer", "1", Span::new(1, 4, 1, 5)).with_field("right"),
            ],
        );

        assert_eq!(node.field_text("left"), Some("x"));
        assert_eq!(node.child_by_field("right").map(SyntaxNode::kind), Some("integer"));
        assert_eq!(node.named_children().count(), 2);
        assert!(node.has_token("="));
        assert!(node.body().is_none());
    }

    #[test]
    fn test_synthetic_module_exposes_body() {
        let stmt = name("x").with_field("consequence");
        let module = SyntaxNode::synthetic_module(vec![stmt], Span::default());

        let body = module.body().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].field(), None);
    }

    #[test]
    fn test_dump_skips_tokens() {
        let node = SyntaxNode::branch(
            "expression_statement",
            Span::new(1, 0, 1, 1),
            vec![name("x"), SyntaxNode::leaf(";", ";", Span::default()).anonymous()],
        );
        let dump = node.dump();
        assert!(dump.starts_with("expression_statement [1:0-1:1]\n"));
        assert!(dump.contains("  identifier [1:0-1:1] \"x\""));
        assert!(!dump.contains(";"));
    }
}
