//! Canonical source rendering for parsed Python trees.
//!
//! Two snippets are considered equivalent when they render to the same
//! canonical text. The renderer therefore normalizes everything that is not
//! structure: layout, spacing, redundant parentheses, number spelling,
//! tuple parentheses and the quoting of plain strings. A module renders as
//! its statements and an expression statement as its expression, so a bare
//! expression compares equal to the same expression found inside a larger
//! tree.

use super::literal::{decode_string, parse_float, parse_int_text, string_repr};
use super::syntax::SyntaxNode;

const INDENT: &str = "    ";

/// Precedence of atoms, calls, attributes and subscripts.
const ATOM: u8 = 17;

/// Minimum precedence accepted in an unconstrained position.
const ANY: u8 = 1;

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "match", "case",
];

/// Kinds rendered without spaces between their tokens.
const COMPACT_KINDS: &[&str] = &[
    "unary_operator",
    "list_splat",
    "dictionary_splat",
    "list_splat_pattern",
    "dictionary_splat_pattern",
    "keyword_argument",
    "default_parameter",
    "decorator",
    "slice",
    "relative_import",
];

/// Tuple displays, with or without their parentheses in source.
const TUPLE_KINDS: &[&str] = &["tuple", "expression_list", "tuple_pattern", "pattern_list"];

/// Kinds that always begin on a fresh line.
const LINE_START_KINDS: &[&str] = &[
    "elif_clause",
    "else_clause",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "case_clause",
    "decorator",
    "function_definition",
    "class_definition",
];

/// Render a node as canonical Python source.
pub fn unparse(node: &SyntaxNode) -> String {
    let mut printer = Printer::default();
    printer.visit(node);
    printer.finish()
}

/// Render a statement list, one statement per line.
pub fn unparse_statements(statements: &[SyntaxNode]) -> String {
    let mut printer = Printer::default();
    printer.statements(statements);
    printer.finish()
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
    line_has_content: bool,
    last: Option<String>,
    glue: bool,
}

impl Printer {
    fn finish(self) -> String {
        self.out
    }

    fn statements(&mut self, statements: &[SyntaxNode]) {
        for statement in statements.iter().filter(|s| s.is_named()) {
            self.line_break();
            self.visit(statement);
        }
    }

    fn line_break(&mut self) {
        if self.line_has_content {
            self.out.push('\n');
            self.line_has_content = false;
            self.last = None;
        }
    }

    fn token(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }
        if !self.line_has_content {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
        } else if !self.glue && needs_space(self.last.as_deref(), token) {
            self.out.push(' ');
        }
        self.glue = false;
        self.out.push_str(token);
        self.line_has_content = true;
        self.last = Some(token.to_string());
    }

    fn visit(&mut self, node: &SyntaxNode) {
        if LINE_START_KINDS.contains(&node.kind()) {
            self.line_break();
        }
        match node.kind() {
            "module" => self.statements(node.children()),
            "block" => {
                self.depth += 1;
                self.statements(node.children());
                self.depth -= 1;
            }
            "parenthesized_expression" => self.visit_operand(node, ANY),
            "string" => match decode_string(node) {
                Some(value) => self.token(&string_repr(&value)),
                None => self.token(node.text().unwrap_or_default()),
            },
            "concatenated_string" => {
                let pieces: Option<String> = node.named_children().map(decode_string).collect();
                match pieces {
                    Some(value) => self.token(&string_repr(&value)),
                    None => {
                        for piece in node.named_children() {
                            self.visit(piece);
                        }
                    }
                }
            }
            kind if TUPLE_KINDS.contains(&kind) => self.tuple(node, true),
            // `a, b` as a statement has no tuple node of its own
            "expression_statement" if node.has_token(",") => self.tuple(node, true),
            "subscript" => self.subscript(node),
            "integer" => {
                let text = node.text().map(normalize_integer).unwrap_or_default();
                self.token(&text);
            }
            "float" => {
                let text = node.text().map(normalize_float).unwrap_or_default();
                self.token(&text);
            }
            kind if COMPACT_KINDS.contains(&kind) => {
                for (position, child) in node.children().iter().enumerate() {
                    if position > 0 {
                        self.glue = true;
                    }
                    self.visit_operand(child, operand_precedence(node, child, position));
                }
            }
            _ if node.children().is_empty() => {
                if let Some(text) = node.text() {
                    self.token(text);
                }
            }
            _ => {
                let mut named_position = 0;
                for child in node.children() {
                    let minimum = operand_precedence(node, child, named_position);
                    if child.is_named() {
                        named_position += 1;
                    }
                    if is_target(node, child) && TUPLE_KINDS.contains(&child.kind()) {
                        self.tuple(child, false);
                    } else {
                        self.visit_operand(child, minimum);
                    }
                }
            }
        }
    }

    /// Render a tuple from its elements so `1, 2` and `(1, 2)` agree.
    /// The empty tuple always keeps its parentheses.
    fn tuple(&mut self, node: &SyntaxNode, parenthesize: bool) {
        let items: Vec<&SyntaxNode> = node.named_children().collect();
        let delimit = parenthesize || items.is_empty();
        if delimit {
            self.token("(");
        }
        self.comma_separated(&items, items.len() == 1);
        if delimit {
            self.token(")");
        }
    }

    /// `a[1, 2]` and `a[(1, 2)]` index with the same tuple.
    fn subscript(&mut self, node: &SyntaxNode) {
        if let Some(value) = node.child_by_field("value") {
            self.visit_operand(value, ATOM);
        }
        let mut items: Vec<&SyntaxNode> = node.children_by_field("subscript").collect();
        let single = match items.as_slice() {
            [only] => Some(unwrap_parentheses(*only)),
            _ => None,
        };
        let mut single_tuple = single.is_some() && node.has_token(",");
        if let Some(inner) = single.filter(|inner| inner.kind() == "tuple") {
            let elements: Vec<&SyntaxNode> = inner.named_children().collect();
            if !elements.is_empty() {
                single_tuple = elements.len() == 1;
                items = elements;
            }
        }

        self.token("[");
        self.comma_separated(&items, single_tuple);
        self.token("]");
    }

    fn comma_separated(&mut self, items: &[&SyntaxNode], trailing_comma: bool) {
        for (position, item) in items.iter().enumerate() {
            if position > 0 {
                self.token(",");
            }
            self.visit_operand(item, ANY);
        }
        if trailing_comma {
            self.token(",");
        }
    }

    /// Visit a child, keeping parentheses only when precedence requires them.
    fn visit_operand(&mut self, node: &SyntaxNode, minimum: u8) {
        if node.kind() != "parenthesized_expression" {
            self.visit(node);
            return;
        }
        let inner = unwrap_parentheses(node);
        if inner.kind() == "parenthesized_expression" {
            // Parentheses around something that is not an expression,
            // e.g. a yield; keep the source shape.
            self.token("(");
            for child in inner.named_children() {
                self.visit(child);
            }
            self.token(")");
        } else if precedence(inner) >= minimum {
            self.visit(inner);
        } else {
            self.token("(");
            self.visit(inner);
            self.token(")");
        }
    }
}

/// Strip nested parentheses around a single expression.
fn unwrap_parentheses(node: &SyntaxNode) -> &SyntaxNode {
    let mut current = node;
    while current.kind() == "parenthesized_expression" {
        let mut named = current.named_children();
        match (named.next(), named.next()) {
            (Some(inner), None) if inner.kind() != "yield" => current = inner,
            _ => break,
        }
    }
    current
}

/// Assignment and loop targets, where tuples are written bare.
fn is_target(parent: &SyntaxNode, child: &SyntaxNode) -> bool {
    matches!(parent.kind(), "assignment" | "for_statement" | "for_in_clause")
        && child.field() == Some("left")
}

fn binary_precedence(operator: &str) -> u8 {
    match operator {
        "or" => 3,
        "and" => 4,
        "|" => 7,
        "^" => 8,
        "&" => 9,
        "<<" | ">>" => 10,
        "+" | "-" => 11,
        "*" | "/" | "//" | "%" | "@" => 12,
        "**" => 15,
        _ => ANY,
    }
}

fn operator_text(node: &SyntaxNode) -> &str {
    node.child_by_field("operator")
        .and_then(SyntaxNode::text)
        .unwrap_or_default()
}

/// Binding strength of an expression, Python's grammar order.
fn precedence(node: &SyntaxNode) -> u8 {
    match node.kind() {
        "named_expression" | "yield" => 0,
        "lambda" => 1,
        "conditional_expression" => 2,
        "boolean_operator" | "binary_operator" => binary_precedence(operator_text(node)),
        "not_operator" => 5,
        "comparison_operator" => 6,
        "unary_operator" => 13,
        "await" => 16,
        _ => ATOM,
    }
}

/// Minimum precedence a child needs to stand without parentheses.
fn operand_precedence(parent: &SyntaxNode, child: &SyntaxNode, named_position: usize) -> u8 {
    match parent.kind() {
        "binary_operator" | "boolean_operator" => {
            let operator = operator_text(parent);
            let own = binary_precedence(operator);
            match (child.field(), operator) {
                (Some("left"), "**") => 16,
                (Some("right"), "**") => 13,
                (Some("left"), _) => own,
                (Some("right"), _) => own + 1,
                _ => ANY,
            }
        }
        "not_operator" => 5,
        "comparison_operator" => 7,
        "unary_operator" => 13,
        "conditional_expression" => {
            if named_position < 2 {
                3
            } else {
                2
            }
        }
        "await" => ATOM,
        "attribute" if child.field() == Some("object") => ATOM,
        "subscript" if child.field() == Some("value") => ATOM,
        "call" if child.field() == Some("function") => ATOM,
        _ => ANY,
    }
}

fn needs_space(last: Option<&str>, token: &str) -> bool {
    let Some(last) = last else {
        return false;
    };
    let last_is_keyword = KEYWORDS.contains(&last);
    if matches!(token, "," | ")" | "]" | "}" | ":" | ";") {
        return false;
    }
    if token == "." {
        return last_is_keyword;
    }
    // `from . import x`; soft keywords stay attached (`re.match`)
    if last == "." {
        return KEYWORDS.contains(&token) && !matches!(token, "match" | "case");
    }
    if matches!(last, "(" | "[" | "{" | ".") {
        return false;
    }
    if matches!(token, "(" | "[") && ends_expression(last) && !last_is_keyword {
        return false;
    }
    true
}

/// Whether a token can end a primary expression (so `(`/`[` continues it).
fn ends_expression(token: &str) -> bool {
    token
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | ')' | ']' | '}' | '"' | '\''))
}

fn normalize_integer(text: &str) -> String {
    match parse_int_text(text) {
        Some(value) => value.to_string(),
        None => text.to_string(),
    }
}

fn normalize_float(text: &str) -> String {
    match parse_float(text) {
        Some(value) if value.is_finite() => format!("{value:?}"),
        _ => text.to_string(),
    }
}
