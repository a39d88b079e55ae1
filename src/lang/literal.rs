//! Literal constants extracted from assignment values.

use std::fmt::{self, Write as _};

use serde::Serialize;

use super::syntax::SyntaxNode;

/// A constant value written directly in source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    /// Integer literal (booleans are never represented here)
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// Text literal, escapes decoded
    Str(String),
    /// `True` or `False`
    Bool(bool),
}

impl Literal {
    /// Read the literal a node spells, if it is one.
    ///
    /// `None`, bytes, f-strings, complex numbers and negated numbers are not
    /// literals here; neither are integers outside the `i64` range.
    pub fn from_node(node: &SyntaxNode) -> Option<Self> {
        match node.kind() {
            "integer" => parse_int(node.text()?).map(Self::Int),
            "float" => parse_float(node.text()?).map(Self::Float),
            "true" => Some(Self::Bool(true)),
            "false" => Some(Self::Bool(false)),
            "string" => decode_string(node).map(Self::Str),
            "concatenated_string" => node
                .named_children()
                .map(decode_string)
                .collect::<Option<String>>()
                .map(Self::Str),
            _ => None,
        }
    }

    /// Name of the literal's type as Python spells it
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::Str(value) => f.write_str(&string_repr(value)),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
        }
    }
}

/// Integer text with `_` separators and an optional base prefix.
pub(crate) fn parse_int_text(text: &str) -> Option<u128> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else {
        (lower.as_str(), 10)
    };
    u128::from_str_radix(digits, radix).ok()
}

fn parse_int(text: &str) -> Option<i64> {
    parse_int_text(text).and_then(|value| i64::try_from(value).ok())
}

/// Float text with `_` separators; imaginary literals are rejected.
pub(crate) fn parse_float(text: &str) -> Option<f64> {
    if text.ends_with(['j', 'J']) {
        return None;
    }
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    cleaned.parse().ok()
}

/// Split a string token into its prefix, quote and body.
pub(crate) fn split_string(text: &str) -> Option<(&str, &str, &str)> {
    let prefix_len = text.find(['"', '\''])?;
    let (prefix, rest) = text.split_at(prefix_len);
    let quote = if rest.starts_with("\"\"\"") || rest.starts_with("'''") {
        &rest[..3]
    } else {
        &rest[..1]
    };
    if rest.len() < quote.len() * 2 || !rest.ends_with(quote) {
        return None;
    }
    let body = &rest[quote.len()..rest.len() - quote.len()];
    Some((prefix, quote, body))
}

/// Value of a plain string node; `None` for f-strings, t-strings and bytes.
pub(crate) fn decode_string(node: &SyntaxNode) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let (prefix, _, body) = split_string(node.text()?)?;
    let prefix = prefix.to_ascii_lowercase();
    if prefix.contains('f') || prefix.contains('b') || prefix.contains('t') {
        return None;
    }
    if prefix.contains('r') {
        return Some(body.to_string());
    }
    Some(unescape(body))
}

/// Quote a string value the way Python's `repr` does: single quotes unless
/// the value holds a single quote and no double quote.
pub(crate) fn string_repr(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Decode Python escape sequences. Unknown escapes keep their backslash.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.by_ref().take(width).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == width => out.push(decoded),
                    _ => {
                        out.push('\\');
                        out.push(next);
                        out.push_str(&digits);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}
