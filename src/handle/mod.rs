//! Chainable handle over a parsed Python tree.
//!
//! A [`Handle`] is either empty, the canonical "not found" value, or wraps a
//! node or a list of nodes. Every query returns a fresh handle, so calls can
//! be chained without checking for absence at each step:
//!
//! ```rust
//! use pyshape::Handle;
//!
//! let submission = Handle::parse("def area(r):\n    return 3.14 * r * r").unwrap();
//! let body = submission.find_function("area");
//! assert!(body.get(0).unwrap().is_equivalent("return 3.14 * r * r").unwrap());
//! assert!(submission.find_function("perimeter").is_missing());
//! ```

mod conditional;
mod find;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::core::errors::{PyshapeError, Result};
use crate::lang::python::parse_source;
use crate::lang::syntax::SyntaxNode;
use crate::lang::unparse::{unparse, unparse_statements};

/// What a populated handle wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Underlying {
    /// A plain list of nodes, indexed directly
    Sequence(Vec<SyntaxNode>),
    /// A single node, indexed through its statement body
    Node(SyntaxNode),
}

/// Immutable wrapper around a parsed tree, or the empty "not found" value.
///
/// Equality is strict: two handles are equal when both are empty or both
/// wrap structurally identical trees, source positions included. For a
/// loose comparison against source text use [`Handle::is_equivalent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Handle {
    /// Nothing found
    #[default]
    Empty,
    /// A node or sequence of nodes
    Populated(Underlying),
}

#[allow(clippy::len_without_is_empty)]
impl Handle {
    /// Parse Python source into a handle wrapping the module.
    pub fn parse(source: &str) -> Result<Self> {
        parse_source(source).map(Self::from)
    }

    /// The empty handle
    pub const fn empty() -> Self {
        Self::Empty
    }

    /// Whether this is the empty handle
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether the handle wraps something
    pub fn is_present(&self) -> bool {
        !self.is_missing()
    }

    /// The wrapped value, if any
    pub fn underlying(&self) -> Option<&Underlying> {
        match self {
            Self::Empty => None,
            Self::Populated(underlying) => Some(underlying),
        }
    }

    /// The wrapped node when the handle holds a single node
    pub fn node(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Populated(Underlying::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Elements that indexing and the finders operate on.
    ///
    /// A sequence exposes its elements; a node exposes its statement body.
    /// Empty handles and nodes without a body expose nothing.
    pub(crate) fn elements(&self) -> &[SyntaxNode] {
        match self {
            Self::Empty => &[],
            Self::Populated(Underlying::Sequence(nodes)) => nodes,
            Self::Populated(Underlying::Node(node)) => node.body().unwrap_or_default(),
        }
    }

    /// Handle for the `index`-th element or statement.
    pub fn get(&self, index: usize) -> Result<Self> {
        let elements = self.elements();
        elements
            .get(index)
            .cloned()
            .map(Self::from)
            .ok_or_else(|| PyshapeError::index(index, elements.len()))
    }

    /// Number of elements or statements.
    pub fn len(&self) -> usize {
        self.elements().len()
    }

    /// Iterate over a handle per element or statement
    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.elements().iter().cloned().map(Self::from)
    }

    /// Canonical source text of the wrapped tree; `None` when empty.
    pub fn unparse(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Populated(Underlying::Node(node)) => Some(unparse(node)),
            Self::Populated(Underlying::Sequence(nodes)) => Some(unparse_statements(nodes)),
        }
    }

    /// Whether the wrapped tree does the same thing as `target`.
    ///
    /// Both sides are rendered canonically and compared as text, so wrapper
    /// differences (a bare expression against the same expression inside a
    /// statement) and layout do not matter. The empty handle is equivalent to
    /// nothing. Fails when `target` does not parse.
    pub fn is_equivalent(&self, target: &str) -> Result<bool> {
        let Some(own) = self.unparse() else {
            return Ok(false);
        };
        let target = unparse(&parse_source(target)?);
        let equivalent = own == target;
        debug!(equivalent, own = %own, target = %target, "compared canonical forms");
        Ok(equivalent)
    }

    /// Short description of the handle's shape, used in error messages.
    pub(crate) fn shape(&self) -> String {
        match self {
            Self::Empty => "empty handle".to_string(),
            Self::Populated(Underlying::Sequence(nodes)) => format!("sequence of {}", nodes.len()),
            Self::Populated(Underlying::Node(node)) => node.kind().to_string(),
        }
    }
}

impl From<SyntaxNode> for Handle {
    fn from(node: SyntaxNode) -> Self {
        Self::Populated(Underlying::Node(node))
    }
}

impl From<Vec<SyntaxNode>> for Handle {
    fn from(nodes: Vec<SyntaxNode>) -> Self {
        Self::Populated(Underlying::Sequence(nodes))
    }
}

impl From<Option<SyntaxNode>> for Handle {
    fn from(node: Option<SyntaxNode>) -> Self {
        node.map_or(Self::Empty, Self::from)
    }
}

impl FromStr for Handle {
    type Err = PyshapeError;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

/// Dynamically typed input: text is parsed, `null` is the empty handle.
impl TryFrom<&serde_json::Value> for Handle {
    type Error = PyshapeError;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(source) => Self::parse(source),
            serde_json::Value::Null => Ok(Self::Empty),
            other => Err(PyshapeError::type_error(format!(
                "handle must be built from source text or null, got {}",
                json_type_name(other)
            ))),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Handle: empty"),
            Self::Populated(Underlying::Node(node)) => {
                write!(f, "Handle:\n{}", node.dump().trim_end())
            }
            Self::Populated(Underlying::Sequence(nodes)) => {
                f.write_str("Handle: [")?;
                for node in nodes {
                    write!(f, "\n{}", node.dump().trim_end())?;
                }
                f.write_str("\n]")
            }
        }
    }
}
