//! Declaration finders and value predicates.
//!
//! Finders look only at the handle's own statements; nested scopes are
//! never searched. "Find" operations return a handle, empty when nothing
//! matches, and "has" operations report whether that handle is populated.

use tracing::trace;

use super::Handle;
use crate::lang::literal::Literal;
use crate::lang::syntax::SyntaxNode;

impl Handle {
    /// First top-level `def` named `name`.
    ///
    /// Decorated definitions match and are returned with their decorators;
    /// `async def` does not match.
    pub fn find_function(&self, name: &str) -> Handle {
        self.find_statement(|stmt| {
            let definition = unwrap_decorated(stmt);
            definition.kind() == "function_definition"
                && !definition.has_token("async")
                && definition.field_text("name") == Some(name)
        })
    }

    /// First top-level `class` named `name`.
    pub fn find_class(&self, name: &str) -> Handle {
        self.find_statement(|stmt| {
            let definition = unwrap_decorated(stmt);
            definition.kind() == "class_definition" && definition.field_text("name") == Some(name)
        })
    }

    /// First top-level assignment binding the plain name `name`.
    ///
    /// Returns the whole statement, so the result compares equal to the same
    /// statement reached by index. Tuple, attribute and subscript targets,
    /// annotated assignments and augmented assignments never match.
    pub fn find_variable(&self, name: &str) -> Handle {
        let found = self
            .elements()
            .iter()
            .find(|stmt| {
                as_assignment(stmt)
                    .is_some_and(|assignment| assignment_targets(assignment).any(|target| target == name))
            })
            .cloned();
        trace!(name, found = found.is_some(), "find_variable");
        Handle::from(found)
    }

    /// Whether a top-level function named `name` exists
    pub fn has_function(&self, name: &str) -> bool {
        self.find_function(name).is_present()
    }

    /// Whether a top-level class named `name` exists
    pub fn has_class(&self, name: &str) -> bool {
        self.find_class(name).is_present()
    }

    /// Whether a top-level variable named `name` is assigned
    pub fn has_variable(&self, name: &str) -> bool {
        self.find_variable(name).is_present()
    }

    /// Literal value assigned to `name`.
    ///
    /// `None` both when the variable is not assigned and when its value is
    /// not a literal; use [`Handle::has_variable`] to tell them apart.
    pub fn get_variable(&self, name: &str) -> Option<Literal> {
        self.find_variable(name)
            .assigned_value()
            .and_then(Literal::from_node)
    }

    /// Whether the handle wraps an assignment of an integer literal.
    ///
    /// `True` and `False` are not integers here.
    pub fn is_integer(&self) -> bool {
        self.assigned_value()
            .is_some_and(|value| matches!(Literal::from_node(value), Some(Literal::Int(_))))
    }

    /// Whether the handle wraps an assignment whose value is a direct call
    /// to the function named `function`, e.g. `x = input()`.
    ///
    /// Method calls such as `obj.input()` do not match.
    pub fn value_is_call(&self, function: &str) -> bool {
        self.assigned_value().is_some_and(|value| {
            value.kind() == "call"
                && value
                    .child_by_field("function")
                    .is_some_and(|callee| callee.kind() == "identifier" && callee.text() == Some(function))
        })
    }

    fn assigned_value(&self) -> Option<&SyntaxNode> {
        let assignment = as_assignment(self.node()?)?;
        assigned_value(assignment)
    }

    fn find_statement<F>(&self, predicate: F) -> Handle
    where
        F: Fn(&SyntaxNode) -> bool,
    {
        Handle::from(self.elements().iter().find(|stmt| predicate(*stmt)).cloned())
    }
}

fn unwrap_decorated(stmt: &SyntaxNode) -> &SyntaxNode {
    if stmt.kind() == "decorated_definition" {
        stmt.child_by_field("definition").unwrap_or(stmt)
    } else {
        stmt
    }
}

/// The plain assignment a statement consists of, if any.
///
/// Accepts both the assignment itself and the expression statement that
/// wraps it at statement level.
fn as_assignment(stmt: &SyntaxNode) -> Option<&SyntaxNode> {
    let candidate = if stmt.kind() == "expression_statement" {
        let mut named = stmt.named_children();
        match (named.next(), named.next()) {
            (Some(only), None) => only,
            _ => return None,
        }
    } else {
        stmt
    };
    let plain = candidate.kind() == "assignment"
        && candidate.child_by_field("type").is_none()
        && candidate.child_by_field("right").is_some();
    plain.then_some(candidate)
}

/// Plain names bound by an assignment, following chains like `a = b = 1`.
fn assignment_targets(assignment: &SyntaxNode) -> impl Iterator<Item = &str> {
    let mut current = Some(assignment);
    std::iter::from_fn(move || {
        let node = current.filter(|node| node.kind() == "assignment")?;
        current = node.child_by_field("right");
        Some(node.child_by_field("left"))
    })
    .flatten()
    .filter(|left| left.kind() == "identifier")
    .filter_map(SyntaxNode::text)
}

/// Value of an assignment, skipping over chained targets.
fn assigned_value(assignment: &SyntaxNode) -> Option<&SyntaxNode> {
    let mut value = assignment.child_by_field("right")?;
    while value.kind() == "assignment" {
        value = value.child_by_field("right")?;
    }
    Some(value)
}
