//! Decomposition of `if`/`elif`/`else` cascades.

use tracing::debug;

use super::Handle;
use crate::core::errors::{PyshapeError, Result};
use crate::lang::syntax::SyntaxNode;

/// One arm of a conditional chain.
struct Branch<'a> {
    /// Test expression; `None` for the final `else`
    test: Option<&'a SyntaxNode>,
    /// Block holding the arm's statements
    block: &'a SyntaxNode,
}

impl Handle {
    /// Every top-level `if` statement, in source order.
    ///
    /// `elif` and `else` arms belong to their `if` and are not listed.
    pub fn find_ifs(&self) -> Vec<Handle> {
        self.elements()
            .iter()
            .filter(|stmt| stmt.kind() == "if_statement")
            .cloned()
            .map(Handle::from)
            .collect()
    }

    /// Test of each arm of the wrapped conditional, in source order.
    ///
    /// A final `else` contributes an empty handle; a chain without `else`
    /// has exactly one entry per test. Fails unless the handle wraps an
    /// `if` statement.
    pub fn find_conditions(&self) -> Result<Vec<Handle>> {
        let branches = self.branches("find_conditions")?;
        Ok(branches
            .into_iter()
            .map(|branch| Handle::from(branch.test.cloned()))
            .collect())
    }

    /// Body of each arm of the wrapped conditional, in source order.
    ///
    /// Each body is wrapped in a module so it can be indexed and searched
    /// like a parsed snippet. Fails unless the handle wraps an `if`
    /// statement.
    pub fn find_if_bodies(&self) -> Result<Vec<Handle>> {
        let branches = self.branches("find_if_bodies")?;
        Ok(branches
            .into_iter()
            .map(|branch| {
                let module =
                    SyntaxNode::synthetic_module(branch.block.children().to_vec(), branch.block.span());
                Handle::from(module)
            })
            .collect())
    }

    fn branches(&self, operation: &str) -> Result<Vec<Branch<'_>>> {
        match self.node() {
            Some(node) if node.kind() == "if_statement" => Ok(conditional_chain(node)),
            _ => Err(PyshapeError::invalid_operation(operation, self.shape())),
        }
    }
}

/// Walk the chain of arms starting at an `if` statement.
///
/// An `else` whose block is a single `if` statement continues the chain,
/// since it has the same structure as an `elif`. The walk stops at a plain
/// `else`, at the end of the arms, or at an arm missing its block.
fn conditional_chain(root: &SyntaxNode) -> Vec<Branch<'_>> {
    let mut branches = Vec::new();
    let mut current = Some(root);

    while let Some(statement) = current.take() {
        let Some(block) = statement.child_by_field("consequence") else {
            break;
        };
        branches.push(Branch {
            test: statement.child_by_field("condition"),
            block,
        });

        for alternative in statement.children_by_field("alternative") {
            match alternative.kind() {
                "elif_clause" => {
                    let Some(block) = alternative.child_by_field("consequence") else {
                        break;
                    };
                    branches.push(Branch {
                        test: alternative.child_by_field("condition"),
                        block,
                    });
                }
                "else_clause" => {
                    let Some(block) = alternative.child_by_field("body") else {
                        break;
                    };
                    match block.children() {
                        [nested] if nested.kind() == "if_statement" => current = Some(nested),
                        _ => branches.push(Branch { test: None, block }),
                    }
                }
                _ => break,
            }
        }
    }

    debug!(arms = branches.len(), "decomposed conditional chain");
    branches
}
