//! # Pyshape: Structural Queries over Python Snippets
//!
//! Pyshape parses Python source with tree-sitter and wraps the result in a
//! [`Handle`], a small query object built for automated grading of learner
//! submissions:
//!
//! - **Navigation**: index into statement bodies, find functions, classes and
//!   variable assignments by name
//! - **Literal extraction**: read the constant a variable is assigned
//! - **Conditionals**: list the tests and bodies of an `if`/`elif`/`else` chain
//! - **Equivalence**: compare code by canonical rendering, ignoring layout,
//!   redundant parentheses and literal spelling
//! - **Check suites**: declarative YAML/JSON expectations evaluated in bulk
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  checks (suites)                     │
//! ├──────────────────────────────────────────────────────┤
//! │                  handle (queries)                    │
//! ├──────────────────────────────────────────────────────┤
//! │  lang::python  │  lang::syntax  │  lang::unparse     │
//! │  (tree-sitter) │  (owned tree)  │  (canonical text)  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pyshape::Handle;
//!
//! # fn main() -> pyshape::Result<()> {
//! let code = Handle::parse("def area(r):\n    return 3.14 * r ** 2\n")?;
//! let body = code.find_function("area");
//! assert!(body.get(0)?.is_equivalent("return 3.14 * (r ** 2)")?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core {
    //! Configuration and error types shared across the crate.

    pub mod config;
    pub mod errors;
}

pub mod lang {
    //! Python parsing and the owned syntax tree.

    pub mod literal;
    pub mod python;
    pub mod syntax;
    pub mod unparse;
}

pub mod checks;
pub mod handle;

pub use checks::{run_suite, SuiteReport};
pub use core::config::CheckSuite;
pub use core::errors::{PyshapeError, Result, ResultExt};
pub use handle::{Handle, Underlying};
pub use lang::literal::Literal;
pub use lang::syntax::{Span, SyntaxNode};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
