//! CLI Module Organization
//!
//! - args: CLI argument structures
//! - commands: command execution
//! - output: report rendering

pub mod args;
pub mod commands;
pub mod output;

pub use args::*;
pub use commands::*;
