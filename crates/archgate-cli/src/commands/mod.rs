//! Subcommand implementations.

pub mod baseline;
pub mod check;
pub mod list_rules;
pub mod output;
