//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod convert;
pub mod dedup;
pub mod drop_columns;
pub mod filter;
