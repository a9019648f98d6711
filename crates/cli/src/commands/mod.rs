//! CLI subcommand implementations.

pub mod migrate;
pub mod product;
pub mod seed;
