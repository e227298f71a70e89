//! # hello-sparql CLI
//!
//! `serve` starts the HTTP API; `query` and `validate` run the same
//! pipelines offline over local files and print the serialized result.

pub mod commands;

pub use commands::{execute, run_query, run_validate, Cli, Commands, ServeArgs};
