// file: src/cli/mod.rs
// version: 1.0.0
// guid: 1a6b3c9d-2e4f-4a58-b7c0-d8e9f1a2b3c4

//! Command line interface for koreonctl

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
