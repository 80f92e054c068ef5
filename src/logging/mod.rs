// file: src/logging/mod.rs
// version: 1.0.0
// guid: 3e1c4f0a-8d92-4b7e-a6f5-1c2d9e8b7a40

//! Logging setup for koreonctl

pub mod logger;

pub use logger::{init_json_logger, init_logger};
