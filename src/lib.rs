// file: src/lib.rs
// version: 1.0.0
// guid: c4e8a2f6-9b1d-4e37-8a05-6f2d1b9c7e38

//! # koreonctl
//!
//! Validates a koreon cluster provisioning document against the support catalog
//! and compiles it into the invocation of the provisioning container.
//!
//! The pipeline is load, validate, confirm, plan and execute. Validation and
//! planning are pure; only the confirmation prompt and the executor touch the
//! outside world.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod executor;
pub mod logging;
pub mod plan;
pub mod validation;

pub use error::{KoreonError, Result};

/// Version information for the tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
