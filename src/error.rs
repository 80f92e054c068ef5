// file: src/error.rs
// version: 1.0.0
// guid: 1b2b4a62-3739-49ad-a454-42eb21a24360

use crate::validation::Violation;
use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, KoreonError>;

/// Error types for koreonctl
#[derive(Error, Debug)]
pub enum KoreonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} file is not found. Run koreonctl init first")]
    ConfigNotFound(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Support catalog error: {0}")]
    Catalog(String),

    #[error("{component} version '{version}' is not supported")]
    UnsupportedVersion { component: String, version: String },

    #[error("Binder schema error: {0}")]
    BinderSchema(String),

    #[error("[ERROR]: To run ansible-playbook an {0} must be specified")]
    MissingCredential(String),

    #[error("there are one or more errors ({} violation(s))", .0.len())]
    ValidationFailed(Vec<Violation>),

    #[error("Command execution error: {0}")]
    Execution(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KoreonError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a new binder schema error
    pub fn binder_schema(msg: impl Into<String>) -> Self {
        Self::BinderSchema(msg.into())
    }

    /// Create a new missing credential error
    pub fn missing_credential(what: impl Into<String>) -> Self {
        Self::MissingCredential(what.into())
    }

    /// Create a new execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Whether the error indicates a wiring or schema defect rather than bad input
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::BinderSchema(_) | Self::MissingCredential(_))
    }
}
