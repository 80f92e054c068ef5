// file: src/config/loader.rs
// version: 1.0.0
// guid: 59be44b0-471c-4cbe-a075-8173bacc7fd1

//! Configuration file loading and environment variable substitution

use super::KoreonToml;
use crate::error::KoreonError;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load a `koreon.toml` document from disk
    pub fn load_koreon_config<P: AsRef<Path>>(&self, path: P) -> Result<KoreonToml> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(KoreonError::ConfigNotFound(path.display().to_string()));
        }

        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            KoreonError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        self.parse_koreon_config(&content)
    }

    /// Parse document text after variable expansion and separator normalization
    pub fn parse_koreon_config(&self, content: &str) -> Result<KoreonToml> {
        // Windows paths, including those coming from variables, are accepted
        // as-is; TOML would read the backslashes as escapes
        let expanded = self.expand_env_vars(content)?;
        let normalized = expanded.replace('\\', "/");
        KoreonToml::from_toml_str(&normalized)
    }

    /// Expand environment variables in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| KoreonError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else if !missing_vars.iter().any(|v| v == var_name) {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(KoreonError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
