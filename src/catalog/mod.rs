// file: src/catalog/mod.rs
// version: 1.0.0
// guid: 768945d8-8d42-466f-bd45-c8be52c8e9fa

//! Support catalog
//!
//! Maps a component and a requested version (or the `latest` alias) to a concrete
//! supported version, and a resolved Kubernetes version to the image and package
//! versions known to work with it.

pub mod binder;

pub use binder::{bind, BindIssue, Bindable, FieldBinding};

use crate::error::KoreonError;
use crate::Result;
use semver::Version;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Catalog shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("support.toml");

/// Alias selecting the newest known version
pub const LATEST: &str = "latest";

pub const KUBERNETES: &str = "kubernetes";
pub const HARBOR: &str = "harbor";
pub const HELM: &str = "helm";

/// Version sets registered per Kubernetes version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportSet {
    Image,
    Package,
}

impl SupportSet {
    /// Name of the catalog table
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportSet::Image => "k8s_support_image",
            SupportSet::Package => "k8s_support_package",
        }
    }
}

/// Immutable support catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SupportCatalog {
    #[serde(default)]
    components: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    k8s_support_image: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    k8s_support_package: BTreeMap<String, BTreeMap<String, String>>,
}

impl SupportCatalog {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parse a catalog document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| KoreonError::catalog(format!("Invalid support catalog: {}", e)))
    }

    /// Load a catalog document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KoreonError::catalog(format!(
                "Failed to read support catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve a requested version of a component
    ///
    /// An empty request or `latest` selects the newest known version. Any other
    /// request must name a known version exactly.
    pub fn resolve(&self, component: &str, requested: &str) -> Result<String> {
        let versions = self
            .components
            .get(component)
            .filter(|versions| !versions.is_empty())
            .ok_or_else(|| {
                KoreonError::catalog(format!("Unknown component '{}'", component))
            })?;

        let requested = requested.trim();
        if requested.is_empty() || requested == LATEST {
            let newest = newest_version(versions).ok_or_else(|| {
                KoreonError::catalog(format!("No versions registered for '{}'", component))
            })?;
            debug!("Resolved {} {} to {}", component, LATEST, newest);
            return Ok(newest.to_string());
        }

        if versions.iter().any(|v| v == requested) {
            Ok(requested.to_string())
        } else {
            Err(KoreonError::UnsupportedVersion {
                component: component.to_string(),
                version: requested.to_string(),
            })
        }
    }

    /// Newest known version of a component
    pub fn latest(&self, component: &str) -> Option<&str> {
        self.components
            .get(component)
            .and_then(|versions| newest_version(versions))
    }

    /// Versions known for a component, in catalog order
    pub fn versions(&self, component: &str) -> &[String] {
        self.components
            .get(component)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Image or package versions registered for a Kubernetes version
    pub fn list_for(
        &self,
        k8s_version: &str,
        set: SupportSet,
    ) -> Option<&BTreeMap<String, String>> {
        let table = match set {
            SupportSet::Image => &self.k8s_support_image,
            SupportSet::Package => &self.k8s_support_package,
        };
        table.get(k8s_version)
    }
}

/// Highest version by semantic ordering; unparsable versions sort below parsable ones
fn newest_version(versions: &[String]) -> Option<&str> {
    versions
        .iter()
        .max_by(|a, b| version_key(a).cmp(&version_key(b)))
        .map(String::as_str)
}

fn version_key(version: &str) -> (Option<Version>, &str) {
    (parse_lenient(version), version)
}

/// Parse `v1.2.3`, `1.2` or `1` as a semantic version
fn parse_lenient(version: &str) -> Option<Version> {
    let trimmed = version.trim().trim_start_matches('v');
    let (core, rest) = match trimmed.find(['-', '+']) {
        Some(idx) => trimmed.split_at(idx),
        None => (trimmed, ""),
    };
    let padded = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, rest),
        2 => format!("{}.0{}", core, rest),
        _ => trimmed.to_string(),
    };
    Version::parse(&padded).ok()
}
