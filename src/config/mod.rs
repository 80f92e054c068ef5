// file: src/config/mod.rs
// version: 1.0.0
// guid: 5fac15d6-f15c-4210-ad6c-f59af1c8a2c1

//! Configuration module for koreonctl
//!
//! Handles loading of the provisioning document and the tool settings, and holds
//! the normalized form produced by validation.

pub mod koreon;
pub mod loader;
pub mod settings;

pub use koreon::{
    CertFile, Etcd, ImageVersion, KoreOn, KoreonToml, Kubernetes, NodeGroup, NodePool,
    PackageVersion, PrepareAirgap, PrivateRegistry, SharedStorage, SupportVersion,
};
pub use loader::ConfigLoader;
pub use settings::Settings;

use serde::Serialize;
use std::ops::Deref;

/// A provisioning document with every version resolved and every default applied
///
/// Only the validator constructs this; there is no mutable access afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedConfig(KoreonToml);

impl NormalizedConfig {
    pub(crate) fn new(inner: KoreonToml) -> Self {
        Self(inner)
    }
}

impl Deref for NormalizedConfig {
    type Target = KoreonToml;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
