// file: src/validation/mod.rs
// version: 1.0.0
// guid: 8b0133cd-2c2c-4850-92d4-b99c5f9e599d

//! Context validation of the provisioning document
//!
//! A validation pass is a pure function of the raw document, the command
//! context and the support catalog. Every rule of the context runs, and every
//! failed rule adds one [`Violation`] to the report. Nothing short-circuits
//! except a structural error in a binding table.

mod airgap;
mod create;

use crate::catalog::binder::{self, Bindable};
use crate::catalog::{SupportCatalog, HELM};
use crate::config::settings::IMAGE_ARCHIVE;
use crate::config::{KoreonToml, NormalizedConfig, SupportVersion};
use crate::error::KoreonError;
use crate::Result;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Default SSH port applied when the document leaves it unset
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Command context selecting the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationContext {
    Create,
    PrepareAirgap,
    DestroyPrepareAirgap,
    /// Commands without rules of their own; only global defaults apply
    Passthrough,
}

impl ValidationContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationContext::Create => "create",
            ValidationContext::PrepareAirgap => "prepare-airgap",
            ValidationContext::DestroyPrepareAirgap => "destroy-prepare-airgap",
            ValidationContext::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValidationContext {
    type Err = KoreonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "create" => Ok(ValidationContext::Create),
            "prepare-airgap" => Ok(ValidationContext::PrepareAirgap),
            "destroy-prepare-airgap" => Ok(ValidationContext::DestroyPrepareAirgap),
            "passthrough" => Ok(ValidationContext::Passthrough),
            _ => Err(KoreonError::config(format!(
                "Unknown validation context: {}",
                s
            ))),
        }
    }
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub context: ValidationContext,
    /// Dotted document path, e.g. `private-registry.registry-ip`
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} > {}", self.context, self.field, self.message)
    }
}

/// Outcome of one validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub context: ValidationContext,
    pub config: NormalizedConfig,
    pub violations: Vec<Violation>,
    /// Informational notices such as versions chosen automatically
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// True when no rule failed
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// The normalized document, or every violation of the pass
    pub fn into_result(self) -> Result<NormalizedConfig> {
        if self.ok() {
            Ok(self.config)
        } else {
            Err(KoreonError::ValidationFailed(self.violations))
        }
    }
}

/// Run the rules of `context` against `raw`
///
/// Returns `Err` only for structural defects; rule failures are in the report.
pub fn validate(
    raw: &KoreonToml,
    context: ValidationContext,
    catalog: &SupportCatalog,
) -> Result<ValidationReport> {
    info!("Validating configuration for {}", context);

    let mut config = raw.clone();
    let mut pass = Pass::new(context, catalog);

    apply_global_defaults(&mut pass, &mut config);

    match context {
        ValidationContext::Create => create::check(&mut pass, &mut config)?,
        ValidationContext::PrepareAirgap => airgap::check_prepare(&mut pass, &mut config)?,
        ValidationContext::DestroyPrepareAirgap => airgap::check_destroy(&mut pass, &config),
        ValidationContext::Passthrough => {}
    }

    if pass.violations.is_empty() {
        info!("Configuration is valid for {}", context);
    } else {
        warn!(
            "Configuration has {} violation(s) for {}",
            pass.violations.len(),
            context
        );
    }

    Ok(ValidationReport {
        context,
        config: NormalizedConfig::new(config),
        violations: pass.violations,
        warnings: pass.warnings,
    })
}

fn apply_global_defaults(pass: &mut Pass<'_>, config: &mut KoreonToml) {
    if config.node_pool.ssh_port == 0 {
        debug!("node-pool.ssh-port unset, using {}", DEFAULT_SSH_PORT);
        config.node_pool.ssh_port = DEFAULT_SSH_PORT;
    }

    config.koreon.image_archive = IMAGE_ARCHIVE.to_string();

    match pass.catalog.resolve(HELM, "") {
        Ok(version) => config.koreon.helm_version = version,
        Err(e)
            if matches!(
                pass.context,
                ValidationContext::Create | ValidationContext::PrepareAirgap
            ) =>
        {
            pass.violation("koreon.helm-version", e.to_string())
        }
        Err(e) => debug!("No helm version available: {}", e),
    }
}

/// Accumulator threaded through the rules of one pass
pub(crate) struct Pass<'a> {
    context: ValidationContext,
    catalog: &'a SupportCatalog,
    violations: Vec<Violation>,
    warnings: Vec<String>,
}

impl<'a> Pass<'a> {
    fn new(context: ValidationContext, catalog: &'a SupportCatalog) -> Self {
        Self {
            context,
            catalog,
            violations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn violation(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let violation = Violation {
            context: self.context,
            field: field.into(),
            message: message.into(),
        };
        debug!("{}", violation);
        self.violations.push(violation);
    }

    fn warning(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Resolve a requested version, recording a warning when it was defaulted
    fn resolve_version(
        &mut self,
        field: &str,
        component: &str,
        requested: &str,
        label: &str,
    ) -> Option<String> {
        match self.catalog.resolve(component, requested) {
            Ok(version) => {
                if requested.trim().is_empty() {
                    self.warning(format!(
                        "{} version is required. Last version {} applied automatically.",
                        label, version
                    ));
                }
                Some(version)
            }
            Err(e) => {
                self.violation(field, e.to_string());
                None
            }
        }
    }

    /// Bind image and package versions registered for `k8s_version`
    fn resolve_support_versions(
        &mut self,
        k8s_version: &str,
        support: &mut SupportVersion,
    ) -> Result<()> {
        self.bind_set(
            k8s_version,
            &mut support.image_version,
            "support-version.image-version",
        )?;
        self.bind_set(
            k8s_version,
            &mut support.package_version,
            "support-version.package-version",
        )
    }

    fn bind_set<T: Bindable>(&mut self, k8s_version: &str, target: &mut T, path: &str) -> Result<()> {
        let catalog = self.catalog;
        let Some(entries) = catalog.list_for(k8s_version, T::SET) else {
            self.violation(
                path,
                format!(
                    "Support package and container image not found for kubernetes {} ({})",
                    k8s_version,
                    T::SET.as_str()
                ),
            );
            return Ok(());
        };

        for issue in binder::bind(target, entries, catalog)? {
            self.violation(format!("{}.{}", path, issue.field), issue.message);
        }
        for field in binder::unbound_fields(target) {
            self.violation(
                format!("{}.{}", path, field),
                format!(
                    "no supported version resolved for kubernetes {}",
                    k8s_version
                ),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SupportCatalog {
        SupportCatalog::builtin().unwrap()
    }

    #[test]
    fn test_context_round_trips_through_str() {
        for context in [
            ValidationContext::Create,
            ValidationContext::PrepareAirgap,
            ValidationContext::DestroyPrepareAirgap,
            ValidationContext::Passthrough,
        ] {
            assert_eq!(context.as_str().parse::<ValidationContext>().unwrap(), context);
        }
        assert!("upgrade".parse::<ValidationContext>().is_err());
    }

    #[test]
    fn test_passthrough_applies_global_defaults_only() {
        let report = validate(&KoreonToml::default(), ValidationContext::Passthrough, &catalog()).unwrap();

        assert!(report.ok());
        assert_eq!(report.config.node_pool.ssh_port, DEFAULT_SSH_PORT);
        assert_eq!(report.config.koreon.image_archive, IMAGE_ARCHIVE);
        assert_eq!(report.config.koreon.helm_version, "3.10.3");
    }

    #[test]
    fn test_explicit_ssh_port_is_kept() {
        let mut raw = KoreonToml::default();
        raw.node_pool.ssh_port = 2222;

        let report = validate(&raw, ValidationContext::Passthrough, &catalog()).unwrap();

        assert_eq!(report.config.node_pool.ssh_port, 2222);
    }

    #[test]
    fn test_missing_helm_is_violation_only_when_installing() {
        let catalog = SupportCatalog::from_toml_str("[components]\nkubernetes = [\"1.24.9\"]\n").unwrap();
        let mut raw = KoreonToml::default();
        raw.prepare_airgap.registry_ip = "10.0.0.5".to_string();

        for context in [ValidationContext::Create, ValidationContext::PrepareAirgap] {
            let report = validate(&raw, context, &catalog).unwrap();
            assert!(
                report.violations.iter().any(|v| v.field == "koreon.helm-version"),
                "{}",
                context
            );
        }

        for context in [
            ValidationContext::DestroyPrepareAirgap,
            ValidationContext::Passthrough,
        ] {
            let report = validate(&raw, context, &catalog).unwrap();
            assert!(report.ok(), "{}: {:?}", context, report.violations);
            assert!(report.config.koreon.helm_version.is_empty());
        }
    }

    #[test]
    fn test_into_result_carries_all_violations() {
        let report = validate(&KoreonToml::default(), ValidationContext::Create, &catalog()).unwrap();
        let count = report.violations.len();
        assert!(count >= 2);

        match report.into_result() {
            Err(KoreonError::ValidationFailed(violations)) => assert_eq!(violations.len(), count),
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation {
            context: ValidationContext::Create,
            field: "koreon.install-dir".to_string(),
            message: "absolute path required".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "[create] koreon.install-dir > absolute path required"
        );
    }
}
