// file: src/validation/airgap.rs
// version: 1.0.0
// guid: ed6f8688-e864-40c4-9c20-935afa497f08

//! Rules for preparing and tearing down the air-gap host

use super::Pass;
use crate::catalog::{HARBOR, KUBERNETES};
use crate::config::KoreonToml;
use crate::Result;

pub(super) fn check_prepare(pass: &mut Pass<'_>, config: &mut KoreonToml) -> Result<()> {
    let airgap = &mut config.prepare_airgap;

    if airgap.registry_ip.is_empty() {
        pass.violation(
            "prepare-airgap.registry-ip",
            "Prepare Air Gap > registry-ip required",
        );
    }

    let k8s_version = pass.resolve_version(
        "prepare-airgap.k8s-version",
        KUBERNETES,
        &airgap.k8s_version,
        "Prepare Air Gap > Kubernetes",
    );
    if let Some(version) = &k8s_version {
        airgap.k8s_version = version.clone();
    }

    if let Some(version) = pass.resolve_version(
        "prepare-airgap.registry-version",
        HARBOR,
        &airgap.registry_version,
        "Prepare Air Gap > Harbor",
    ) {
        airgap.registry_version = version;
    }

    if let Some(version) = &k8s_version {
        pass.resolve_support_versions(version, &mut config.support_version)?;
    }

    Ok(())
}

pub(super) fn check_destroy(pass: &mut Pass<'_>, config: &KoreonToml) {
    if config.prepare_airgap.registry_ip.is_empty() {
        pass.violation(
            "prepare-airgap.registry-ip",
            "Destroy: Prepare Air Gap > registry-ip required",
        );
    }
}
