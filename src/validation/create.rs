// file: src/validation/create.rs
// version: 1.0.0
// guid: 2297c2fd-95ef-4834-823a-90b0715751c1

//! Rules for cluster creation

use super::Pass;
use crate::catalog::{HARBOR, KUBERNETES};
use crate::config::{Etcd, KoreOn, KoreonToml, NodePool, PrivateRegistry, SharedStorage};
use crate::Result;
use std::path::Path;
use tracing::debug;

/// Etcd cluster sizes accepted for an external etcd
const ETCD_CARDINALITIES: [usize; 3] = [1, 3, 5];

/// Token index of the Kubernetes version in a local repository archive name
const LOCAL_REPOSITORY_VERSION_TOKEN: usize = 2;

/// Token index of the Harbor version in a registry archive name
const REGISTRY_VERSION_TOKEN: usize = 1;

pub(super) fn check(pass: &mut Pass<'_>, config: &mut KoreonToml) -> Result<()> {
    check_install_dir(pass, &config.koreon);

    let k8s_version = pass.resolve_version(
        "kubernetes.version",
        KUBERNETES,
        &config.kubernetes.version,
        "kubernetes > Kubernetes",
    );
    if let Some(version) = &k8s_version {
        config.kubernetes.version = version.clone();
    }

    check_node_pool(pass, &config.node_pool);

    if config.kubernetes.etcd.external_etcd {
        check_etcd(pass, &config.kubernetes.etcd);
    }

    check_shared_storage(pass, &config.shared_storage);

    let registry_version = check_private_registry(pass, &mut config.private_registry);

    if config.koreon.closed_network {
        check_local_repository(pass, &mut config.koreon, k8s_version.as_deref());
        if config.private_registry.install {
            check_registry_archive(
                pass,
                &mut config.private_registry,
                registry_version.as_deref(),
            );
        }
    }

    if let Some(version) = &k8s_version {
        pass.resolve_support_versions(version, &mut config.support_version)?;
    }

    Ok(())
}

fn check_install_dir(pass: &mut Pass<'_>, koreon: &KoreOn) {
    if !koreon.install_dir.is_empty() && !koreon.install_dir.starts_with('/') {
        pass.violation(
            "koreon.install-dir",
            format!(
                "absolute path required, '{}' is relative",
                koreon.install_dir
            ),
        );
    }
}

fn check_node_pool(pass: &mut Pass<'_>, node_pool: &NodePool) {
    if node_pool.master.ip.is_empty() {
        pass.violation("node-pool.master.ip", "K8s control plane node is required");
    }
    if node_pool.node.ip.is_empty() {
        pass.violation("node-pool.node.ip", "K8s worker node is required");
    }
}

fn check_etcd(pass: &mut Pass<'_>, etcd: &Etcd) {
    let ip_count = etcd.ip.len();
    let private_ip_count = etcd.private_ip.len();
    debug!(
        "External etcd with {} ip(s) and {} private ip(s)",
        ip_count, private_ip_count
    );

    // A missing private-ip list is accepted; two populated lists must line up
    if ip_count > 0 && private_ip_count > 0 && ip_count != private_ip_count {
        pass.violation(
            "kubernetes.etcd.private-ip",
            format!(
                "etcd nodes need one private ip address per ip address ({} ip, {} private-ip)",
                ip_count, private_ip_count
            ),
        );
    }

    if !ETCD_CARDINALITIES.contains(&ip_count) {
        pass.violation(
            "kubernetes.etcd.ip",
            format!(
                "even or unsupported etcd cardinality: {} node(s), only 1, 3 or 5 are supported",
                ip_count
            ),
        );
    }
}

fn check_shared_storage(pass: &mut Pass<'_>, storage: &SharedStorage) {
    if storage.install && storage.storage_ip.is_empty() {
        pass.violation(
            "shared-storage.storage-ip",
            "storage-ip required when shared-storage install is enabled",
        );
    }
}

/// Returns the resolved registry version
fn check_private_registry(pass: &mut Pass<'_>, registry: &mut PrivateRegistry) -> Option<String> {
    if registry.install {
        if registry.registry_ip.is_empty() {
            pass.violation(
                "private-registry.registry-ip",
                "registry-ip required when private-registry install is enabled",
            );
        }
        if registry.registry_domain.is_empty() {
            registry.registry_domain = registry.registry_ip.clone();
        }
    }

    let version = pass.resolve_version(
        "private-registry.registry-version",
        HARBOR,
        &registry.registry_version,
        "Private Registry > Harbor",
    );
    if let Some(version) = &version {
        registry.registry_version = version.clone();
    }

    if registry.public_cert {
        if registry.cert_file.ssl_certificate.is_empty() {
            pass.violation(
                "private-registry.cert-file.ssl-certificate",
                "ssl-certificate required when public-cert is enabled",
            );
        }
        if registry.cert_file.ssl_certificate_key.is_empty() {
            pass.violation(
                "private-registry.cert-file.ssl-certificate-key",
                "ssl-certificate-key required when public-cert is enabled",
            );
        }
    }

    version
}

fn check_local_repository(pass: &mut Pass<'_>, koreon: &mut KoreOn, k8s_version: Option<&str>) {
    const ARCHIVE_FIELD: &str = "koreon.local-repository-archive-file";

    if koreon.local_repository_install {
        if !koreon.local_repository_url.is_empty() {
            pass.violation(
                "koreon.local-repository-url",
                "local-repository-url must be empty when local-repository-install is enabled",
            );
        }

        if koreon.local_repository_archive_file.is_empty() {
            pass.violation(
                ARCHIVE_FIELD,
                "archive-file required when installing a local repository",
            );
        } else {
            let file_name = base_name(&koreon.local_repository_archive_file);
            check_archive_version(
                pass,
                ARCHIVE_FIELD,
                &file_name,
                LOCAL_REPOSITORY_VERSION_TOKEN,
                k8s_version,
                "kubernetes",
            );
            koreon.local_repository_archive_file = file_name;
        }
    } else {
        if koreon.local_repository_url.is_empty() {
            pass.violation(
                "koreon.local-repository-url",
                "local-repository-url required when not installing a local repository",
            );
        }
        if !koreon.local_repository_archive_file.is_empty() {
            pass.violation(
                ARCHIVE_FIELD,
                "local-repository-archive-file must be empty when not installing a local repository",
            );
        }
    }
}

fn check_registry_archive(
    pass: &mut Pass<'_>,
    registry: &mut PrivateRegistry,
    registry_version: Option<&str>,
) {
    const ARCHIVE_FIELD: &str = "private-registry.registry-archive-file";

    if registry.registry_archive_file.is_empty() {
        pass.violation(
            ARCHIVE_FIELD,
            "registry archive-file required in closed network mode",
        );
        return;
    }

    let file_name = base_name(&registry.registry_archive_file);
    check_archive_version(
        pass,
        ARCHIVE_FIELD,
        &file_name,
        REGISTRY_VERSION_TOKEN,
        registry_version,
        "registry",
    );
    registry.registry_archive_file = file_name;
}

/// Compare the `-` separated token at `index` of `file_name` with `expected`
///
/// Skipped when the expected version did not resolve; that failure is already
/// reported.
fn check_archive_version(
    pass: &mut Pass<'_>,
    field: &str,
    file_name: &str,
    index: usize,
    expected: Option<&str>,
    what: &str,
) {
    let Some(token) = file_name.split('-').nth(index) else {
        pass.violation(
            field,
            format!(
                "archive file name '{}' has no {} version token",
                file_name, what
            ),
        );
        return;
    };

    if let Some(expected) = expected {
        if token != expected {
            pass.violation(
                field,
                format!(
                    "archive/version mismatch: '{}' carries {} version '{}' but '{}' is being installed",
                    file_name, what, token, expected
                ),
            );
        }
    }
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}
