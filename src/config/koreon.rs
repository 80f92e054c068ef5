// file: src/config/koreon.rs
// version: 1.0.0
// guid: a2cc5867-92e1-4c0a-b746-f664d9cf285c

//! Cluster provisioning document (`koreon.toml`) structures
//!
//! Every field is optional at this level. Which fields are mandatory depends on
//! the command the document is validated for, see [`crate::validation`].

use serde::{Deserialize, Serialize};

/// Root of the `koreon.toml` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KoreonToml {
    /// General installer options
    pub koreon: KoreOn,
    /// Kubernetes cluster options
    pub kubernetes: Kubernetes,
    /// Control plane and worker node inventory
    pub node_pool: NodePool,
    /// NFS shared storage
    pub shared_storage: SharedStorage,
    /// Harbor private registry
    pub private_registry: PrivateRegistry,
    /// Air-gap preparation host
    pub prepare_airgap: PrepareAirgap,
    /// Versions derived from the support catalog; never read from user input
    pub support_version: SupportVersion,
}

/// `[koreon]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KoreOn {
    pub cluster_name: String,
    /// Installation directory on the nodes; absolute paths only
    pub install_dir: String,
    pub cert_validity_days: u32,
    pub debug_mode: bool,
    /// Install without internet access, from a local repository and registry
    pub closed_network: bool,
    pub local_repository_install: bool,
    pub local_repository_url: String,
    pub local_repository_archive_file: String,
    /// Filled in by the validator
    pub image_archive: String,
    /// Filled in by the validator
    pub helm_version: String,
}

/// `[kubernetes]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Kubernetes {
    /// Requested version; empty or "latest" selects the newest supported one
    pub version: String,
    pub container_runtime: String,
    pub kube_proxy_mode: String,
    pub service_cidr: String,
    pub pod_cidr: String,
    pub node_port_range: String,
    pub audit_log_enable: bool,
    pub api_sans: Vec<String>,
    pub etcd: Etcd,
}

/// `[kubernetes.etcd]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Etcd {
    pub external_etcd: bool,
    pub ip: Vec<String>,
    pub private_ip: Vec<String>,
    pub encrypt_secret: bool,
}

/// `[node-pool]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NodePool {
    pub data_dir: String,
    /// SSH port of every node; 0 means unset and becomes 22
    pub ssh_port: u16,
    pub master: NodeGroup,
    pub node: NodeGroup,
}

/// `[node-pool.master]` and `[node-pool.node]` sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NodeGroup {
    pub ip: Vec<String>,
    pub private_ip: Vec<String>,
    pub lb_ip: String,
    pub haproxy_install: bool,
}

/// `[shared-storage]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SharedStorage {
    pub install: bool,
    pub storage_ip: String,
    pub private_ip: String,
    pub volume_dir: String,
    pub nfs_version: String,
}

/// `[private-registry]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PrivateRegistry {
    pub install: bool,
    pub registry_ip: String,
    pub private_ip: String,
    /// Defaults to `registry_ip` when unset
    pub registry_domain: String,
    /// Harbor version; empty selects the newest supported one
    pub registry_version: String,
    pub registry_archive_file: String,
    pub data_dir: String,
    pub public_cert: bool,
    pub cert_file: CertFile,
}

/// `[private-registry.cert-file]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CertFile {
    pub ssl_certificate: String,
    pub ssl_certificate_key: String,
}

/// `[prepare-airgap]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PrepareAirgap {
    pub k8s_version: String,
    pub registry_ip: String,
    pub registry_version: String,
}

/// Container image and OS package versions matching the resolved Kubernetes version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SupportVersion {
    pub image_version: ImageVersion,
    pub package_version: PackageVersion,
}

/// Container image versions bound from the `k8s_support_image` catalog set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImageVersion {
    pub calico: String,
    pub coredns: String,
    pub etcd: String,
    pub pause: String,
    pub metrics_server: String,
}

/// OS package versions bound from the `k8s_support_package` catalog set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PackageVersion {
    pub containerd: String,
    pub crictl: String,
    pub docker: String,
    pub docker_compose: String,
    pub haproxy: String,
}

impl KoreonToml {
    /// Parse a document from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = KoreonToml::from_toml_str("").unwrap();
        assert_eq!(config, KoreonToml::default());
        assert_eq!(config.node_pool.ssh_port, 0);
    }

    #[test]
    fn test_kebab_case_sections() {
        let config = KoreonToml::from_toml_str(
            r#"
[koreon]
install-dir = "/opt/koreon"
closed-network = true
local-repository-install = true

[kubernetes]
version = "1.24.9"

[kubernetes.etcd]
external-etcd = true
ip = ["10.0.0.11", "10.0.0.12", "10.0.0.13"]

[node-pool]
ssh-port = 2222

[node-pool.master]
ip = ["10.0.0.1"]

[private-registry]
install = true
registry-ip = "10.0.0.5"

[private-registry.cert-file]
ssl-certificate = "/certs/harbor.crt"
"#,
        )
        .unwrap();

        assert_eq!(config.koreon.install_dir, "/opt/koreon");
        assert!(config.koreon.closed_network);
        assert!(config.koreon.local_repository_install);
        assert_eq!(config.kubernetes.version, "1.24.9");
        assert_eq!(config.kubernetes.etcd.ip.len(), 3);
        assert_eq!(config.node_pool.ssh_port, 2222);
        assert_eq!(config.node_pool.master.ip, vec!["10.0.0.1".to_string()]);
        assert_eq!(config.private_registry.registry_ip, "10.0.0.5");
        assert_eq!(config.private_registry.cert_file.ssl_certificate, "/certs/harbor.crt");
    }

    #[test]
    fn test_type_mismatch_is_parse_error() {
        let result = KoreonToml::from_toml_str("[node-pool]\nssh-port = \"twenty-two\"\n");
        assert!(matches!(result, Err(crate::error::KoreonError::ConfigParse(_))));
    }
}
