// file: src/catalog/binder.rs
// version: 1.0.0
// guid: be1b41a7-a465-44ea-9eb4-c333b4e5bca1

//! Field binding from catalog sets onto version records
//!
//! Each bindable record declares a static table. Every entry names a field, a
//! correspondence of the form `"<catalog key>,<support component>"` and the
//! accessors used to write and read the field.

use super::{SupportCatalog, SupportSet};
use crate::config::{ImageVersion, PackageVersion};
use crate::error::KoreonError;
use crate::Result;
use std::collections::BTreeMap;
use tracing::debug;

/// One declared field of a bindable record
pub struct FieldBinding<T> {
    pub field: &'static str,
    pub correspondence: &'static str,
    pub assign: fn(&mut T, String),
    pub read: fn(&T) -> &str,
}

/// A record whose fields are filled exclusively from a catalog set
pub trait Bindable: Sized + 'static {
    /// Catalog set the record is bound from
    const SET: SupportSet;

    /// Declared field table
    fn bindings() -> &'static [FieldBinding<Self>];
}

/// A field that could not be bound to a supported version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindIssue {
    pub field: &'static str,
    pub message: String,
}

/// Bind every declared field of `target` from `entries`
///
/// A malformed correspondence is a schema defect and fails the whole bind. A
/// catalog key missing from `entries` leaves the field empty. A value the
/// catalog does not support for the declared component is reported as an issue
/// and also leaves the field empty.
pub fn bind<T: Bindable>(
    target: &mut T,
    entries: &BTreeMap<String, String>,
    catalog: &SupportCatalog,
) -> Result<Vec<BindIssue>> {
    let parsed = T::bindings()
        .iter()
        .map(|binding| parse_correspondence(binding).map(|parts| (binding, parts)))
        .collect::<Result<Vec<_>>>()?;

    let mut issues = Vec::new();
    for (binding, (key, component)) in parsed {
        let value = match entries.get(key).filter(|v| !v.is_empty()) {
            Some(requested) => match catalog.resolve(component, requested) {
                Ok(resolved) => resolved,
                Err(e) => {
                    issues.push(BindIssue {
                        field: binding.field,
                        message: e.to_string(),
                    });
                    String::new()
                }
            },
            None => {
                debug!("{} has no '{}' entry", T::SET.as_str(), key);
                String::new()
            }
        };
        (binding.assign)(target, value);
    }

    Ok(issues)
}

/// Fields of `target` that are still empty
pub fn unbound_fields<T: Bindable>(target: &T) -> Vec<&'static str> {
    T::bindings()
        .iter()
        .filter(|binding| (binding.read)(target).is_empty())
        .map(|binding| binding.field)
        .collect()
}

fn parse_correspondence<T>(binding: &FieldBinding<T>) -> Result<(&'static str, &'static str)> {
    let parts: Vec<&'static str> = binding.correspondence.split(',').collect();
    match parts.as_slice() {
        [key, component] if !key.is_empty() && !component.is_empty() => Ok((*key, *component)),
        _ => Err(KoreonError::binder_schema(format!(
            "tag entry error in {} field",
            binding.field
        ))),
    }
}

static IMAGE_BINDINGS: &[FieldBinding<ImageVersion>] = &[
    FieldBinding {
        field: "calico",
        correspondence: "calico,calico",
        assign: |t, v| t.calico = v,
        read: |t| t.calico.as_str(),
    },
    FieldBinding {
        field: "coredns",
        correspondence: "coredns,coredns",
        assign: |t, v| t.coredns = v,
        read: |t| t.coredns.as_str(),
    },
    FieldBinding {
        field: "etcd",
        correspondence: "etcd,etcd",
        assign: |t, v| t.etcd = v,
        read: |t| t.etcd.as_str(),
    },
    FieldBinding {
        field: "pause",
        correspondence: "pause,pause",
        assign: |t, v| t.pause = v,
        read: |t| t.pause.as_str(),
    },
    FieldBinding {
        field: "metrics-server",
        correspondence: "metrics-server,metrics-server",
        assign: |t, v| t.metrics_server = v,
        read: |t| t.metrics_server.as_str(),
    },
];

static PACKAGE_BINDINGS: &[FieldBinding<PackageVersion>] = &[
    FieldBinding {
        field: "containerd",
        correspondence: "containerd,containerd",
        assign: |t, v| t.containerd = v,
        read: |t| t.containerd.as_str(),
    },
    FieldBinding {
        field: "crictl",
        correspondence: "crictl,crictl",
        assign: |t, v| t.crictl = v,
        read: |t| t.crictl.as_str(),
    },
    FieldBinding {
        field: "docker",
        correspondence: "docker,docker",
        assign: |t, v| t.docker = v,
        read: |t| t.docker.as_str(),
    },
    FieldBinding {
        field: "docker-compose",
        correspondence: "docker-compose,docker-compose",
        assign: |t, v| t.docker_compose = v,
        read: |t| t.docker_compose.as_str(),
    },
    FieldBinding {
        field: "haproxy",
        correspondence: "haproxy,haproxy",
        assign: |t, v| t.haproxy = v,
        read: |t| t.haproxy.as_str(),
    },
];

impl Bindable for ImageVersion {
    const SET: SupportSet = SupportSet::Image;

    fn bindings() -> &'static [FieldBinding<Self>] {
        IMAGE_BINDINGS
    }
}

impl Bindable for PackageVersion {
    const SET: SupportSet = SupportSet::Package;

    fn bindings() -> &'static [FieldBinding<Self>] {
        PACKAGE_BINDINGS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Broken {
        value: String,
    }

    static BROKEN_BINDINGS: &[FieldBinding<Broken>] = &[FieldBinding {
        field: "value",
        correspondence: "value",
        assign: |t, v| t.value = v,
        read: |t| t.value.as_str(),
    }];

    impl Bindable for Broken {
        const SET: SupportSet = SupportSet::Image;

        fn bindings() -> &'static [FieldBinding<Self>] {
            BROKEN_BINDINGS
        }
    }

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bind_image_versions() {
        let catalog = SupportCatalog::builtin().unwrap();
        let set = catalog.list_for("1.25.5", SupportSet::Image).unwrap();
        let mut images = ImageVersion::default();

        let issues = bind(&mut images, set, &catalog).unwrap();

        assert!(issues.is_empty());
        assert_eq!(images.calico, "3.24.5");
        assert_eq!(images.pause, "3.8");
        assert_eq!(images.metrics_server, "0.6.2");
        assert!(unbound_fields(&images).is_empty());
    }

    #[test]
    fn test_missing_key_binds_empty() {
        let catalog = SupportCatalog::builtin().unwrap();
        let mut packages = PackageVersion {
            docker: "stale".to_string(),
            ..Default::default()
        };

        let issues = bind(&mut packages, &entries(&[("containerd", "1.6.14")]), &catalog).unwrap();

        assert!(issues.is_empty());
        assert_eq!(packages.containerd, "1.6.14");
        assert_eq!(packages.docker, "");
        assert_eq!(
            unbound_fields(&packages),
            vec!["crictl", "docker", "docker-compose", "haproxy"]
        );
    }

    #[test]
    fn test_unsupported_value_is_issue() {
        let catalog = SupportCatalog::builtin().unwrap();
        let mut images = ImageVersion::default();

        let issues = bind(&mut images, &entries(&[("calico", "9.9.9")]), &catalog).unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "calico");
        assert!(issues[0].message.contains("9.9.9"));
        assert_eq!(images.calico, "");
    }

    #[test]
    fn test_malformed_correspondence_is_schema_error() {
        let catalog = SupportCatalog::builtin().unwrap();
        let mut broken = Broken::default();

        let err = bind(&mut broken, &entries(&[("value", "1")]), &catalog).unwrap_err();

        assert!(matches!(err, KoreonError::BinderSchema(_)));
        assert!(err.is_structural());
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn test_declared_tables_are_well_formed() {
        for binding in ImageVersion::bindings() {
            assert!(parse_correspondence(binding).is_ok(), "{}", binding.field);
        }
        for binding in PackageVersion::bindings() {
            assert!(parse_correspondence(binding).is_ok(), "{}", binding.field);
        }
    }
}
