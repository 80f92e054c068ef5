// file: src/confirm.rs
// version: 1.0.0
// guid: 6f0d7b8e-0c1e-4f57-9a53-2d4f1c0a8e61

//! Operator confirmation before a provisioning run

use crate::config::{NodeGroup, NormalizedConfig};
use crate::plan::{DestroyTarget, PlanCommand};
use crate::Result;
use std::fmt::Write as _;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use tracing::debug;

/// Answer that lets a run proceed
pub const AFFIRMATIVE: &str = "y";

/// Prompt closing every summary
pub const PROMPT: &str = "Is this ok [y/n]: ";

const RULE: &str =
    "=================================================================================";

/// Writes a summary and reads one line of operator input
pub struct ConfirmationGate<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConfirmationGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show `summary` and report whether the answer equals `expected`
    ///
    /// Only the line terminator is stripped; the comparison is case sensitive.
    /// An empty line or end of input declines.
    pub fn confirm(&mut self, summary: &str, expected: &str) -> Result<bool> {
        self.output.write_all(summary.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("No operator input, declining");
            return Ok(false);
        }

        let answer = line.trim_end_matches(['\n', '\r']);
        let accepted = !answer.is_empty() && answer == expected;
        debug!("Operator answered '{}', accepted: {}", answer, accepted);
        Ok(accepted)
    }
}

impl ConfirmationGate<StdinLock<'static>, Stdout> {
    /// Gate reading the process stdin and writing to stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

/// Render the inventory shown before `command` runs, ending with [`PROMPT`]
pub fn render_summary(command: PlanCommand, config: &NormalizedConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Inventory for {} task.", command.name());
    let _ = writeln!(out, "{}", RULE);

    match command {
        PlanCommand::PrepareAirgap
        | PlanCommand::DownloadArchive
        | PlanCommand::Destroy(DestroyTarget::PrepareAirgap) => {
            let airgap = &config.prepare_airgap;
            row(&mut out, "Kubernetes Version", &airgap.k8s_version, "");
            row(&mut out, "Harbor Version", &airgap.registry_version, "");
            let _ = writeln!(out, "{}", RULE);
            header(&mut out);
            row(&mut out, "registry", &airgap.registry_ip, "");
        }
        _ => {
            row(&mut out, "Cluster Name", &config.koreon.cluster_name, "");
            row(&mut out, "Kubernetes Version", &config.kubernetes.version, "");
            row(&mut out, "Container Runtime", &config.kubernetes.container_runtime, "");
            row(&mut out, "Install Directory", &config.koreon.install_dir, "");
            row(
                &mut out,
                "Closed Network",
                if config.koreon.closed_network { "true" } else { "false" },
                "",
            );
            let _ = writeln!(out, "{}", RULE);
            header(&mut out);
            nodes(&mut out, "master", &config.node_pool.master);
            nodes(&mut out, "node", &config.node_pool.node);

            let etcd = &config.kubernetes.etcd;
            if etcd.external_etcd {
                for (i, ip) in etcd.ip.iter().enumerate() {
                    let private = etcd.private_ip.get(i).map(String::as_str).unwrap_or(ip);
                    row(&mut out, &format!("etcd-{}", i), ip, private);
                }
            }

            let registry = &config.private_registry;
            if registry.install {
                row(&mut out, "registry", &registry.registry_ip, &registry.private_ip);
            }

            let storage = &config.shared_storage;
            if storage.install {
                row(&mut out, "storage", &storage.storage_ip, &storage.private_ip);
            }
        }
    }

    let _ = writeln!(out, "{}", RULE);
    out.push_str(PROMPT);
    out
}

fn header(out: &mut String) {
    row(out, "Node Name", "IP", "Private IP");
    let _ = writeln!(out, "{}", RULE);
}

fn nodes(out: &mut String, prefix: &str, group: &NodeGroup) {
    for (i, ip) in group.ip.iter().enumerate() {
        let private = group.private_ip.get(i).map(String::as_str).unwrap_or(ip);
        row(out, &format!("{}-{}", prefix, i), ip, private);
    }
}

fn row(out: &mut String, name: &str, value: &str, extra: &str) {
    if extra.is_empty() {
        let _ = writeln!(out, "{:<24}{}", name, value);
    } else {
        let _ = writeln!(out, "{:<24}{:<28}{}", name, value, extra);
    }
}
