// file: src/plan/mod.rs
// version: 1.0.0
// guid: 2c595303-e455-45b5-81a2-7ec645250cf9

//! Execution plan construction
//!
//! Turns a normalized provisioning document and the command line flags into the
//! exact `docker run` invocation of the provisioning container. Building is
//! deterministic: the same inputs from the same working directory always produce
//! the same tokens.

use crate::config::{NormalizedConfig, Settings};
use crate::error::KoreonError;
use crate::validation::ValidationContext;
use crate::Result;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory inside the container where the private key is mounted
const KEY_MOUNT_DIR: &str = "/home";

/// What a destroy run removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DestroyTarget {
    All,
    Cluster,
    Registry,
    Storage,
    PrepareAirgap,
}

impl DestroyTarget {
    /// Reset command name understood by the playbooks
    pub fn command(&self) -> &'static str {
        match self {
            DestroyTarget::All => "reset-all",
            DestroyTarget::Cluster => "reset-cluster",
            DestroyTarget::Registry => "reset-registry",
            DestroyTarget::Storage => "reset-storage",
            DestroyTarget::PrepareAirgap => "reset-prepare-airgap",
        }
    }

    /// Tag scoping the run; a full reset runs untagged
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            DestroyTarget::All => None,
            other => Some(other.command()),
        }
    }
}

/// Provisioning command carried out by the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanCommand {
    Create,
    PrepareAirgap,
    DownloadArchive,
    Destroy(DestroyTarget),
}

impl PlanCommand {
    /// Human readable name used in summaries and logs
    pub fn name(&self) -> &'static str {
        match self {
            PlanCommand::Create => "create",
            PlanCommand::PrepareAirgap => "prepare-airgap",
            PlanCommand::DownloadArchive => "download-archive",
            PlanCommand::Destroy(target) => target.command(),
        }
    }

    /// Rule set the document must satisfy before this command runs
    pub fn validation_context(&self) -> ValidationContext {
        match self {
            PlanCommand::Create => ValidationContext::Create,
            PlanCommand::PrepareAirgap | PlanCommand::DownloadArchive => {
                ValidationContext::PrepareAirgap
            }
            PlanCommand::Destroy(DestroyTarget::PrepareAirgap) => {
                ValidationContext::DestroyPrepareAirgap
            }
            PlanCommand::Destroy(_) => ValidationContext::Passthrough,
        }
    }

    fn subcommand(&self) -> &'static [&'static str] {
        match self {
            PlanCommand::Create => &["create"],
            PlanCommand::PrepareAirgap => &["prepare-airgap"],
            PlanCommand::DownloadArchive => &["prepare-airgap", "download-archive"],
            PlanCommand::Destroy(_) => &["destroy"],
        }
    }

    fn tag(&self) -> Option<&'static str> {
        match self {
            PlanCommand::Destroy(target) => target.tag(),
            _ => None,
        }
    }

    fn names_container(&self) -> bool {
        matches!(self, PlanCommand::PrepareAirgap | PlanCommand::DownloadArchive)
    }

    /// Whether the image is pulled before running
    fn pulls_image(&self, config: &NormalizedConfig) -> bool {
        match self {
            // The air-gap host is torn down from the connected side
            PlanCommand::Destroy(DestroyTarget::PrepareAirgap) => true,
            _ => !config.koreon.closed_network,
        }
    }
}

/// Flags given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFlags {
    pub dry_run: bool,
    pub verbose: bool,
    pub private_key: Option<PathBuf>,
    pub user: Option<String>,
}

/// Ordered token sequence of the executor invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExecutionPlan {
    tokens: Vec<String>,
}

impl ExecutionPlan {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Program to run
    pub fn program(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments after the program
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }
}

impl fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Builds execution plans for one set of tool settings
pub struct PlanBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Assemble the invocation for `command`
    ///
    /// Fails before producing any token when the private key or the SSH user is
    /// missing.
    pub fn build(
        &self,
        command: PlanCommand,
        config: &NormalizedConfig,
        flags: &CommandFlags,
    ) -> Result<ExecutionPlan> {
        let (key_path, user) = required_credentials(flags)?;
        let key_source = absolute(key_path)?;
        let key_name = key_source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                KoreonError::missing_credential(format!(
                    "privateKey file name (got '{}')",
                    key_path.display()
                ))
            })?;
        let key_target = format!("{}/{}", KEY_MOUNT_DIR, key_name);

        let mut tokens: Vec<String> = vec!["docker".into(), "run".into()];
        if command.names_container() {
            tokens.extend(["--name".into(), self.settings.image_name.clone()]);
        }
        tokens.extend(["--rm", "--privileged", "-it"].map(String::from));

        if command.pulls_image(config) {
            tokens.extend(["--pull", "always"].map(String::from));
        }

        tokens.extend([
            "-v".into(),
            format!(
                "{}:/{}",
                self.settings.work_dir.display(),
                self.settings.config_sub_dir
            ),
        ]);

        tokens.extend([
            "--mount".into(),
            format!(
                "type=bind,source={},target={},readonly",
                key_source.display(),
                key_target
            ),
        ]);

        tokens.push(self.settings.image.clone());
        tokens.push(format!("./{}", self.settings.image_name));
        tokens.extend(command.subcommand().iter().map(|s| s.to_string()));

        if let Some(tag) = command.tag() {
            tokens.extend(["--tags".into(), tag.to_string()]);
        }

        if flags.verbose {
            tokens.push("--verbose".into());
        }
        if flags.dry_run {
            tokens.push("--dry-run".into());
        }

        tokens.extend(["--private-key".into(), key_target]);
        tokens.extend(["--user".into(), user.to_string()]);

        debug!("Built {} token plan for {}", tokens.len(), command.name());
        Ok(ExecutionPlan { tokens })
    }
}

/// Resolve a key path the way the shell that invoked us would
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn required_credentials(flags: &CommandFlags) -> Result<(&Path, &str)> {
    let key = flags
        .private_key
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or_else(|| KoreonError::missing_credential("privateKey"))?;
    let user = flags
        .user
        .as_deref()
        .filter(|user| !user.is_empty())
        .ok_or_else(|| KoreonError::missing_credential("ssh login user"))?;
    Ok((key, user))
}
