// file: src/cli/args.rs
// version: 1.0.0
// guid: 4d8f1e2a-6b3c-47d9-a0e5-c2b19f7d3e84

//! Command line argument definitions

use crate::config::settings::{
    Settings, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_SUB_DIR, DEFAULT_IMAGE, DEFAULT_IMAGE_NAME,
};
use crate::plan::{CommandFlags, DestroyTarget, PlanCommand};
use crate::validation::ValidationContext;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "koreonctl")]
#[command(about = "Validate koreon cluster configurations and run the provisioning container")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON, filtered by RUST_LOG
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Provisioning document name inside the work directory
    #[arg(long, global = true, env = "KOREONCTL_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Support catalog replacing the built-in one
    #[arg(long, global = true, env = "KOREONCTL_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Directory holding the provisioning document
    #[arg(long, global = true, default_value = ".")]
    pub work_dir: PathBuf,

    /// Provisioning container image
    #[arg(long, global = true, env = "KOREONCTL_IMAGE", default_value = DEFAULT_IMAGE)]
    pub image: String,
}

impl Cli {
    /// Tool settings derived from the global arguments
    pub fn settings(&self) -> Settings {
        Settings {
            image: self.image.clone(),
            image_name: DEFAULT_IMAGE_NAME.to_string(),
            config_file: self.config.clone(),
            config_sub_dir: DEFAULT_CONFIG_SUB_DIR.to_string(),
            work_dir: self.work_dir.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a Kubernetes cluster
    Create(RunArgs),

    /// Prepare the air-gap registry host
    PrepareAirgap {
        #[command(subcommand)]
        action: Option<AirgapAction>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Reset cluster, registry, storage or air-gap host
    Destroy {
        #[command(subcommand)]
        target: Option<DestroyArg>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Validate the provisioning document without running anything
    Validate {
        #[arg(long, value_enum, default_value = "create")]
        context: ContextArg,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the execution plan of a provisioning command
    Plan {
        #[command(subcommand)]
        command: PlanArg,
    },
}

/// Flags shared by every provisioning command
#[derive(Args, Clone, Debug, Default)]
pub struct RunArgs {
    /// Pass --dry-run to the provisioning run
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// SSH private key used to reach the nodes, relative to the current directory
    #[arg(short = 'p', long, global = true)]
    pub private_key: Option<String>,

    /// SSH login user
    #[arg(short, long, global = true)]
    pub user: Option<String>,
}

impl RunArgs {
    /// Flags for the plan builder, with `~` expanded in the key path
    pub fn flags(&self, verbose: bool) -> CommandFlags {
        CommandFlags {
            dry_run: self.dry_run,
            verbose,
            private_key: self
                .private_key
                .as_deref()
                .map(|key| PathBuf::from(shellexpand::tilde(key).into_owned())),
            user: self.user.clone(),
        }
    }
}

#[derive(Subcommand, Clone, Copy, Debug)]
pub enum AirgapAction {
    /// Download the archive produced by prepare-airgap
    DownloadArchive,
}

#[derive(Subcommand, Clone, Copy, Debug)]
pub enum DestroyArg {
    /// Reset the Kubernetes cluster only
    Cluster,
    /// Reset the private registry only
    Registry,
    /// Reset the shared storage only
    Storage,
    /// Reset the air-gap registry host
    PrepareAirgap,
}

impl From<Option<DestroyArg>> for DestroyTarget {
    fn from(arg: Option<DestroyArg>) -> Self {
        match arg {
            None => DestroyTarget::All,
            Some(DestroyArg::Cluster) => DestroyTarget::Cluster,
            Some(DestroyArg::Registry) => DestroyTarget::Registry,
            Some(DestroyArg::Storage) => DestroyTarget::Storage,
            Some(DestroyArg::PrepareAirgap) => DestroyTarget::PrepareAirgap,
        }
    }
}

/// Provisioning commands accepted by `plan`
#[derive(Subcommand, Clone, Debug)]
pub enum PlanArg {
    Create(RunArgs),
    PrepareAirgap {
        #[command(subcommand)]
        action: Option<AirgapAction>,

        #[command(flatten)]
        run: RunArgs,
    },
    Destroy {
        #[command(subcommand)]
        target: Option<DestroyArg>,

        #[command(flatten)]
        run: RunArgs,
    },
}

impl PlanArg {
    pub fn command(&self) -> PlanCommand {
        match self {
            PlanArg::Create(_) => PlanCommand::Create,
            PlanArg::PrepareAirgap { action, .. } => airgap_command(*action),
            PlanArg::Destroy { target, .. } => PlanCommand::Destroy((*target).into()),
        }
    }

    pub fn run_args(&self) -> &RunArgs {
        match self {
            PlanArg::Create(run)
            | PlanArg::PrepareAirgap { run, .. }
            | PlanArg::Destroy { run, .. } => run,
        }
    }
}

pub fn airgap_command(action: Option<AirgapAction>) -> PlanCommand {
    match action {
        None => PlanCommand::PrepareAirgap,
        Some(AirgapAction::DownloadArchive) => PlanCommand::DownloadArchive,
    }
}

/// Validation context argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ContextArg {
    Create,
    PrepareAirgap,
    DestroyPrepareAirgap,
}

impl From<ContextArg> for ValidationContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::Create => ValidationContext::Create,
            ContextArg::PrepareAirgap => ValidationContext::PrepareAirgap,
            ContextArg::DestroyPrepareAirgap => ValidationContext::DestroyPrepareAirgap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_destroy_without_target_resets_all() {
        let cli = Cli::try_parse_from(["koreonctl", "destroy", "-p", "id_rsa", "-u", "root"]).unwrap();

        match cli.command {
            Commands::Destroy { target, run } => {
                assert_eq!(DestroyTarget::from(target), DestroyTarget::All);
                assert_eq!(run.user.as_deref(), Some("root"));
            }
            _ => panic!("expected destroy"),
        }
    }

    #[test]
    fn test_destroy_flags_after_target() {
        let cli = Cli::try_parse_from([
            "koreonctl", "destroy", "cluster", "--dry-run", "-p", "id_rsa", "-u", "root",
        ])
        .unwrap();

        match cli.command {
            Commands::Destroy { target, run } => {
                assert_eq!(DestroyTarget::from(target), DestroyTarget::Cluster);
                assert!(run.dry_run);
                assert_eq!(run.private_key.as_deref(), Some("id_rsa"));
            }
            _ => panic!("expected destroy"),
        }
    }

    #[test]
    fn test_plan_download_archive() {
        let cli = Cli::try_parse_from(["koreonctl", "plan", "prepare-airgap", "download-archive"]).unwrap();

        match cli.command {
            Commands::Plan { command } => assert_eq!(command.command(), PlanCommand::DownloadArchive),
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_private_key_tilde_is_expanded() {
        let run = RunArgs {
            private_key: Some("~/.ssh/id_rsa".to_string()),
            ..Default::default()
        };

        let flags = run.flags(false);

        let key = flags.private_key.unwrap();
        assert!(!key.to_string_lossy().starts_with('~'));
        assert!(key.ends_with(".ssh/id_rsa"));
    }

    #[test]
    fn test_settings_follow_global_flags() {
        let cli = Cli::try_parse_from([
            "koreonctl", "--work-dir", "/srv/demo", "--config", "demo.toml", "validate",
        ])
        .unwrap();

        let settings = cli.settings();

        assert_eq!(settings.config_path(), PathBuf::from("/srv/demo/demo.toml"));
        assert_eq!(settings.image_name, DEFAULT_IMAGE_NAME);
    }
}
