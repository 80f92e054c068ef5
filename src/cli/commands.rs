// file: src/cli/commands.rs
// version: 1.0.0
// guid: 7c2e9f41-a3b5-4d06-8e1f-5b9a2c7d4e13

//! Command implementations for the CLI
//!
//! Every command returns the process exit code on success.

use crate::{
    catalog::SupportCatalog,
    cli::args::RunArgs,
    config::{ConfigLoader, NormalizedConfig, Settings},
    confirm::{render_summary, ConfirmationGate, AFFIRMATIVE},
    error::KoreonError,
    executor::DockerExecutor,
    logging::logger::{with_async_operation_span, with_operation_span},
    plan::{PlanBuilder, PlanCommand},
    validation::{validate, ValidationContext, ValidationReport, Violation},
    Result,
};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

/// Printed when the operator declines the run
pub const NOTHING_TO_CHANGE: &str = "nothing to change";

/// Validate, confirm and run one provisioning command
pub async fn provision_command(
    settings: Settings,
    command: PlanCommand,
    run: &RunArgs,
    verbose: bool,
) -> Result<i32> {
    let settings = absolute_work_dir(settings)?;
    let config = validated(&settings, command.validation_context())?;

    let summary = render_summary(command, &config);
    let accepted = tokio::task::spawn_blocking(move || {
        ConfirmationGate::stdio().confirm(&summary, AFFIRMATIVE)
    })
    .await
    .map_err(|e| KoreonError::execution(format!("Confirmation prompt failed: {}", e)))??;

    if !accepted {
        println!("{}", NOTHING_TO_CHANGE);
        return Ok(0);
    }

    let plan = PlanBuilder::new(&settings).build(command, &config, &run.flags(verbose))?;
    let executor = DockerExecutor::locate(&plan)?;

    with_async_operation_span(command.name(), || executor.run(&plan)).await
}

/// Print the invocation a provisioning command would run
pub async fn plan_command(
    settings: Settings,
    command: PlanCommand,
    run: &RunArgs,
    verbose: bool,
) -> Result<i32> {
    let settings = absolute_work_dir(settings)?;
    let config = validated(&settings, command.validation_context())?;

    let plan = PlanBuilder::new(&settings).build(command, &config, &run.flags(verbose))?;
    println!("{}", plan);
    Ok(0)
}

/// Run one validation pass and print the report
pub async fn validate_command(
    settings: Settings,
    context: ValidationContext,
    json_output: bool,
) -> Result<i32> {
    let report = run_validation(&settings, context)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(if report.ok() { 0 } else { 1 })
}

/// Print an error the way the command layer reports it
pub fn report_error(error: &KoreonError) {
    match error {
        KoreonError::ValidationFailed(violations) => {
            print_violations(violations);
            eprintln!("{}", error.to_string().red().bold());
        }
        other => eprintln!("{} {}", "Error:".red().bold(), other),
    }
}

fn validated(settings: &Settings, context: ValidationContext) -> Result<NormalizedConfig> {
    run_validation(settings, context)?.into_result()
}

fn run_validation(settings: &Settings, context: ValidationContext) -> Result<ValidationReport> {
    let raw = ConfigLoader::new().load_koreon_config(settings.config_path())?;
    let catalog = load_catalog(settings)?;
    with_operation_span("validate", || validate(&raw, context, &catalog))
}

fn load_catalog(settings: &Settings) -> Result<SupportCatalog> {
    match &settings.catalog {
        Some(path) => {
            info!("Loading support catalog from {}", path.display());
            SupportCatalog::load(path)
        }
        None => SupportCatalog::builtin(),
    }
}

fn absolute_work_dir(mut settings: Settings) -> Result<Settings> {
    if settings.work_dir.is_relative() {
        let cwd: PathBuf = std::env::current_dir()?;
        settings.work_dir = if settings.work_dir.as_os_str() == "." {
            cwd
        } else {
            cwd.join(&settings.work_dir)
        };
    }
    Ok(settings)
}

fn print_report(report: &ValidationReport) {
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    if report.ok() {
        println!(
            "{} configuration is valid for {}",
            "ok:".green().bold(),
            report.context
        );
    } else {
        print_violations(&report.violations);
    }
}

fn print_violations(violations: &[Violation]) {
    for violation in violations {
        eprintln!("{} {}", "error:".red().bold(), violation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID_CREATE: &str = r#"
[koreon]
cluster-name = "demo"
install-dir = "/var/lib/koreon"

[kubernetes]
version = "1.24.9"

[node-pool.master]
ip = ["10.0.0.1"]

[node-pool.node]
ip = ["10.0.0.2"]

[private-registry]
registry-version = "2.7.0"
"#;

    fn settings_for(dir: &TempDir, content: &str) -> Settings {
        std::fs::write(dir.path().join("koreon.toml"), content).unwrap();
        Settings {
            work_dir: dir.path().to_path_buf(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_validate_command_exit_codes() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let settings = settings_for(&dir, VALID_CREATE);

        // Act
        let ok = validate_command(settings.clone(), ValidationContext::Create, true)
            .await
            .unwrap();
        let failed = validate_command(settings, ValidationContext::PrepareAirgap, false)
            .await
            .unwrap();

        // Assert
        assert_eq!(ok, 0);
        assert_eq!(failed, 1);
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            work_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };

        let err = validate_command(settings, ValidationContext::Create, false)
            .await
            .unwrap_err();

        assert!(matches!(err, KoreonError::ConfigNotFound(_)));
    }

    #[tokio::test]
    async fn test_plan_command_requires_credentials() {
        let dir = TempDir::new().unwrap();
        let settings = settings_for(&dir, VALID_CREATE);

        let err = plan_command(settings, PlanCommand::Create, &RunArgs::default(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, KoreonError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_plan_command_stops_on_violations() {
        let dir = TempDir::new().unwrap();
        let settings = settings_for(&dir, "[koreon]\ninstall-dir = \"relative\"\n");
        let run = RunArgs {
            private_key: Some("id_rsa".to_string()),
            user: Some("root".to_string()),
            ..Default::default()
        };

        let err = plan_command(settings, PlanCommand::Create, &run, false)
            .await
            .unwrap_err();

        match err {
            KoreonError::ValidationFailed(violations) => {
                assert!(violations.iter().any(|v| v.field == "koreon.install-dir"));
            }
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_absolute_work_dir() {
        let settings = absolute_work_dir(Settings::default()).unwrap();
        assert!(settings.work_dir.is_absolute());

        let fixed = Settings {
            work_dir: PathBuf::from("/srv/demo"),
            ..Settings::default()
        };
        assert_eq!(absolute_work_dir(fixed).unwrap().work_dir, PathBuf::from("/srv/demo"));
    }
}
