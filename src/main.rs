// file: src/main.rs
// version: 1.0.0
// guid: 5d9e1f3a-7b2c-4e68-9a04-c1b8d6e2f7a9

//! koreonctl - main entry point

use anyhow::Context;
use clap::Parser;
use koreonctl::cli::{
    args::{airgap_command, Cli, Commands},
    commands::{plan_command, provision_command, report_error, validate_command},
};
use koreonctl::logging::{init_json_logger, init_logger};
use koreonctl::plan::PlanCommand;
use tokio::signal;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        init_json_logger()
    } else {
        init_logger(cli.verbose, cli.quiet)
    }
    .context("Failed to initialize logging")?;

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Unable to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let settings = cli.settings();
    let verbose = cli.verbose;

    let command_future = async {
        match &cli.command {
            Commands::Create(run) => {
                provision_command(settings, PlanCommand::Create, run, verbose).await
            }
            Commands::PrepareAirgap { action, run } => {
                provision_command(settings, airgap_command(*action), run, verbose).await
            }
            Commands::Destroy { target, run } => {
                provision_command(settings, PlanCommand::Destroy((*target).into()), run, verbose)
                    .await
            }
            Commands::Validate { context, json } => {
                validate_command(settings, (*context).into(), *json).await
            }
            Commands::Plan { command } => {
                plan_command(settings, command.command(), command.run_args(), verbose).await
            }
        }
    };

    let code = tokio::select! {
        result = command_future => match result {
            Ok(code) => code,
            Err(e) => {
                report_error(&e);
                1
            }
        },
        _ = shutdown_signal => {
            warn!("Interrupted by user");
            130 // Standard exit code for Ctrl+C
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
