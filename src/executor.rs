// file: src/executor.rs
// version: 1.0.0
// guid: 0b7d3a51-5f8e-4c8a-b1c2-93e5d7a4f260

//! Runs an execution plan against the local container runtime

use crate::error::KoreonError;
use crate::plan::ExecutionPlan;
use crate::Result;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Hands plans to the container runtime found on `PATH`
#[derive(Debug, Clone)]
pub struct DockerExecutor {
    program: PathBuf,
}

impl DockerExecutor {
    /// Locate the program named by `plan` on `PATH`
    pub fn locate(plan: &ExecutionPlan) -> Result<Self> {
        let program = which::which(plan.program()).map_err(|e| {
            KoreonError::execution(format!("{} not found on PATH: {}", plan.program(), e))
        })?;
        debug!("Using container runtime at {}", program.display());
        Ok(Self { program })
    }

    /// Executor bound to an explicit program
    pub fn with_program<P: AsRef<Path>>(program: P) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the plan with inherited stdio and return the exit status code
    ///
    /// A process terminated by a signal reports code 1.
    pub async fn run(&self, plan: &ExecutionPlan) -> Result<i32> {
        info!("Running: {}", plan);

        let status = Command::new(&self.program)
            .args(plan.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                KoreonError::execution(format!(
                    "Failed to execute {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let code = status.code().unwrap_or(1);
        if status.success() {
            info!("Provisioning container finished successfully");
        } else {
            warn!("Provisioning container exited with code {}", code);
        }
        Ok(code)
    }
}
