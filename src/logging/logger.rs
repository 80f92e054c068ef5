// file: src/logging/logger.rs
// version: 1.0.0
// guid: 9a4e2b7c-1f3d-4c68-8e05-b7d6a3c91f52

//! Logger initialization and configuration

use crate::error::KoreonError;
use crate::Result;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize human readable logging on stderr
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(level_directive(verbose, quiet)))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| KoreonError::config(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Filter directive for the console logger; `quiet` wins over `verbose`
fn level_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Initialize JSON logging on stderr, filtered by `RUST_LOG`
pub fn init_json_logger() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| KoreonError::config(format!("Failed to initialize JSON logger: {}", e)))?;

    Ok(())
}

/// Run `f` inside an `operation` span
pub fn with_operation_span<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let span = tracing::info_span!("operation", name = operation);
    let _enter = span.enter();
    f()
}

/// Run the future produced by `f` inside an `operation` span
pub async fn with_async_operation_span<F, Fut, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let span = tracing::info_span!("operation", name = operation);
    async move { f().await }.instrument(span).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        // Arrange & Act & Assert
        assert_eq!(level_directive(false, false), "info");
        assert_eq!(level_directive(true, false), "debug");
        assert_eq!(level_directive(false, true), "error");
        assert_eq!(level_directive(true, true), "error");
    }

    #[test]
    fn test_with_operation_span() {
        // Arrange
        let mut executed = false;

        // Act
        let result = with_operation_span("validate", || {
            executed = true;
            "done"
        });

        // Assert
        assert!(executed);
        assert_eq!(result, "done");
    }

    #[tokio::test]
    async fn test_with_async_operation_span() {
        // Arrange
        let operation = "execute";

        // Act
        let result = with_async_operation_span(operation, || async {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            42
        })
        .await;

        // Assert
        assert_eq!(result, 42);
    }
}
