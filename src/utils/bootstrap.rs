//! Bootstrap utilities for paystream binaries.
//!
//! Shared initialization code for the ingest and dashboard binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with PAYSTREAM_LOG environment variable.
///
/// Defaults to "info" level if PAYSTREAM_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Read `--config <path>` (or `--config=<path>`, `-c <path>`) from the process arguments.
pub fn parse_config_path() -> Option<String> {
    config_path_from_args(std::env::args().skip(1))
}

fn config_path_from_args<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
        if arg == "--config" || arg == "-c" {
            return args.next();
        }
    }
    None
}

/// Resolves once the process receives an interrupt (Ctrl+C).
///
/// If the signal handler cannot be installed the future never resolves, so
/// callers keep running rather than stopping at once.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for interrupt");
        std::future::pending::<()>().await;
    }
}
