//! `net-recv`: run the loopback receive check once.
//!
//! Exits with status 0 when every check passed. `RUST_LOG` controls the log
//! filter (default `info`).

use std::process::ExitCode;

use loopback_recv::{Harness, HarnessConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .init();

    match Harness::new(HarnessConfig::default()).run().await {
        Ok(report) if report.checks.all_passed() => {
            tracing::info!(checks = %report.checks, "recv: all checks passed");
            ExitCode::SUCCESS
        }
        Ok(report) => {
            tracing::error!(checks = %report.checks, "recv: checks failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("recv: {e}");
            ExitCode::FAILURE
        }
    }
}
