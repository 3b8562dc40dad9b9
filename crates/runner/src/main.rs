use std::process::ExitCode;

use scriptline_core::config::RunnerConfig;
use scriptline_core::runner::Runner;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Warnings and errors go to stderr, the transcript to stdout. ANSI is off
    // because the output is usually captured by the API.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scriptline_runner=info,scriptline_core=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(
                    std::io::stderr
                        .with_max_level(tracing::Level::WARN)
                        .or_else(std::io::stdout),
                ),
        )
        .init();

    let config = RunnerConfig::from_env();
    tracing::info!(
        base_dir = %config.base_dir.display(),
        scripts = config.scripts.len(),
        "Loaded runner configuration"
    );

    let runner = Runner::new(config);
    match runner.run().await {
        Ok(report) => {
            let archived = report.archived.iter().filter(|e| e.is_moved()).count();
            tracing::info!(
                succeeded = report.succeeded(),
                failed = report.failed(),
                archived,
                "Run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run aborted");
            ExitCode::FAILURE
        }
    }
}
