//! Namecascade CLI entrypoint.
//!
//! Reads query and reference JSON-lines files named by `NAMECASCADE_QUERY_PATH`
//! and `NAMECASCADE_REFERENCE_PATH`, writes one flat JSON row per query to
//! stdout and logs run statistics to stderr.

use std::io::{self, BufWriter, Write};

use mimalloc::MiMalloc;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use namecascade::config::{Config, ConfigError};
use namecascade::dataset::Dataset;
use namecascade::pipeline::MatchEngine;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let query_path = config
        .query_path
        .clone()
        .ok_or(ConfigError::MissingEnvVar {
            name: "NAMECASCADE_QUERY_PATH",
        })?;
    let reference_path = config
        .reference_path
        .clone()
        .ok_or(ConfigError::MissingEnvVar {
            name: "NAMECASCADE_REFERENCE_PATH",
        })?;

    let columns = &config.columns;
    let queries = Dataset::from_json_lines_path(
        "queries",
        &query_path,
        &columns.query_id,
        &columns.query_name,
    )?;
    let references = Dataset::from_json_lines_path(
        "references",
        &reference_path,
        &columns.reference_id,
        &columns.reference_name,
    )?;

    tracing::info!(
        queries = queries.len(),
        references = references.len(),
        judge = config.judge.provider.as_str(),
        "Namecascade starting"
    );

    let top_n = config.top_n_matches;
    let engine = MatchEngine::from_config(config)?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let report = engine.run(&queries, &references, cancel).await;

    let mut out = BufWriter::new(io::stdout().lock());
    for row in report.flat_rows() {
        writeln!(out, "{}", row.to_json_string(top_n))?;
    }
    out.flush()?;

    tracing::info!(
        statistics = %serde_json::to_string(&report.statistics)?,
        unresolved = report.unresolved_queries(),
        skipped = report.skipped_queries,
        cancelled = report.cancelled,
        "Namecascade finished"
    );
    Ok(())
}

async fn cancel_on_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, cancelling outstanding work");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, cancelling outstanding work");
        }
    }
    cancel.cancel();
}
