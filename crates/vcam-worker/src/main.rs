//! vcam worker binary.

use std::time::Duration;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vcam_worker::{Runner, WorkerConfig};

fn init_tracing() {
    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vcam=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting vcam-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics recorder unavailable: {}", e);
            None
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to build runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let mut runner = Runner::new(config).context("failed to start worker")?;
        let stdin = BufReader::new(tokio::io::stdin());
        let shutdown = async {
            tokio::signal::ctrl_c().await.ok();
        };
        runner.run(stdin, shutdown).await.context("tick loop failed")?;
        runner
            .finish(metrics.as_ref())
            .context("failed to flush outputs")
    });

    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_timeout(Duration::from_millis(200));

    match result {
        Ok(stats) => info!(
            processed = stats.processed,
            skipped = stats.skipped,
            frame_sets = stats.frame_sets,
            "Worker shutdown complete"
        ),
        Err(e) => {
            error!("Worker error: {:#}", e);
            std::process::exit(1);
        }
    }
}
