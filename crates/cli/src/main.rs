use clap::Parser;
use dns_sentry_domain::CliOverrides;
use dns_sentry_infrastructure::CaptureLoop;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;

#[derive(Parser)]
#[command(name = "dns-sentry")]
#[command(version = "0.1.0")]
#[command(about = "Passive DNS monitor with upstream domain classification")]
struct Cli {
    /// Network interface to capture DNS traffic on (e.g. eth0)
    interface: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Classifier endpoint URL
    #[arg(long)]
    reporter_url: Option<String>,

    /// Cache backend URL
    #[arg(long)]
    redis_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        reporter_url: cli.reporter_url.clone(),
        redis_url: cli.redis_url.clone(),
        log_level: cli.log_level.clone(),
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;

    bootstrap::init_logging(&config);
    info!("Starting dns-sentry v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();
    let (ingress_tx, ingress_rx) = mpsc::unbounded_channel();

    // A capture handle that cannot be opened is a startup failure.
    let capture = CaptureLoop::open(
        &cli.interface,
        &config.capture,
        ingress_tx.clone(),
        shutdown.clone(),
    )?;
    let capture_handle = capture.spawn();

    let services = di::Services::new(&config)?;
    let jobs = di::start_jobs(&config, &services, ingress_rx, shutdown.clone());

    bootstrap::wait_for_shutdown().await;
    info!("Shutdown signal received");

    shutdown.cancel();
    // Wake the ingest loop in case it is parked on an empty channel.
    let _ = ingress_tx.send(String::new());

    if let Some(ingest) = jobs.ingest {
        if let Err(e) = ingest.await {
            error!(error = %e, "Ingest loop ended abnormally");
        }
    }
    if let Some(stats) = jobs.stats {
        let _ = stats.await;
    }
    if let Err(e) = capture_handle.await {
        error!(error = %e, "Capture task ended abnormally");
    }

    info!("Shutdown complete");
    Ok(())
}
