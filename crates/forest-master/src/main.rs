//! Forest Master - job gateway for random forest workers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use forest_master::http;
use forest_master::{AppState, BatchOrchestrator, Config, JobGateway, WorkerPool};

const DEFAULT_LOG_FILTER: &str = "forest_master=info,tower_http=info";

/// Forest Master - dispatches training and prediction jobs to workers
#[derive(Parser)]
#[command(name = "forest-master")]
#[command(about = "Job gateway for distributed random forest workers", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve,

    /// Run the tasks declared in the configuration and print the report
    #[command(name = "run-batch")]
    RunBatch,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::RunBatch => {
            if run_batch(config).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn build_gateway(config: &Config) -> Result<Arc<JobGateway>, Box<dyn std::error::Error>> {
    let pool = WorkerPool::connect_lazy(&config.worker_endpoints(), config.gateway.connect_timeout())?;
    Ok(Arc::new(JobGateway::new(Arc::new(pool), config.deadlines())))
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = build_gateway(&config)?;
    let state = AppState::new(gateway);
    let http_addr = config.http_addr();

    info!(
        http_addr = %http_addr,
        workers = state.worker_count(),
        env = %config.app.env,
        "Starting forest master"
    );

    let router = http::create_router(state);
    let listener = TcpListener::bind(http_addr).await?;
    info!("HTTP server listening on {}", http_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Forest master stopped");
    Ok(())
}

/// Returns whether every recorded job succeeded.
async fn run_batch(config: Config) -> Result<bool, Box<dyn std::error::Error>> {
    if config.tasks.is_empty() {
        warn!("No tasks declared in configuration");
    }

    let gateway = build_gateway(&config)?;
    let mut orchestrator = BatchOrchestrator::new(gateway);
    if let Some(max_concurrency) = config.batch.max_concurrency {
        orchestrator = orchestrator.with_max_concurrency(max_concurrency);
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    let report = orchestrator
        .run_until_cancelled(&config.tasks, &cancel)
        .await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(report.is_success())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
