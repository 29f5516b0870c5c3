//! admetd — HTTP daemon exposing ADMET property prediction.
//!
//! ## Endpoints
//!
//! - `GET /health`: liveness probe, independent of pool state
//! - `GET /properties`: the property catalog
//! - `POST /smi`: predict for one SMILES string
//! - `POST /upload_smi`: predict for an uploaded file of SMILES

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};

use admet_core::{init_tracing, PredictionService, ServiceConfig, StubModel};

mod handlers;
mod routes;

#[derive(Parser)]
#[command(name = "admetd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ADMET property-prediction microservice", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "ADMET_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Number of pooled inference workers
    #[arg(long, env = "ADMET_POOL_SIZE", default_value_t = 1)]
    pool_size: usize,

    /// Give up waiting for a free worker after this many seconds
    #[arg(long, env = "ADMET_ACQUIRE_TIMEOUT_SECS")]
    acquire_timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let config = ServiceConfig {
        pool_size: cli.pool_size,
        acquire_timeout: cli.acquire_timeout_secs.map(Duration::from_secs),
    };

    // Catalog verification and alias-table construction happen here; any
    // failure aborts startup before the listener binds.
    let service = PredictionService::with_models(&config, || Box::new(StubModel::new()))
        .context("failed to build prediction service")?;

    let app = routes::router(service);
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!(addr = %cli.bind, pool_size = cli.pool_size, "admetd listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
