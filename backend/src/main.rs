use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cuentas_pagar_backend::config::{Config, EnvOverride};
use cuentas_pagar_backend::{create_router, initialize_backend};

#[derive(Parser)]
#[clap(about = "Accounts payable REST service", long_about = None)]
struct Cli {
    #[clap(short, long, env = "CXP_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
    #[clap(long, env = "CXP_DATA_DIR", value_name = "DIRECTORY")]
    data_dir: Option<PathBuf>,
    #[clap(long, env = "CXP_BIND_ADDR", value_name = "ADDR")]
    bind_addr: Option<SocketAddr>,
    #[clap(long, env = "CXP_CORS_ORIGIN", value_name = "URL")]
    cors_origin: Option<String>,
    #[clap(long, env = "CXP_TAX_RATE", value_name = "RATE")]
    tax_rate: Option<f64>,
    /// Directory with the built frontend
    #[clap(long, env = "CXP_STATIC_DIR", value_name = "DIRECTORY")]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load_config(
        cli.config,
        EnvOverride {
            data_dir: cli.data_dir,
            bind_addr: cli.bind_addr,
            cors_origin: cli.cors_origin,
            tax_rate: cli.tax_rate,
        },
    )?;
    if cli.static_dir.is_some() {
        config.server.static_dir = cli.static_dir;
    }

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config.server)?;

    let addr = config.server.bind_addr;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
