use anyhow::{Context, Result};
use clap::Parser;
use std::net::Ipv4Addr;
use std::sync::Arc;
use studygen::{api, config, logging, materials::StudyService};
use tokio::net::TcpListener;

/// Serve the study material generation endpoint.
#[derive(Debug, Parser)]
#[command(name = "studygen", version, about)]
struct Cli {
    /// Port to listen on (overrides `PORT`).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config().context("failed to load configuration")?;
    logging::init_tracing(config.log_file.as_deref());
    config.log_summary();

    let service = StudyService::from_config(&config).context("failed to build Vertex AI client")?;
    let app = api::create_router(Arc::new(service), config.max_upload_bytes);

    let port = cli.port.unwrap_or_else(|| config.port());
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}
