use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use trade_report::server::{build_router, AppState};
use trade_report::{ReportGenerator, Settings};

/// Trade cycle report service
#[derive(Debug, Parser)]
#[command(name = "trade-report", version)]
struct Args {
    /// Overrides SERVER_HOST
    #[arg(long)]
    host: Option<String>,

    /// Overrides SERVER_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = Settings::load().context("Failed to load settings")?;
    setup_logging(&settings.log_level);

    let generator =
        ReportGenerator::from_settings(&settings).context("Failed to build OpenAI client")?;
    let app = build_router(AppState::new(generator), &settings);

    let host = args.host.unwrap_or_else(|| settings.server_host.clone());
    let port = args.port.unwrap_or(settings.server_port);
    let address = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(
        address = %address,
        version = env!("CARGO_PKG_VERSION"),
        model = %settings.openai_model,
        "application_startup"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("application_shutdown");
    Ok(())
}

/// JSON logs filtered by RUST_LOG, or LOG_LEVEL when RUST_LOG is unset
fn setup_logging(level: &str) {
    let level = level.to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("trade_report={level},tower_http={level}"))
    });

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
