//! symdx-web - Symptom diagnosis web service
//!
//! Startup order:
//! 1. Configuration (CLI / env / TOML / defaults)
//! 2. Model artifacts (each independently; failures are logged, not fatal)
//! 3. Metrics and the label distribution chart
//! 4. HTTP listener (default http://127.0.0.1:5000)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use symdx_common::config::ServiceConfig;
use symdx_common::{ArtifactSet, Metrics};
use symdx_web::{build_router, report, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for symdx-web
///
/// All optional; values given here override the config file.
#[derive(Parser, Debug)]
#[command(name = "symdx-web")]
#[command(about = "Symptom diagnosis web service")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "SYMDX_CONFIG")]
    config: Option<PathBuf>,

    /// Host to listen on
    #[arg(long, env = "SYMDX_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SYMDX_PORT")]
    port: Option<u16>,

    /// Directory containing the model artifacts and metrics.json
    #[arg(short, long, env = "SYMDX_ARTIFACT_DIR")]
    artifact_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.artifact_dir {
            config.artifact_dir = dir;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = Args::parse();
    let config = ServiceConfig::load(args.config.take().as_deref())
        .context("Failed to load configuration")?;
    let config = args.apply(config);

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting symdx-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Artifact directory: {}", config.artifact_dir.display());

    let paths = config.artifact_paths();
    let artifacts = ArtifactSet::load(&paths);
    let model = artifacts.components();
    if model.is_none() {
        warn!(
            "Prediction disabled, missing components: {}",
            artifacts.missing().join(", ")
        );
    }

    let metrics = Metrics::load(&paths.metrics);

    // Chart failures only cost the dashboard image
    if let Err(e) = report::generate_chart(&metrics, &config.static_dir) {
        error!("Failed to generate chart: {}", e);
    }

    let state = AppState::new(model, metrics, config.static_dir.clone());
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Running on http://{}/", addr);
    info!("Dashboard: http://{}/dashboard", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
