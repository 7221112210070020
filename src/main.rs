use anyhow::Context;
use app_env::AppConfig;
use axum::extract::State;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

mod api;
mod app_env;
mod db;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routes;
mod routing_utils;

/// Data shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor for the application's shared data
pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env()?;

    let otel_exporters = config
        .otel
        .as_ref()
        .map(logging::init_exporters)
        .transpose()?;
    let _telemetry =
        logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters)?;

    info!("Connecting to the database");
    let db_pool = db::connect_sqlx(&config.database_url, config.db_max_connections)
        .await
        .context("connecting to the database")?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db_pool),
    });
    let router = routes::build_router(shared_data);

    let listener = TcpListener::bind(config.bind_address.as_str())
        .await
        .with_context(|| format!("binding to {}", config.bind_address))?;
    info!("Starting server on {}", config.bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP requests")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves once the process is asked to stop via Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Could not listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Could not listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown requested, draining connections");
}
