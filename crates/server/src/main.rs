//! Translation management server

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use transdesk_config::Settings;
use transdesk_persistence::PersistenceError;
use transdesk_server::{create_router, telemetry, AppState};
use transdesk_text_processing::EnrichmentPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let settings = Settings::load().context("Failed to load configuration")?;
    telemetry::init(settings.runtime_mode);

    info!(
        mode = ?settings.runtime_mode,
        backend = ?settings.database.backend,
        "Starting translation management server"
    );

    let store = transdesk_persistence::init(&settings.database);

    // A missing URI is fatal; an unreachable database is retried per request.
    match store.ensure_ready().await {
        Ok(()) => info!(backend = store.backend(), "Translation store ready"),
        Err(PersistenceError::Configuration(msg)) => {
            error!(error = %msg, "Critical configuration error");
            anyhow::bail!(msg);
        },
        Err(e) => warn!(error = %e, "Database not reachable at startup, will retry on demand"),
    }

    let pipeline = EnrichmentPipeline::from_config(&settings.translation)?;
    info!(translator = pipeline.translator_name(), "Enrichment pipeline ready");

    let app = create_router(AppState::new(store, pipeline));

    let addr = settings.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
