use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use hostelcare::hostelcare_config::ServerConfig;
use hostelcare::hostelcare_db::{init_db_pool, run_migrations};
use hostelcare::logging::{init_tracing, shutdown_tracer};
use hostelcare::metrics::{init_metrics, metrics_app, set_observability_enabled};
use hostelcare::router::init_router;
use hostelcare::state::AppState;

/// How often idle rate limiter buckets are dropped.
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = ServerConfig::from_env();
    set_observability_enabled(config.observability_enabled);

    if let Err(e) = init_tracing(&config) {
        eprintln!("❌ Failed to initialise tracing: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server exited with an error");
        shutdown_tracer();
        std::process::exit(1);
    }

    shutdown_tracer();
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    if let Some(handle) = init_metrics()? {
        let metrics_address = config.metrics_address();
        let listener = tokio::net::TcpListener::bind(&metrics_address).await?;
        tracing::info!("Metrics available at http://{metrics_address}/metrics");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                tracing::error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let db = init_db_pool().await?;
    run_migrations(&db).await?;

    let state = AppState::from_env(db);
    state.rate_limiters.spawn_cleanup(RATE_LIMIT_CLEANUP_INTERVAL);
    tracing::info!(strategy = ?state.ticket_config.strategy, "Ticket allocation configured");

    let app = init_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("🚀 Server running on http://{address}");
    tracing::info!("📚 Swagger UI available at http://{address}/swagger-ui");
    tracing::info!("📖 Scalar UI available at http://{address}/scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
