//! calcd orchestrator server.
//!
//! Hosts the expression API and the internal task endpoints the workers poll.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calcd_orchestrator::{
    config::{AppConfig, OperatorTimeouts},
    engine::Driver,
    handlers,
    queue::TaskQueue,
    state::AppState,
    store::{ExpressionStore, MemoryStore},
};

/// Initialize tracing/logging.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,calcd_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router with all routes.
fn build_router(state: AppState) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Health check routes
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .with_state(state.clone());

    // Expression routes
    let expression_routes = Router::new()
        .route("/api/v1/calculate", post(handlers::calculate))
        .route("/api/v1/expressions", get(handlers::list_expressions))
        .route("/api/v1/expressions/{id}", get(handlers::get_expression))
        .with_state(state.clone());

    // Internal worker routes
    let task_routes = Router::new()
        .route(
            "/internal/task",
            get(handlers::poll_task).post(handlers::submit_result),
        )
        .with_state(state);

    Router::new()
        .merge(health_routes)
        .merge(expression_routes)
        .merge(task_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting calcd orchestrator"
    );

    let app_config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    let timeouts = OperatorTimeouts::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load operator timeouts, using defaults");
        OperatorTimeouts::default()
    });

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        debug = app_config.debug,
        "Configuration loaded"
    );

    let store: Arc<dyn ExpressionStore> = Arc::new(MemoryStore::new());
    let queue = Arc::new(TaskQueue::new());
    let driver = Arc::new(Driver::new(
        Arc::clone(&queue),
        Arc::clone(&store),
        timeouts,
    ));

    let state = AppState::new(store, queue, driver, app_config.clone());
    let app = build_router(state);

    let addr: SocketAddr = app_config.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
