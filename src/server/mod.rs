pub mod api;

use crate::models::SharedSymbolStore;
use crate::services::{SharedHealthStats, SharedQuoteSource, SharedSnapshotStore};
use crate::utils::get_public_dir;
use axum::{
    extract::FromRef,
    routing::{delete, get},
    Router,
};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub snapshots: SharedSnapshotStore,
    pub health_stats: SharedHealthStats,
    pub symbols: SharedSymbolStore,
    pub quotes: SharedQuoteSource,
    pub started_at: Instant,
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for SharedSnapshotStore {
    fn from_ref(app_state: &AppState) -> SharedSnapshotStore {
        app_state.snapshots.clone()
    }
}

impl FromRef<AppState> for SharedHealthStats {
    fn from_ref(app_state: &AppState) -> SharedHealthStats {
        app_state.health_stats.clone()
    }
}

impl FromRef<AppState> for SharedSymbolStore {
    fn from_ref(app_state: &AppState) -> SharedSymbolStore {
        app_state.symbols.clone()
    }
}

impl FromRef<AppState> for SharedQuoteSource {
    fn from_ref(app_state: &AppState) -> SharedQuoteSource {
        app_state.quotes.clone()
    }
}

/// Routes without the static file service and CORS layer
pub fn api_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(api::dashboard_handler))
        .route("/api/chart", get(api::chart_handler))
        .route("/api/indices", get(api::indices_handler))
        .route("/api/scanner", get(api::scanner_handler))
        .route(
            "/api/symbols",
            get(api::list_symbols_handler).post(api::add_symbol_handler),
        )
        .route("/api/symbols/{group}/{symbol}", delete(api::remove_symbol_handler))
        .route("/health", get(api::health_handler))
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(app_state: AppState, port: u16) -> crate::error::Result<()> {
    tracing::info!("Starting marketpulse server");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    let public_dir = get_public_dir();
    tracing::info!("Using public directory: {}", public_dir.display());

    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/dashboard?stock=RELIANCE.NS&index=^NSEI");
    tracing::info!("  GET /api/chart?symbol=^NSEI&interval=1m&period=1d");
    tracing::info!("  GET /api/indices?name=DAX");
    tracing::info!("  GET /api/scanner?limit=10");
    tracing::info!("  GET|POST /api/symbols, DELETE /api/symbols/{{group}}/{{symbol}}");
    tracing::info!("  GET /health");
    tracing::info!("  GET /public/* (static files from {})", public_dir.display());

    let app = api_router(app_state)
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
