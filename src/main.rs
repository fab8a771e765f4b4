use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wordboard::{api, auth, broadcast, seed, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordboard=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting wordboard...");

    let auth_config = auth::CrAuthConfig::from_env();

    // Seed the shared documents
    let roster = seed::roster_from_env();
    let state = Arc::new(AppState::new(
        seed::initial_board(),
        seed::initial_ledger(roster),
        auth_config.clone(),
    ));

    // Spawn background task pushing submission progress to clients
    broadcast::spawn_progress_broadcaster(state.clone());

    // CR-gated management API (snapshot backup/restore, CSV download)
    let api_routes = Router::new()
        .route("/api/state/export", get(api::export_state))
        .route("/api/state/import", post(api::import_state))
        .route("/api/submissions.csv", get(api::download_csv))
        .layer(middleware::from_fn_with_state(
            Arc::new(auth_config),
            auth::cr_auth_middleware,
        ));

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(api_routes)
        .fallback_service(ServeDir::new("static"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port = std::env::var("WORDBOARD_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8017);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}
