//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// CORS allows only localhost origins on the configured port: the API serves
/// a local single-page front-end, not the open internet.
pub fn create_router(state: AppState) -> Router {
    let port = state.config.general.port;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            [
                format!("http://127.0.0.1:{}", port),
                format!("http://localhost:{}", port),
            ]
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/chat/voice", post(handlers::chat_voice))
        .route("/sessions", get(handlers::list_sessions))
        .route("/sessions/{id}/history", get(handlers::session_history))
        .route("/sessions/{id}/export", get(handlers::session_export))
        .route("/sessions/{id}", axum::routing::delete(handlers::delete_session))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on `127.0.0.1:{port}`.
pub async fn start_server(state: AppState) -> Result<(), wikivox_core::error::WikivoxError> {
    let port = state.config.general.port;
    let addr = format!("127.0.0.1:{}", port);

    let router = create_router(state);

    tracing::info!(addr = %addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| wikivox_core::error::WikivoxError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| wikivox_core::error::WikivoxError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
