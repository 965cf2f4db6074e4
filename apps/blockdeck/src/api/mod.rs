//! # Board HTTP API
//!
//! Drives one [`Board`] over HTTP. A browser adapter forwards its pointer
//! events and live block geometry here and renders what comes back.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /board` - Arrangement and drag session
//! - `GET /catalog` - Style tokens
//! - `GET /widgets` - Pool widgets that are not shown
//! - `POST /drag/start` - Pointer-down on a block or token
//! - `POST /drag/move` - Pointer-move with candidate rectangles
//! - `POST /drag/end` - Pointer-up, commits the drop
//! - `POST /drag/cancel` - Abandon the gesture
//! - `POST /style` - Click-to-apply a style
//! - `POST /sections/move` - Move a section onto another's position
//! - `POST /sections/drop` - Release a dragged section, closest center wins
//! - `POST /replace` - Swap a shown block for a pool widget
//! - `POST /reset` - Restore the default arrangement
//! - `POST /export` - Binary snapshot, base64 encoded
//!
//! ## Environment
//!
//! - `BLOCKDECK_CORS_ORIGINS`: comma-separated origins, or `*` (default: localhost only)
//! - `BLOCKDECK_RATE_LIMIT`: requests per second (default: 100, 0 to disable)
//! - `BLOCKDECK_API_KEY`: if set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{get_api_key_from_env, keys_match};
pub use middleware::{create_rate_limiter, get_rate_limit_from_env, parse_rate_limit};
// Re-exported for the integration tests.
#[allow(unused_imports)]
pub use handlers::{
    board_handler, catalog_handler, drag_cancel_handler, drag_end_handler, drag_move_handler,
    drag_start_handler, export_handler, health_handler, replace_handler, reset_handler,
    sections_drop_handler, sections_move_handler, status_for, style_handler, widgets_handler,
};
#[allow(unused_imports)]
pub use types::{
    CancelResponse, CandidateJson, DragMoveRequest, DragMoveResponse, DragStartRequest,
    ErrorResponse, ExportResponse, HealthResponse, MAX_MOVE_CANDIDATES, OutcomeResponse,
    ReplaceRequest, SectionDropRequest, SectionMoveRequest, StyleRequest, TokenJson,
    WidgetsResponse,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use blockdeck_core::{Board, DeckError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<RwLock<Board>>,
}

impl AppState {
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// CORS from `BLOCKDECK_CORS_ORIGINS`. Unset or unparseable means localhost only.
fn build_cors_layer() -> CorsLayer {
    let configured = std::env::var("BLOCKDECK_CORS_ORIGINS").ok();

    match configured.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: allowing ALL origins (BLOCKDECK_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!("CORS: invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: no valid origins configured, using localhost only");
                build_localhost_cors()
            } else {
                tracing::info!(count = allowed.len(), "CORS: allowing configured origins");
                cors_with_origins(allowed)
            }
        }
        None => build_localhost_cors(),
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    cors_with_origins(origins)
}

fn cors_with_origins(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Build the router with every endpoint and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit, rate limit,
/// authentication.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/board", get(handlers::board_handler))
        .route("/catalog", get(handlers::catalog_handler))
        .route("/widgets", get(handlers::widgets_handler))
        .route("/drag/start", post(handlers::drag_start_handler))
        .route("/drag/move", post(handlers::drag_move_handler))
        .route("/drag/end", post(handlers::drag_end_handler))
        .route("/drag/cancel", post(handlers::drag_cancel_handler))
        .route("/style", post(handlers::style_handler))
        .route("/sections/move", post(handlers::sections_move_handler))
        .route("/sections/drop", post(handlers::sections_drop_handler))
        .route("/replace", post(handlers::replace_handler))
        .route("/reset", post(handlers::reset_handler))
        .route("/export", post(handlers::export_handler));

    match get_api_key_from_env() {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            let key: auth::ApiKey = Arc::from(key);
            router = router.layer(axum_middleware::from_fn_with_state(
                key,
                auth::api_key_auth_middleware,
            ));
        }
        None => tracing::warn!(
            "API key authentication DISABLED; set BLOCKDECK_API_KEY to require a bearer token"
        ),
    }

    let rate = get_rate_limit_from_env();
    match create_rate_limiter(rate) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", rate);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer()),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind `addr` and serve `board` until the process is stopped.
pub async fn run_server(addr: &str, board: Board) -> Result<(), DeckError> {
    let board_name = board.key().to_string();
    let persistent = board.is_persistent();
    let router = create_router(AppState::new(board));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DeckError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!(board = %board_name, persistent, "blockdeck listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| DeckError::IoError(format!("Server error: {}", e)))
}
