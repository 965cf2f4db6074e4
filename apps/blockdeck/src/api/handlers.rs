//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Pointer events from concurrent requests are serialized by the board's
//! write lock, so the state machine sees one ordered stream.

use super::{
    AppState,
    types::{
        CancelResponse, DragMoveRequest, DragMoveResponse, DragStartRequest, ErrorResponse,
        ExportResponse, HealthResponse, OutcomeResponse, ReplaceRequest, SectionDropRequest,
        SectionMoveRequest, StyleRequest, TokenJson, WidgetsResponse,
    },
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blockdeck_core::{
    Board, DeckError, Point, TargetUpdate, arrangement_crypto_hash, board_checksum,
    export_snapshot,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status for a core error.
#[must_use]
pub fn status_for(error: &DeckError) -> StatusCode {
    match error {
        DeckError::DragInProgress(_) | DeckError::NotEditable(_) => StatusCode::CONFLICT,
        DeckError::BlockNotFound(_) | DeckError::SectionNotFound(_) => StatusCode::NOT_FOUND,
        DeckError::InvalidId(_)
        | DeckError::UnknownStyle(_)
        | DeckError::DuplicateBlock(_)
        | DeckError::DuplicateSection(_)
        | DeckError::InvalidColumns(_)
        | DeckError::DeserializationError(_) => StatusCode::BAD_REQUEST,
        DeckError::QuotaExceeded { .. }
        | DeckError::SerializationError(_)
        | DeckError::IoError(_)
        | DeckError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &DeckError) -> Response {
    (status_for(error), Json(ErrorResponse::new(error.to_string()))).into_response()
}

fn outcome_response(board: &Board, outcome: blockdeck_core::DropOutcome) -> Response {
    let body = OutcomeResponse {
        outcome,
        board: board.snapshot(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

// =============================================================================
// READ HANDLERS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Current arrangement and drag session.
pub async fn board_handler(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.board.read().await;
    (StatusCode::OK, Json(board.snapshot()))
}

/// Pool widgets not on the board.
pub async fn widgets_handler(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.board.read().await;
    let available = board.available_blocks().cloned().collect();
    (StatusCode::OK, Json(WidgetsResponse { available }))
}

/// The style tokens of the side panel.
pub async fn catalog_handler(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.board.read().await;
    let tokens: Vec<TokenJson> = board.catalog().iter().map(TokenJson::from).collect();
    (StatusCode::OK, Json(tokens))
}

// =============================================================================
// DRAG HANDLERS
// =============================================================================

/// Pointer-down.
pub async fn drag_start_handler(
    State(state): State<AppState>,
    Json(request): Json<DragStartRequest>,
) -> Response {
    let mut board = state.board.write().await;
    match board.pointer_down_raw(&request.id, Point::new(request.x, request.y)) {
        Ok(()) => (StatusCode::OK, Json(board.snapshot())).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Pointer-move with live candidate geometry.
pub async fn drag_move_handler(
    State(state): State<AppState>,
    Json(request): Json<DragMoveRequest>,
) -> Response {
    let candidates = match request.to_candidates() {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };

    let mut board = state.board.write().await;
    let update = board.pointer_move(&request.pointer_state(), &candidates);
    let current_target_id = board
        .snapshot()
        .session
        .and_then(|s| s.current_target_id)
        .map(|id| id.to_string());

    let body = DragMoveResponse {
        changed: matches!(update, TargetUpdate::Changed(_)),
        current_target_id,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Pointer-up: commits the drop and returns the outcome.
pub async fn drag_end_handler(State(state): State<AppState>) -> Response {
    let mut board = state.board.write().await;
    let outcome = board.pointer_up();
    outcome_response(&board, outcome)
}

/// Abandon the current gesture.
pub async fn drag_cancel_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut board = state.board.write().await;
    let cancelled = board.cancel();
    (StatusCode::OK, Json(CancelResponse { cancelled }))
}

// =============================================================================
// EDIT HANDLERS
// =============================================================================

/// Click-to-apply a style.
pub async fn style_handler(
    State(state): State<AppState>,
    Json(request): Json<StyleRequest>,
) -> Response {
    let (block, style) = match request.parse() {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };
    let mut board = state.board.write().await;
    match board.apply_style_to(&block, style) {
        Ok(outcome) => outcome_response(&board, outcome),
        Err(e) => error_response(&e),
    }
}

/// Move a section onto another section's position.
pub async fn sections_move_handler(
    State(state): State<AppState>,
    Json(request): Json<SectionMoveRequest>,
) -> Response {
    let (from, to) = match request.parse() {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };
    let mut board = state.board.write().await;
    match board.move_section(&from, &to) {
        Ok(outcome) => outcome_response(&board, outcome),
        Err(e) => error_response(&e),
    }
}

/// Release a dragged section over the live section geometry.
pub async fn sections_drop_handler(
    State(state): State<AppState>,
    Json(request): Json<SectionDropRequest>,
) -> Response {
    let (section, candidates) = match request.parse() {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };
    let mut board = state.board.write().await;
    match board.drop_section(&section, &request.drag_rect, &candidates) {
        Ok(outcome) => outcome_response(&board, outcome),
        Err(e) => error_response(&e),
    }
}

/// Swap a shown block for a pool widget.
pub async fn replace_handler(
    State(state): State<AppState>,
    Json(request): Json<ReplaceRequest>,
) -> Response {
    let (current, with) = match request.parse() {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };
    let mut board = state.board.write().await;
    match board.replace_block(&current, &with) {
        Ok(outcome) => outcome_response(&board, outcome),
        Err(e) => error_response(&e),
    }
}

/// Restore the default arrangement.
pub async fn reset_handler(State(state): State<AppState>) -> Response {
    let mut board = state.board.write().await;
    match board.reset() {
        Ok(()) => (StatusCode::OK, Json(board.snapshot())).into_response(),
        Err(e) => error_response(&e),
    }
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Export the board as a base64 binary snapshot.
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let board = state.board.read().await;
    let arrangement = board.arrangement();
    let sections = board.sections();

    let exported = export_snapshot(board.key().name(), arrangement, sections).and_then(|data| {
        let checksum = board_checksum(arrangement, sections)?;
        let hash = arrangement_crypto_hash(arrangement)?;
        Ok((data, checksum, hash))
    });

    match exported {
        Ok((data, checksum, hash)) => (
            StatusCode::OK,
            Json(ExportResponse::success(data, checksum, hash)),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ExportResponse::error(format!("Export failed: {}", e))),
        ),
    }
}
