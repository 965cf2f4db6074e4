//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use blockdeck_core::{
    Block, BlockId, BoardSnapshot, Candidate, ChartStyle, DeckError, DropOutcome, Point,
    PointerState, Rect, SectionCandidate, SectionId, StyleToken,
};
use serde::{Deserialize, Serialize};

/// Maximum number of candidates accepted in one move event.
pub const MAX_MOVE_CANDIDATES: usize = 1024;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every non-2xx response produced by a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// One style token as shown in the side panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenJson {
    /// Drag id, `panel::<style>`.
    pub id: String,
    pub style: ChartStyle,
    pub label: String,
    pub color: String,
}

impl From<&StyleToken> for TokenJson {
    fn from(token: &StyleToken) -> Self {
        Self {
            id: token.drag_id().to_string(),
            style: token.style,
            label: token.label.clone(),
            color: token.color.clone(),
        }
    }
}

// =============================================================================
// DRAG REQUESTS/RESPONSES
// =============================================================================

/// Pointer-down request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragStartRequest {
    /// A block id or a `panel::<style>` token id.
    pub id: String,
    pub x: i32,
    pub y: i32,
}

/// Live geometry of one block, as measured by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateJson {
    pub id: String,
    pub rect: Rect,
}

/// Pointer-move request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragMoveRequest {
    pub pointer: Point,
    pub drag_rect: Rect,
    #[serde(default)]
    pub candidates: Vec<CandidateJson>,
}

impl DragMoveRequest {
    #[must_use]
    pub fn pointer_state(&self) -> PointerState {
        PointerState::new(self.pointer, self.drag_rect)
    }

    /// Convert candidates, validating their count and ids.
    ///
    /// Acceptor flags are left unset; the board fills them in from its blocks.
    pub fn to_candidates(&self) -> Result<Vec<Candidate>, DeckError> {
        if self.candidates.len() > MAX_MOVE_CANDIDATES {
            return Err(DeckError::DeserializationError(format!(
                "{} candidates exceeds maximum {}",
                self.candidates.len(),
                MAX_MOVE_CANDIDATES
            )));
        }
        self.candidates
            .iter()
            .map(|c| Ok(Candidate::new(BlockId::parse(c.id.as_str())?, c.rect, false)))
            .collect()
    }
}

/// Pointer-move response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragMoveResponse {
    /// Whether the drop target changed with this move.
    pub changed: bool,
    pub current_target_id: Option<String>,
}

/// Result of a release or a direct edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeResponse {
    pub outcome: DropOutcome,
    pub board: BoardSnapshot,
}

/// Cancel response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// False when there was no gesture to cancel.
    pub cancelled: bool,
}

// =============================================================================
// STYLE REQUEST
// =============================================================================

/// Click-to-apply request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRequest {
    pub block_id: String,
    pub style: String,
}

impl StyleRequest {
    /// Parse the block id and style name.
    pub fn parse(&self) -> Result<(BlockId, ChartStyle), DeckError> {
        Ok((BlockId::parse(self.block_id.as_str())?, self.style.parse()?))
    }
}

// =============================================================================
// SECTION REQUESTS
// =============================================================================

/// Move one section onto another's position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionMoveRequest {
    pub from: String,
    pub to: String,
}

impl SectionMoveRequest {
    pub fn parse(&self) -> Result<(SectionId, SectionId), DeckError> {
        Ok((
            SectionId::parse(self.from.as_str())?,
            SectionId::parse(self.to.as_str())?,
        ))
    }
}

/// Release of a dragged section with the live section geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDropRequest {
    pub section_id: String,
    pub drag_rect: Rect,
    #[serde(default)]
    pub candidates: Vec<CandidateJson>,
}

impl SectionDropRequest {
    /// Parse the dragged section and its candidates, capping their count.
    pub fn parse(&self) -> Result<(SectionId, Vec<SectionCandidate>), DeckError> {
        if self.candidates.len() > MAX_MOVE_CANDIDATES {
            return Err(DeckError::DeserializationError(format!(
                "{} candidates exceeds maximum {}",
                self.candidates.len(),
                MAX_MOVE_CANDIDATES
            )));
        }
        let candidates = self
            .candidates
            .iter()
            .map(|c| Ok(SectionCandidate::new(SectionId::parse(c.id.as_str())?, c.rect)))
            .collect::<Result<Vec<_>, DeckError>>()?;
        Ok((SectionId::parse(self.section_id.as_str())?, candidates))
    }
}

// =============================================================================
// WIDGET REPLACEMENT
// =============================================================================

/// Swap a shown block for a widget from the pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRequest {
    pub block_id: String,
    pub with: String,
}

impl ReplaceRequest {
    pub fn parse(&self) -> Result<(BlockId, BlockId), DeckError> {
        Ok((
            BlockId::parse(self.block_id.as_str())?,
            BlockId::parse(self.with.as_str())?,
        ))
    }
}

/// Widgets that may replace a shown block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetsResponse {
    pub available: Vec<Block>,
}

// =============================================================================
// EXPORT RESPONSE
// =============================================================================

/// Export response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: Option<String>, // Base64 encoded
    /// Covers the section layout too.
    pub checksum: Option<u64>,
    /// BLAKE3 hex digest of the arrangement.
    pub hash: Option<String>,
    pub error: Option<String>,
}

impl ExportResponse {
    pub fn success(data: Vec<u8>, checksum: u64, hash: String) -> Self {
        Self {
            success: true,
            data: Some(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                &data,
            )),
            checksum: Some(checksum),
            hash: Some(hash),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            checksum: None,
            hash: None,
            error: Some(msg.into()),
        }
    }
}
