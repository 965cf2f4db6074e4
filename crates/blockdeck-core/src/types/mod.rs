//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every part of the core:
//! - Identifiers (`BlockId`, `SectionId`)
//! - Block content (`BlockKind`, `ChartStyle`, `Block`)
//! - Error types (`DeckError`)
//!
//! ## Wire Shape
//!
//! A block serializes as `{"id": .., "type": .., "chartType": ..}`, the record
//! shape boards have always been persisted in. `chartType` is omitted when the
//! block carries no style and `styleValue` is accepted as an alias on read.
//!
//! Sectioned boards add `sectionId`, `title` and `color`, and a locked block
//! carries `"editable": false`. All four are omitted when unset.

use crate::identity::is_acceptor_target;
use crate::primitives::STYLE_TOKEN_PREFIX;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// BLOCK IDENTIFIER
// =============================================================================

/// Identifier of a block, unique within its arrangement.
///
/// Identity is stable across reorders. The style-token namespace
/// (`panel::`) is reserved and can never name a block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockId(String);

impl BlockId {
    /// Parse a block id from its external string form.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DeckError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DeckError::InvalidId(raw));
        }
        if raw.starts_with(STYLE_TOKEN_PREFIX) {
            return Err(DeckError::InvalidId(raw));
        }
        Ok(Self(raw))
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BlockId {
    type Error = DeckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<BlockId> for String {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

impl PartialEq<str> for BlockId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// =============================================================================
// SECTION IDENTIFIER
// =============================================================================

/// Identifier of a dashboard section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Parse a section id. Same rules as block ids.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DeckError> {
        let raw = raw.into();
        if raw.trim().is_empty() || raw.starts_with(STYLE_TOKEN_PREFIX) {
            return Err(DeckError::InvalidId(raw));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SectionId {
    type Error = DeckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// =============================================================================
// CHART STYLE
// =============================================================================

/// The visual style a chart block is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    Bar,
    Line,
    Radar,
    Pie,
    #[serde(rename = "radialbar")]
    RadialBar,
}

impl ChartStyle {
    /// Every style, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Bar,
        Self::Line,
        Self::Radar,
        Self::Pie,
        Self::RadialBar,
    ];

    /// Wire name of the style.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Radar => "radar",
            Self::Pie => "pie",
            Self::RadialBar => "radialbar",
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartStyle {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| DeckError::UnknownStyle(s.to_string()))
    }
}

// =============================================================================
// BLOCK
// =============================================================================

/// What a block shows. Only chart blocks accept style drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Chart,
}

impl BlockKind {
    /// Infer the kind of a block that arrived without a type.
    ///
    /// Boundary helper only: inside the core the kind is always explicit.
    #[must_use]
    pub fn infer(id: &str) -> Self {
        if is_acceptor_target(id) {
            Self::Chart
        } else {
            Self::Text
        }
    }
}

/// A reorderable, styleable unit of an arrangement.
///
/// Position is derived from arrangement order and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identity.
    pub id: BlockId,
    /// Text or chart.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Chart style, if one was chosen.
    #[serde(
        rename = "chartType",
        alias = "styleValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub style: Option<ChartStyle>,
    /// Section the block is grouped under, on sectioned boards.
    #[serde(rename = "sectionId", default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Accent color, e.g. `#6366f1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Whether the block may be swapped for another widget.
    #[serde(default = "editable_default", skip_serializing_if = "is_editable")]
    pub editable: bool,
}

const fn editable_default() -> bool {
    true
}

const fn is_editable(editable: &bool) -> bool {
    *editable
}

impl Block {
    /// Create a text block.
    #[must_use]
    pub fn text(id: BlockId) -> Self {
        Self {
            id,
            kind: BlockKind::Text,
            style: None,
            section: None,
            title: None,
            color: None,
            editable: true,
        }
    }

    /// Create a chart block with an initial style.
    #[must_use]
    pub fn chart(id: BlockId, style: ChartStyle) -> Self {
        Self {
            style: Some(style),
            kind: BlockKind::Chart,
            ..Self::text(id)
        }
    }

    /// Group the block under `section`.
    #[must_use]
    pub fn in_section(mut self, section: SectionId) -> Self {
        self.section = Some(section);
        self
    }

    /// Set the display title and accent color.
    #[must_use]
    pub fn labelled(mut self, title: impl Into<String>, color: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.color = Some(color.into());
        self
    }

    /// Pin the block so it can never be replaced.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Whether a style token may be dropped onto this block.
    #[must_use]
    pub fn accepts_style(&self) -> bool {
        self.kind == BlockKind::Chart
    }

    /// The style a chart block renders with; unstyled charts render as bars.
    #[must_use]
    pub fn effective_style(&self) -> Option<ChartStyle> {
        match self.kind {
            BlockKind::Chart => Some(self.style.unwrap_or(ChartStyle::Bar)),
            BlockKind::Text => None,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in blockdeck.
///
/// - Fallible operations return `Result<T, DeckError>`
/// - The core never panics; interaction paths degrade to no-ops
#[derive(Debug, Error)]
pub enum DeckError {
    /// An id string is empty or uses a reserved namespace.
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    /// A style name is not part of the style vocabulary or catalog.
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// The block is not part of the arrangement.
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    /// The same block id appears twice in one arrangement.
    #[error("Duplicate block: {0}")]
    DuplicateBlock(BlockId),

    /// The section is not part of the layout.
    #[error("Section not found: {0}")]
    SectionNotFound(SectionId),

    /// The same section id appears twice in one layout.
    #[error("Duplicate section: {0}")]
    DuplicateSection(SectionId),

    /// The section column count is not 1 or 2.
    #[error("Invalid column count: {0}")]
    InvalidColumns(u8),

    /// The block is pinned and cannot be replaced.
    #[error("Block is not editable: {0}")]
    NotEditable(BlockId),

    /// A drag is already active; only one drag may run at a time.
    #[error("Drag already in progress: {0}")]
    DragInProgress(String),

    /// The storage backend has no room for the value.
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration could not be read or is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================
