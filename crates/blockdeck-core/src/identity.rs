//! # Identity & Classification
//!
//! Everything that can be grabbed is a [`DragId`]: either a block of the
//! arrangement or a style token from the side panel. The role of a drag is
//! a property of that tagged id, fixed when the id is constructed.
//!
//! The raw-string predicates ([`classify_role`], [`is_acceptor_target`])
//! exist for the boundary that receives ids from outside (HTTP, CLI,
//! persisted records). Past the boundary, nothing inspects id prefixes.

use crate::primitives::{CHART_BLOCK_PREFIX, STYLE_TOKEN_PREFIX};
use crate::{BlockId, ChartStyle, DeckError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a drag does when it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragRole {
    /// A block is being moved to a new position.
    Reorder,
    /// A style token is being dropped onto a chart block.
    Style,
}

/// Classify a raw id by role. Total: every string has a role.
#[must_use]
pub fn classify_role(raw: &str) -> DragRole {
    if raw.starts_with(STYLE_TOKEN_PREFIX) {
        DragRole::Style
    } else {
        DragRole::Reorder
    }
}

/// Whether a raw block id denotes a block that accepts style drops.
#[must_use]
pub fn is_acceptor_target(raw: &str) -> bool {
    raw.starts_with(CHART_BLOCK_PREFIX)
}

/// A grabbable thing: a block or a style token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragId {
    Block(BlockId),
    Token(ChartStyle),
}

impl DragId {
    /// Parse an id received from outside the core.
    ///
    /// `panel::<style>` is a style token; any other non-empty string is a
    /// block id.
    pub fn parse(raw: &str) -> Result<Self, DeckError> {
        match raw.strip_prefix(STYLE_TOKEN_PREFIX) {
            Some(style) => Ok(Self::Token(style.parse()?)),
            None => Ok(Self::Block(BlockId::parse(raw)?)),
        }
    }

    /// The role this id plays when dragged. Never changes for a given id.
    #[must_use]
    pub fn role(&self) -> DragRole {
        match self {
            Self::Block(_) => DragRole::Reorder,
            Self::Token(_) => DragRole::Style,
        }
    }

    /// The block id, for reorder drags.
    #[must_use]
    pub fn as_block(&self) -> Option<&BlockId> {
        match self {
            Self::Block(id) => Some(id),
            Self::Token(_) => None,
        }
    }

    /// The carried style, for token drags.
    #[must_use]
    pub fn as_style(&self) -> Option<ChartStyle> {
        match self {
            Self::Token(style) => Some(*style),
            Self::Block(_) => None,
        }
    }
}

impl fmt::Display for DragId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(id) => write!(f, "{id}"),
            Self::Token(style) => write!(f, "{STYLE_TOKEN_PREFIX}{style}"),
        }
    }
}

impl From<BlockId> for DragId {
    fn from(id: BlockId) -> Self {
        Self::Block(id)
    }
}

impl From<ChartStyle> for DragId {
    fn from(style: ChartStyle) -> Self {
        Self::Token(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_ids_are_style_sources() {
        assert_eq!(classify_role("panel::bar"), DragRole::Style);
        assert_eq!(classify_role("chart-1"), DragRole::Reorder);
        assert_eq!(classify_role(""), DragRole::Reorder);
    }

    #[test]
    fn acceptors_are_chart_prefixed() {
        assert!(is_acceptor_target("chart-2"));
        assert!(!is_acceptor_target("text-1"));
        assert!(!is_acceptor_target("panel::bar"));
    }

    #[test]
    fn parse_token() {
        let id = DragId::parse("panel::radar").expect("parse");
        assert_eq!(id, DragId::Token(ChartStyle::Radar));
        assert_eq!(id.role(), DragRole::Style);
        assert_eq!(id.to_string(), "panel::radar");
    }

    #[test]
    fn parse_block() {
        let id = DragId::parse("text-1").expect("parse");
        assert_eq!(id.role(), DragRole::Reorder);
        assert_eq!(id.as_block().map(BlockId::as_str), Some("text-1"));
        assert_eq!(id.to_string(), "text-1");
    }

    #[test]
    fn parse_rejects_unknown_token_and_empty() {
        assert!(matches!(
            DragId::parse("panel::donut"),
            Err(DeckError::UnknownStyle(_))
        ));
        assert!(matches!(DragId::parse(""), Err(DeckError::InvalidId(_))));
    }

    #[test]
    fn role_agrees_with_raw_classification() {
        for raw in ["panel::pie", "chart-4", "text-9", "a"] {
            let id = DragId::parse(raw).expect("parse");
            assert_eq!(id.role(), classify_role(raw));
        }
    }

    #[test]
    fn prefixed_ids_never_fall_back_to_blocks() {
        for raw in ["panel::", "panel::panel::bar", "panel::Bar"] {
            assert_eq!(classify_role(raw), DragRole::Style);
            assert!(matches!(
                DragId::parse(raw),
                Err(DeckError::UnknownStyle(_))
            ));
        }
    }
}
