//! # Arrangement
//!
//! The ordered collection of blocks a board shows. Block ids are unique;
//! this is checked whenever an arrangement is built from outside data,
//! including deserialization.

use crate::{Block, BlockId, ChartStyle, DeckError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered sequence of blocks with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Arrangement {
    blocks: Vec<Block>,
}

impl Arrangement {
    /// Build an arrangement, rejecting duplicate ids.
    pub fn new(blocks: Vec<Block>) -> Result<Self, DeckError> {
        let mut seen = BTreeSet::new();
        for block in &blocks {
            if !seen.insert(&block.id) {
                return Err(DeckError::DuplicateBlock(block.id.clone()));
            }
        }
        Ok(Self { blocks })
    }

    /// Wrap blocks already known to be unique (a permutation or in-place
    /// edit of a valid arrangement).
    pub(crate) fn from_unique(blocks: Vec<Block>) -> Self {
        debug_assert!(Self::new(blocks.clone()).is_ok());
        Self { blocks }
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of a block, if present.
    #[must_use]
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &BlockId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.blocks.iter().map(|b| &b.id)
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}

impl TryFrom<Vec<Block>> for Arrangement {
    type Error = DeckError;

    fn try_from(blocks: Vec<Block>) -> Result<Self, Self::Error> {
        Self::new(blocks)
    }
}

impl From<Arrangement> for Vec<Block> {
    fn from(arrangement: Arrangement) -> Self {
        arrangement.blocks
    }
}

/// The arrangement a board starts with when nothing is persisted.
#[must_use]
pub fn default_dashboard() -> Arrangement {
    let ids = ["text-1", "chart-1", "text-2", "chart-2"]
        .map(|raw| BlockId::parse(raw).ok());
    let [Some(text_1), Some(chart_1), Some(text_2), Some(chart_2)] = ids else {
        return Arrangement::default();
    };
    Arrangement::from_unique(vec![
        Block::text(text_1),
        Block::chart(chart_1, ChartStyle::Bar),
        Block::text(text_2),
        Block::chart(chart_2, ChartStyle::Radar),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockKind;

    fn id(raw: &str) -> BlockId {
        BlockId::parse(raw).expect("valid id")
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Arrangement::new(vec![Block::text(id("a")), Block::text(id("a"))]);
        assert!(matches!(result, Err(DeckError::DuplicateBlock(dup)) if dup == *"a"));
    }

    #[test]
    fn duplicate_ids_are_rejected_on_read() {
        let json = r#"[{"id":"a","type":"text"},{"id":"a","type":"chart"}]"#;
        assert!(serde_json::from_str::<Arrangement>(json).is_err());
    }

    #[test]
    fn serializes_as_plain_record_array() {
        let arrangement = Arrangement::new(vec![
            Block::chart(id("chart-1"), ChartStyle::Bar),
            Block::text(id("text-1")),
        ])
        .expect("valid");
        let json = serde_json::to_string(&arrangement).expect("serialize");
        assert_eq!(
            json,
            r#"[{"id":"chart-1","type":"chart","chartType":"bar"},{"id":"text-1","type":"text"}]"#
        );
    }

    #[test]
    fn default_dashboard_layout() {
        let dashboard = default_dashboard();
        let ids: Vec<&str> = dashboard.ids().map(BlockId::as_str).collect();
        assert_eq!(ids, vec!["text-1", "chart-1", "text-2", "chart-2"]);
        assert_eq!(dashboard.get(&id("chart-2")).and_then(|b| b.style), Some(ChartStyle::Radar));
        assert_eq!(dashboard.get(&id("text-2")).map(|b| b.kind), Some(BlockKind::Text));
    }

    #[test]
    fn lookup_by_id() {
        let dashboard = default_dashboard();
        assert_eq!(dashboard.position(&id("text-2")), Some(2));
        assert!(!dashboard.contains(&id("chart-9")));
    }
}
