//! # Mutation Engines
//!
//! Pure functions that derive a new arrangement (or section layout) from
//! an old one. No engine mutates its input.
//!
//! - [`MutationEngine::reorder`] permutes: one block moves, the rest keep
//!   their relative order.
//! - [`MutationEngine::reorder_sections`] does the same for whole sections.
//! - [`MutationEngine::apply_style`] edits: exactly one block's style changes.
//! - [`MutationEngine::replace`] swaps one block for another in place.

use crate::arrangement::Arrangement;
use crate::layout::SectionLayout;
use crate::{Block, BlockId, ChartStyle, DeckError, SectionId};

/// Move the element at `from` to `to`, shifting the elements in between.
///
/// Out-of-range indices leave the slice as it was.
pub fn array_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() || to >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

/// Stateless home of the two engines.
pub struct MutationEngine;

impl MutationEngine {
    /// Move `source` to the position currently held by `destination`.
    ///
    /// Both ids must be in the arrangement.
    pub fn reorder(
        arrangement: &Arrangement,
        source: &BlockId,
        destination: &BlockId,
    ) -> Result<Arrangement, DeckError> {
        let from = arrangement
            .position(source)
            .ok_or_else(|| DeckError::BlockNotFound(source.clone()))?;
        let to = arrangement
            .position(destination)
            .ok_or_else(|| DeckError::BlockNotFound(destination.clone()))?;

        if from == to {
            return Ok(arrangement.clone());
        }
        Ok(Arrangement::from_unique(array_move(
            arrangement.blocks(),
            from,
            to,
        )))
    }

    /// Move section `source` to the position currently held by `destination`.
    pub fn reorder_sections(
        layout: &SectionLayout,
        source: &SectionId,
        destination: &SectionId,
    ) -> Result<SectionLayout, DeckError> {
        let from = layout
            .position(source)
            .ok_or_else(|| DeckError::SectionNotFound(source.clone()))?;
        let to = layout
            .position(destination)
            .ok_or_else(|| DeckError::SectionNotFound(destination.clone()))?;

        if from == to {
            return Ok(layout.clone());
        }
        Ok(SectionLayout::from_unique(array_move(
            layout.sections(),
            from,
            to,
        )))
    }

    /// Put `replacement` where `current` is. The replacement joins the
    /// section of the block it replaces.
    ///
    /// `replacement` must not already be shown.
    pub fn replace(
        arrangement: &Arrangement,
        current: &BlockId,
        replacement: &Block,
    ) -> Result<Arrangement, DeckError> {
        let index = arrangement
            .position(current)
            .ok_or_else(|| DeckError::BlockNotFound(current.clone()))?;
        if arrangement.contains(&replacement.id) {
            return Err(DeckError::DuplicateBlock(replacement.id.clone()));
        }
        let mut blocks = arrangement.blocks().to_vec();
        let mut incoming = replacement.clone();
        incoming.section = blocks[index].section.take();
        blocks[index] = incoming;
        Ok(Arrangement::from_unique(blocks))
    }

    /// Replace the style of `target`. An absent target yields the input
    /// unchanged.
    #[must_use]
    pub fn apply_style(arrangement: &Arrangement, target: &BlockId, style: ChartStyle) -> Arrangement {
        if !arrangement.contains(target) {
            return arrangement.clone();
        }
        let blocks = arrangement
            .blocks()
            .iter()
            .map(|block| {
                let mut block = block.clone();
                if &block.id == target {
                    block.style = Some(style);
                }
                block
            })
            .collect();
        Arrangement::from_unique(blocks)
    }
}
