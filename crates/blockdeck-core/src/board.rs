//! # Board
//!
//! The single owner of an arrangement. A `Board` wires the drag machine,
//! the mutation engines, the style catalog and the persistence gateway
//! together; adapters feed it pointer events and read [`BoardSnapshot`]s.
//!
//! Sectioned boards also own a [`SectionLayout`], reordered with the same
//! engine as blocks, and every board keeps a widget pool that `replace`
//! draws from.
//!
//! Every committed mutation is handed to the gateway right away. Saving
//! is best-effort and never fails an interaction.

use crate::arrangement::Arrangement;
use crate::catalog::StyleCatalog;
use crate::collision::{Candidate, CollisionResolver, PointerState, SectionCandidate};
use crate::gateway::{BoardKey, PersistenceGateway};
use crate::geometry::{Point, Rect};
use crate::identity::DragId;
use crate::layout::{Grouping, SectionLayout};
use crate::mutation::MutationEngine;
use crate::session::{DragMachine, DropIntent, NoOpReason, SessionSnapshot, TargetUpdate};
use crate::template::BoardTemplate;
use crate::{Block, BlockId, ChartStyle, DeckError, SectionId};
use serde::{Deserialize, Serialize};

// =============================================================================
// OUTCOMES
// =============================================================================

/// What a release (or a direct edit) did to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    /// `block` moved from index `from` to index `to`.
    Reordered { block: BlockId, from: usize, to: usize },
    /// `block` now renders with `style`.
    StyleApplied {
        block: BlockId,
        previous: Option<ChartStyle>,
        style: ChartStyle,
    },
    /// Section `section` moved from index `from` to index `to`.
    SectionMoved {
        section: SectionId,
        from: usize,
        to: usize,
    },
    /// `block` at index `at` was swapped out for `with`.
    Replaced {
        block: BlockId,
        with: BlockId,
        at: usize,
    },
    /// Nothing changed.
    NoOp { reason: NoOpReason },
}

impl DropOutcome {
    fn noop(reason: NoOpReason) -> Self {
        Self::NoOp { reason }
    }

    /// Whether the board changed.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::NoOp { .. })
    }
}

/// Everything an adapter needs to render a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: String,
    pub blocks: Arrangement,
    #[serde(default, skip_serializing_if = "SectionLayout::is_empty")]
    pub sections: SectionLayout,
    pub session: Option<SessionSnapshot>,
}

// =============================================================================
// BOARD
// =============================================================================

/// Owner of one board's arrangement and drag state.
#[derive(Debug)]
pub struct Board {
    key: BoardKey,
    arrangement: Arrangement,
    sections: SectionLayout,
    defaults: BoardTemplate,
    catalog: StyleCatalog,
    machine: DragMachine,
    gateway: Option<PersistenceGateway>,
}

impl Board {
    /// A volatile board showing `defaults`.
    #[must_use]
    pub fn new(key: BoardKey, defaults: impl Into<BoardTemplate>) -> Self {
        let defaults = defaults.into();
        Self {
            key,
            arrangement: defaults.blocks.clone(),
            sections: defaults.sections.clone(),
            defaults,
            catalog: StyleCatalog::default(),
            machine: DragMachine::default(),
            gateway: None,
        }
    }

    /// A persisted board: restores the stored arrangement and section
    /// layout, each falling back to `defaults` when nothing usable is stored.
    #[must_use]
    pub fn open(key: BoardKey, defaults: impl Into<BoardTemplate>, gateway: PersistenceGateway) -> Self {
        let defaults = defaults.into();
        let arrangement = match gateway.load(&key) {
            Some(stored) => {
                tracing::info!(board = %key, blocks = stored.len(), "restored arrangement");
                stored
            }
            None => {
                tracing::info!(board = %key, "no stored arrangement, using defaults");
                defaults.blocks.clone()
            }
        };
        let sections = gateway
            .load_sections(&key)
            .inspect(|stored| tracing::info!(board = %key, sections = stored.len(), "restored sections"))
            .unwrap_or_else(|| defaults.sections.clone());
        Self {
            key,
            arrangement,
            sections,
            defaults,
            catalog: StyleCatalog::default(),
            machine: DragMachine::default(),
            gateway: Some(gateway),
        }
    }

    /// Replace the style catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: StyleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Require `pixels` of pointer travel before a pointer-down becomes a drag.
    #[must_use]
    pub fn with_activation_distance(mut self, pixels: u32) -> Self {
        self.machine = DragMachine::new(pixels);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn key(&self) -> &BoardKey {
        &self.key
    }

    #[must_use]
    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    #[must_use]
    pub fn sections(&self) -> &SectionLayout {
        &self.sections
    }

    /// The arrangement grouped by section.
    #[must_use]
    pub fn grouping(&self) -> Grouping<'_> {
        self.sections.group(&self.arrangement)
    }

    /// Pool blocks that are not shown and may replace a shown one.
    pub fn available_blocks(&self) -> impl Iterator<Item = &Block> {
        self.defaults
            .pool
            .blocks()
            .iter()
            .filter(|block| !self.arrangement.contains(&block.id))
    }

    #[must_use]
    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn activation_distance(&self) -> u32 {
        self.machine.activation_distance()
    }

    /// True while a gesture is pending or dragging.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.machine.is_active()
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.gateway.as_ref().is_some_and(|g| g.backend().is_persistent())
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: self.key.name().to_string(),
            blocks: self.arrangement.clone(),
            sections: self.sections.clone(),
            session: self.machine.snapshot(),
        }
    }

    // -------------------------------------------------------------------------
    // Pointer events
    // -------------------------------------------------------------------------

    /// Pointer-down on a raw id as received from an adapter.
    pub fn pointer_down_raw(&mut self, raw: &str, at: Point) -> Result<(), DeckError> {
        let id = DragId::parse(raw)?;
        self.pointer_down(id, at)
    }

    /// Pointer-down on a block or a style token.
    pub fn pointer_down(&mut self, id: DragId, at: Point) -> Result<(), DeckError> {
        let known = match &id {
            DragId::Block(block) => {
                if self.arrangement.contains(block) {
                    Ok(())
                } else {
                    Err(DeckError::BlockNotFound(block.clone()))
                }
            }
            DragId::Token(style) => {
                if self.catalog.contains(*style) {
                    Ok(())
                } else {
                    Err(DeckError::UnknownStyle(style.to_string()))
                }
            }
        };
        known
            .and_then(|()| self.machine.pointer_down(id, at))
            .inspect_err(|error| tracing::warn!(board = %self.key, %error, "pointer-down rejected"))
    }

    /// Pointer move with the live geometry of the droppable blocks.
    ///
    /// Candidates that are not in the arrangement are ignored and each
    /// candidate's acceptor flag is taken from its block.
    pub fn pointer_move(&mut self, pointer: &PointerState, candidates: &[Candidate]) -> TargetUpdate {
        if !self.machine.is_active() {
            return TargetUpdate::Unchanged;
        }
        let live: Vec<Candidate> = candidates
            .iter()
            .filter_map(|candidate| {
                let block = self.arrangement.get(&candidate.id)?;
                Some(Candidate {
                    accepts_style: block.accepts_style(),
                    ..candidate.clone()
                })
            })
            .collect();
        self.machine.pointer_move(pointer, &live)
    }

    /// Release the pointer and commit whatever the drag resolved to.
    pub fn pointer_up(&mut self) -> DropOutcome {
        match self.machine.pointer_up() {
            DropIntent::NoOp(reason) => DropOutcome::noop(reason),
            DropIntent::Reorder {
                source,
                destination,
            } => self.commit_reorder(source, destination),
            DropIntent::ApplyStyle { target, style } => self.commit_style(target, style),
        }
    }

    /// Abandon the current gesture. Returns whether anything was live.
    pub fn cancel(&mut self) -> bool {
        self.machine.cancel()
    }

    // -------------------------------------------------------------------------
    // Direct edits
    // -------------------------------------------------------------------------

    /// Apply a style to a block without dragging (click-to-apply).
    pub fn apply_style_to(&mut self, target: &BlockId, style: ChartStyle) -> Result<DropOutcome, DeckError> {
        self.ensure_idle()?;
        if !self.catalog.contains(style) {
            return Err(DeckError::UnknownStyle(style.to_string()));
        }
        if !self.arrangement.contains(target) {
            return Err(DeckError::BlockNotFound(target.clone()));
        }
        Ok(self.commit_style(target.clone(), style))
    }

    /// Move `source` to the position of `destination` without dragging.
    pub fn move_block(&mut self, source: &BlockId, destination: &BlockId) -> Result<DropOutcome, DeckError> {
        self.ensure_idle()?;
        for id in [source, destination] {
            if !self.arrangement.contains(id) {
                return Err(DeckError::BlockNotFound(id.clone()));
            }
        }
        if source == destination {
            return Ok(DropOutcome::noop(NoOpReason::DroppedOnSelf));
        }
        Ok(self.commit_reorder(source.clone(), destination.clone()))
    }

    /// Move section `source` to the position of section `destination`.
    pub fn move_section(&mut self, source: &SectionId, destination: &SectionId) -> Result<DropOutcome, DeckError> {
        self.ensure_idle()?;
        let from = self.section_position(source)?;
        let to = self.section_position(destination)?;
        if from == to {
            return Ok(DropOutcome::noop(NoOpReason::DroppedOnSelf));
        }
        let next = MutationEngine::reorder_sections(&self.sections, source, destination)?;
        tracing::info!(board = %self.key, section = %source, from, to, "section moved");
        self.commit_sections(next);
        Ok(DropOutcome::SectionMoved {
            section: source.clone(),
            from,
            to,
        })
    }

    /// Release a dragged section: the section whose center is closest to
    /// `dragged` becomes the destination.
    ///
    /// Candidates that are not in the layout are ignored.
    pub fn drop_section(
        &mut self,
        source: &SectionId,
        dragged: &Rect,
        candidates: &[SectionCandidate],
    ) -> Result<DropOutcome, DeckError> {
        self.ensure_idle()?;
        self.section_position(source)?;
        let live: Vec<SectionCandidate> = candidates
            .iter()
            .filter(|candidate| self.sections.contains(&candidate.id))
            .cloned()
            .collect();
        match CollisionResolver::closest_center(dragged, &live) {
            None => Ok(DropOutcome::noop(NoOpReason::NoTarget)),
            Some(target) => {
                let target = target.clone();
                self.move_section(source, &target)
            }
        }
    }

    /// Swap the shown block `current` for `replacement` from the widget pool.
    ///
    /// `current` must be editable and `replacement` must not be shown
    /// already; see [`available_blocks`](Self::available_blocks).
    pub fn replace_block(&mut self, current: &BlockId, replacement: &BlockId) -> Result<DropOutcome, DeckError> {
        self.ensure_idle()?;
        let Some(shown) = self.arrangement.get(current) else {
            return Err(DeckError::BlockNotFound(current.clone()));
        };
        if !shown.editable {
            return Err(DeckError::NotEditable(current.clone()));
        }
        let Some(incoming) = self.defaults.pool.get(replacement) else {
            return Err(DeckError::BlockNotFound(replacement.clone()));
        };
        let next = MutationEngine::replace(&self.arrangement, current, incoming)?;
        let at = self.arrangement.position(current).unwrap_or_default();
        tracing::info!(board = %self.key, block = %current, with = %replacement, at, "block replaced");
        self.commit(next);
        Ok(DropOutcome::Replaced {
            block: current.clone(),
            with: replacement.clone(),
            at,
        })
    }

    /// Replace the whole arrangement, e.g. after an import.
    pub fn replace_arrangement(&mut self, arrangement: Arrangement) -> Result<(), DeckError> {
        self.ensure_idle()?;
        tracing::info!(board = %self.key, blocks = arrangement.len(), "arrangement replaced");
        self.commit(arrangement);
        Ok(())
    }

    /// Replace the section layout, e.g. after an import.
    pub fn replace_sections(&mut self, sections: SectionLayout) -> Result<(), DeckError> {
        self.ensure_idle()?;
        tracing::info!(board = %self.key, sections = sections.len(), "section layout replaced");
        self.commit_sections(sections);
        Ok(())
    }

    /// Restore the default arrangement and section layout.
    pub fn reset(&mut self) -> Result<(), DeckError> {
        self.ensure_idle()?;
        tracing::info!(board = %self.key, "board reset to defaults");
        self.commit(self.defaults.blocks.clone());
        if !self.sections.is_empty() || !self.defaults.sections.is_empty() {
            self.commit_sections(self.defaults.sections.clone());
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<(), DeckError> {
        match self.machine.snapshot() {
            Some(session) => Err(DeckError::DragInProgress(session.active_id)),
            None if self.machine.is_active() => Err(DeckError::DragInProgress("pending".to_string())),
            None => Ok(()),
        }
    }

    fn section_position(&self, id: &SectionId) -> Result<usize, DeckError> {
        self.sections
            .position(id)
            .ok_or_else(|| DeckError::SectionNotFound(id.clone()))
    }

    fn commit_reorder(&mut self, source: BlockId, destination: BlockId) -> DropOutcome {
        let (Some(from), Some(to)) = (
            self.arrangement.position(&source),
            self.arrangement.position(&destination),
        ) else {
            tracing::debug!(board = %self.key, block = %source, "reorder target went stale");
            return DropOutcome::noop(NoOpReason::StaleTarget);
        };
        let Ok(next) = MutationEngine::reorder(&self.arrangement, &source, &destination) else {
            return DropOutcome::noop(NoOpReason::StaleTarget);
        };
        tracing::info!(board = %self.key, block = %source, from, to, "block reordered");
        self.commit(next);
        DropOutcome::Reordered {
            block: source,
            from,
            to,
        }
    }

    fn commit_style(&mut self, target: BlockId, style: ChartStyle) -> DropOutcome {
        let Some(block) = self.arrangement.get(&target) else {
            return DropOutcome::noop(NoOpReason::StaleTarget);
        };
        if !block.accepts_style() {
            return DropOutcome::noop(NoOpReason::NotAcceptor);
        }
        let previous = block.style;
        let next = MutationEngine::apply_style(&self.arrangement, &target, style);
        tracing::info!(board = %self.key, block = %target, %style, "style applied");
        self.commit(next);
        DropOutcome::StyleApplied {
            block: target,
            previous,
            style,
        }
    }

    fn commit(&mut self, next: Arrangement) {
        self.arrangement = next;
        if let Some(gateway) = self.gateway.as_mut() {
            gateway.save(&self.key, &self.arrangement);
        }
    }

    fn commit_sections(&mut self, next: SectionLayout) {
        self.sections = next;
        if let Some(gateway) = self.gateway.as_mut() {
            gateway.save_sections(&self.key, &self.sections);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::default_dashboard;
    use crate::storage::{MemoryStore, StorageBackend};
    use crate::template::{basic_template, sectioned_template};

    fn id(raw: &str) -> BlockId {
        BlockId::parse(raw).expect("valid id")
    }

    fn board() -> Board {
        Board::new(BoardKey::default(), default_dashboard())
    }

    /// The default dashboard stacked vertically, 100px tall rows.
    fn column() -> Vec<Candidate> {
        ["text-1", "chart-1", "text-2", "chart-2"]
            .iter()
            .zip(0..)
            .map(|(raw, row)| Candidate::new(id(raw), Rect::new(0, row * 100, 300, 100), false))
            .collect()
    }

    fn order(board: &Board) -> Vec<String> {
        board.arrangement().ids().map(ToString::to_string).collect()
    }

    #[test]
    fn reorder_gesture_commits() {
        let mut board = board();
        board.pointer_down_raw("text-1", Point::new(10, 10)).expect("down");
        let moved = PointerState::new(Point::new(10, 360), Rect::new(0, 300, 300, 100));
        assert!(board.pointer_move(&moved, &column()).is_changed());
        assert_eq!(
            board.pointer_up(),
            DropOutcome::Reordered {
                block: id("text-1"),
                from: 0,
                to: 3,
            }
        );
        assert_eq!(order(&board), vec!["chart-1", "text-2", "chart-2", "text-1"]);
    }

    #[test]
    fn style_gesture_uses_block_acceptor_flag() {
        let mut board = board();
        board.pointer_down_raw("panel::pie", Point::new(500, 0)).expect("down");
        // Candidates arrive with accepts_style = false; the board corrects it.
        let over_chart = PointerState::new(Point::new(50, 150), Rect::new(40, 140, 20, 20));
        board.pointer_move(&over_chart, &column());
        let snapshot = board.snapshot();
        assert_eq!(
            snapshot.session.as_ref().and_then(|s| s.drop_highlight().cloned()),
            Some(id("chart-1"))
        );
        assert_eq!(
            board.pointer_up(),
            DropOutcome::StyleApplied {
                block: id("chart-1"),
                previous: Some(ChartStyle::Bar),
                style: ChartStyle::Pie,
            }
        );
        assert_eq!(order(&board), vec!["text-1", "chart-1", "text-2", "chart-2"]);
    }

    #[test]
    fn unknown_ids_are_rejected_at_pointer_down() {
        let mut board = board();
        assert!(matches!(
            board.pointer_down_raw("chart-9", Point::default()),
            Err(DeckError::BlockNotFound(_))
        ));
        assert!(matches!(
            board.pointer_down_raw("panel::donut", Point::default()),
            Err(DeckError::UnknownStyle(_))
        ));
        assert!(!board.is_dragging());
    }

    #[test]
    fn token_outside_catalog_is_rejected() {
        let catalog = StyleCatalog::new(
            StyleCatalog::default()
                .iter()
                .filter(|t| t.style != ChartStyle::Line)
                .cloned(),
        );
        let mut board = board().with_catalog(catalog);
        assert!(matches!(
            board.pointer_down(DragId::Token(ChartStyle::Line), Point::default()),
            Err(DeckError::UnknownStyle(_))
        ));
    }

    #[test]
    fn vanished_candidates_are_ignored() {
        let mut board = board();
        board.pointer_down_raw("text-1", Point::default()).expect("down");
        let ghost = vec![Candidate::new(id("ghost"), Rect::new(0, 0, 300, 100), false)];
        let state = PointerState::new(Point::new(10, 10), Rect::new(0, 0, 300, 100));
        assert_eq!(board.pointer_move(&state, &ghost), TargetUpdate::Unchanged);
        assert_eq!(
            board.pointer_up(),
            DropOutcome::NoOp {
                reason: NoOpReason::NoTarget
            }
        );
    }

    #[test]
    fn direct_edits_are_rejected_while_dragging() {
        let mut board = board();
        board.pointer_down_raw("text-1", Point::default()).expect("down");
        assert!(matches!(
            board.apply_style_to(&id("chart-1"), ChartStyle::Line),
            Err(DeckError::DragInProgress(_))
        ));
        assert!(matches!(board.reset(), Err(DeckError::DragInProgress(_))));
        assert!(board.cancel());
        assert!(board.reset().is_ok());
    }

    #[test]
    fn pending_gesture_blocks_direct_edits() {
        let mut board = board().with_activation_distance(8);
        board.pointer_down_raw("text-1", Point::default()).expect("down");
        assert!(board.snapshot().session.is_none());
        assert!(matches!(board.reset(), Err(DeckError::DragInProgress(_))));
    }

    #[test]
    fn click_to_apply() {
        let mut board = board();
        let outcome = board
            .apply_style_to(&id("chart-2"), ChartStyle::RadialBar)
            .expect("apply");
        assert!(outcome.is_mutation());
        assert_eq!(
            board.arrangement().get(&id("chart-2")).and_then(|b| b.style),
            Some(ChartStyle::RadialBar)
        );

        let on_text = board.apply_style_to(&id("text-1"), ChartStyle::Bar).expect("apply");
        assert_eq!(
            on_text,
            DropOutcome::NoOp {
                reason: NoOpReason::NotAcceptor
            }
        );
        assert!(matches!(
            board.apply_style_to(&id("chart-9"), ChartStyle::Bar),
            Err(DeckError::BlockNotFound(_))
        ));
    }

    #[test]
    fn move_block_without_gesture() {
        let mut board = board();
        let outcome = board.move_block(&id("chart-2"), &id("text-1")).expect("move");
        assert_eq!(
            outcome,
            DropOutcome::Reordered {
                block: id("chart-2"),
                from: 3,
                to: 0,
            }
        );
        assert_eq!(order(&board), vec!["chart-2", "text-1", "chart-1", "text-2"]);
        assert!(!board.move_block(&id("text-1"), &id("text-1")).expect("noop").is_mutation());
        assert!(matches!(
            board.move_block(&id("text-1"), &id("nope")),
            Err(DeckError::BlockNotFound(_))
        ));
    }

    #[test]
    fn mutations_are_persisted_and_restored() {
        let gateway = PersistenceGateway::new(StorageBackend::InMemory(MemoryStore::new()));
        let mut board = Board::open(BoardKey::default(), default_dashboard(), gateway);
        board.apply_style_to(&id("chart-1"), ChartStyle::Line).expect("apply");

        let Board { gateway, .. } = board;
        let gateway = gateway.expect("persisted board");
        let reopened = Board::open(BoardKey::default(), default_dashboard(), gateway);
        assert_eq!(
            reopened.arrangement().get(&id("chart-1")).and_then(|b| b.style),
            Some(ChartStyle::Line)
        );
    }

    #[test]
    fn failed_save_keeps_in_memory_arrangement() {
        let gateway = PersistenceGateway::new(StorageBackend::InMemory(MemoryStore::with_quota(0)));
        let mut board = Board::open(BoardKey::default(), default_dashboard(), gateway);
        let outcome = board.apply_style_to(&id("chart-1"), ChartStyle::Pie).expect("apply");
        assert!(outcome.is_mutation());
        assert_eq!(
            board.arrangement().get(&id("chart-1")).and_then(|b| b.style),
            Some(ChartStyle::Pie)
        );
    }

    #[test]
    fn snapshot_serializes_for_adapters() {
        let board = board();
        let json = serde_json::to_value(board.snapshot()).expect("serialize");
        assert_eq!(json["board"], "dashboard");
        assert_eq!(json["blocks"][1]["chartType"], "bar");
        assert!(json["session"].is_null());
    }

    #[test]
    fn stale_reorder_is_a_noop() {
        let mut board = board();
        let before = board.arrangement().clone();
        assert_eq!(
            board.commit_reorder(id("text-1"), id("ghost")),
            DropOutcome::NoOp {
                reason: NoOpReason::StaleTarget
            }
        );
        assert_eq!(board.arrangement(), &before);
    }

    // -------------------------------------------------------------------------
    // Sections
    // -------------------------------------------------------------------------

    fn sid(raw: &str) -> SectionId {
        SectionId::parse(raw).expect("valid section")
    }

    fn section_order(board: &Board) -> Vec<String> {
        board.sections().ids().map(ToString::to_string).collect()
    }

    /// The sectioned report stacked vertically, 200px per section.
    fn section_column(board: &Board) -> Vec<SectionCandidate> {
        board
            .sections()
            .ids()
            .zip(0..)
            .map(|(id, row)| SectionCandidate::new(id.clone(), Rect::new(0, row * 200, 800, 180)))
            .collect()
    }

    #[test]
    fn sections_move_as_a_whole() {
        let mut board = Board::new(BoardKey::default(), sectioned_template());
        let blocks_before = board.arrangement().clone();

        let outcome = board.move_section(&sid("sec5"), &sid("sec2")).expect("move");
        assert_eq!(
            outcome,
            DropOutcome::SectionMoved {
                section: sid("sec5"),
                from: 4,
                to: 1,
            }
        );
        assert_eq!(section_order(&board), ["sec1", "sec5", "sec2", "sec3", "sec4", "sec6"]);
        assert_eq!(board.arrangement(), &blocks_before);

        let grouping = board.grouping();
        let second: Vec<&str> = grouping.sections[1].blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(second, ["sec5-a", "sec5-b"]);
    }

    #[test]
    fn section_drop_resolves_by_closest_center() {
        let mut board = Board::new(BoardKey::default(), sectioned_template());
        let candidates = section_column(&board);

        // sec1 dragged down to the fourth slot.
        let outcome = board
            .drop_section(&sid("sec1"), &Rect::new(0, 610, 800, 180), &candidates)
            .expect("drop");
        assert!(matches!(outcome, DropOutcome::SectionMoved { from: 0, to: 3, .. }));
        assert_eq!(section_order(&board), ["sec2", "sec3", "sec4", "sec1", "sec5", "sec6"]);

        let onto_self = board
            .drop_section(&sid("sec1"), &Rect::new(0, 600, 800, 180), &section_column(&board))
            .expect("drop");
        assert_eq!(onto_self, DropOutcome::NoOp { reason: NoOpReason::DroppedOnSelf });
        assert_eq!(
            board.drop_section(&sid("sec1"), &Rect::default(), &[]).expect("drop"),
            DropOutcome::NoOp { reason: NoOpReason::NoTarget }
        );
        assert!(matches!(
            board.drop_section(&sid("sec9"), &Rect::default(), &candidates),
            Err(DeckError::SectionNotFound(_))
        ));
    }

    #[test]
    fn section_moves_wait_for_the_drag() {
        let mut board = Board::new(BoardKey::default(), sectioned_template());
        board.pointer_down_raw("sec1-a", Point::default()).expect("down");
        assert!(matches!(
            board.move_section(&sid("sec1"), &sid("sec2")),
            Err(DeckError::DragInProgress(_))
        ));
    }

    #[test]
    fn sections_persist_and_reset() {
        let gateway = PersistenceGateway::new(StorageBackend::InMemory(MemoryStore::new()));
        let mut board = Board::open(BoardKey::default(), sectioned_template(), gateway);
        board.move_section(&sid("sec6"), &sid("sec1")).expect("move");

        let Board { gateway, .. } = board;
        let gateway = gateway.expect("persisted board");
        let mut reopened = Board::open(BoardKey::default(), sectioned_template(), gateway);
        assert_eq!(section_order(&reopened)[0], "sec6");

        reopened.reset().expect("reset");
        assert_eq!(reopened.sections(), &sectioned_template().sections);
    }

    #[test]
    fn snapshot_lists_sections_only_when_present() {
        let sectioned = Board::new(BoardKey::default(), sectioned_template());
        let json = serde_json::to_value(sectioned.snapshot()).expect("serialize");
        assert_eq!(json["sections"][1]["sectionId"], "sec2");
        assert_eq!(json["sections"][1]["cols"], 2);
        assert_eq!(json["blocks"][0]["sectionId"], "sec1");

        let json = serde_json::to_value(board().snapshot()).expect("serialize");
        assert!(json.get("sections").is_none());
    }

    // -------------------------------------------------------------------------
    // Replacement
    // -------------------------------------------------------------------------

    #[test]
    fn replace_draws_from_unshown_pool_blocks() {
        let mut board = Board::new(BoardKey::default(), basic_template());
        let available: Vec<&str> = board.available_blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(available, ["text-3", "chart-3"]);

        let outcome = board.replace_block(&id("chart-1"), &id("chart-3")).expect("replace");
        assert_eq!(
            outcome,
            DropOutcome::Replaced {
                block: id("chart-1"),
                with: id("chart-3"),
                at: 1,
            }
        );
        assert_eq!(order(&board), ["text-1", "chart-3", "text-2", "chart-2"]);
        let available: Vec<&str> = board.available_blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(available, ["chart-1", "text-3"]);
    }

    #[test]
    fn replace_rejects_shown_unknown_and_locked_blocks() {
        let mut board = Board::new(BoardKey::default(), basic_template());
        assert!(matches!(
            board.replace_block(&id("text-1"), &id("chart-2")),
            Err(DeckError::DuplicateBlock(_))
        ));
        assert!(matches!(
            board.replace_block(&id("text-1"), &id("chart-9")),
            Err(DeckError::BlockNotFound(_))
        ));
        assert!(matches!(
            board.replace_block(&id("ghost"), &id("text-3")),
            Err(DeckError::BlockNotFound(_))
        ));

        let pinned = Arrangement::new(vec![Block::text(id("text-1")).locked()]).expect("valid");
        let mut board = Board::new(
            BoardKey::default(),
            BoardTemplate {
                pool: Arrangement::new(vec![Block::text(id("text-1")), Block::text(id("text-2"))])
                    .expect("valid"),
                blocks: pinned,
                sections: SectionLayout::default(),
            },
        );
        assert!(board.available_blocks().any(|b| b.id == *"text-2"));
        assert!(matches!(
            board.replace_block(&id("text-1"), &id("text-2")),
            Err(DeckError::NotEditable(_))
        ));
    }

    #[test]
    fn replacement_stays_in_its_section() {
        let template = sectioned_template();
        let spare = Block::chart(id("spare"), ChartStyle::Pie).labelled("Spare", "#000000");
        let mut pool = template.pool.clone().into_blocks();
        pool.push(spare);
        let mut board = Board::new(
            BoardKey::default(),
            BoardTemplate {
                pool: Arrangement::new(pool).expect("valid"),
                ..template
            },
        );

        board.replace_block(&id("sec3-b"), &id("spare")).expect("replace");
        let grouping = board.grouping();
        let third: Vec<&str> = grouping.sections[2].blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(third, ["sec3-a", "spare"]);
    }
}
