//! # Collision Resolver
//!
//! Decides which drop target the current pointer state hits.
//!
//! The strategy depends on the drag role and the asymmetry is deliberate:
//! - Style drops use **point containment** against acceptor blocks only.
//!   Applying a style must hit exactly the block under the pointer.
//! - Reorders use **maximal rectangle overlap** with the dragged item's
//!   bounds, ties broken by nearest center. The user only needs to drag
//!   "near" the destination.
//!
//! Resolution is a pure function of the inputs. A candidate that vanished
//! since the last tick is simply not in the slice.
//!
//! Whole sections are dropped with a third strategy, **closest center**:
//! the section whose center is nearest the dragged section's center wins,
//! overlapping or not.

use crate::geometry::{Point, Rect};
use crate::identity::DragRole;
use crate::{BlockId, SectionId};
use serde::{Deserialize, Serialize};

/// Live geometry of one droppable block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: BlockId,
    pub rect: Rect,
    /// Whether style tokens may be dropped here.
    #[serde(default)]
    pub accepts_style: bool,
}

impl Candidate {
    #[must_use]
    pub fn new(id: BlockId, rect: Rect, accepts_style: bool) -> Self {
        Self {
            id,
            rect,
            accepts_style,
        }
    }
}

/// Live geometry of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCandidate {
    pub id: SectionId,
    pub rect: Rect,
}

impl SectionCandidate {
    #[must_use]
    pub fn new(id: SectionId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

/// Pointer position plus the current bounds of the dragged item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerState {
    pub pointer: Point,
    pub drag_rect: Rect,
}

impl PointerState {
    #[must_use]
    pub const fn new(pointer: Point, drag_rect: Rect) -> Self {
        Self { pointer, drag_rect }
    }
}

/// Hit-test strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitStrategy {
    /// Target is the acceptor whose bounds contain the pointer.
    PointerWithin,
    /// Target is the candidate overlapping the dragged bounds the most.
    RectOverlap,
}

impl HitStrategy {
    /// The strategy used for a drag role.
    #[must_use]
    pub const fn for_role(role: DragRole) -> Self {
        match role {
            DragRole::Style => Self::PointerWithin,
            DragRole::Reorder => Self::RectOverlap,
        }
    }
}

/// Stateless resolver; see the module docs.
pub struct CollisionResolver;

impl CollisionResolver {
    /// Resolve the drop target for `role`, or `None` when nothing qualifies.
    #[must_use]
    pub fn resolve(
        role: DragRole,
        pointer: &PointerState,
        candidates: &[Candidate],
    ) -> Option<BlockId> {
        let hit = match HitStrategy::for_role(role) {
            HitStrategy::PointerWithin => Self::pointer_within(pointer.pointer, candidates),
            HitStrategy::RectOverlap => Self::rect_overlap(&pointer.drag_rect, candidates),
        };
        hit.map(|candidate| candidate.id.clone())
    }

    /// The section whose center is nearest `dragged`'s; earliest on ties.
    #[must_use]
    pub fn closest_center<'a>(
        dragged: &Rect,
        candidates: &'a [SectionCandidate],
    ) -> Option<&'a SectionId> {
        let mut best: Option<(&SectionCandidate, i128)> = None;
        for candidate in candidates {
            let distance = dragged.center_distance_sq(&candidate.rect);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }
        best.map(|(candidate, _)| &candidate.id)
    }

    /// Acceptors containing the point; nearest center wins, then earliest.
    fn pointer_within(point: Point, candidates: &[Candidate]) -> Option<&Candidate> {
        let mut best: Option<(&Candidate, i128)> = None;
        for candidate in candidates
            .iter()
            .filter(|c| c.accepts_style && c.rect.contains(point))
        {
            let distance = candidate.rect.center_distance_to_point_sq(point);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    /// Largest overlap wins; nearest center breaks ties, then earliest.
    fn rect_overlap<'a>(dragged: &Rect, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        let mut best: Option<(&Candidate, i64, i128)> = None;
        for candidate in candidates {
            let area = dragged.overlap_area(&candidate.rect);
            if area == 0 {
                continue;
            }
            let distance = dragged.center_distance_sq(&candidate.rect);
            let better = match best {
                None => true,
                Some((_, best_area, best_distance)) => {
                    area > best_area || (area == best_area && distance < best_distance)
                }
            };
            if better {
                best = Some((candidate, area, distance));
            }
        }
        best.map(|(candidate, _, _)| candidate)
    }
}

// =============================================================================
// TESTS
// =============================================================================
