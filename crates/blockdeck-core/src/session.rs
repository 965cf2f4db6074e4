//! # Drag Session State Machine
//!
//! Tracks the lifecycle of one drag gesture:
//!
//! ```text
//! Idle ──pointer_down──▶ Pending ──moved ≥ activation──▶ Dragging
//!  ▲  └──────────────(activation 0)─────────────────────▶   │
//!  │                                                         │
//!  └────────────── pointer_up / cancel ◀─────────────────────┘
//! ```
//!
//! The machine owns no arrangement. `pointer_up` yields a [`DropIntent`]
//! and the caller decides what to mutate.
//!
//! ## Invariants
//!
//! - At most one session is live.
//! - A session's role is fixed at pointer-down.
//! - Events that don't apply to the current state are ignored.

use crate::collision::{Candidate, CollisionResolver, PointerState};
use crate::geometry::Point;
use crate::identity::{DragId, DragRole};
use crate::{BlockId, ChartStyle, DeckError};
use serde::{Deserialize, Serialize};

// =============================================================================
// SESSION
// =============================================================================

/// State of an active drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    active: DragId,
    role: DragRole,
    over: Option<BlockId>,
}

impl DragSession {
    fn new(active: DragId) -> Self {
        let role = active.role();
        Self {
            active,
            role,
            over: None,
        }
    }

    #[must_use]
    pub fn active(&self) -> &DragId {
        &self.active
    }

    #[must_use]
    pub fn role(&self) -> DragRole {
        self.role
    }

    #[must_use]
    pub fn over(&self) -> Option<&BlockId> {
        self.over.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active_id: self.active.to_string(),
            role: self.role,
            current_target_id: self.over.clone(),
        }
    }
}

/// What adapters see of an active drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub active_id: String,
    pub role: DragRole,
    pub current_target_id: Option<BlockId>,
}

impl SessionSnapshot {
    /// The acceptor to highlight. Only style drags highlight their target.
    #[must_use]
    pub fn drop_highlight(&self) -> Option<&BlockId> {
        match self.role {
            DragRole::Style => self.current_target_id.as_ref(),
            DragRole::Reorder => None,
        }
    }
}

// =============================================================================
// EVENT RESULTS
// =============================================================================

/// Result of a pointer move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetUpdate {
    /// The published target is still correct.
    Unchanged,
    /// The target changed; `None` means nothing is under the drag anymore.
    Changed(Option<BlockId>),
}

impl TargetUpdate {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// Why a release did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// No drag was live.
    Idle,
    /// Released before the activation distance was reached.
    Click,
    /// Released with nothing under the drag.
    NoTarget,
    /// A block was dropped on itself.
    DroppedOnSelf,
    /// The target is no longer in the arrangement.
    StaleTarget,
    /// A style was aimed at a block that does not accept styles.
    NotAcceptor,
}

/// What a release asks the owner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent {
    Reorder {
        source: BlockId,
        destination: BlockId,
    },
    ApplyStyle {
        target: BlockId,
        style: ChartStyle,
    },
    NoOp(NoOpReason),
}

// =============================================================================
// MACHINE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Pending {
        active: DragId,
        origin: Point,
    },
    Dragging(DragSession),
}

/// The drag state machine. See the module docs.
#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    state: DragState,
    activation_distance: u32,
}

impl DragMachine {
    /// Create a machine that activates once the pointer has travelled
    /// `activation_distance` pixels. 0 activates on pointer-down.
    #[must_use]
    pub fn new(activation_distance: u32) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance,
        }
    }

    #[must_use]
    pub fn activation_distance(&self) -> u32 {
        self.activation_distance
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// True while a gesture is pending or dragging.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_idle()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Snapshot of the live drag; pending gestures are not drags yet.
    #[must_use]
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session().map(DragSession::snapshot)
    }

    /// Begin a gesture on `id` at `at`.
    pub fn pointer_down(&mut self, id: DragId, at: Point) -> Result<(), DeckError> {
        if let Some(current) = self.current_id() {
            return Err(DeckError::DragInProgress(current.to_string()));
        }
        if self.activation_distance == 0 {
            tracing::debug!(active = %id, "drag started");
            self.state = DragState::Dragging(DragSession::new(id));
        } else {
            tracing::debug!(active = %id, "drag pending");
            self.state = DragState::Pending {
                active: id,
                origin: at,
            };
        }
        Ok(())
    }

    /// Feed a pointer move with the live candidate geometry.
    pub fn pointer_move(&mut self, pointer: &PointerState, candidates: &[Candidate]) -> TargetUpdate {
        if let DragState::Pending { active, origin } = &self.state {
            if !self.travelled_enough(*origin, pointer.pointer) {
                return TargetUpdate::Unchanged;
            }
            tracing::debug!(active = %active, "drag activated");
            self.state = DragState::Dragging(DragSession::new(active.clone()));
        }

        let DragState::Dragging(session) = &mut self.state else {
            return TargetUpdate::Unchanged;
        };

        let resolved = CollisionResolver::resolve(session.role, pointer, candidates);
        if resolved == session.over {
            return TargetUpdate::Unchanged;
        }
        tracing::debug!(
            active = %session.active,
            target = ?resolved.as_ref().map(BlockId::as_str),
            "drop target changed"
        );
        session.over.clone_from(&resolved);
        TargetUpdate::Changed(resolved)
    }

    /// Release the pointer. Always returns the machine to idle.
    pub fn pointer_up(&mut self) -> DropIntent {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DropIntent::NoOp(NoOpReason::Idle),
            DragState::Pending { .. } => DropIntent::NoOp(NoOpReason::Click),
            DragState::Dragging(session) => Self::intent_for(session),
        }
    }

    /// Abandon the gesture. Returns whether anything was live.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        if was_active {
            tracing::debug!("drag cancelled");
        }
        self.state = DragState::Idle;
        was_active
    }

    fn current_id(&self) -> Option<&DragId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pending { active, .. } => Some(active),
            DragState::Dragging(session) => Some(&session.active),
        }
    }

    fn travelled_enough(&self, origin: Point, now: Point) -> bool {
        let threshold = i128::from(self.activation_distance);
        origin.distance_sq(&now) >= threshold * threshold
    }

    fn intent_for(session: DragSession) -> DropIntent {
        let Some(target) = session.over else {
            return DropIntent::NoOp(NoOpReason::NoTarget);
        };
        match session.active {
            DragId::Block(source) if source == target => DropIntent::NoOp(NoOpReason::DroppedOnSelf),
            DragId::Block(source) => DropIntent::Reorder {
                source,
                destination: target,
            },
            DragId::Token(style) => DropIntent::ApplyStyle { target, style },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
