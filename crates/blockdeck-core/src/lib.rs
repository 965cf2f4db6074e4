//! # blockdeck-core
//!
//! The drag-interaction engine for blockdeck boards - THE LOGIC.
//!
//! A board is an ordered arrangement of text and chart blocks. Users
//! rearrange blocks by dragging them, and restyle chart blocks by dragging a
//! style token from the side panel onto them. Both gestures share one
//! pointer surface; the drag id decides which one is happening.
//!
//! ## Layers
//!
//! - `types`, `identity` - ids, blocks, styles and role classification
//! - `layout`, `template` - sections and the defaults a board starts from
//! - `geometry`, `collision` - integer hit testing
//! - `session` - the drag state machine
//! - `mutation` - pure reorder and style-apply engines
//! - `gateway`, `storage`, `formats`, `export` - persistence
//! - `board` - the owner that wires everything together
//!
//! ## Architectural Constraints
//!
//! - Synchronous and deterministic: integer geometry, no floating point
//! - No async, no network dependencies
//! - Emits `tracing` events; installing a subscriber is the app's job

// =============================================================================
// MODULES
// =============================================================================

pub mod arrangement;
pub mod board;
pub mod catalog;
pub mod collision;
pub mod export;
pub mod formats;
pub mod gateway;
pub mod geometry;
pub mod identity;
pub mod layout;
pub mod mutation;
pub mod primitives;
pub mod session;
pub mod storage;
pub mod template;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Block, BlockId, BlockKind, ChartStyle, DeckError, SectionId};

// =============================================================================
// RE-EXPORTS: Interaction Engine
// =============================================================================

pub use arrangement::{Arrangement, default_dashboard};
pub use board::{Board, BoardSnapshot, DropOutcome};
pub use catalog::{StyleCatalog, StyleToken};
pub use collision::{Candidate, CollisionResolver, HitStrategy, PointerState, SectionCandidate};
pub use geometry::{Point, Rect};
pub use identity::{DragId, DragRole, classify_role, is_acceptor_target};
pub use layout::{Columns, Grouping, Section, SectionGroup, SectionLayout};
pub use mutation::{MutationEngine, array_move};
pub use session::{
    DragMachine, DragSession, DropIntent, NoOpReason, SessionSnapshot, TargetUpdate,
};
pub use template::{BoardTemplate, TemplateKind, basic_template, sectioned_template};

// =============================================================================
// RE-EXPORTS: Persistence
// =============================================================================

pub use export::{
    Snapshot, SnapshotHeader, arrangement_checksum, board_checksum, export_snapshot,
    import_snapshot,
};
pub use formats::{
    arrangement_from_json, arrangement_to_json, ensure_persistable, sections_from_json,
    sections_to_json,
};
pub use gateway::{
    BoardKey, DiagnosticHook, PersistenceFailure, PersistenceGateway, PersistenceOp,
};
pub use storage::{KeyValueStore, MemoryStore, RedbStore, StorageBackend};

#[cfg(feature = "crypto-hash")]
pub use export::arrangement_crypto_hash;
