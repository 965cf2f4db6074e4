//! # Snapshot Export
//!
//! Binary export of one board for backup and transfer between stores.
//!
//! Format: header (5 bytes) + postcard payload.
//! - 4 bytes: magic (`BDCK`)
//! - 1 byte: version
//! - payload: board name, blocks, sections, checksum
//!
//! Size and header are validated before the payload is decoded, and the
//! checksum is verified after. Export enforces the same block count and
//! size limits, so every exported snapshot can be imported again.

use crate::arrangement::Arrangement;
use crate::formats::{arrangement_to_json, sections_to_json};
use crate::layout::{Columns, Section, SectionLayout};
use crate::primitives::{MAX_PERSISTED_SIZE, MAX_SNAPSHOT_BLOCKS, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
use crate::{Block, BlockId, BlockKind, ChartStyle, DeckError, SectionId};
use serde::{Deserialize, Serialize};

/// Length of the snapshot header.
const HEADER_LEN: usize = 5;

// =============================================================================
// HEADER
// =============================================================================

/// The header that precedes every snapshot payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
        }
    }

    /// Error messages stay generic so they don't describe the format.
    pub fn validate(&self) -> Result<(), DeckError> {
        if &self.magic != SNAPSHOT_MAGIC {
            return Err(DeckError::DeserializationError(
                "Invalid snapshot format".to_string(),
            ));
        }
        if self.version != SNAPSHOT_VERSION {
            return Err(DeckError::DeserializationError(
                "Unsupported snapshot version".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeckError> {
        let Some(head) = bytes.get(0..HEADER_LEN) else {
            return Err(DeckError::DeserializationError(
                "Snapshot too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&head[0..4]);
        Ok(Self {
            magic,
            version: head[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// A block as stored in a snapshot. postcard is not self-describing, so
/// every field is always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotBlock {
    id: String,
    kind: BlockKind,
    style: Option<ChartStyle>,
    section: Option<String>,
    title: Option<String>,
    color: Option<String>,
    editable: bool,
}

impl From<&Block> for SnapshotBlock {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id.to_string(),
            kind: block.kind,
            style: block.style,
            section: block.section.as_ref().map(ToString::to_string),
            title: block.title.clone(),
            color: block.color.clone(),
            editable: block.editable,
        }
    }
}

impl TryFrom<SnapshotBlock> for Block {
    type Error = DeckError;

    fn try_from(b: SnapshotBlock) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BlockId::parse(b.id)?,
            kind: b.kind,
            style: b.style,
            section: b.section.map(SectionId::parse).transpose()?,
            title: b.title,
            color: b.color,
            editable: b.editable,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotSection {
    id: String,
    cols: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotPayload {
    board: String,
    blocks: Vec<SnapshotBlock>,
    sections: Vec<SnapshotSection>,
    checksum: u64,
}

/// A decoded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: String,
    pub arrangement: Arrangement,
    pub sections: SectionLayout,
    pub checksum: u64,
}

// =============================================================================
// CHECKSUM
// =============================================================================

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(seed: u64, bytes: &[u8]) -> u64 {
    bytes.iter().fold(seed, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// FNV-1a checksum of the persisted JSON form of an arrangement.
///
/// Not a cryptographic hash: it detects accidental corruption and lets two
/// arrangements be compared cheaply.
pub fn arrangement_checksum(arrangement: &Arrangement) -> Result<u64, DeckError> {
    Ok(fnv1a(FNV_OFFSET, &arrangement_to_json(arrangement)?))
}

/// Checksum of a whole board: the arrangement, continued over the section
/// layout. Equal to [`arrangement_checksum`] when there are no sections.
pub fn board_checksum(arrangement: &Arrangement, sections: &SectionLayout) -> Result<u64, DeckError> {
    let hash = arrangement_checksum(arrangement)?;
    if sections.is_empty() {
        return Ok(hash);
    }
    Ok(fnv1a(hash, &sections_to_json(sections)?))
}

/// BLAKE3 hex digest of the persisted JSON form of an arrangement.
///
/// Only available with the `crypto-hash` feature.
#[cfg(feature = "crypto-hash")]
pub fn arrangement_crypto_hash(arrangement: &Arrangement) -> Result<String, DeckError> {
    let data = arrangement_to_json(arrangement)?;
    Ok(blake3::hash(&data).to_hex().to_string())
}

// =============================================================================
// EXPORT / IMPORT
// =============================================================================

/// Export a board's blocks and sections as a binary snapshot.
///
/// Fails when the board holds more blocks or sections than an import
/// accepts, or when the encoded snapshot exceeds the import size cap.
pub fn export_snapshot(
    board: &str,
    arrangement: &Arrangement,
    sections: &SectionLayout,
) -> Result<Vec<u8>, DeckError> {
    for (what, count) in [("blocks", arrangement.len()), ("sections", sections.len())] {
        if count > MAX_SNAPSHOT_BLOCKS {
            return Err(DeckError::SerializationError(format!(
                "Board holds {count} {what}, a snapshot can hold at most {MAX_SNAPSHOT_BLOCKS}"
            )));
        }
    }
    let payload = SnapshotPayload {
        board: board.to_string(),
        blocks: arrangement.blocks().iter().map(SnapshotBlock::from).collect(),
        sections: sections
            .sections()
            .iter()
            .map(|s| SnapshotSection {
                id: s.id.to_string(),
                cols: s.cols.count(),
            })
            .collect(),
        checksum: board_checksum(arrangement, sections)?,
    };
    let body =
        postcard::to_stdvec(&payload).map_err(|e| DeckError::SerializationError(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&SnapshotHeader::new().to_bytes());
    bytes.extend_from_slice(&body);
    if bytes.len() > MAX_PERSISTED_SIZE {
        return Err(DeckError::SerializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTED_SIZE
        )));
    }
    Ok(bytes)
}

/// Import a binary snapshot.
pub fn import_snapshot(bytes: &[u8]) -> Result<Snapshot, DeckError> {
    if bytes.len() > MAX_PERSISTED_SIZE {
        return Err(DeckError::DeserializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTED_SIZE
        )));
    }
    SnapshotHeader::from_bytes(bytes)?.validate()?;

    let payload: SnapshotPayload = postcard::from_bytes(&bytes[HEADER_LEN..])
        .map_err(|e| DeckError::DeserializationError(format!("Failed to decode snapshot: {e}")))?;

    for (what, count) in [("blocks", payload.blocks.len()), ("sections", payload.sections.len())] {
        if count > MAX_SNAPSHOT_BLOCKS {
            return Err(DeckError::DeserializationError(format!(
                "Snapshot holds {count} {what}, maximum is {MAX_SNAPSHOT_BLOCKS}"
            )));
        }
    }

    let blocks = payload
        .blocks
        .into_iter()
        .map(Block::try_from)
        .collect::<Result<Vec<_>, DeckError>>()?;
    let arrangement = Arrangement::new(blocks)?;
    let sections = payload
        .sections
        .into_iter()
        .map(|s| Ok(Section::new(SectionId::parse(s.id)?, Columns::try_from(s.cols)?)))
        .collect::<Result<Vec<_>, DeckError>>()
        .and_then(SectionLayout::new)?;

    let computed = board_checksum(&arrangement, &sections)?;
    if computed != payload.checksum {
        return Err(DeckError::DeserializationError(format!(
            "Checksum mismatch: expected {:016x}, computed {computed:016x}",
            payload.checksum
        )));
    }

    Ok(Snapshot {
        board: payload.board,
        arrangement,
        sections,
        checksum: computed,
    })
}

// =============================================================================
// TESTS
// =============================================================================
