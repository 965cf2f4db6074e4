//! # Persistence Format
//!
//! JSON encoding of what the gateway stores. An arrangement is a record
//! array:
//!
//! ```json
//! [{"id":"chart-1","type":"chart","chartType":"bar"},{"id":"text-1","type":"text"}]
//! ```
//!
//! and a section layout is `[{"sectionId":"sec1","cols":1}, ...]`.
//!
//! There is no version field. Anything that does not decode into a valid
//! value is an error and the caller treats it as absent.
//!
//! Payload size is capped both ways: an oversized value is never written,
//! and a stored one is rejected before parsing.

use crate::arrangement::Arrangement;
use crate::layout::SectionLayout;
use crate::primitives::MAX_PERSISTED_SIZE;
use crate::DeckError;

/// Fail with `QuotaExceeded` when `bytes` is too large to persist.
pub fn ensure_persistable(bytes: &[u8]) -> Result<(), DeckError> {
    if bytes.len() > MAX_PERSISTED_SIZE {
        return Err(DeckError::QuotaExceeded {
            needed: bytes.len(),
            available: MAX_PERSISTED_SIZE,
        });
    }
    Ok(())
}

fn ensure_readable(bytes: &[u8]) -> Result<(), DeckError> {
    if bytes.len() > MAX_PERSISTED_SIZE {
        return Err(DeckError::DeserializationError(format!(
            "Payload size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTED_SIZE
        )));
    }
    Ok(())
}

/// Encode an arrangement as a JSON record array.
pub fn arrangement_to_json(arrangement: &Arrangement) -> Result<Vec<u8>, DeckError> {
    serde_json::to_vec(arrangement).map_err(|e| DeckError::SerializationError(e.to_string()))
}

/// Decode a JSON record array.
///
/// Fails on oversized payloads, shape mismatches, unknown styles, reserved
/// or empty ids, and duplicate ids.
pub fn arrangement_from_json(bytes: &[u8]) -> Result<Arrangement, DeckError> {
    ensure_readable(bytes)?;
    serde_json::from_slice(bytes).map_err(|e| DeckError::DeserializationError(e.to_string()))
}

/// Encode a section layout.
pub fn sections_to_json(layout: &SectionLayout) -> Result<Vec<u8>, DeckError> {
    serde_json::to_vec(layout).map_err(|e| DeckError::SerializationError(e.to_string()))
}

/// Decode a section layout. Column counts other than 1 or 2 and duplicate
/// section ids are errors.
pub fn sections_from_json(bytes: &[u8]) -> Result<SectionLayout, DeckError> {
    ensure_readable(bytes)?;
    serde_json::from_slice(bytes).map_err(|e| DeckError::DeserializationError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
