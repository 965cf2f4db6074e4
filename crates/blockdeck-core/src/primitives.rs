//! # Interaction Primitives
//!
//! Hardcoded constants for the blockdeck core.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Namespace carried by every style-token drag id (`panel::bar`, ...).
///
/// Ids without this prefix are reorder sources.
pub const STYLE_TOKEN_PREFIX: &str = "panel::";

/// Prefix of block ids that denote chart blocks.
///
/// Only used at the boundary to infer a block kind for an id that arrived
/// without an explicit type.
pub const CHART_BLOCK_PREFIX: &str = "chart-";

/// Namespace for persisted board keys. A board named `dashboard` is stored
/// under `blockdeck:board:dashboard`.
pub const BOARD_KEY_NAMESPACE: &str = "blockdeck:board:";

/// Namespace for a board's section layout, stored next to its blocks
/// under `blockdeck:sections:<name>`.
pub const SECTION_KEY_NAMESPACE: &str = "blockdeck:sections:";

/// Name of the board used when none is configured.
pub const DEFAULT_BOARD_NAME: &str = "dashboard";

/// Pointer travel (in pixels) the app requires before a pointer-down turns
/// into a drag. The core default is 0 (activate immediately).
pub const DEFAULT_ACTIVATION_DISTANCE: u32 = 8;

/// Maximum length of a board name.
pub const MAX_BOARD_NAME_LENGTH: usize = 128;

// =============================================================================
// PERSISTENCE LIMITS
// =============================================================================

/// Maximum size of a persisted arrangement or section layout. Larger
/// payloads are never written and, when found in a store, never parsed.
pub const MAX_PERSISTED_SIZE: usize = 1024 * 1024;

/// Magic bytes for the binary snapshot header.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"BDCK";

/// Current binary snapshot format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const SNAPSHOT_VERSION: u8 = 2;

/// Maximum number of blocks (and of sections) in one snapshot, on export
/// and on import.
pub const MAX_SNAPSHOT_BLOCKS: usize = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(SNAPSHOT_MAGIC, b"BDCK");
    }

    #[test]
    fn storage_namespaces_differ() {
        assert_ne!(BOARD_KEY_NAMESPACE, SECTION_KEY_NAMESPACE);
    }

    #[test]
    fn prefixes_do_not_overlap() {
        assert!(!STYLE_TOKEN_PREFIX.starts_with(CHART_BLOCK_PREFIX));
        assert!(!CHART_BLOCK_PREFIX.starts_with(STYLE_TOKEN_PREFIX));
    }
}
