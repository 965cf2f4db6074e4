//! # Persistence Gateway
//!
//! Best-effort persistence of boards. A board's blocks and its section
//! layout are stored under separate keys and saved independently.
//!
//! The in-memory arrangement is authoritative. The gateway never hands a
//! failure back to the board:
//! - `save` failures are logged at `warn` and reported to the diagnostic
//!   hook, if one is installed. A value too large to be read back is a
//!   failed save and is never written.
//! - `load` returns `None` when the key is absent (silently) or when the
//!   stored value cannot be decoded (logged and reported).

use crate::arrangement::Arrangement;
use crate::formats::{
    arrangement_from_json, arrangement_to_json, ensure_persistable, sections_from_json,
    sections_to_json,
};
use crate::layout::SectionLayout;
use crate::primitives::{
    BOARD_KEY_NAMESPACE, DEFAULT_BOARD_NAME, MAX_BOARD_NAME_LENGTH, SECTION_KEY_NAMESPACE,
};
use crate::storage::{KeyValueStore, StorageBackend};
use crate::DeckError;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// BOARD KEY
// =============================================================================

/// Name of a persisted board; stored under `blockdeck:board:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoardKey(String);

impl BoardKey {
    /// Board names are 1 to 128 ASCII letters, digits, `-`, `_` or `.`.
    pub fn new(name: impl Into<String>) -> Result<Self, DeckError> {
        let name = name.into();
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if name.is_empty() || name.len() > MAX_BOARD_NAME_LENGTH || !valid_chars {
            return Err(DeckError::InvalidId(name));
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The namespaced storage key.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{BOARD_KEY_NAMESPACE}{}", self.0)
    }

    /// The namespaced key of the board's section layout.
    #[must_use]
    pub fn sections_key(&self) -> String {
        format!("{SECTION_KEY_NAMESPACE}{}", self.0)
    }
}

impl Default for BoardKey {
    fn default() -> Self {
        Self(DEFAULT_BOARD_NAME.to_string())
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// Which gateway operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOp {
    Save,
    Load,
}

/// A swallowed persistence failure, as reported to the diagnostic hook.
#[derive(Debug)]
pub struct PersistenceFailure {
    pub op: PersistenceOp,
    pub key: BoardKey,
    pub error: DeckError,
}

/// Observer for swallowed persistence failures.
pub type DiagnosticHook = Arc<dyn Fn(&PersistenceFailure) + Send + Sync>;

// =============================================================================
// GATEWAY
// =============================================================================

/// Best-effort store of arrangements.
#[derive(Default)]
pub struct PersistenceGateway {
    backend: StorageBackend,
    hook: Option<DiagnosticHook>,
}

impl fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("backend", &self.backend)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl PersistenceGateway {
    #[must_use]
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            backend,
            hook: None,
        }
    }

    /// Install a hook that sees every swallowed failure.
    #[must_use]
    pub fn with_hook(mut self, hook: DiagnosticHook) -> Self {
        self.hook = Some(hook);
        self
    }

    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Persist `arrangement` under `key`. Failures are logged, never returned.
    pub fn save(&mut self, key: &BoardKey, arrangement: &Arrangement) {
        let encoded = arrangement_to_json(arrangement);
        if self.store(key, &key.storage_key(), encoded, "arrangement") {
            tracing::debug!(board = %key, blocks = arrangement.len(), "arrangement saved");
        }
    }

    /// Persist the section layout of `key`. Failures are logged, never returned.
    pub fn save_sections(&mut self, key: &BoardKey, layout: &SectionLayout) {
        let encoded = sections_to_json(layout);
        if self.store(key, &key.sections_key(), encoded, "section layout") {
            tracing::debug!(board = %key, sections = layout.len(), "section layout saved");
        }
    }

    /// Load the arrangement stored under `key`.
    ///
    /// `None` when nothing is stored or the stored value is unusable.
    pub fn load(&self, key: &BoardKey) -> Option<Arrangement> {
        let bytes = self.fetch(key, &key.storage_key(), "arrangement")?;
        match arrangement_from_json(&bytes) {
            Ok(arrangement) => Some(arrangement),
            Err(error) => {
                tracing::warn!(board = %key, %error, "discarding unreadable arrangement");
                self.report(PersistenceOp::Load, key, error);
                None
            }
        }
    }

    /// Load the section layout of `key`, with the same tolerance as [`load`].
    ///
    /// [`load`]: Self::load
    pub fn load_sections(&self, key: &BoardKey) -> Option<SectionLayout> {
        let bytes = self.fetch(key, &key.sections_key(), "section layout")?;
        match sections_from_json(&bytes) {
            Ok(layout) => Some(layout),
            Err(error) => {
                tracing::warn!(board = %key, %error, "discarding unreadable section layout");
                self.report(PersistenceOp::Load, key, error);
                None
            }
        }
    }

    /// Write an encoded value; true when it landed in the backend.
    fn store(
        &mut self,
        key: &BoardKey,
        storage_key: &str,
        encoded: Result<Vec<u8>, DeckError>,
        what: &str,
    ) -> bool {
        let result = encoded.and_then(|bytes| {
            ensure_persistable(&bytes)?;
            self.backend.put(storage_key, &bytes)
        });
        match result {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(board = %key, %error, "failed to persist {what}");
                self.report(PersistenceOp::Save, key, error);
                false
            }
        }
    }

    fn fetch(&self, key: &BoardKey, storage_key: &str, what: &str) -> Option<Vec<u8>> {
        match self.backend.get(storage_key) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(board = %key, %error, "failed to read persisted {what}");
                self.report(PersistenceOp::Load, key, error);
                None
            }
        }
    }

    fn report(&self, op: PersistenceOp, key: &BoardKey, error: DeckError) {
        if let Some(hook) = &self.hook {
            hook(&PersistenceFailure {
                op,
                key: key.clone(),
                error,
            });
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
    use crate::storage::MemoryStore;
    use crate::template::sectioned_template;
    use crate::{Block, BlockId};
    use std::sync::Mutex;

    fn key(name: &str) -> BoardKey {
        BoardKey::new(name).expect("valid name")
    }

    fn recording_hook() -> (DiagnosticHook, Arc<Mutex<Vec<PersistenceOp>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hook: DiagnosticHook = Arc::new(move |failure: &PersistenceFailure| {
            sink.lock().expect("lock").push(failure.op);
        });
        (hook, seen)
    }

    #[test]
    fn board_key_validation() {
        assert_eq!(key("dashboard").storage_key(), "blockdeck:board:dashboard");
        assert!(BoardKey::new("").is_err());
        assert!(BoardKey::new("has space").is_err());
        assert!(BoardKey::new("x".repeat(MAX_BOARD_NAME_LENGTH + 1)).is_err());
        assert_eq!(BoardKey::default().name(), DEFAULT_BOARD_NAME);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut gateway = PersistenceGateway::default();
        let dashboard = default_dashboard();
        gateway.save(&key("a"), &dashboard);
        assert_eq!(gateway.load(&key("a")), Some(dashboard));
    }

    #[test]
    fn missing_key_is_silent() {
        let (hook, seen) = recording_hook();
        let gateway = PersistenceGateway::default().with_hook(hook);
        assert_eq!(gateway.load(&key("missing")), None);
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn corrupt_value_loads_as_none_and_reports() {
        let mut store = MemoryStore::new();
        store
            .put("blockdeck:board:a", br#"[{"id":"a","type":"text"},{"id":"a","type":"text"}]"#)
            .expect("put");
        let (hook, seen) = recording_hook();
        let gateway = PersistenceGateway::new(StorageBackend::InMemory(store)).with_hook(hook);
        assert_eq!(gateway.load(&key("a")), None);
        assert_eq!(*seen.lock().expect("lock"), vec![PersistenceOp::Load]);
    }

    #[test]
    fn quota_failure_is_swallowed_and_reported() {
        let (hook, seen) = recording_hook();
        let store = MemoryStore::with_quota(4);
        let mut gateway = PersistenceGateway::new(StorageBackend::InMemory(store)).with_hook(hook);
        gateway.save(&key("a"), &default_dashboard());
        assert_eq!(*seen.lock().expect("lock"), vec![PersistenceOp::Save]);
        assert_eq!(gateway.load(&key("a")), None);
    }

    #[test]
    fn oversized_arrangement_is_a_failed_save() {
        let (hook, seen) = recording_hook();
        let mut gateway = PersistenceGateway::default().with_hook(hook);
        gateway.save(&key("a"), &default_dashboard());

        let huge = Arrangement::new(
            (0..40_000)
                .map(|i| Block::text(BlockId::parse(format!("text-{i}")).expect("id")))
                .collect(),
        )
        .expect("unique");
        gateway.save(&key("a"), &huge);

        assert_eq!(*seen.lock().expect("lock"), vec![PersistenceOp::Save]);
        // The last value that fit is still there.
        assert_eq!(gateway.load(&key("a")), Some(default_dashboard()));
    }

    #[test]
    fn sections_live_under_their_own_key() {
        let mut gateway = PersistenceGateway::default();
        let layout = sectioned_template().sections;
        gateway.save_sections(&key("a"), &layout);

        assert_eq!(key("a").sections_key(), "blockdeck:sections:a");
        assert_eq!(gateway.load_sections(&key("a")), Some(layout));
        assert_eq!(gateway.load(&key("a")), None);
        assert_eq!(gateway.load_sections(&key("b")), None);
    }

    #[test]
    fn corrupt_sections_load_as_none_and_report() {
        let mut store = MemoryStore::new();
        store
            .put("blockdeck:sections:a", br#"[{"sectionId":"s","cols":5}]"#)
            .expect("put");
        let (hook, seen) = recording_hook();
        let gateway = PersistenceGateway::new(StorageBackend::InMemory(store)).with_hook(hook);
        assert_eq!(gateway.load_sections(&key("a")), None);
        assert_eq!(*seen.lock().expect("lock"), vec![PersistenceOp::Load]);
    }

    #[test]
    fn boards_are_isolated() {
        let mut gateway = PersistenceGateway::default();
        gateway.save(&key("one"), &default_dashboard());
        assert_eq!(gateway.load(&key("two")), None);
    }
}
