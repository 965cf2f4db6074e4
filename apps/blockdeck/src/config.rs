//! # Configuration
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config blockdeck.toml`)
//! 3. Environment (`BLOCKDECK_DATABASE`, `BLOCKDECK_BACKEND`,
//!    `BLOCKDECK_BOARD`, `BLOCKDECK_TEMPLATE`, `BLOCKDECK_ACTIVATION_DISTANCE`)
//! 4. Command-line flags
//!
//! ```toml
//! database = "blockdeck.redb"
//! backend = "redb"
//! board = "dashboard"
//! template = "basic"        # or "sectioned"
//! activation_distance = 8
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! ```

use blockdeck_core::primitives::{DEFAULT_ACTIVATION_DISTANCE, DEFAULT_BOARD_NAME};
use blockdeck_core::{
    Board, BoardKey, BoardTemplate, DeckError, DiagnosticHook, PersistenceGateway,
    StorageBackend, TemplateKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Maximum size of a configuration file.
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// BACKEND KIND
// =============================================================================

/// Where boards are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// redb database file (ACID, persistent)
    Redb,
    /// In-process memory (volatile)
    Memory,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redb => "redb",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(DeckError::ConfigError(format!(
                "Unknown backend '{other}' (expected redb or memory)"
            ))),
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the redb database file.
    pub database: PathBuf,
    pub backend: BackendKind,
    /// Name of the board to open.
    pub board: String,
    /// Built-in defaults the board starts from.
    pub template: TemplateKind,
    /// Pointer travel in pixels before a press becomes a drag.
    pub activation_distance: u32,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("blockdeck.redb"),
            backend: BackendKind::Redb,
            board: DEFAULT_BOARD_NAME.to_string(),
            template: TemplateKind::default(),
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            server: ServerConfig::default(),
        }
    }
}

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub board: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Parse a TOML document on top of the defaults.
    pub fn from_toml(text: &str) -> Result<Self, DeckError> {
        toml::from_str(text).map_err(|e| DeckError::ConfigError(e.to_string()))
    }

    /// Read a TOML file on top of the defaults.
    pub fn from_file(path: &Path) -> Result<Self, DeckError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            DeckError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(DeckError::ConfigError(format!(
                "Config file {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            DeckError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Apply `BLOCKDECK_*` variables as returned by `lookup`.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, DeckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(database) = set("BLOCKDECK_DATABASE") {
            self.database = PathBuf::from(database);
        }
        if let Some(backend) = set("BLOCKDECK_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(board) = set("BLOCKDECK_BOARD") {
            self.board = board;
        }
        if let Some(template) = set("BLOCKDECK_TEMPLATE") {
            self.template = template.parse()?;
        }
        if let Some(distance) = set("BLOCKDECK_ACTIVATION_DISTANCE") {
            self.activation_distance = distance.trim().parse().map_err(|_| {
                DeckError::ConfigError(format!(
                    "BLOCKDECK_ACTIVATION_DISTANCE must be a non-negative integer, got '{distance}'"
                ))
            })?;
        }
        Ok(self)
    }

    /// Apply command-line flags.
    #[must_use]
    pub fn apply_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(board) = overrides.board {
            self.board = board;
        }
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        self
    }

    /// Resolve every layer: defaults, file, process environment, flags.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self, DeckError> {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base
            .apply_env(|name| std::env::var(name).ok())?
            .apply_overrides(overrides);
        config.board_key()?;
        Ok(config)
    }

    pub fn board_key(&self) -> Result<BoardKey, DeckError> {
        BoardKey::new(self.board.clone())
    }

    /// Open the configured storage backend.
    pub fn storage(&self) -> Result<StorageBackend, DeckError> {
        match self.backend {
            BackendKind::Redb => StorageBackend::redb(&self.database),
            BackendKind::Memory => Ok(StorageBackend::default()),
        }
    }

    /// The defaults of the configured template.
    #[must_use]
    pub fn template(&self) -> BoardTemplate {
        self.template.build()
    }

    /// Open the configured board, restoring its persisted arrangement.
    pub fn open_board(&self, hook: Option<DiagnosticHook>) -> Result<Board, DeckError> {
        let mut gateway = PersistenceGateway::new(self.storage()?);
        if let Some(hook) = hook {
            gateway = gateway.with_hook(hook);
        }
        Ok(Board::open(self.board_key()?, self.template(), gateway)
            .with_activation_distance(self.activation_distance))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use blockdeck_core::default_dashboard;
    use std::collections::BTreeMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Redb);
        assert_eq!(config.board, "dashboard");
        assert_eq!(config.activation_distance, 8);
        assert_eq!(config.template, TemplateKind::Basic);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = Config::from_toml(
            r#"
            backend = "memory"
            board = "ops"

            [server]
            port = 9000
            "#,
        )
        .expect("parse");
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.board, "ops");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.activation_distance, 8);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_toml("colour = \"blue\""),
            Err(DeckError::ConfigError(_))
        ));
        assert!(Config::from_toml("[server]\nhots = \"x\"").is_err());
    }

    #[test]
    fn env_overrides_file_and_flags_override_env() {
        let file = Config::from_toml("board = \"from-file\"").expect("parse");
        let config = file
            .apply_env(env(&[
                ("BLOCKDECK_BOARD", "from-env"),
                ("BLOCKDECK_ACTIVATION_DISTANCE", "0"),
                ("BLOCKDECK_BACKEND", "Memory"),
            ]))
            .expect("env");
        assert_eq!(config.board, "from-env");
        assert_eq!(config.activation_distance, 0);
        assert_eq!(config.backend, BackendKind::Memory);

        let config = config.apply_overrides(Overrides {
            board: Some("from-flag".to_string()),
            ..Overrides::default()
        });
        assert_eq!(config.board, "from-flag");
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let result = Config::default().apply_env(env(&[("BLOCKDECK_ACTIVATION_DISTANCE", "-3")]));
        assert!(matches!(result, Err(DeckError::ConfigError(_))));
        let result = Config::default().apply_env(env(&[("BLOCKDECK_BACKEND", "sqlite")]));
        assert!(matches!(result, Err(DeckError::ConfigError(_))));
        let result = Config::default().apply_env(env(&[("BLOCKDECK_TEMPLATE", "grid")]));
        assert!(matches!(result, Err(DeckError::ConfigError(_))));
    }

    #[test]
    fn sectioned_template_from_file_and_env() {
        let config = Config::from_toml("template = \"sectioned\"").expect("parse");
        assert_eq!(config.template, TemplateKind::Sectioned);

        let config = Config::default()
            .apply_env(env(&[("BLOCKDECK_TEMPLATE", "sectioned"), ("BLOCKDECK_BACKEND", "memory")]))
            .expect("env");
        let board = config.open_board(None).expect("open");
        assert_eq!(board.sections().len(), 6);
        assert_eq!(board.arrangement().len(), 9);
    }

    #[test]
    fn memory_board_opens_with_defaults() {
        let config = Config {
            backend: BackendKind::Memory,
            ..Config::default()
        };
        let board = config.open_board(None).expect("open");
        assert_eq!(board.arrangement(), &default_dashboard());
        assert_eq!(board.activation_distance(), 8);
        assert!(!board.is_persistent());
    }
}
