//! # CLI Command Implementations
//!
//! Every command opens the configured board, does its work, and lets the
//! board persist through its gateway. Save failures that the board swallows
//! during interaction are collected here and turned into command errors.

use crate::api;
use crate::config::Config;
use blockdeck_core::{
    Block, Board, BlockId, Candidate, ChartStyle, DeckError, DiagnosticHook, DropOutcome,
    PersistenceFailure, PersistenceGateway, PersistenceOp, Point, Rect, SectionId, TargetUpdate,
    arrangement_crypto_hash, board_checksum, export_snapshot, import_snapshot,
    primitives::MAX_PERSISTED_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// =============================================================================
// FILE LIMITS
// =============================================================================

/// Maximum size of a snapshot file.
const MAX_IMPORT_FILE_SIZE: u64 = 2 * MAX_PERSISTED_SIZE as u64;

/// Maximum size of a replay script.
const MAX_REPLAY_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Maximum number of events in one replay script.
pub const MAX_REPLAY_EVENTS: usize = 10_000;

fn validate_file_size(path: &Path, max_size: u64) -> Result<(), DeckError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| DeckError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(DeckError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve `..` and symlinks and require an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, DeckError> {
    let canonical = path.canonicalize().map_err(|e| {
        DeckError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(DeckError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    Ok(canonical)
}

/// Require an existing parent directory; returns canonical parent + file name.
fn validate_output_path(path: &Path) -> Result<PathBuf, DeckError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        DeckError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;
    if !canonical_parent.is_dir() {
        return Err(DeckError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| DeckError::IoError("Output path has no filename".to_string()))?;
    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SAVE FAILURE COLLECTION
// =============================================================================

/// Collects swallowed save failures so a command can report them.
#[derive(Clone, Default)]
pub struct FailureLog(Arc<Mutex<Vec<String>>>);

impl FailureLog {
    /// Hook to install on the board's gateway.
    pub fn hook(&self) -> DiagnosticHook {
        let failures = Arc::clone(&self.0);
        Arc::new(move |failure: &PersistenceFailure| {
            if failure.op != PersistenceOp::Save {
                return;
            }
            if let Ok(mut list) = failures.lock() {
                list.push(format!("board '{}': {}", failure.key, failure.error));
            }
        })
    }

    /// `Err` with every collected failure, draining the log.
    pub fn check(&self) -> Result<(), DeckError> {
        let failures = match self.0.lock() {
            Ok(mut list) => std::mem::take(&mut *list),
            Err(_) => return Err(DeckError::IoError("failure log poisoned".to_string())),
        };
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DeckError::IoError(format!(
                "arrangement not persisted: {}",
                failures.join("; ")
            )))
        }
    }
}

fn open_board(config: &Config, log: &FailureLog) -> Result<Board, DeckError> {
    config.open_board(Some(log.hook()))
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config) -> Result<(), DeckError> {
    let board = config.open_board(None)?;

    println!("Blockdeck Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.server.host);
    println!("  Port:     {}", config.server.port);
    println!("  Backend:  {}", config.backend);
    println!("  Database: {}", config.database.display());
    println!("  Board:    {}", config.board);
    println!("  Template: {}", config.template);
    println!();
    println!("Endpoints:");
    println!("  GET  /board        - Arrangement and drag session");
    println!("  GET  /catalog      - Style tokens");
    println!("  GET  /widgets      - Pool widgets not on the board");
    println!("  POST /drag/start   - Pointer-down");
    println!("  POST /drag/move    - Pointer-move");
    println!("  POST /drag/end     - Pointer-up");
    println!("  POST /drag/cancel  - Cancel the gesture");
    println!("  POST /style        - Click-to-apply a style");
    println!("  POST /sections/move - Move a section");
    println!("  POST /sections/drop - Drop a dragged section");
    println!("  POST /replace      - Swap a block for a pool widget");
    println!("  POST /reset        - Restore defaults");
    println!("  POST /export       - Binary snapshot");
    println!("  GET  /health       - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    api::run_server(&addr, board).await
}

// =============================================================================
// SHOW / CATALOG COMMANDS
// =============================================================================

/// Print the current arrangement.
pub fn cmd_show(config: &Config, json_mode: bool) -> Result<(), DeckError> {
    let board = config.open_board(None)?;

    if json_mode {
        print_json(&board.snapshot());
        return Ok(());
    }

    println!("Board: {}", board.key());
    println!("Backend: {}", config.backend);
    println!();
    if board.sections().is_empty() {
        for (index, block) in board.arrangement().blocks().iter().enumerate() {
            print_block(index, block);
        }
        return Ok(());
    }

    let grouping = board.grouping();
    for group in &grouping.sections {
        println!("[{}] {} col", group.section.id, group.section.cols.count());
        for block in &group.blocks {
            print_block(board.arrangement().position(&block.id).unwrap_or_default(), block);
        }
    }
    if !grouping.loose.is_empty() {
        println!("[ungrouped]");
        for block in &grouping.loose {
            print_block(board.arrangement().position(&block.id).unwrap_or_default(), block);
        }
    }
    Ok(())
}

fn print_block(index: usize, block: &Block) {
    let lock = if block.editable { "" } else { "  (locked)" };
    let title = block.title.as_deref().unwrap_or_default();
    match block.effective_style() {
        Some(style) => println!("  {:>2}. {:<16} chart  {:<10} {}{}", index, block.id, style, title, lock),
        None => println!("  {:>2}. {:<16} text   {:<10} {}{}", index, block.id, "", title, lock),
    }
}

/// List the pool widgets that could replace a shown block.
pub fn cmd_widgets(config: &Config, json_mode: bool) -> Result<(), DeckError> {
    let board = config.open_board(None)?;
    let available: Vec<&Block> = board.available_blocks().collect();

    if json_mode {
        print_json(&available);
        return Ok(());
    }

    if available.is_empty() {
        println!("Every widget is already on the board");
        return Ok(());
    }
    println!("Available widgets:");
    for block in available {
        match block.effective_style() {
            Some(style) => println!("  {:<16} chart  {}", block.id, style),
            None => println!("  {:<16} text", block.id),
        }
    }
    Ok(())
}

/// List the style tokens.
pub fn cmd_catalog(config: &Config, json_mode: bool) -> Result<(), DeckError> {
    let board = config.open_board(None)?;
    let tokens: Vec<api::TokenJson> = board.catalog().iter().map(api::TokenJson::from).collect();

    if json_mode {
        print_json(&tokens);
        return Ok(());
    }

    println!("Style tokens:");
    for token in &tokens {
        println!("  {:<18} {:<12} {}", token.id, token.label, token.color);
    }
    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Store the template's arrangement and sections, then read them back.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), DeckError> {
    let key = config.board_key()?;
    let log = FailureLog::default();
    let gateway = PersistenceGateway::new(config.storage()?).with_hook(log.hook());

    if gateway.load(&key).is_some() && !force {
        return Err(DeckError::IoError(format!(
            "Board '{}' already has a stored arrangement. Use --force to overwrite.",
            key
        )));
    }

    let template = config.template();
    let mut board = Board::open(key, template.clone(), gateway)
        .with_activation_distance(config.activation_distance);
    board.reset()?;
    log.check()?;

    if !board.is_persistent() {
        println!("Initialized volatile board '{}' (memory backend)", board.key());
        return Ok(());
    }
    drop(board);

    let reopened = config.open_board(None)?;
    if *reopened.arrangement() != template.blocks || *reopened.sections() != template.sections {
        return Err(DeckError::IoError(format!(
            "Stored arrangement for '{}' did not read back",
            reopened.key()
        )));
    }
    println!(
        "Initialized board '{}' in {}",
        reopened.key(),
        config.database.display()
    );
    Ok(())
}

// =============================================================================
// EDIT COMMANDS
// =============================================================================

fn report_outcome(board: &Board, outcome: &DropOutcome, json_mode: bool) {
    if json_mode {
        print_json(&serde_json::json!({
            "outcome": outcome,
            "board": board.snapshot(),
        }));
        return;
    }
    match outcome {
        DropOutcome::Reordered { block, from, to } => {
            println!("Moved {} from position {} to {}", block, from, to);
        }
        DropOutcome::StyleApplied {
            block,
            previous,
            style,
        } => match previous {
            Some(previous) => println!("Restyled {} from {} to {}", block, previous, style),
            None => println!("Styled {} as {}", block, style),
        },
        DropOutcome::SectionMoved { section, from, to } => {
            println!("Moved section {} from position {} to {}", section, from, to);
        }
        DropOutcome::Replaced { block, with, at } => {
            println!("Replaced {} with {} at position {}", block, with, at);
        }
        DropOutcome::NoOp { reason } => println!("No change ({:?})", reason),
    }
}

/// Move `from` to the position of `to`.
pub fn cmd_reorder(config: &Config, json_mode: bool, from: &str, to: &str) -> Result<(), DeckError> {
    let source = BlockId::parse(from)?;
    let destination = BlockId::parse(to)?;

    let log = FailureLog::default();
    let mut board = open_board(config, &log)?;
    let outcome = board.move_block(&source, &destination)?;
    log.check()?;

    report_outcome(&board, &outcome, json_mode);
    Ok(())
}

/// Apply `style` to `block`.
pub fn cmd_style(config: &Config, json_mode: bool, block: &str, style: &str) -> Result<(), DeckError> {
    let target = BlockId::parse(block)?;
    let style: ChartStyle = style.parse()?;

    let log = FailureLog::default();
    let mut board = open_board(config, &log)?;
    let outcome = board.apply_style_to(&target, style)?;
    log.check()?;

    report_outcome(&board, &outcome, json_mode);
    Ok(())
}

/// Move section `from` to the position of section `to`.
pub fn cmd_move_section(config: &Config, json_mode: bool, from: &str, to: &str) -> Result<(), DeckError> {
    let source = SectionId::parse(from)?;
    let destination = SectionId::parse(to)?;

    let log = FailureLog::default();
    let mut board = open_board(config, &log)?;
    let outcome = board.move_section(&source, &destination)?;
    log.check()?;

    report_outcome(&board, &outcome, json_mode);
    Ok(())
}

/// Swap `block` for the pool widget `with`.
pub fn cmd_replace(config: &Config, json_mode: bool, block: &str, with: &str) -> Result<(), DeckError> {
    let current = BlockId::parse(block)?;
    let replacement = BlockId::parse(with)?;

    let log = FailureLog::default();
    let mut board = open_board(config, &log)?;
    let outcome = board.replace_block(&current, &replacement)?;
    log.check()?;

    report_outcome(&board, &outcome, json_mode);
    Ok(())
}

// =============================================================================
// REPLAY COMMAND
// =============================================================================

/// One scripted pointer event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Pointer-down on a block id or a `panel::<style>` token.
    Down { id: String, x: i32, y: i32 },
    /// Pointer-move with the live candidate geometry.
    Move {
        pointer: Point,
        drag_rect: Rect,
        #[serde(default)]
        candidates: Vec<Candidate>,
    },
    Up,
    Cancel,
}

/// What one replayed event did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepResult {
    Pressed,
    Rejected { error: String },
    Moved {
        changed: bool,
        current_target_id: Option<BlockId>,
    },
    Dropped { outcome: DropOutcome },
    Cancelled { cancelled: bool },
}

/// Feed `events` to `board` in order.
///
/// A rejected pointer-down is recorded and the script continues, the same
/// way an interactive adapter would ignore it.
pub fn replay(board: &mut Board, events: &[ReplayEvent]) -> Vec<StepResult> {
    events
        .iter()
        .map(|event| match event {
            ReplayEvent::Down { id, x, y } => match board.pointer_down_raw(id, Point::new(*x, *y)) {
                Ok(()) => StepResult::Pressed,
                Err(e) => StepResult::Rejected {
                    error: e.to_string(),
                },
            },
            ReplayEvent::Move {
                pointer,
                drag_rect,
                candidates,
            } => {
                let state = blockdeck_core::PointerState::new(*pointer, *drag_rect);
                let update = board.pointer_move(&state, candidates);
                StepResult::Moved {
                    changed: matches!(update, TargetUpdate::Changed(_)),
                    current_target_id: board.snapshot().session.and_then(|s| s.current_target_id),
                }
            }
            ReplayEvent::Up => StepResult::Dropped {
                outcome: board.pointer_up(),
            },
            ReplayEvent::Cancel => StepResult::Cancelled {
                cancelled: board.cancel(),
            },
        })
        .collect()
}

/// Parse a replay script.
pub fn parse_replay(contents: &[u8]) -> Result<Vec<ReplayEvent>, DeckError> {
    let events: Vec<ReplayEvent> = serde_json::from_slice(contents)
        .map_err(|e| DeckError::DeserializationError(format!("Replay script: {}", e)))?;
    if events.len() > MAX_REPLAY_EVENTS {
        return Err(DeckError::DeserializationError(format!(
            "Replay has {} events, maximum is {}",
            events.len(),
            MAX_REPLAY_EVENTS
        )));
    }
    Ok(events)
}

/// Replay a gesture script against the board.
pub fn cmd_replay(config: &Config, json_mode: bool, file: &Path) -> Result<(), DeckError> {
    let path = validate_file_path(file)?;
    validate_file_size(&path, MAX_REPLAY_FILE_SIZE)?;
    let contents = std::fs::read(&path)
        .map_err(|e| DeckError::IoError(format!("Read file: {}", e)))?;
    let events = parse_replay(&contents)?;

    tracing::info!(events = events.len(), "replaying {}", path.display());

    let log = FailureLog::default();
    let mut board = open_board(config, &log)?;
    let steps = replay(&mut board, &events);
    if board.cancel() {
        tracing::warn!("replay ended mid-gesture; drag cancelled");
    }
    log.check()?;

    if json_mode {
        print_json(&serde_json::json!({
            "steps": steps,
            "board": board.snapshot(),
        }));
        return Ok(());
    }

    for (index, step) in steps.iter().enumerate() {
        println!(
            "  {:>3}. {}",
            index,
            serde_json::to_string(step).unwrap_or_default()
        );
    }
    let mutations = steps
        .iter()
        .filter(|s| matches!(s, StepResult::Dropped { outcome } if outcome.is_mutation()))
        .count();
    println!("Replayed {} events, {} committed drops", steps.len(), mutations);
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Write the board as a binary snapshot.
pub fn cmd_export(config: &Config, json_mode: bool, output: &Path) -> Result<(), DeckError> {
    let validated_output = validate_output_path(output)?;
    let board = config.open_board(None)?;
    let arrangement = board.arrangement();
    let sections = board.sections();

    let data = export_snapshot(board.key().name(), arrangement, sections)?;
    let checksum = board_checksum(arrangement, sections)?;
    let hash = arrangement_crypto_hash(arrangement)?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| DeckError::IoError(format!("Write file: {}", e)))?;

    if json_mode {
        print_json(&serde_json::json!({
            "path": validated_output.to_string_lossy(),
            "bytes": data.len(),
            "checksum": checksum,
            "hash": hash,
        }));
        return Ok(());
    }

    println!("Checksum: {}", checksum);
    println!("BLAKE3:   {}", hash);
    println!(
        "Exported {} bytes to {}",
        data.len(),
        validated_output.display()
    );
    Ok(())
}

/// Replace the board's arrangement and sections with a snapshot's.
pub fn cmd_import(config: &Config, input: &Path) -> Result<(), DeckError> {
    let path = validate_file_path(input)?;
    validate_file_size(&path, MAX_IMPORT_FILE_SIZE)?;
    let data = std::fs::read(&path)
        .map_err(|e| DeckError::IoError(format!("Read file: {}", e)))?;

    let snapshot = import_snapshot(&data)?;

    let log = FailureLog::default();
    let mut board = open_board(config, &log)?;
    if snapshot.board != board.key().name() {
        tracing::info!(
            from = %snapshot.board,
            into = %board.key(),
            "importing snapshot into a different board"
        );
    }
    let blocks = snapshot.arrangement.len();
    let sections = snapshot.sections.len();
    board.replace_arrangement(snapshot.arrangement)?;
    board.replace_sections(snapshot.sections)?;
    log.check()?;

    println!(
        "Imported {} blocks in {} sections into board '{}'",
        blocks,
        sections,
        board.key()
    );
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;
    use blockdeck_core::{BoardKey, NoOpReason, TemplateKind, default_dashboard};

    fn board() -> Board {
        Board::new(BoardKey::default(), default_dashboard()).with_activation_distance(8)
    }

    fn ids(board: &Board) -> Vec<String> {
        board
            .arrangement()
            .ids()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    const GRID: &str = r#"[
        {"id":"text-1","rect":{"x":0,"y":0,"width":100,"height":100}},
        {"id":"chart-1","rect":{"x":110,"y":0,"width":100,"height":100}},
        {"id":"text-2","rect":{"x":0,"y":110,"width":100,"height":100}},
        {"id":"chart-2","rect":{"x":110,"y":110,"width":100,"height":100}}
    ]"#;

    fn script(body: &str) -> Vec<ReplayEvent> {
        let json = body.replace("GRID", GRID);
        parse_replay(json.as_bytes()).expect("script")
    }

    #[test]
    fn replay_reorders_by_overlap() {
        let events = script(
            r#"[
            {"event":"down","id":"text-1","x":50,"y":50},
            {"event":"move","pointer":{"x":160,"y":160},
             "drag_rect":{"x":105,"y":105,"width":100,"height":100},"candidates":GRID},
            {"event":"up"}
        ]"#,
        );
        let mut board = board();
        let steps = replay(&mut board, &events);

        assert_eq!(steps[0], StepResult::Pressed);
        assert!(matches!(
            &steps[1],
            StepResult::Moved { changed: true, current_target_id: Some(id) } if id == "chart-2"
        ));
        assert!(matches!(
            &steps[2],
            StepResult::Dropped { outcome: DropOutcome::Reordered { from: 0, to: 3, .. } }
        ));
        assert_eq!(ids(&board), ["chart-1", "text-2", "chart-2", "text-1"]);
    }

    #[test]
    fn replay_styles_chart_under_pointer() {
        let events = script(
            r#"[
            {"event":"down","id":"panel::pie","x":400,"y":20},
            {"event":"move","pointer":{"x":150,"y":50},
             "drag_rect":{"x":120,"y":30,"width":80,"height":40},"candidates":GRID},
            {"event":"up"}
        ]"#,
        );
        let mut board = board();
        let steps = replay(&mut board, &events);

        assert!(matches!(
            &steps[2],
            StepResult::Dropped { outcome: DropOutcome::StyleApplied { style: ChartStyle::Pie, .. } }
        ));
        let chart = BlockId::parse("chart-1").expect("id");
        assert_eq!(
            board.arrangement().get(&chart).and_then(|b| b.style),
            Some(ChartStyle::Pie)
        );
    }

    #[test]
    fn short_travel_is_a_click() {
        let events = script(
            r#"[
            {"event":"down","id":"text-1","x":50,"y":50},
            {"event":"move","pointer":{"x":53,"y":52},
             "drag_rect":{"x":3,"y":2,"width":100,"height":100},"candidates":GRID},
            {"event":"up"}
        ]"#,
        );
        let mut board = board();
        let steps = replay(&mut board, &events);

        assert!(matches!(&steps[1], StepResult::Moved { changed: false, .. }));
        assert_eq!(
            steps[2],
            StepResult::Dropped {
                outcome: DropOutcome::NoOp {
                    reason: NoOpReason::Click
                }
            }
        );
        assert_eq!(ids(&board), ["text-1", "chart-1", "text-2", "chart-2"]);
    }

    #[test]
    fn unknown_block_is_rejected_and_script_continues() {
        let events = script(
            r#"[
            {"event":"down","id":"ghost","x":0,"y":0},
            {"event":"cancel"},
            {"event":"up"}
        ]"#,
        );
        let mut board = board();
        let steps = replay(&mut board, &events);

        assert!(matches!(&steps[0], StepResult::Rejected { .. }));
        assert_eq!(steps[1], StepResult::Cancelled { cancelled: false });
        assert_eq!(
            steps[2],
            StepResult::Dropped {
                outcome: DropOutcome::NoOp {
                    reason: NoOpReason::Idle
                }
            }
        );
    }

    #[test]
    fn malformed_script_is_rejected() {
        assert!(parse_replay(br#"[{"event":"jump"}]"#).is_err());
        assert!(parse_replay(br#"{"event":"up"}"#).is_err());
        assert!(parse_replay(br#"[{"event":"move","pointer":{"x":0,"y":0},"drag_rect":{"x":0,"y":0,"width":1,"height":1},"candidates":[{"id":"","rect":{"x":0,"y":0,"width":1,"height":1}}]}]"#).is_err());
    }

    #[test]
    fn failure_log_reports_only_saves() {
        let log = FailureLog::default();
        let hook = log.hook();
        let key = BoardKey::default();

        hook(&PersistenceFailure {
            op: PersistenceOp::Load,
            key: key.clone(),
            error: DeckError::DeserializationError("bad".to_string()),
        });
        assert!(log.check().is_ok());

        hook(&PersistenceFailure {
            op: PersistenceOp::Save,
            key,
            error: DeckError::QuotaExceeded {
                needed: 10,
                available: 0,
            },
        });
        assert!(matches!(log.check(), Err(DeckError::IoError(_))));
        // Drained.
        assert!(log.check().is_ok());
    }

    #[test]
    fn output_path_requires_existing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(validate_output_path(&dir.path().join("out.bdck")).is_ok());
        assert!(validate_output_path(&dir.path().join("missing/out.bdck")).is_err());
    }

    #[test]
    fn input_path_must_be_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(validate_file_path(dir.path()).is_err());
        assert!(validate_file_path(&dir.path().join("absent.json")).is_err());
    }

    fn sectioned_config(dir: &Path) -> Config {
        Config {
            database: dir.join("board.redb"),
            backend: BackendKind::Redb,
            template: TemplateKind::Sectioned,
            ..Config::default()
        }
    }

    #[test]
    fn init_stores_sectioned_template() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = sectioned_config(dir.path());
        cmd_init(&config, false).expect("init");
        assert!(cmd_init(&config, false).is_err());

        let board = config.open_board(None).expect("open");
        assert_eq!(board.sections().len(), 6);
        assert_eq!(board.arrangement().len(), 9);
    }

    #[test]
    fn section_move_and_export_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = sectioned_config(dir.path());
        cmd_move_section(&config, false, "sec6", "sec1").expect("move");

        let output = dir.path().join("board.bdck");
        cmd_export(&config, false, &output).expect("export");
        let data = std::fs::read(&output).expect("read");
        let snapshot = import_snapshot(&data).expect("import");
        let first = snapshot.sections.ids().next().map(SectionId::as_str);
        assert_eq!(first, Some("sec6"));

        cmd_reorder(&config, false, "sec1-a", "sec2-a").expect("reorder");
        cmd_import(&config, &output).expect("import into board");
        let board = config.open_board(None).expect("open");
        assert_eq!(board.arrangement(), &snapshot.arrangement);
        assert_eq!(board.sections(), &snapshot.sections);
    }

    #[test]
    fn replace_command_swaps_in_pool_widget() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            database: dir.path().join("board.redb"),
            backend: BackendKind::Redb,
            ..Config::default()
        };
        cmd_replace(&config, false, "text-2", "chart-3").expect("replace");
        assert!(matches!(
            cmd_replace(&config, false, "text-1", "chart-3"),
            Err(DeckError::DuplicateBlock(_))
        ));

        let board = config.open_board(None).expect("open");
        assert_eq!(ids(&board), ["text-1", "chart-1", "chart-3", "chart-2"]);
        let available: Vec<&str> = board.available_blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(available, ["text-2", "text-3"]);
    }
}
