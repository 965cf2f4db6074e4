//! # Blockdeck CLI
//!
//! ## Available Commands
//!
//! - `server` - Serve the board over HTTP
//! - `show` - Print the arrangement (default)
//! - `catalog` - List the style tokens
//! - `init` - Store the default arrangement
//! - `reorder` - Move a block onto another block's position
//! - `style` - Apply a chart style to a block
//! - `move-section` - Move a section onto another section's position
//! - `widgets` - List pool widgets that are not shown
//! - `replace` - Swap a shown block for a pool widget
//! - `replay` - Drive the drag machine with a scripted gesture
//! - `export` - Write a binary snapshot
//! - `import` - Load a binary snapshot into the board

mod commands;

use crate::config::{BackendKind, Config, Overrides};
use blockdeck_core::DeckError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Blockdeck - drag-and-drop dashboard board
///
/// Reorder dashboard blocks and restyle chart blocks, one board at a time.
#[derive(Parser, Debug)]
#[command(name = "blockdeck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the redb database
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Board to open
    #[arg(short = 'b', long, global = true)]
    pub board: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the current arrangement
    Show,

    /// List the style tokens
    Catalog,

    /// Store the default arrangement for the board
    Init {
        /// Overwrite an arrangement that is already stored
        #[arg(short, long)]
        force: bool,
    },

    /// Move a block to another block's position
    Reorder {
        /// Block to move
        #[arg(long)]
        from: String,

        /// Block whose position it takes
        #[arg(long)]
        to: String,
    },

    /// Apply a chart style to a block
    Style {
        /// Target block id
        #[arg(long)]
        block: String,

        /// Style name (bar, line, pie, radar, radialbar)
        #[arg(long)]
        style: String,
    },

    /// Move a section to another section's position
    MoveSection {
        /// Section to move
        #[arg(long)]
        from: String,

        /// Section whose position it takes
        #[arg(long)]
        to: String,
    },

    /// List widgets that could replace a shown block
    Widgets,

    /// Swap a shown block for a widget from the pool
    Replace {
        /// Block to take off the board
        #[arg(long)]
        block: String,

        /// Pool widget to show in its place
        #[arg(long)]
        with: String,
    },

    /// Replay a scripted pointer gesture from a JSON file
    Replay {
        /// Path to the event file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export the board as a binary snapshot
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import a binary snapshot into the board
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

impl Cli {
    /// Flags that override the configuration layers below them.
    fn overrides(&self) -> Overrides {
        let (host, port) = match &self.command {
            Some(Commands::Server { host, port }) => (host.clone(), *port),
            _ => (None, None),
        };
        Overrides {
            database: self.database.clone(),
            backend: self.backend,
            board: self.board.clone(),
            host,
            port,
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), DeckError> {
    let config = Config::load(cli.config.as_deref(), cli.overrides())?;
    if cli.verbose {
        tracing::info!(
            database = %config.database.display(),
            backend = %config.backend,
            board = %config.board,
            template = %config.template,
            "configuration resolved"
        );
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { .. }) => cmd_server(&config).await,
        Some(Commands::Show) | None => cmd_show(&config, json_mode),
        Some(Commands::Catalog) => cmd_catalog(&config, json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Reorder { from, to }) => cmd_reorder(&config, json_mode, &from, &to),
        Some(Commands::Style { block, style }) => cmd_style(&config, json_mode, &block, &style),
        Some(Commands::MoveSection { from, to }) => {
            cmd_move_section(&config, json_mode, &from, &to)
        }
        Some(Commands::Widgets) => cmd_widgets(&config, json_mode),
        Some(Commands::Replace { block, with }) => cmd_replace(&config, json_mode, &block, &with),
        Some(Commands::Replay { file }) => cmd_replay(&config, json_mode, &file),
        Some(Commands::Export { output }) => cmd_export(&config, json_mode, &output),
        Some(Commands::Import { input }) => cmd_import(&config, &input),
    }
}
