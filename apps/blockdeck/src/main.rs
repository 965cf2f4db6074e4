//! # Blockdeck
//!
//! Binary entry point: an HTTP server and a CLI over one drag-and-drop
//! dashboard board.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              apps/blockdeck                   │
//! │                                               │
//! │   ┌────────────┐          ┌────────────┐      │
//! │   │    CLI     │          │  HTTP API  │      │
//! │   │   (clap)   │          │   (axum)   │      │
//! │   └─────┬──────┘          └─────┬──────┘      │
//! │         └────────────┬──────────┘             │
//! │                      ▼                        │
//! │              ┌───────────────┐                │
//! │              │ blockdeck-core│                │
//! │              └───────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! blockdeck server --host 0.0.0.0 --port 8080
//! blockdeck show
//! blockdeck style --block chart-1 --style pie
//! blockdeck replay -f gesture.json
//! ```

use blockdeck::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // BLOCKDECK_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("BLOCKDECK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blockdeck=info,blockdeck_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  ┌──┐┌──┐  blockdeck v{}
  └──┘└──┘  drag to reorder, drop to restyle
"#,
        env!("CARGO_PKG_VERSION")
    );
}
