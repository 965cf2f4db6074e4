//! # blockdeck
//!
//! Headless host for blockdeck boards: the HTTP API, the CLI and the
//! configuration they share. The binary in `main.rs` only installs logging
//! and dispatches to [`cli::execute`].

pub mod api;
pub mod cli;
pub mod config;
