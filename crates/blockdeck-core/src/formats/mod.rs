//! # Formats
//!
//! Byte encodings of arrangements and section layouts. File and store I/O
//! live elsewhere.

pub mod persistence;

pub use persistence::{
    arrangement_from_json, arrangement_to_json, ensure_persistable, sections_from_json,
    sections_to_json,
};
