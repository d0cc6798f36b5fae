//! boris-restore - Rebuild BORIS project files from their CSV exports
//!
//! Reverses the lossy CSV export pipeline of the BORIS behavioral-coding
//! application: detects which of the two export shapes a file uses, infers
//! the behavior taxonomy (state vs. point events, categories, modifiers)
//! from observed row patterns, reconstructs the chronologically ordered
//! event stream, and assembles a complete project document the application
//! can reopen.
//!
//! ## Pipeline
//!
//! format detection → row parsing → taxonomy building → project assembly

pub mod adapters;
pub mod encoder;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod taxonomy;
pub mod types;

pub use error::RestoreError;
pub use pipeline::{restore_csv, RestoredProject};
pub use types::{Event, ExportFormat, Project, RestoreConfig};

/// Crate version reported by the CLI
pub const RESTORE_VERSION: &str = env!("CARGO_PKG_VERSION");
