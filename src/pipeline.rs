//! Pipeline orchestration
//!
//! This module provides the public API for rebuilding a project document
//! from the raw text of a CSV export: sniff and read the table, detect the
//! export shape, parse rows with the matching adapter, then derive the
//! taxonomy and assemble the document.

use std::cmp::Ordering;

use crate::adapters;
use crate::encoder::ProjectAssembler;
use crate::error::RestoreError;
use crate::reader;
use crate::taxonomy::Taxonomy;
use crate::types::{ExportFormat, ObservationMeta, Project, RestoreConfig};

/// Result of a successful reconstruction
#[derive(Debug, Clone)]
pub struct RestoredProject {
    /// Export shape the input was detected as
    pub format: ExportFormat,
    /// The assembled project document
    pub project: Project,
}

/// Rebuild a project document from the raw text of a CSV export.
///
/// # Arguments
/// * `content` - Full text of the export file
/// * `config` - Defaults applied where the export carries no information
///
/// # Returns
/// The assembled document together with the detected export shape.
///
/// Reconstruction is all-or-nothing: any missing column, undetectable
/// shape or malformed numeric field fails the whole conversion.
pub fn restore_csv(content: &str, config: &RestoreConfig) -> Result<RestoredProject, RestoreError> {
    let table = reader::read_table(content)?;
    if table.rows.is_empty() {
        return Err(RestoreError::EmptyInput);
    }

    let format = ExportFormat::detect(&table.headers).ok_or(RestoreError::UnknownFormat)?;
    let meta = ObservationMeta::from_row(&table.rows[0], config)?;

    // Stage 1: parse rows with the shape-specific adapter
    let parser = adapters::parser_for(format);
    let mut parsed = parser.parse(&table.rows, meta.fps)?;

    // Stage 2: chronological ordering; the stable sort keeps input order
    // for events at the same time
    parsed
        .events
        .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));

    // Stage 3: derive the taxonomy and assemble the document
    let taxonomy = Taxonomy::build(&parsed, config);
    let project = ProjectAssembler::new(config).assemble(&meta, taxonomy, parsed.events);

    Ok(RestoredProject { format, project })
}
