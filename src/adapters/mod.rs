//! Row-parser variants
//!
//! One adapter per export shape. Both parse raw rows into the same
//! intermediate representation: accumulated per-behavior observations plus
//! the reconstructed event list.

mod aggregated;
mod standard;

pub use aggregated::AggregatedParser;
pub use standard::StandardParser;

use crate::error::RestoreError;
use crate::reader::Row;
use crate::types::{ExportFormat, ParsedEvents};

/// Trait for export-shape row parsers
pub trait RowParser {
    /// Parse data rows into behavior accumulators and events.
    ///
    /// `fps` is used to synthesize frame indices where the export does not
    /// carry them.
    fn parse(&self, rows: &[Row], fps: f64) -> Result<ParsedEvents, RestoreError>;
}

/// Parser implementation for a detected export format.
pub fn parser_for(format: ExportFormat) -> &'static dyn RowParser {
    match format {
        ExportFormat::Standard => &StandardParser,
        ExportFormat::Aggregated => &AggregatedParser,
    }
}
