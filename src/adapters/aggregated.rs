//! Aggregated export parser
//!
//! Aggregated exports carry one row per behavior bout with `Start (s)` and
//! `Stop (s)` times. State bouts are unfolded back into start/stop event
//! pairs; point bouts produce a single event.

use crate::error::RestoreError;
use crate::normalizer::parse_decimal;
use crate::reader::Row;
use crate::types::{Event, ParsedEvents};

use super::RowParser;

/// Bouts shorter than this with no explicit behavior type count as point
/// events.
pub const POINT_EPSILON: f64 = 0.001;

/// Parser for aggregated (one row per bout) exports
pub struct AggregatedParser;

impl RowParser for AggregatedParser {
    fn parse(&self, rows: &[Row], fps: f64) -> Result<ParsedEvents, RestoreError> {
        let mut parsed = ParsedEvents::default();

        for row in rows {
            let code = row.require("Behavior")?.to_string();
            let subject = row.require("Subject")?.to_string();
            let category = row.get("Behavioral category").unwrap_or("").to_string();

            let start = parse_decimal(row.require("Start (s)")?)?;
            let stop = parse_decimal(row.require("Stop (s)")?)?;

            // The modifier can sit in any Modifier*-named column; the first
            // non-blank one in column order wins
            let modifier = row
                .fields()
                .filter(|(name, _)| name.starts_with("Modifier"))
                .map(|(_, value)| value.trim())
                .find(|value| !value.is_empty())
                .unwrap_or("")
                .to_string();

            let comment = match row.first_non_empty(&["Comment", "Comment start"]) {
                Some(value) if value != "NA" => value.to_string(),
                _ => String::new(),
            };

            let behavior_type = row
                .get("Behavior type")
                .unwrap_or("")
                .trim()
                .to_uppercase();
            let is_point = behavior_type == "POINT"
                || (behavior_type.is_empty() && (stop - start).abs() < POINT_EPSILON);

            let info = parsed.behavior_entry(&code);
            info.record_category(&category);
            if !modifier.is_empty() {
                info.record_modifiers(&modifier);
            }
            info.record_type(if is_point { "POINT" } else { "STATE" });

            parsed.subjects.insert(subject.clone());

            if is_point {
                parsed.events.push(Event {
                    time: start,
                    subject,
                    code,
                    modifier,
                    comment,
                    frame_index: (start * fps) as i64,
                });
            } else {
                // Modifier and comment are defined only at bout start; a
                // degenerate bout with start == stop still gets both events
                parsed.events.push(Event {
                    time: start,
                    subject: subject.clone(),
                    code: code.clone(),
                    modifier,
                    comment,
                    frame_index: (start * fps) as i64,
                });
                parsed.events.push(Event {
                    time: stop,
                    subject,
                    code,
                    modifier: String::new(),
                    comment: String::new(),
                    frame_index: (stop * fps) as i64,
                });
            }
        }

        Ok(parsed)
    }
}
