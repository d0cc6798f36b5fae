//! Standard export parser
//!
//! Standard exports carry one row per coded event with an explicit
//! `Behavior type` column. Frame indices come from the `Image index` column
//! when the export has one, otherwise from the event time and frame rate.

use crate::error::RestoreError;
use crate::normalizer::parse_decimal;
use crate::reader::Row;
use crate::types::{Event, ParsedEvents};

use super::RowParser;

/// Parser for standard (one row per event) exports
pub struct StandardParser;

impl RowParser for StandardParser {
    fn parse(&self, rows: &[Row], fps: f64) -> Result<ParsedEvents, RestoreError> {
        let mut parsed = ParsedEvents::default();

        for row in rows {
            let code = row.require("Behavior")?.to_string();
            let behavior_type = row.require("Behavior type")?.to_string();
            let category = row.require("Behavioral category")?.to_string();
            let subject = row.require("Subject")?.to_string();
            let time = parse_decimal(row.require("Time")?)?;

            let modifier = row.get("Modifier #1").unwrap_or("").trim().to_string();

            let comment = match row.get("Comment") {
                Some(value) if !value.is_empty() && value != "NA" => value.to_string(),
                _ => String::new(),
            };

            let frame_index = row
                .get("Image index")
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .unwrap_or((time * fps) as i64);

            let info = parsed.behavior_entry(&code);
            info.record_type(&behavior_type);
            info.record_category(&category);
            if !modifier.is_empty() {
                info.record_modifiers(&modifier);
            }

            parsed.subjects.insert(subject.clone());
            parsed.events.push(Event {
                time,
                subject,
                code,
                modifier,
                comment,
                frame_index,
            });
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_table;

    const HEADER: &str =
        "Observation id,Time,Subject,Behavior,Behavior type,Behavioral category,Modifier #1,Comment,Image index";

    fn parse(csv: &str, fps: f64) -> ParsedEvents {
        let table = read_table(csv).unwrap();
        StandardParser.parse(&table.rows, fps).unwrap()
    }

    #[test]
    fn test_one_event_per_row() {
        let csv = format!("{HEADER}\nobs,1.0,A,Walk,START,Locomotion,,,30\nobs,5.0,A,Walk,STOP,Locomotion,,,150\n");
        let parsed = parse(&csv, 30.0);
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.events[0].time, 1.0);
        assert_eq!(parsed.events[1].time, 5.0);
    }

    #[test]
    fn test_start_stop_tags_classify_state() {
        let csv = format!("{HEADER}\nobs,1.0,A,Walk,START,,,,\nobs,5.0,A,Walk,STOP,,,,\nobs,2.0,A,Peck,POINT,,,,\n");
        let parsed = parse(&csv, 30.0);
        assert!(parsed.behaviors["Walk"].is_state());
        assert!(!parsed.behaviors["Peck"].is_state());
    }

    #[test]
    fn test_image_index_used_when_parseable() {
        let csv = format!("{HEADER}\nobs,1.0,A,Walk,POINT,,,,42\n");
        let parsed = parse(&csv, 30.0);
        assert_eq!(parsed.events[0].frame_index, 42);
    }

    #[test]
    fn test_frame_index_synthesized_from_fps() {
        let csv = format!("{HEADER}\nobs,1.5,A,Walk,POINT,,,,\n");
        let parsed = parse(&csv, 30.0);
        // 1.5 * 30 = 45, truncated toward zero
        assert_eq!(parsed.events[0].frame_index, 45);
    }

    #[test]
    fn test_na_comment_becomes_empty() {
        let csv = format!("{HEADER}\nobs,1.0,A,Walk,POINT,,,NA,\nobs,2.0,A,Walk,POINT,,,real note,\n");
        let parsed = parse(&csv, 30.0);
        assert_eq!(parsed.events[0].comment, "");
        assert_eq!(parsed.events[1].comment, "real note");
    }

    #[test]
    fn test_modifier_tokens_accumulated() {
        let csv = format!("{HEADER}\nobs,1.0,A,Walk,POINT,,\"fast, uphill\",,\nobs,2.0,A,Walk,POINT,,slow,,\n");
        let parsed = parse(&csv, 30.0);
        let tokens: Vec<&str> = parsed.behaviors["Walk"]
            .modifiers
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(tokens, vec!["fast", "slow", "uphill"]);
        assert_eq!(parsed.events[0].modifier, "fast, uphill");
        assert_eq!(parsed.events[1].modifier, "slow");
    }

    #[test]
    fn test_category_last_seen_wins() {
        let csv = format!("{HEADER}\nobs,1.0,A,Walk,POINT,Old,,,\nobs,2.0,A,Walk,POINT,New,,,\n");
        let parsed = parse(&csv, 30.0);
        assert_eq!(parsed.behaviors["Walk"].category.as_deref(), Some("New"));
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let table = read_table("Time,Subject,Behavior,Behavior type\n1.0,A,Walk,POINT\n").unwrap();
        let err = StandardParser.parse(&table.rows, 30.0).unwrap_err();
        assert!(
            matches!(err, RestoreError::MissingColumn(ref col) if col == "Behavioral category")
        );
    }

    #[test]
    fn test_malformed_time_is_fatal() {
        let csv = format!("{HEADER}\nobs,not-a-number,A,Walk,POINT,,,,\n");
        let table = read_table(&csv).unwrap();
        let err = StandardParser.parse(&table.rows, 30.0).unwrap_err();
        assert!(matches!(err, RestoreError::InvalidNumber(ref v) if v == "not-a-number"));
    }
}
