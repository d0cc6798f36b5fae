//! Core types for the restore pipeline
//!
//! This module defines the data that flows through each stage of the
//! pipeline: the detected export shape, the intermediate event stream and
//! per-behavior accumulators, and the nested project document that is
//! serialized at the end.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::RestoreError;
use crate::normalizer::parse_decimal;
use crate::reader::Row;

/// Frame rate assumed when the export carries no FPS column
pub const DEFAULT_FPS: f64 = 30.0;

/// Display color assigned to every restored behavior
pub const DEFAULT_BEHAVIOR_COLOR: &str = "#aaaaaa";

/// Project format version written into the restored document
pub const PROJECT_FORMAT_VERSION: &str = "7.0";

/// Time display format written into the restored document
pub const DEFAULT_TIME_FORMAT: &str = "hh:mm:ss";

/// Description attached to restored projects
pub const RESTORED_DESCRIPTION: &str = "Restored from CSV export";

/// Defaults applied wherever the export carries no information.
///
/// The assembler reads every structural default from here, so a consumer
/// needing different values has a single substitution point.
#[derive(Debug, Clone)]
pub struct RestoreConfig {
    /// Frame rate used for frame-index synthesis when the export has no
    /// usable FPS column
    pub fallback_fps: f64,
    /// Display color assigned to restored behaviors
    pub behavior_color: String,
    /// Project format version constant
    pub format_version: String,
    /// Time display format constant
    pub time_format: String,
    /// Description attached to the restored project
    pub project_description: String,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            fallback_fps: DEFAULT_FPS,
            behavior_color: DEFAULT_BEHAVIOR_COLOR.to_string(),
            format_version: PROJECT_FORMAT_VERSION.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            project_description: RESTORED_DESCRIPTION.to_string(),
        }
    }
}

/// Export shape identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One row per coded event, with `Time` and `Behavior type` columns
    Standard,
    /// One row per behavior bout, with `Start (s)` and `Stop (s)` columns
    Aggregated,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Standard => "standard",
            ExportFormat::Aggregated => "aggregated",
        }
    }

    /// Classify the export from its header columns.
    ///
    /// Aggregated exports carry `Start (s)`/`Stop (s)` and win when both
    /// shapes match; standard exports carry `Time`/`Behavior type`.
    pub fn detect(headers: &[String]) -> Option<ExportFormat> {
        let has = |name: &str| headers.iter().any(|h| h == name);
        if has("Start (s)") && has("Stop (s)") {
            return Some(ExportFormat::Aggregated);
        }
        if has("Time") && has("Behavior type") {
            return Some(ExportFormat::Standard);
        }
        None
    }
}

/// A single coded event in the reconstructed observation.
///
/// Serialized as the 6-element array
/// `[time, subject, code, modifier, comment, frame_index]` the project
/// format stores events as.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event time in seconds from observation start
    pub time: f64,
    /// Subject the behavior was coded for
    pub subject: String,
    /// Behavior code
    pub code: String,
    /// Modifier value, empty when none was coded
    pub modifier: String,
    /// Free-text comment, empty when none was coded
    pub comment: String,
    /// Media frame index at the event time
    pub frame_index: i64,
}

impl Serialize for Event {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(6))?;
        seq.serialize_element(&self.time)?;
        seq.serialize_element(&self.subject)?;
        seq.serialize_element(&self.code)?;
        seq.serialize_element(&self.modifier)?;
        seq.serialize_element(&self.comment)?;
        seq.serialize_element(&self.frame_index)?;
        seq.end()
    }
}

/// Per-behavior accumulator built up while scanning rows.
///
/// One instance per behavior code, never shared across codes. Finalized by
/// the taxonomy builder once all rows are processed.
#[derive(Debug, Clone, Default)]
pub struct BehaviorInfo {
    /// Type tags observed for this code (POINT, STATE, START, STOP)
    pub types: BTreeSet<String>,
    /// Behavioral category, last-seen value wins
    pub category: Option<String>,
    /// Distinct modifier tokens observed for this code
    pub modifiers: BTreeSet<String>,
}

impl BehaviorInfo {
    pub fn record_type(&mut self, tag: &str) {
        self.types.insert(tag.to_string());
    }

    pub fn record_category(&mut self, category: &str) {
        self.category = Some(category.to_string());
    }

    /// Split a raw modifier field on `,` and record the non-empty tokens.
    pub fn record_modifiers(&mut self, raw: &str) {
        for token in raw.split(',') {
            let token = token.trim();
            if !token.is_empty() {
                self.modifiers.insert(token.to_string());
            }
        }
    }

    /// A behavior is a state event if any interval-style tag was observed.
    pub fn is_state(&self) -> bool {
        ["START", "STOP", "STATE"]
            .iter()
            .any(|tag| self.types.contains(*tag))
    }
}

/// Uniform output of both row-parser variants
#[derive(Debug, Clone, Default)]
pub struct ParsedEvents {
    /// Accumulated per-behavior observations, keyed by behavior code
    pub behaviors: BTreeMap<String, BehaviorInfo>,
    /// Distinct subjects observed across all rows
    pub subjects: BTreeSet<String>,
    /// Reconstructed events in row order, sorted by the pipeline
    pub events: Vec<Event>,
}

impl ParsedEvents {
    /// Accumulator for `code`, created on first observation.
    pub fn behavior_entry(&mut self, code: &str) -> &mut BehaviorInfo {
        self.behaviors.entry(code.to_string()).or_default()
    }
}

/// Observation-level metadata pulled from the first export row
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationMeta {
    pub observation_id: String,
    pub date: String,
    pub media_file: String,
    pub media_duration: f64,
    pub fps: f64,
}

impl ObservationMeta {
    /// Extract metadata from the first row of the export.
    ///
    /// `Observation id`, `Observation date` and `Media file name` must be
    /// present. Media duration defaults to 0.0 and FPS to the configured
    /// fallback when their columns are absent or blank; older exports name
    /// the FPS column `FPS (frame/s)`, both spellings are accepted.
    pub fn from_row(row: &Row, config: &RestoreConfig) -> Result<Self, RestoreError> {
        let observation_id = row.require("Observation id")?.to_string();
        let date = row.require("Observation date")?.to_string();
        let media_file = row.require("Media file name")?.to_string();

        let media_duration = match row.first_non_empty(&["Media duration (s)"]) {
            Some(raw) => parse_decimal(raw)?,
            None => 0.0,
        };
        let fps = match row.first_non_empty(&["FPS", "FPS (frame/s)"]) {
            Some(raw) => parse_decimal(raw)?,
            None => config.fallback_fps,
        };

        Ok(Self {
            observation_id,
            date,
            media_file,
            media_duration,
            fps,
        })
    }
}

// Project document structures
//
// These mirror the nested layout of a version 7.0 project file. Field
// order matches the order the target application writes, and keys that
// contain spaces are renamed explicitly.

/// One entry in the subjects configuration
#[derive(Debug, Clone, Serialize)]
pub struct SubjectConf {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// Display type of a behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BehaviorKind {
    #[serde(rename = "State event")]
    State,
    #[serde(rename = "Point event")]
    Point,
}

impl BehaviorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::State => "State event",
            BehaviorKind::Point => "Point event",
        }
    }
}

/// One modifier set attached to a behavior
#[derive(Debug, Clone, Serialize)]
pub struct ModifierSet {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(rename = "ask at stop")]
    pub ask_at_stop: bool,
    pub values: Vec<String>,
}

/// Modifiers block of a behavior entry.
///
/// The project format stores the empty string when a behavior has no
/// modifiers and an indexed map of sets otherwise.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ModifiersField {
    Empty(String),
    Sets(BTreeMap<String, ModifierSet>),
}

impl ModifiersField {
    pub fn empty() -> Self {
        ModifiersField::Empty(String::new())
    }
}

/// One entry in the behaviors configuration
#[derive(Debug, Clone, Serialize)]
pub struct BehaviorConf {
    #[serde(rename = "type")]
    pub kind: BehaviorKind,
    pub key: String,
    pub code: String,
    pub description: String,
    pub color: String,
    pub category: String,
    pub modifiers: ModifiersField,
    pub excluded: String,
    #[serde(rename = "coding map")]
    pub coding_map: String,
}

/// One entry in the behavioral categories configuration
#[derive(Debug, Clone, Serialize)]
pub struct CategoryConf {
    pub name: String,
    pub color: String,
}

/// Media metadata block of an observation
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfo {
    pub length: BTreeMap<String, f64>,
    pub fps: BTreeMap<String, f64>,
    #[serde(rename = "hasVideo")]
    pub has_video: BTreeMap<String, bool>,
    #[serde(rename = "hasAudio")]
    pub has_audio: BTreeMap<String, bool>,
    pub offset: BTreeMap<String, f64>,
    #[serde(rename = "zoom level")]
    pub zoom_level: BTreeMap<String, f64>,
}

/// A single reconstructed observation
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub file: BTreeMap<String, Vec<String>>,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub description: String,
    #[serde(rename = "time offset")]
    pub time_offset: f64,
    pub events: Vec<Event>,
    #[serde(rename = "observation time interval")]
    pub time_interval: [i64; 2],
    pub independent_variables: BTreeMap<String, serde_json::Value>,
    pub visualize_spectrogram: bool,
    pub visualize_waveform: bool,
    pub media_creation_date_as_offset: bool,
    pub media_scan_sampling_duration: i64,
    pub image_display_duration: i64,
    pub close_behaviors_between_videos: bool,
    pub media_info: MediaInfo,
}

/// The root project document
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub time_format: String,
    pub project_date: String,
    pub project_name: String,
    pub project_description: String,
    pub project_format_version: String,
    pub subjects_conf: BTreeMap<String, SubjectConf>,
    pub behaviors_conf: BTreeMap<String, BehaviorConf>,
    pub observations: BTreeMap<String, Observation>,
    pub behavioral_categories: Vec<String>,
    pub independent_variables: BTreeMap<String, serde_json::Value>,
    pub coding_map: BTreeMap<String, serde_json::Value>,
    pub behaviors_coding_map: Vec<serde_json::Value>,
    pub converters: BTreeMap<String, serde_json::Value>,
    pub behavioral_categories_config: BTreeMap<String, CategoryConf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_detect_standard() {
        let cols = headers(&["Observation id", "Time", "Subject", "Behavior", "Behavior type"]);
        assert_eq!(ExportFormat::detect(&cols), Some(ExportFormat::Standard));
    }

    #[test]
    fn test_detect_aggregated() {
        let cols = headers(&["Observation id", "Subject", "Behavior", "Start (s)", "Stop (s)"]);
        assert_eq!(ExportFormat::detect(&cols), Some(ExportFormat::Aggregated));
    }

    #[test]
    fn test_detect_aggregated_wins_over_standard() {
        // Headers matching both shapes classify as aggregated
        let cols = headers(&["Time", "Behavior type", "Start (s)", "Stop (s)"]);
        assert_eq!(ExportFormat::detect(&cols), Some(ExportFormat::Aggregated));
    }

    #[test]
    fn test_detect_unknown() {
        let cols = headers(&["Observation id", "Subject", "Behavior"]);
        assert_eq!(ExportFormat::detect(&cols), None);
    }

    #[test]
    fn test_event_serializes_as_array() {
        let event = Event {
            time: 1.5,
            subject: "A".to_string(),
            code: "Walk".to_string(),
            modifier: "fast".to_string(),
            comment: "".to_string(),
            frame_index: 45,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"[1.5,"A","Walk","fast","",45]"#);
    }

    #[test]
    fn test_behavior_info_state_classification() {
        let mut info = BehaviorInfo::default();
        info.record_type("START");
        info.record_type("STOP");
        assert!(info.is_state());

        let mut point = BehaviorInfo::default();
        point.record_type("POINT");
        assert!(!point.is_state());
    }

    #[test]
    fn test_record_modifiers_splits_and_trims() {
        let mut info = BehaviorInfo::default();
        info.record_modifiers(" fast , slow,,steady ");
        let tokens: Vec<&str> = info.modifiers.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["fast", "slow", "steady"]);
    }

    #[test]
    fn test_modifiers_field_serialization() {
        let json = serde_json::to_string(&ModifiersField::empty()).unwrap();
        assert_eq!(json, r#""""#);

        let mut sets = BTreeMap::new();
        sets.insert(
            "0".to_string(),
            ModifierSet {
                name: String::new(),
                description: String::new(),
                kind: 0,
                ask_at_stop: false,
                values: vec!["fast".to_string()],
            },
        );
        let json = serde_json::to_string(&ModifiersField::Sets(sets)).unwrap();
        assert_eq!(
            json,
            r#"{"0":{"name":"","description":"","type":0,"ask at stop":false,"values":["fast"]}}"#
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = RestoreConfig::default();
        assert_eq!(config.fallback_fps, 30.0);
        assert_eq!(config.behavior_color, "#aaaaaa");
        assert_eq!(config.format_version, "7.0");
        assert_eq!(config.time_format, "hh:mm:ss");
    }
}
