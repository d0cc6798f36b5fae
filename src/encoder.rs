//! Project assembly
//!
//! Merges taxonomy, event stream and observation metadata into the final
//! nested project document. Every structural default the target format
//! requires but the export cannot provide is applied here; this is the
//! only place new optional project fields should be added.

use chrono::Local;
use std::collections::BTreeMap;

use crate::error::RestoreError;
use crate::taxonomy::Taxonomy;
use crate::types::{Event, MediaInfo, Observation, ObservationMeta, Project, RestoreConfig};

/// Observation type recorded for reconstructed observations
pub const OBSERVATION_TYPE: &str = "MEDIA";

/// Number of media file slots an observation carries
const MEDIA_FILE_SLOTS: u32 = 8;

/// Assembles the root project document
pub struct ProjectAssembler<'a> {
    config: &'a RestoreConfig,
}

impl<'a> ProjectAssembler<'a> {
    pub fn new(config: &'a RestoreConfig) -> Self {
        Self { config }
    }

    /// Assemble the document from its reconstructed parts.
    ///
    /// Events are expected to be in final (chronological) order.
    pub fn assemble(
        &self,
        meta: &ObservationMeta,
        taxonomy: Taxonomy,
        events: Vec<Event>,
    ) -> Project {
        let mut observations = BTreeMap::new();
        observations.insert(
            meta.observation_id.clone(),
            self.build_observation(meta, events),
        );

        Project {
            time_format: self.config.time_format.clone(),
            project_date: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            project_name: meta.observation_id.clone(),
            project_description: self.config.project_description.clone(),
            project_format_version: self.config.format_version.clone(),
            subjects_conf: taxonomy.subjects_conf,
            behaviors_conf: taxonomy.behaviors_conf,
            observations,
            behavioral_categories: taxonomy.behavioral_categories,
            independent_variables: BTreeMap::new(),
            coding_map: BTreeMap::new(),
            behaviors_coding_map: Vec::new(),
            converters: BTreeMap::new(),
            behavioral_categories_config: taxonomy.categories_config,
        }
    }

    fn build_observation(&self, meta: &ObservationMeta, events: Vec<Event>) -> Observation {
        // Slot "1" holds the reconstructed media reference, the rest stay empty
        let mut file = BTreeMap::new();
        file.insert("1".to_string(), vec![meta.media_file.clone()]);
        for slot in 2..=MEDIA_FILE_SLOTS {
            file.insert(slot.to_string(), Vec::new());
        }

        // The export cannot distinguish audio from video tracks, so both
        // presence flags are forced on
        let media_info = MediaInfo {
            length: single(&meta.media_file, meta.media_duration),
            fps: single(&meta.media_file, meta.fps),
            has_video: single(&meta.media_file, true),
            has_audio: single(&meta.media_file, true),
            offset: single("1", 0.0),
            zoom_level: single("1", 1.0),
        };

        Observation {
            file,
            kind: OBSERVATION_TYPE.to_string(),
            date: meta.date.clone(),
            description: String::new(),
            time_offset: 0.0,
            events,
            time_interval: [0, 0],
            independent_variables: BTreeMap::new(),
            visualize_spectrogram: false,
            visualize_waveform: false,
            media_creation_date_as_offset: false,
            media_scan_sampling_duration: 0,
            image_display_duration: 1,
            close_behaviors_between_videos: false,
            media_info,
        }
    }
}

/// Serialize the document compactly; downstream tooling parses the output
/// byte-for-byte deterministically aside from the generation timestamp.
pub fn to_json(project: &Project) -> Result<String, RestoreError> {
    serde_json::to_string(project).map_err(RestoreError::JsonError)
}

fn single<V>(key: &str, value: V) -> BTreeMap<String, V> {
    let mut map = BTreeMap::new();
    map.insert(key.to_string(), value);
    map
}
