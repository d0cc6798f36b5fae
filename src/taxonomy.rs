//! Taxonomy building
//!
//! Turns the accumulated per-behavior observations into the ordered
//! subject, behavior and category configuration blocks of the project
//! document. Index keys are zero-based strings; subjects and behaviors are
//! indexed in lexicographic order, categories in first-discovery order.

use std::collections::BTreeMap;

use crate::types::{
    BehaviorConf, BehaviorKind, CategoryConf, ModifierSet, ModifiersField, ParsedEvents,
    RestoreConfig, SubjectConf,
};

/// Derived, read-only configuration view over the parsed rows
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub subjects_conf: BTreeMap<String, SubjectConf>,
    pub behaviors_conf: BTreeMap<String, BehaviorConf>,
    pub behavioral_categories: Vec<String>,
    pub categories_config: BTreeMap<String, CategoryConf>,
}

impl Taxonomy {
    /// Build the configuration blocks from accumulated observations.
    pub fn build(parsed: &ParsedEvents, config: &RestoreConfig) -> Taxonomy {
        let subjects_conf = parsed
            .subjects
            .iter()
            .enumerate()
            .map(|(index, name)| {
                (
                    index.to_string(),
                    SubjectConf {
                        key: String::new(),
                        name: name.clone(),
                        description: String::new(),
                    },
                )
            })
            .collect();

        let mut behaviors_conf = BTreeMap::new();
        let mut behavioral_categories: Vec<String> = Vec::new();

        for (index, (code, info)) in parsed.behaviors.iter().enumerate() {
            let kind = if info.is_state() {
                BehaviorKind::State
            } else {
                BehaviorKind::Point
            };

            let category = info.category.clone().unwrap_or_default();
            if !category.is_empty() && !behavioral_categories.contains(&category) {
                behavioral_categories.push(category.clone());
            }

            let modifiers = if info.modifiers.is_empty() {
                ModifiersField::empty()
            } else {
                let mut sets = BTreeMap::new();
                sets.insert(
                    "0".to_string(),
                    ModifierSet {
                        name: String::new(),
                        description: String::new(),
                        kind: 0,
                        ask_at_stop: false,
                        values: info.modifiers.iter().cloned().collect(),
                    },
                );
                ModifiersField::Sets(sets)
            };

            behaviors_conf.insert(
                index.to_string(),
                BehaviorConf {
                    kind,
                    key: String::new(),
                    code: code.clone(),
                    description: String::new(),
                    color: config.behavior_color.clone(),
                    category,
                    modifiers,
                    excluded: String::new(),
                    coding_map: String::new(),
                },
            );
        }

        let categories_config = behavioral_categories
            .iter()
            .enumerate()
            .map(|(index, name)| {
                (
                    index.to_string(),
                    CategoryConf {
                        name: name.clone(),
                        color: String::new(),
                    },
                )
            })
            .collect();

        Taxonomy {
            subjects_conf,
            behaviors_conf,
            behavioral_categories,
            categories_config,
        }
    }
}
