//! Checklist schema provider.
//!
//! # Responsibility
//! - Decode the base schema, country overrides, categories and duration slot.
//! - Validate record shape at the data boundary so engines see typed items.
//! - Expose the built-in dataset parsed once per process.
//!
//! # Invariants
//! - Items missing `id` or `title` are skipped, never fatal.
//! - Section ids and category ids are unique.
//! - The built-in dataset is immutable after first access.

use crate::compose::duration::DurationSlot;
use crate::lexicon::{Lexicon, LexiconError};
use crate::model::category::Category;
use crate::model::item::{ChecklistItem, CountryOverrideSet, InteractionKind, Section};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BUILTIN_DATASET_JSON: &str = include_str!("../../data/checklist.json");
const BUILTIN_LEXICON_JSON: &str = include_str!("../../data/lexicon.json");

static BUILTIN_DATASET: Lazy<Dataset> = Lazy::new(|| {
    Dataset::from_json_str(BUILTIN_DATASET_JSON).unwrap_or_else(|err| {
        warn!("event=dataset_load module=schema status=fallback source=builtin error={err}");
        Dataset::default()
    })
});

static BUILTIN_LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::from_json_str(BUILTIN_LEXICON_JSON).unwrap_or_else(|err| {
        warn!("event=lexicon_load module=schema status=fallback source=builtin error={err}");
        Lexicon::default()
    })
});

/// Returns the dataset bundled with the crate.
pub fn builtin_dataset() -> &'static Dataset {
    &BUILTIN_DATASET
}

/// Returns the lexicon bundled with the crate.
pub fn builtin_lexicon() -> &'static Lexicon {
    &BUILTIN_LEXICON
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema decode/validation errors.
#[derive(Debug)]
pub enum SchemaError {
    Json(serde_json::Error),
    DuplicateSectionId(String),
    DuplicateCategoryId(String),
    EmptySlotField(&'static str),
    Io(std::io::Error),
    Lexicon(LexiconError),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid checklist dataset: {err}"),
            Self::DuplicateSectionId(id) => write!(f, "section id is duplicated: {id}"),
            Self::DuplicateCategoryId(id) => write!(f, "category id is duplicated: {id}"),
            Self::EmptySlotField(name) => write!(f, "duration slot `{name}` must not be empty"),
            Self::Io(err) => write!(f, "failed to read data file: {err}"),
            Self::Lexicon(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Lexicon(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for SchemaError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LexiconError> for SchemaError {
    fn from(value: LexiconError) -> Self {
        Self::Lexicon(value)
    }
}

/// Immutable checklist data for every destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub sections: Vec<Section>,
    /// Country key -> override items per section.
    pub overrides: BTreeMap<String, CountryOverrideSet>,
    pub categories: Vec<Category>,
    pub duration_slot: DurationSlot,
}

impl Dataset {
    /// Decodes and validates a dataset document.
    ///
    /// # Errors
    /// - Returns `Json` when the document does not decode.
    /// - Returns `Duplicate*` for repeated section or category ids.
    /// - Returns `EmptySlotField` for a blank duration slot field.
    pub fn from_json_str(json: &str) -> SchemaResult<Self> {
        let raw: RawDataset = serde_json::from_str(json)?;

        let mut section_ids = BTreeSet::new();
        let mut sections = Vec::with_capacity(raw.sections.len());
        for section in raw.sections {
            if !section_ids.insert(section.id.clone()) {
                return Err(SchemaError::DuplicateSectionId(section.id));
            }
            let items = convert_items(&section.id, section.items);
            sections.push(Section::new(section.id, section.title, items));
        }

        let mut overrides = BTreeMap::new();
        for (country, by_section) in raw.overrides {
            let set: CountryOverrideSet = by_section
                .into_iter()
                .map(|(section_id, items)| {
                    let items = convert_items(&section_id, items);
                    (section_id, items)
                })
                .collect();
            overrides.insert(country, set);
        }

        let mut category_ids = BTreeSet::new();
        for category in &raw.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(SchemaError::DuplicateCategoryId(category.id.clone()));
            }
        }

        let duration_slot = raw.duration_slot.unwrap_or_default();
        validate_slot(&duration_slot)?;

        info!(
            "event=dataset_load module=schema status=ok sections={} countries={} categories={}",
            sections.len(),
            overrides.len(),
            raw.categories.len()
        );

        Ok(Self {
            sections,
            overrides,
            categories: raw.categories,
            duration_slot,
        })
    }

    /// Reads and decodes a dataset file.
    pub fn load(path: impl AsRef<std::path::Path>) -> SchemaResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Returns the override set for a destination, if one exists.
    pub fn overrides_for(&self, country: &str) -> Option<&CountryOverrideSet> {
        self.overrides.get(country)
    }

    /// Sorted destination keys that carry overrides.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == section_id)
    }
}

/// Reads and decodes a lexicon file.
pub fn load_lexicon(path: impl AsRef<std::path::Path>) -> SchemaResult<Lexicon> {
    let json = std::fs::read_to_string(path)?;
    Ok(Lexicon::from_json_str(&json)?)
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    sections: Vec<RawSection>,
    #[serde(default)]
    overrides: BTreeMap<String, BTreeMap<String, Vec<RawItem>>>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    duration_slot: Option<DurationSlot>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    interaction: Option<String>,
    image_url: Option<String>,
    link_url: Option<String>,
}

fn convert_items(section_id: &str, raw: Vec<RawItem>) -> Vec<ChecklistItem> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, item)| convert_item(section_id, index, item))
        .collect()
}

fn convert_item(section_id: &str, index: usize, raw: RawItem) -> Option<ChecklistItem> {
    let (Some(id), Some(title)) = (non_blank(raw.id), non_blank(raw.title)) else {
        warn!(
            "event=dataset_load module=schema status=skip reason=missing_id_or_title section={} index={}",
            section_id, index
        );
        return None;
    };

    let interaction = match raw.interaction.as_deref() {
        None => InteractionKind::None,
        Some(value) => InteractionKind::parse(value).unwrap_or_else(|| {
            warn!(
                "event=dataset_load module=schema status=fallback reason=unknown_interaction section={} id={} value={}",
                section_id, id, value
            );
            InteractionKind::None
        }),
    };

    Some(ChecklistItem {
        id,
        title,
        description: raw.description.unwrap_or_default(),
        interaction,
        image_url: non_blank(raw.image_url),
        link_url: non_blank(raw.link_url),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn validate_slot(slot: &DurationSlot) -> SchemaResult<()> {
    if slot.section_id.trim().is_empty() {
        return Err(SchemaError::EmptySlotField("section_id"));
    }
    if slot.remove_item_id.trim().is_empty() {
        return Err(SchemaError::EmptySlotField("remove_item_id"));
    }
    if slot.anchor_item_id.trim().is_empty() {
        return Err(SchemaError::EmptySlotField("anchor_item_id"));
    }
    Ok(())
}
