//! Checklist item and section records.
//!
//! # Responsibility
//! - Define the canonical item shape used by base schema, country overrides
//!   and user custom items.
//! - Provide the well-formedness predicate engines use to skip bad records.
//!
//! # Invariants
//! - `id` is unique within one composed checklist.
//! - An item with a blank `id` or `title` is malformed and never emitted by
//!   the composition engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the presentation layer should treat an item when activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Plain checkbox row.
    #[default]
    None,
    /// Row opens `link_url`.
    Link,
}

impl InteractionKind {
    /// Parses a dataset value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

/// One checklist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Stable identity used for checked-state bookkeeping.
    pub id: String,
    /// Display title. Merge key against override items.
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub interaction: InteractionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

impl ChecklistItem {
    /// Creates a plain item with empty description and no media.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            interaction: InteractionKind::None,
            image_url: None,
            link_url: None,
        }
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style link setter. Also switches interaction to `Link`.
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self.interaction = InteractionKind::Link;
        self
    }

    /// Builder-style image setter.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Returns whether both `id` and `title` carry non-blank text.
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty()
    }
}

/// Ordered group of checklist items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>, items: Vec<ChecklistItem>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items,
        }
    }

    /// Returns the first item with the given id.
    pub fn item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

/// Per-destination override items keyed by section id.
///
/// Sections without an entry keep their base items.
pub type CountryOverrideSet = BTreeMap<String, Vec<ChecklistItem>>;
