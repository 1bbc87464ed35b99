//! Caller-owned checklist state.
//!
//! # Responsibility
//! - Track destination, checked item ids and user custom items.
//! - Overlay custom items onto composed sections.
//!
//! # Invariants
//! - Changing destination clears checked ids; custom items survive.
//! - Re-selecting the same destination keeps checked ids.
//! - Custom item ids are generated and never collide with schema ids.
//! - Engines read this state by reference; it is persisted by the caller.

use crate::compose::merge::merge;
use crate::model::item::{ChecklistItem, Section};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

const CUSTOM_ID_PREFIX: &str = "custom-";

/// User-owned checklist state passed into the pure engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistState {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub checked_ids: BTreeSet<String>,
    /// Section id -> custom items in creation order.
    #[serde(default)]
    pub custom_items: BTreeMap<String, Vec<ChecklistItem>>,
}

impl ChecklistState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a destination. Returns whether checked ids were cleared.
    pub fn select_destination(&mut self, country: Option<&str>) -> bool {
        let next = country.map(str::to_string);
        if self.destination == next {
            return false;
        }
        let cleared = self.checked_ids.len();
        self.destination = next;
        self.checked_ids.clear();
        info!(
            "event=destination_select module=state status=ok destination={} cleared_checked={}",
            self.destination.as_deref().unwrap_or("-"),
            cleared
        );
        true
    }

    pub fn is_checked(&self, item_id: &str) -> bool {
        self.checked_ids.contains(item_id)
    }

    pub fn check(&mut self, item_id: &str) {
        self.checked_ids.insert(item_id.to_string());
    }

    pub fn uncheck(&mut self, item_id: &str) {
        self.checked_ids.remove(item_id);
    }

    /// Flips one id. Returns the new checked state.
    pub fn toggle(&mut self, item_id: &str) -> bool {
        if self.checked_ids.remove(item_id) {
            false
        } else {
            self.checked_ids.insert(item_id.to_string());
            true
        }
    }

    /// Adds a user item to a section and returns its generated id.
    ///
    /// Returns `None` for blank titles.
    pub fn add_custom_item(
        &mut self,
        section_id: &str,
        title: &str,
        description: &str,
    ) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = format!("{CUSTOM_ID_PREFIX}{}", Uuid::new_v4());
        let item = ChecklistItem::new(id.clone(), title).with_description(description.trim());
        self.custom_items
            .entry(section_id.to_string())
            .or_default()
            .push(item);
        Some(id)
    }

    /// Removes a custom item and its checked mark. Returns whether it existed.
    pub fn remove_custom_item(&mut self, item_id: &str) -> bool {
        let mut removed = false;
        for items in self.custom_items.values_mut() {
            let before = items.len();
            items.retain(|item| item.id != item_id);
            removed |= items.len() != before;
        }
        self.custom_items.retain(|_, items| !items.is_empty());
        if removed {
            self.checked_ids.remove(item_id);
        }
        removed
    }

    /// Clears checked ids and custom items; keeps the destination.
    pub fn reset(&mut self) {
        self.checked_ids.clear();
        self.custom_items.clear();
    }

    /// Overlays custom items onto composed sections with title merge.
    ///
    /// A custom item titled exactly like a composed row replaces that row in
    /// place. The row's id becomes the custom id, so its checked state and
    /// any category progress move to the custom item.
    pub fn apply_custom_items(&self, sections: &[Section]) -> Vec<Section> {
        sections
            .iter()
            .map(|section| match self.custom_items.get(&section.id) {
                Some(custom) => Section::new(
                    section.id.clone(),
                    section.title.clone(),
                    merge(&section.items, custom),
                ),
                None => section.clone(),
            })
            .collect()
    }
}

/// Returns whether an id was generated by [`ChecklistState::add_custom_item`].
pub fn is_custom_item_id(item_id: &str) -> bool {
    item_id.starts_with(CUSTOM_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::{is_custom_item_id, ChecklistState};

    #[test]
    fn destination_change_clears_checked_only() {
        let mut state = ChecklistState::new();
        state.select_destination(Some("japan"));
        state.check("passport");
        let custom = state.add_custom_item("packing", "Camera", "").unwrap();

        assert!(!state.select_destination(Some("japan")));
        assert!(state.is_checked("passport"));

        assert!(state.select_destination(Some("korea")));
        assert!(state.checked_ids.is_empty());
        assert_eq!(state.custom_items["packing"][0].id, custom);
    }

    #[test]
    fn toggle_flips_state() {
        let mut state = ChecklistState::new();
        assert!(state.toggle("passport"));
        assert!(!state.toggle("passport"));
        assert!(!state.is_checked("passport"));
    }

    #[test]
    fn custom_items_get_prefixed_ids_and_reject_blank_titles() {
        let mut state = ChecklistState::new();
        assert_eq!(state.add_custom_item("packing", "   ", ""), None);
        let id = state.add_custom_item("packing", " Camera ", "spare battery").unwrap();
        assert!(is_custom_item_id(&id));
        assert_eq!(state.custom_items["packing"][0].title, "Camera");

        state.check(&id);
        assert!(state.remove_custom_item(&id));
        assert!(!state.is_checked(&id));
        assert!(state.custom_items.is_empty());
        assert!(!state.remove_custom_item(&id));
    }
}
