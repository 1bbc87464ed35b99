//! Per-destination checklist composition.
//!
//! # Responsibility
//! - Apply duration insertion, then title-keyed override merge, per section.
//! - Produce the composed section list consumed by annotation and matching.
//!
//! # Invariants
//! - Section order follows the base schema.
//! - Overrides for unknown section ids are ignored.
//! - Positional insertion always runs before override merge.

pub mod duration;
pub mod merge;

use self::duration::{apply_duration_plan, duration_items, DurationSelection, DurationSlot};
use self::merge::merge;
use crate::model::item::{CountryOverrideSet, Section};
use crate::schema::Dataset;
use log::debug;

/// Composes the dataset's checklist for a destination and trip length.
///
/// An unknown or absent country yields the base schema, still subject to
/// duration insertion.
pub fn compose_checklist(
    dataset: &Dataset,
    country: Option<&str>,
    duration: Option<DurationSelection>,
) -> Vec<Section> {
    let overrides = country.and_then(|country| dataset.overrides_for(country));
    debug!(
        "event=checklist_compose module=compose status=start country={} has_overrides={} duration={}",
        country.unwrap_or("-"),
        overrides.is_some(),
        duration
            .map(|selection| selection.label())
            .unwrap_or_else(|| "-".to_string())
    );
    compose_sections(
        &dataset.sections,
        overrides,
        &dataset.duration_slot,
        duration,
    )
}

/// Composes explicit sections with an optional override set.
pub fn compose_sections(
    sections: &[Section],
    overrides: Option<&CountryOverrideSet>,
    slot: &DurationSlot,
    duration: Option<DurationSelection>,
) -> Vec<Section> {
    if let Some(overrides) = overrides {
        for section_id in overrides.keys() {
            if !sections.iter().any(|section| &section.id == section_id) {
                debug!(
                    "event=checklist_compose module=compose status=skip reason=unknown_section section={}",
                    section_id
                );
            }
        }
    }

    sections
        .iter()
        .map(|section| {
            let mut items = section.items.clone();
            if let Some(selection) = duration {
                if section.id == slot.section_id {
                    items = apply_duration_plan(&items, slot, duration_items(selection));
                }
            }
            if let Some(extra) = overrides.and_then(|set| set.get(&section.id)) {
                items = merge(&items, extra);
            }
            Section::new(section.id.clone(), section.title.clone(), items)
        })
        .collect()
}
