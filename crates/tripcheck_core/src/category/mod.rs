//! Cross-section category completion.
//!
//! # Responsibility
//! - Resolve category title patterns to concrete items across sections.
//! - Report per-category and aggregate completion from checked ids.
//!
//! # Invariants
//! - A pattern matches by title equality or substring containment.
//! - An empty pattern list never completes.
//! - Checked ids are caller-owned; nothing here persists them.

use crate::model::category::Category;
use crate::model::item::{ChecklistItem, Section};
use serde::Serialize;
use std::collections::BTreeSet;

/// Returns every item whose title equals or contains any pattern.
///
/// Items are returned in section order, then item order. Malformed items
/// and empty patterns are ignored.
pub fn match_category<'a>(patterns: &[String], sections: &'a [Section]) -> Vec<&'a ChecklistItem> {
    let patterns: Vec<&str> = patterns
        .iter()
        .map(String::as_str)
        .filter(|pattern| !pattern.is_empty())
        .collect();
    if patterns.is_empty() {
        return Vec::new();
    }

    sections
        .iter()
        .flat_map(|section| section.items.iter())
        .filter(|item| item.is_well_formed())
        .filter(|item| {
            patterns
                .iter()
                .any(|pattern| item.title == *pattern || item.title.contains(pattern))
        })
        .collect()
}

/// Returns whether every matched item is checked. False when nothing matches.
pub fn is_category_complete(
    patterns: &[String],
    sections: &[Section],
    checked_ids: &BTreeSet<String>,
) -> bool {
    let matched = match_category(patterns, sections);
    !matched.is_empty() && matched.iter().all(|item| checked_ids.contains(&item.id))
}

/// Completion snapshot of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStatus {
    pub id: String,
    pub label: String,
    pub matched_ids: Vec<String>,
    pub checked_count: usize,
    pub completed: bool,
}

/// Completion snapshot of a category list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub categories: Vec<CategoryStatus>,
    pub completed: usize,
    pub total: usize,
}

pub fn category_status(
    category: &Category,
    sections: &[Section],
    checked_ids: &BTreeSet<String>,
) -> CategoryStatus {
    let matched = match_category(&category.title_patterns, sections);
    let checked_count = matched
        .iter()
        .filter(|item| checked_ids.contains(&item.id))
        .count();
    CategoryStatus {
        id: category.id.clone(),
        label: category.label.clone(),
        completed: !matched.is_empty() && checked_count == matched.len(),
        matched_ids: matched.iter().map(|item| item.id.clone()).collect(),
        checked_count,
    }
}

pub fn category_report(
    categories: &[Category],
    sections: &[Section],
    checked_ids: &BTreeSet<String>,
) -> CategoryReport {
    let statuses: Vec<CategoryStatus> = categories
        .iter()
        .map(|category| category_status(category, sections, checked_ids))
        .collect();
    CategoryReport {
        completed: statuses.iter().filter(|status| status.completed).count(),
        total: statuses.len(),
        categories: statuses,
    }
}

/// Returns `(checked, total)` for one section.
pub fn section_progress(section: &Section, checked_ids: &BTreeSet<String>) -> (usize, usize) {
    let checked = section
        .items
        .iter()
        .filter(|item| checked_ids.contains(&item.id))
        .count();
    (checked, section.items.len())
}
