//! Title-keyed overlay of override items onto base items.
//!
//! # Responsibility
//! - Substitute override items in place of equally-titled base items.
//! - Append override-only items after every base-derived item.
//!
//! # Invariants
//! - Output never contains two items with the same title or the same id.
//! - Relative order of base items is preserved.
//! - Appended items keep the override list's relative order.
//! - Title comparison is exact string equality.
//! - Any post-condition breach degrades to the unmodified base list.

use crate::model::item::ChecklistItem;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Internal merge failure. Never surfaced by [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    DuplicateTitle(String),
    DuplicateId(String),
}

impl Display for MergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTitle(title) => write!(f, "merged list repeats title `{title}`"),
            Self::DuplicateId(id) => write!(f, "merged list repeats id `{id}`"),
        }
    }
}

impl Error for MergeError {}

/// Overlays `overrides` onto `base`.
///
/// Malformed items (blank id or title) are skipped, as are override items
/// whose id is already taken by another item in the output. If the result
/// still breaks title or id uniqueness, the base list is returned unchanged,
/// or the filtered override list when the base has no usable items.
pub fn merge(base: &[ChecklistItem], overrides: &[ChecklistItem]) -> Vec<ChecklistItem> {
    let overrides = well_formed(overrides, "override");
    if overrides.is_empty() {
        return base.to_vec();
    }

    match try_merge(base, &overrides) {
        Ok(merged) => merged,
        Err(err) => {
            warn!(
                "event=checklist_merge module=compose status=fallback base_len={} override_len={} error={}",
                base.len(),
                overrides.len(),
                err
            );
            if base.iter().any(ChecklistItem::is_well_formed) {
                base.to_vec()
            } else {
                overrides.into_iter().cloned().collect()
            }
        }
    }
}

/// Strict variant of [`merge`] that reports post-condition failures.
///
/// `overrides` must already be filtered to well-formed items.
pub fn try_merge(
    base: &[ChecklistItem],
    overrides: &[&ChecklistItem],
) -> Result<Vec<ChecklistItem>, MergeError> {
    let mut by_title: HashMap<&str, &ChecklistItem> = HashMap::with_capacity(overrides.len());
    for item in overrides {
        by_title.entry(item.title.as_str()).or_insert(*item);
    }

    let base = well_formed(base, "base");
    let mut base_titles: HashSet<&str> = HashSet::with_capacity(base.len());
    let mut rows: Vec<&ChecklistItem> = Vec::with_capacity(base.len());
    for item in base {
        if base_titles.insert(item.title.as_str()) {
            rows.push(item);
        } else {
            debug!(
                "event=checklist_merge module=compose status=skip reason=repeated_base_title id={}",
                item.id
            );
        }
    }

    // Ids of base rows that stay in place; substitutes may not reuse them.
    let kept_ids: HashSet<&str> = rows
        .iter()
        .filter(|item| !by_title.contains_key(item.title.as_str()))
        .map(|item| item.id.as_str())
        .collect();

    let mut merged = Vec::with_capacity(rows.len() + overrides.len());
    let mut used_ids: HashSet<&str> = HashSet::with_capacity(rows.len() + overrides.len());
    for item in rows.iter().copied() {
        let mut chosen = item;
        if let Some(substitute) = by_title.get(item.title.as_str()).copied() {
            let id = substitute.id.as_str();
            if id != item.id && (kept_ids.contains(id) || used_ids.contains(id)) {
                skip_colliding(substitute);
            } else {
                chosen = substitute;
            }
        }
        if !used_ids.insert(chosen.id.as_str()) {
            skip_colliding(chosen);
            continue;
        }
        merged.push(chosen.clone());
    }

    let mut appended: HashSet<&str> = HashSet::new();
    for item in overrides {
        let title = item.title.as_str();
        if base_titles.contains(title) || !appended.insert(title) {
            continue;
        }
        if !used_ids.insert(item.id.as_str()) {
            skip_colliding(item);
            continue;
        }
        merged.push((*item).clone());
    }

    ensure_unique(&merged)?;
    Ok(merged)
}

fn skip_colliding(item: &ChecklistItem) {
    warn!(
        "event=checklist_merge module=compose status=skip reason=id_in_use id={}",
        item.id
    );
}

fn well_formed<'a>(items: &'a [ChecklistItem], origin: &str) -> Vec<&'a ChecklistItem> {
    items
        .iter()
        .filter(|item| {
            let ok = item.is_well_formed();
            if !ok {
                warn!(
                    "event=checklist_merge module=compose status=skip reason=malformed_item origin={} id={:?}",
                    origin, item.id
                );
            }
            ok
        })
        .collect()
}

fn ensure_unique(items: &[ChecklistItem]) -> Result<(), MergeError> {
    let mut titles = HashSet::with_capacity(items.len());
    let mut ids = HashSet::with_capacity(items.len());
    for item in items {
        if !titles.insert(item.title.as_str()) {
            return Err(MergeError::DuplicateTitle(item.title.clone()));
        }
        if !ids.insert(item.id.as_str()) {
            return Err(MergeError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}
