//! Duration-driven positional insertion.
//!
//! # Responsibility
//! - Parse trip-length selections coming from the presentation selector.
//! - Generate the ordered duration-specific packing items.
//! - Splice generated items after an anchor item before override merge runs.
//!
//! # Invariants
//! - Removal affects only the one item whose id equals the slot's removed id.
//! - A missing anchor prepends generated items; they are never dropped.

use crate::model::item::ChecklistItem;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static DURATION_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})\s*(?:(\+)|-\s*(\d{1,3}))?\s*(?:nights?)?$")
        .expect("valid duration label regex")
});

/// Trip length at which a laundry kit is added.
const LAUNDRY_MIN_NIGHTS: u32 = 7;
/// Upper bound on generated clothing counts; longer trips assume laundry.
const MAX_CLOTHING_SETS: u32 = 5;

/// Where duration items land in the base schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSlot {
    pub section_id: String,
    /// Generic item replaced by the generated ones.
    pub remove_item_id: String,
    /// Generated items are inserted right after this item.
    pub anchor_item_id: String,
}

impl Default for DurationSlot {
    fn default() -> Self {
        Self {
            section_id: "packing".to_string(),
            remove_item_id: "underwear".to_string(),
            anchor_item_id: "clothing".to_string(),
        }
    }
}

/// Parsed trip-length selection in nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSelection {
    pub min_nights: u32,
    /// `None` for open-ended selections such as `7+`.
    pub max_nights: Option<u32>,
}

impl DurationSelection {
    /// Parses selector labels: `1`, `2-3`, `7+`, `4-6 nights`.
    pub fn parse(label: &str) -> Result<Self, DurationError> {
        let normalized = label.trim().to_ascii_lowercase();
        let captures = DURATION_LABEL_RE
            .captures(normalized.as_str())
            .ok_or_else(|| DurationError::InvalidLabel(label.to_string()))?;

        let min_nights = parse_nights(&captures[1], label)?;
        let max_nights = if captures.get(2).is_some() {
            None
        } else if let Some(upper) = captures.get(3) {
            let upper = parse_nights(upper.as_str(), label)?;
            if upper < min_nights {
                return Err(DurationError::ReversedRange {
                    min: min_nights,
                    max: upper,
                });
            }
            Some(upper)
        } else {
            Some(min_nights)
        };

        if min_nights == 0 && max_nights == Some(0) {
            return Err(DurationError::InvalidLabel(label.to_string()));
        }

        Ok(Self {
            min_nights,
            max_nights,
        })
    }

    /// Nights used for sizing: the upper bound, or the lower bound when open.
    pub fn sizing_nights(&self) -> u32 {
        self.max_nights.unwrap_or(self.min_nights)
    }

    /// Selector label that round-trips through [`DurationSelection::parse`].
    pub fn label(&self) -> String {
        match self.max_nights {
            None => format!("{}+", self.min_nights),
            Some(max) if max == self.min_nights => max.to_string(),
            Some(max) => format!("{}-{}", self.min_nights, max),
        }
    }
}

fn parse_nights(value: &str, label: &str) -> Result<u32, DurationError> {
    value
        .parse::<u32>()
        .map_err(|_| DurationError::InvalidLabel(label.to_string()))
}

/// Duration selection parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    InvalidLabel(String),
    ReversedRange { min: u32, max: u32 },
}

impl Display for DurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLabel(value) => write!(
                f,
                "invalid duration `{value}`; expected N, N-M or N+ nights"
            ),
            Self::ReversedRange { min, max } => {
                write!(f, "duration range {min}-{max} is reversed")
            }
        }
    }
}

impl Error for DurationError {}

/// Generates the ordered duration-specific packing items.
///
/// Clothing counts are one set per night plus one, capped for long trips,
/// which additionally get a laundry kit.
pub fn duration_items(selection: DurationSelection) -> Vec<ChecklistItem> {
    let nights = selection.sizing_nights();
    let sets = (nights + 1).min(MAX_CLOTHING_SETS);
    let label = selection.label();

    let mut items = vec![
        ChecklistItem::new("duration_underwear", format!("Underwear ({sets} sets)"))
            .with_description(format!("Sized for a {label} night trip.")),
        ChecklistItem::new("duration_socks", format!("Socks ({sets} pairs)"))
            .with_description(format!("Sized for a {label} night trip.")),
    ];
    if nights >= LAUNDRY_MIN_NIGHTS {
        items.push(
            ChecklistItem::new("duration_laundry", "Laundry kit").with_description(
                "Travel detergent and a clothesline for washing on the road.",
            ),
        );
    }
    items
}

/// Removes the slot's generic item and splices `generated` after its anchor.
///
/// Runs before title merge so overrides can still supersede inserted items.
pub fn apply_duration_plan(
    items: &[ChecklistItem],
    slot: &DurationSlot,
    generated: Vec<ChecklistItem>,
) -> Vec<ChecklistItem> {
    let mut result: Vec<ChecklistItem> = Vec::with_capacity(items.len() + generated.len());
    let mut removed = false;
    for item in items {
        if !removed && item.id == slot.remove_item_id {
            removed = true;
            continue;
        }
        result.push(item.clone());
    }

    let insert_at = match result
        .iter()
        .position(|item| item.id == slot.anchor_item_id)
    {
        Some(index) => index + 1,
        None => {
            debug!(
                "event=duration_insert module=compose status=fallback reason=anchor_missing anchor={}",
                slot.anchor_item_id
            );
            0
        }
    };
    result.splice(insert_at..insert_at, generated);
    result
}

#[cfg(test)]
mod tests {
    use super::{apply_duration_plan, duration_items, DurationError, DurationSelection, DurationSlot};
    use crate::model::item::ChecklistItem;

    fn packing() -> Vec<ChecklistItem> {
        vec![
            ChecklistItem::new("clothing", "Clothing"),
            ChecklistItem::new("underwear", "Underwear"),
            ChecklistItem::new("pouch", "Pouch"),
        ]
    }

    fn ids(items: &[ChecklistItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn parses_selector_labels() {
        assert_eq!(
            DurationSelection::parse("2-3").unwrap(),
            DurationSelection {
                min_nights: 2,
                max_nights: Some(3)
            }
        );
        assert_eq!(DurationSelection::parse("7+").unwrap().max_nights, None);
        assert_eq!(
            DurationSelection::parse(" 4 - 6 Nights ").unwrap().label(),
            "4-6"
        );
        assert_eq!(DurationSelection::parse("1 night").unwrap().label(), "1");
    }

    #[test]
    fn rejects_malformed_labels() {
        assert!(matches!(
            DurationSelection::parse("a week"),
            Err(DurationError::InvalidLabel(_))
        ));
        assert_eq!(
            DurationSelection::parse("5-2"),
            Err(DurationError::ReversedRange { min: 5, max: 2 })
        );
        assert!(DurationSelection::parse("0").is_err());
    }

    #[test]
    fn short_trips_get_two_items_long_trips_get_laundry() {
        let short = duration_items(DurationSelection::parse("2-3").unwrap());
        assert_eq!(ids(&short), vec!["duration_underwear", "duration_socks"]);
        assert_eq!(short[0].title, "Underwear (4 sets)");

        let long = duration_items(DurationSelection::parse("7+").unwrap());
        assert_eq!(long.len(), 3);
        assert_eq!(long[0].title, "Underwear (5 sets)");
    }

    #[test]
    fn inserts_after_anchor_and_removes_generic_item() {
        let generated = vec![
            ChecklistItem::new("g1", "Generated 1"),
            ChecklistItem::new("g2", "Generated 2"),
        ];
        let result = apply_duration_plan(&packing(), &DurationSlot::default(), generated);
        assert_eq!(ids(&result), vec!["clothing", "g1", "g2", "pouch"]);
    }

    #[test]
    fn missing_anchor_prepends_generated_items() {
        let slot = DurationSlot {
            anchor_item_id: "missing".to_string(),
            ..DurationSlot::default()
        };
        let result = apply_duration_plan(&packing(), &slot, vec![ChecklistItem::new("g1", "G")]);
        assert_eq!(ids(&result), vec!["g1", "clothing", "pouch"]);
    }

    #[test]
    fn removal_touches_only_the_first_matching_id() {
        let mut items = packing();
        items.push(ChecklistItem::new("underwear_spare", "Underwear spare"));
        let result = apply_duration_plan(&items, &DurationSlot::default(), Vec::new());
        assert_eq!(ids(&result), vec!["clothing", "pouch", "underwear_spare"]);
    }
}
