//! Keyword-to-link annotation of item text.
//!
//! # Responsibility
//! - Split free text into plain runs and linked keyword spans.
//! - Tag links for the presentation layer (affiliate, named campaign).
//!
//! # Invariants
//! - Longer keywords win; equal lengths keep lexicon insertion order.
//! - Linked spans never overlap.
//! - Concatenating every segment's text reproduces the input exactly.
//! - Scanning for one keyword resumes one character after each occurrence
//!   start, so overlapping occurrences are all considered.

use crate::lexicon::policy::LinkPolicy;
use crate::lexicon::{FieldKind, KeywordEntry, KeywordTable, Lexicon};
use crate::model::item::ChecklistItem;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Presentation metadata attached to a link.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum LinkTag {
    Affiliate,
    Campaign(String),
}

/// Unit of annotated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text {
        text: String,
    },
    Link {
        text: String,
        url: String,
        tags: BTreeSet<LinkTag>,
    },
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Display text of either variant.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } | Self::Link { text, .. } => text,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => None,
            Self::Link { url, .. } => Some(url.as_str()),
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }
}

/// Accepted keyword occurrence as a byte range of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a> {
    pub start: usize,
    pub end: usize,
    pub entry: &'a KeywordEntry,
}

impl KeywordMatch<'_> {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Annotates `text` with the lexicon selected by country and field.
///
/// Returns a single plain segment when the text is empty, the country is
/// absent or unknown, or the selected table is empty.
pub fn annotate(
    lexicon: &Lexicon,
    text: &str,
    country: Option<&str>,
    field: FieldKind,
) -> Vec<Segment> {
    let table = country.and_then(|country| lexicon.table(country, field));
    match table {
        Some(table) if !text.is_empty() && !table.is_empty() => {
            annotate_with_table(text, table, lexicon.policy())
        }
        _ => vec![Segment::plain(text)],
    }
}

/// Annotates `text` against one keyword table.
pub fn annotate_with_table(text: &str, table: &KeywordTable, policy: &LinkPolicy) -> Vec<Segment> {
    if text.is_empty() {
        return vec![Segment::plain(text)];
    }

    let matches = find_matches(text, table);
    if matches.is_empty() {
        return vec![Segment::plain(text)];
    }

    let mut segments = Vec::with_capacity(matches.len() * 2 + 1);
    let mut cursor = 0;
    for found in matches {
        if found.start > cursor {
            segments.push(Segment::plain(&text[cursor..found.start]));
        }
        segments.push(Segment::Link {
            text: text[found.start..found.end].to_string(),
            url: found.entry.url.clone(),
            tags: link_tags(&found.entry.url, policy),
        });
        cursor = found.end;
    }
    if cursor < text.len() {
        segments.push(Segment::plain(&text[cursor..]));
    }
    segments
}

/// Finds non-overlapping keyword occurrences ordered by start position.
pub fn find_matches<'a>(text: &str, table: &'a KeywordTable) -> Vec<KeywordMatch<'a>> {
    let mut keywords: Vec<&KeywordEntry> = table
        .iter()
        .filter(|entry| !entry.keyword.is_empty())
        .collect();
    keywords.sort_by(|left, right| {
        right
            .keyword
            .chars()
            .count()
            .cmp(&left.keyword.chars().count())
    });

    // Accepted spans keyed by start; disjoint, so only the nearest span
    // starting before a candidate's end can overlap it.
    let mut accepted: BTreeMap<usize, KeywordMatch<'a>> = BTreeMap::new();
    for entry in keywords {
        let keyword = entry.keyword.as_str();
        let mut from = 0;
        while let Some(offset) = text[from..].find(keyword) {
            let start = from + offset;
            let end = start + keyword.len();
            let blocked = accepted
                .range(..end)
                .next_back()
                .is_some_and(|(_, other)| other.overlaps(start, end));
            if !blocked {
                accepted.insert(start, KeywordMatch { start, end, entry });
            }
            from = start + next_char_len(text, start);
            if from >= text.len() {
                break;
            }
        }
    }

    let mut kept: Vec<KeywordMatch<'a>> = Vec::with_capacity(accepted.len());
    for found in accepted.into_values() {
        let clear = kept
            .last()
            .map_or(true, |last| !last.overlaps(found.start, found.end));
        if clear {
            kept.push(found);
        }
    }
    kept
}

/// Annotated projection of one item for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedItem {
    pub item: ChecklistItem,
    pub title: Vec<Segment>,
    pub description: Vec<Segment>,
}

/// Annotates both text fields of an item with their own tables.
pub fn annotate_item(lexicon: &Lexicon, item: &ChecklistItem, country: Option<&str>) -> AnnotatedItem {
    AnnotatedItem {
        item: item.clone(),
        title: annotate(lexicon, &item.title, country, FieldKind::Title),
        description: annotate(lexicon, &item.description, country, FieldKind::Description),
    }
}

fn link_tags(url: &str, policy: &LinkPolicy) -> BTreeSet<LinkTag> {
    let mut tags = BTreeSet::new();
    if policy.is_affiliate(url) {
        tags.insert(LinkTag::Affiliate);
    }
    if let Some(name) = policy.campaign(url) {
        tags.insert(LinkTag::Campaign(name.to_string()));
    }
    tags
}

fn next_char_len(text: &str, index: usize) -> usize {
    text[index..].chars().next().map_or(1, char::len_utf8)
}
