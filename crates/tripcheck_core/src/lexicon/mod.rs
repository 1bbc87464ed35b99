//! Per-country keyword lexicon.
//!
//! # Responsibility
//! - Hold keyword -> URL tables per country, split by field kind.
//! - Decode the lexicon document and resolve shared-group inclusion.
//!
//! # Invariants
//! - Tables keep insertion order; a repeated keyword keeps its first position
//!   and takes the later URL.
//! - Keywords are non-empty and URLs are absolute.
//! - Shared groups are copied in by inclusion; countries never inherit.

pub mod policy;

use self::policy::{url_host, LinkPolicy};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LexiconResult<T> = Result<T, LexiconError>;

/// Which item field a text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Title,
    Description,
}

/// One keyword phrase and its outbound URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub url: String,
}

/// Insertion-ordered keyword table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or re-targets a keyword.
    pub fn insert(&mut self, keyword: impl Into<String>, url: impl Into<String>) {
        let keyword = keyword.into();
        let url = url.into();
        match self.entries.iter_mut().find(|entry| entry.keyword == keyword) {
            Some(existing) => existing.url = url,
            None => self.entries.push(KeywordEntry { keyword, url }),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.keyword == keyword)
            .map(|entry| entry.url.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn extend_from(&mut self, other: &KeywordTable) {
        for entry in other.iter() {
            self.insert(entry.keyword.clone(), entry.url.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeywordTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (keyword, url) in iter {
            table.insert(keyword, url);
        }
        table
    }
}

/// Title and description tables for one country.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryLexicon {
    pub title: KeywordTable,
    pub description: KeywordTable,
}

impl CountryLexicon {
    pub fn table(&self, field: FieldKind) -> &KeywordTable {
        match field {
            FieldKind::Title => &self.title,
            FieldKind::Description => &self.description,
        }
    }
}

/// Read-only lexicon for every supported destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    countries: BTreeMap<String, CountryLexicon>,
    policy: LinkPolicy,
}

impl Lexicon {
    pub fn new(policy: LinkPolicy) -> Self {
        Self {
            countries: BTreeMap::new(),
            policy,
        }
    }

    /// Registers (or replaces) one country's tables.
    pub fn insert_country(&mut self, country: impl Into<String>, lexicon: CountryLexicon) {
        self.countries.insert(country.into(), lexicon);
    }

    /// Returns the table for a country and field, if the country is known.
    pub fn table(&self, country: &str, field: FieldKind) -> Option<&KeywordTable> {
        self.countries
            .get(country)
            .map(|lexicon| lexicon.table(field))
    }

    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    /// Sorted country keys.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }

    /// Decodes and validates a lexicon document.
    ///
    /// # Errors
    /// - Returns `Json` when the document does not decode.
    /// - Returns `UnknownInclude` when a country includes an undefined group.
    /// - Returns `EmptyKeyword` / `InvalidUrl` for bad entries.
    pub fn from_json_str(json: &str) -> LexiconResult<Self> {
        let document: LexiconDocument = serde_json::from_str(json)?;

        let mut shared = BTreeMap::new();
        for (name, group) in &document.shared {
            shared.insert(name.as_str(), group.to_lexicon(name)?);
        }

        let mut lexicon = Self::new(document.policy);
        for (country, raw) in &document.countries {
            let mut resolved = CountryLexicon::default();
            for group_name in &raw.include {
                let group =
                    shared
                        .get(group_name.as_str())
                        .ok_or_else(|| LexiconError::UnknownInclude {
                            country: country.clone(),
                            group: group_name.clone(),
                        })?;
                resolved.title.extend_from(&group.title);
                resolved.description.extend_from(&group.description);
            }
            let own = raw.tables.to_lexicon(country)?;
            resolved.title.extend_from(&own.title);
            resolved.description.extend_from(&own.description);
            lexicon.insert_country(country.clone(), resolved);
        }

        info!(
            "event=lexicon_load module=lexicon status=ok countries={} shared_groups={}",
            lexicon.countries.len(),
            shared.len()
        );
        Ok(lexicon)
    }
}

#[derive(Debug, Deserialize)]
struct LexiconDocument {
    #[serde(default)]
    policy: LinkPolicy,
    #[serde(default)]
    shared: BTreeMap<String, RawTables>,
    #[serde(default)]
    countries: BTreeMap<String, RawCountry>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTables {
    #[serde(default)]
    title: Vec<KeywordEntry>,
    #[serde(default)]
    description: Vec<KeywordEntry>,
}

impl RawTables {
    fn to_lexicon(&self, owner: &str) -> LexiconResult<CountryLexicon> {
        Ok(CountryLexicon {
            title: validated_table(owner, &self.title)?,
            description: validated_table(owner, &self.description)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    #[serde(default)]
    include: Vec<String>,
    #[serde(flatten)]
    tables: RawTables,
}

fn validated_table(owner: &str, entries: &[KeywordEntry]) -> LexiconResult<KeywordTable> {
    let mut table = KeywordTable::new();
    for entry in entries {
        if entry.keyword.is_empty() {
            return Err(LexiconError::EmptyKeyword {
                owner: owner.to_string(),
            });
        }
        if url_host(&entry.url).is_none() {
            return Err(LexiconError::InvalidUrl {
                keyword: entry.keyword.clone(),
                url: entry.url.clone(),
            });
        }
        table.insert(entry.keyword.clone(), entry.url.clone());
    }
    Ok(table)
}

/// Lexicon decode/validation errors.
#[derive(Debug)]
pub enum LexiconError {
    Json(serde_json::Error),
    EmptyKeyword { owner: String },
    InvalidUrl { keyword: String, url: String },
    UnknownInclude { country: String, group: String },
}

impl Display for LexiconError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid lexicon document: {err}"),
            Self::EmptyKeyword { owner } => write!(f, "lexicon `{owner}` has an empty keyword"),
            Self::InvalidUrl { keyword, url } => {
                write!(f, "keyword `{keyword}` maps to non-absolute url `{url}`")
            }
            Self::UnknownInclude { country, group } => {
                write!(f, "country `{country}` includes unknown group `{group}`")
            }
        }
    }
}

impl Error for LexiconError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LexiconError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
